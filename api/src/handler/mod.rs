pub mod event;
pub mod health;
pub mod reservation;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;
