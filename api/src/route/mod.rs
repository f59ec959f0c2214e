pub mod event;
pub mod health;
pub mod reservation;
pub mod user;
pub mod v1;
