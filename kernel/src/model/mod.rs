pub mod catalog;
pub mod id;
pub mod reservation;
pub mod role;
pub mod user;
