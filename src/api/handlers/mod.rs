pub mod consumers;
pub mod events;
pub mod health;
pub mod topics;
