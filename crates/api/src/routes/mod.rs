pub mod attach;
pub mod health;
