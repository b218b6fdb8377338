pub mod account;
pub mod health;
pub mod transfer;

pub use account::{RegisterResponse, get_pocket, login, register};
pub use health::{HealthResponse, health_check};
pub use transfer::process_transfer;
