pub mod appointments;
pub mod error;
pub mod health;

pub use error::ApiError;
