pub mod error;
pub mod health;
pub mod openapi;
pub mod todos;

pub use error::{AppError, ErrorResponse};
