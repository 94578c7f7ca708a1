//! Task REST API.

pub mod error;
pub mod tasks;

pub use error::ApiError;
