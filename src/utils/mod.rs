//! Utility modules

pub mod error;

pub use error::{Result, ServiceError};
