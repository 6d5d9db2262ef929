//! Core types and error handling shared across the pipeline.

pub mod error;

pub use error::{ErrorContext, SproutError, user_friendly_error};
