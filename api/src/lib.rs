//! Thin HTTP client for the hosted deck-generation service.

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;
