//! REST API client module for the remote user source.
//!
//! This module provides the `ApiClient` for fetching the user collection
//! from the remote endpoint. The endpoint requires no authentication and
//! takes no query parameters.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
