//! # Google Cloud Storage (GCS) Client
//!
//! This module provides a client for the Google Cloud Storage JSON API. It is
//! the production [`crate::store::ObjectStore`] behind
//! [`crate::client::StorageClient`].
//!
//! ## Submodules
//! - `client`: Contains the core client logic for making API requests to GCS.
//! - `types`: Defines the data structures deserialized from the GCS API.

/// Core client for GCS API requests.
pub mod client;
/// Data structures for the GCS API.
pub mod types;

// Re-export key components to provide a convenient public API for this module.
pub use client::{GcsClient, encode_object_name, parse_gs_url};
pub use types::*;
