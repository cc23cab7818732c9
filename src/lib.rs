// # gcs_helper: Moving Files and Tables In and Out of Cloud Storage
//
// This crate wraps a Google Cloud Storage connection in a small client with
// convenience methods: list buckets, upload a file, download one object or a
// whole prefix, and upload an in-memory table directly as CSV, Parquet or JSON.
//
// The GCS backend is enabled with the `reqwest` feature; everything else
// (configuration, formats, the client itself) works against any
// `store::ObjectStore`.

/// Configuration descriptors and variable sources.
pub mod config;

/// The injected logging sink.
pub mod diag;

/// Error taxonomy shared by every operation.
pub mod error;

/// Table encodings and object naming.
pub mod format;

/// The backend seam.
pub mod store;

/// The storage client.
pub mod client;

/// Google Cloud Platform utilities: service-account auth and the GCS backend.
pub mod gcp;

pub use client::{DEFAULT_DOWNLOAD_DIR, DownloadMode, StorageClient};
pub use diag::Diagnostics;
pub use error::{Error, Result};
pub use format::FileFormat;
pub use store::ObjectStore;
