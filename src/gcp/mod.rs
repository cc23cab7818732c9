#[cfg(feature = "reqwest")]
pub mod auth;

#[cfg(feature = "reqwest")]
pub mod gcs;

pub mod types;

#[cfg(feature = "reqwest")]
pub use auth::TokenProvider;
