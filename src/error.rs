//! # Error taxonomy
//!
//! Every public operation of this crate fails with one of four kinds. Lower
//! layers (HTTP calls, token signing) work with `anyhow` and are folded into
//! [`Error::Backend`] at the client boundary so the full cause chain survives
//! in the message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// One or more required configuration variables could not be resolved.
    #[error("missing configuration for {schema}: {}", .missing.join(", "))]
    MissingConfiguration {
        schema: String,
        missing: Vec<String>,
    },

    /// The service-account credential is malformed or was rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A caller-supplied mode, format or parameter is not acceptable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any remote transport, permission or local I/O failure.
    #[error("{op} failed: {cause:#}")]
    Backend {
        op: &'static str,
        cause: anyhow::Error,
    },
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn backend(op: &'static str, cause: anyhow::Error) -> Self {
        Error::Backend { op, cause }
    }

    /// Short kind name, handy for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingConfiguration { .. } => "MissingConfiguration",
            Error::Authentication(_) => "AuthenticationError",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::Backend { .. } => "BackendError",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn missing_configuration_lists_every_name() {
        let err = Error::MissingConfiguration {
            schema: "GoogleAuthentication".to_string(),
            missing: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing configuration for GoogleAuthentication: A, B"
        );
        assert_eq!(err.kind(), "MissingConfiguration");
    }

    #[test]
    fn backend_message_keeps_cause_chain() {
        let cause = Err::<(), _>(anyhow!("connection reset"))
            .context("Failed to call GCS list API")
            .unwrap_err();
        let err = Error::backend("list_buckets", cause);
        assert_eq!(
            err.to_string(),
            "list_buckets failed: Failed to call GCS list API: connection reset"
        );
        assert_eq!(err.kind(), "BackendError");
    }
}
