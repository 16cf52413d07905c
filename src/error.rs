//! Unified startup and infrastructure error type.
//!
//! Application-level failures (a bad filter value, an episode that does not
//! exist) are expressed as HTTP responses, not as `Error`s; see
//! [`api::ApiError`](crate::api::ApiError). This type covers the conditions
//! that abort startup: the dataset cannot be loaded, or the listener cannot
//! be bound.

use std::net::SocketAddr;
use std::path::PathBuf;

/// The error type returned by circus' fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured bind address is not a `host:port` string.
    #[error("invalid bind address `{addr}`")]
    BindAddr {
        addr: String,
        source: std::net::AddrParseError,
    },

    /// The listener could not be bound.
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Socket-level failure after startup.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset file could not be read.
    #[error("failed to read dataset `{}`", path.display())]
    DatasetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The dataset file is not a JSON array of script records.
    #[error("dataset `{}` is not valid scripts JSON", path.display())]
    DatasetParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The dataset parsed but holds no records.
    #[error("dataset contains no records")]
    EmptyDataset,
}
