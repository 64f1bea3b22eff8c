//! Unified error handling for ecendpoint-core
//!
//! Every resolution failure is a distinct [`CoreError`] variant with helper
//! predicates, so callers can branch without matching on messages.
//!
//! # Example
//!
//! ```rust
//! use ecendpoint_core::{CoreError, LookupKind};
//!
//! let err = CoreError::Ambiguous {
//!     cluster_id: "cache-01".to_string(),
//!     kind: LookupKind::ReplicationGroup,
//!     count: 2,
//! };
//! assert!(err.is_ambiguous());
//! assert!(!err.is_retryable());
//! ```

use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

/// Error codes the SDK reports for throttled requests
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
];

/// Which describe call an ambiguous or missing match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    ReplicationGroup,
    CacheCluster,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::ReplicationGroup => write!(f, "replication groups"),
            LookupKind::CacheCluster => write!(f, "cache clusters"),
        }
    }
}

/// Core error type for session building and endpoint resolution
#[derive(Error, Debug)]
pub enum CoreError {
    /// Empty cluster identifier
    #[error("no cluster name provided")]
    MissingIdentifier,

    /// Neither a replication group nor a cache cluster matched
    #[error("no replication groups or cache clusters associated with '{cluster_id}'")]
    NotFound { cluster_id: String },

    /// More than one match for an identifier that should be unique
    #[error("{count} {kind} match '{cluster_id}', expected exactly one")]
    Ambiguous {
        cluster_id: String,
        kind: LookupKind,
        count: usize,
    },

    /// Configuration endpoint requested on a group without cluster mode
    #[error("no configuration endpoint on '{cluster_id}', perhaps this is not a cluster configuration")]
    NotClusterConfiguration { cluster_id: String },

    /// Matched cluster carries no usable endpoint information
    #[error("no endpoint available for '{cluster_id}'")]
    NoEndpoint { cluster_id: String },

    /// The ElastiCache API call itself failed
    #[error("{operation} failed: {message}")]
    Upstream {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    /// Configuration or session error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if no cluster matched the identifier
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns true if the identifier matched more than one resource
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, CoreError::Ambiguous { .. })
    }

    /// Returns true for caller mistakes (empty identifier, bad configuration)
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, CoreError::MissingIdentifier | CoreError::Config(_))
    }

    /// Returns true if the cluster exists but cannot satisfy the request
    #[must_use]
    pub fn is_incompatible(&self) -> bool {
        matches!(
            self,
            CoreError::NotClusterConfiguration { .. } | CoreError::NoEndpoint { .. }
        )
    }

    /// Returns true if the failure came from the ElastiCache API
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, CoreError::Upstream { .. })
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Upstream {
                code: Some(code), ..
            } => THROTTLING_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}
