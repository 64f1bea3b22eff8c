//! Error types for ecendpoint
//!
//! Maps library errors onto user-facing messages with suggestions.

use colored::Colorize;
use ecendpoint_core::{ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: no replication groups or cache clusters associated with 'my-redis'
///
///   tip: check the region: ecendpoint resolve my-redis --region <region>
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for description in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
        }
    }
}

/// Main error type for the ecendpoint application
#[derive(Error, Debug)]
pub enum EcEndpointError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Missing credentials for profile '{name}'")]
    MissingCredentials { name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    NotFound { cluster_id: String, message: String },

    #[error("{message}")]
    Ambiguous { message: String },

    #[error("{message}")]
    Incompatible { message: String },

    #[error("API error: {message}")]
    ApiError {
        message: String,
        retryable: bool,
    },

    /// First failure under panic-on-error; printed without suggestions
    #[error("{message}")]
    Aborted { message: String },

    #[error("{failed} of {total} clusters failed to resolve")]
    PartialFailure { failed: usize, total: usize },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for ecendpoint operations
pub type Result<T> = std::result::Result<T, EcEndpointError>;

impl EcEndpointError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            EcEndpointError::ProfileNotFound { name } => vec![
                "List available profiles: ecendpoint profile list".to_string(),
                format!("Create profile '{}': ecendpoint profile set {}", name, name),
                "Check profile name spelling".to_string(),
            ],
            EcEndpointError::MissingCredentials { name } => vec![
                format!(
                    "Set static keys: ecendpoint profile set {} --access-key <id> --secret-key <secret>",
                    name
                ),
                format!(
                    "Or use keys from the environment: ecendpoint profile set {} --credentials environment",
                    name
                ),
                format!("Check profile details: ecendpoint profile show {}", name),
            ],
            EcEndpointError::NotFound { cluster_id, .. } => vec![
                format!(
                    "Check the region: ecendpoint resolve {} --region <region>",
                    cluster_id
                ),
                "Verify the replication group or cache cluster id".to_string(),
                "Check that you're using the correct profile".to_string(),
            ],
            EcEndpointError::Ambiguous { .. } => vec![
                "Pass the exact replication group id rather than a prefix".to_string(),
            ],
            EcEndpointError::Incompatible { .. } => vec![
                "Use 'ecendpoint primary <id>' for groups without cluster mode".to_string(),
                "Inspect the topology: ecendpoint resolve <id>".to_string(),
            ],
            EcEndpointError::ApiError { retryable: true, .. } => vec![
                "The request was throttled; retry after a short wait".to_string(),
            ],
            EcEndpointError::ApiError { message, .. }
                if message.contains("credentials") || message.contains("AccessDenied") =>
            {
                vec![
                    "Check which credential sources the profile uses: ecendpoint profile show <profile>"
                        .to_string(),
                    "Verify the IAM identity allows elasticache:Describe* actions".to_string(),
                ]
            }
            EcEndpointError::ApiError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify --endpoint-url if you are targeting a custom endpoint".to_string(),
            ],
            EcEndpointError::InvalidInput { .. } => vec![
                "Check the command syntax: ecendpoint <command> --help".to_string(),
            ],
            EcEndpointError::Configuration(_) => vec![
                "Show the configuration file location: ecendpoint profile path".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let EcEndpointError::PartialFailure { .. } = self {
            diag = diag.detail("each failure is reported above");
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }

    /// Convert to the panic-on-error form, keeping only the message
    pub fn into_aborted(self) -> Self {
        match self {
            EcEndpointError::Aborted { .. } => self,
            other => EcEndpointError::Aborted {
                message: other.to_string(),
            },
        }
    }

    /// Abort under panic-on-error, otherwise keep the error as is
    pub fn aborted_if(self, abort: bool) -> Self {
        if abort { self.into_aborted() } else { self }
    }
}

impl From<CoreError> for EcEndpointError {
    fn from(err: CoreError) -> Self {
        let retryable = err.is_retryable();
        match err {
            CoreError::MissingIdentifier => EcEndpointError::InvalidInput {
                message: err.to_string(),
            },
            CoreError::NotFound { ref cluster_id } => EcEndpointError::NotFound {
                cluster_id: cluster_id.clone(),
                message: err.to_string(),
            },
            CoreError::Ambiguous { .. } => EcEndpointError::Ambiguous {
                message: err.to_string(),
            },
            CoreError::NotClusterConfiguration { .. } | CoreError::NoEndpoint { .. } => {
                EcEndpointError::Incompatible {
                    message: err.to_string(),
                }
            }
            CoreError::Upstream { .. } => EcEndpointError::ApiError {
                message: err.to_string(),
                retryable,
            },
            CoreError::Config(config_err) => EcEndpointError::from(config_err),
        }
    }
}

impl From<ConfigError> for EcEndpointError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => EcEndpointError::ProfileNotFound { name },
            ConfigError::EmptyValue { .. } | ConfigError::InvalidEndpoint { .. } => {
                EcEndpointError::InvalidInput {
                    message: err.to_string(),
                }
            }
            _ => EcEndpointError::Configuration(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for EcEndpointError {
    fn from(err: serde_json::Error) -> Self {
        EcEndpointError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for EcEndpointError {
    fn from(err: std::io::Error) -> Self {
        EcEndpointError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for EcEndpointError {
    fn from(err: anyhow::Error) -> Self {
        EcEndpointError::Configuration(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_with_cluster_id() {
        let err = EcEndpointError::from(CoreError::NotFound {
            cluster_id: "my-redis".to_string(),
        });
        assert!(matches!(err, EcEndpointError::NotFound { ref cluster_id, .. } if cluster_id == "my-redis"));
        assert!(err.suggestions()[0].contains("ecendpoint resolve my-redis --region"));
    }

    #[test]
    fn test_missing_identifier_is_invalid_input() {
        let err = EcEndpointError::from(CoreError::MissingIdentifier);
        assert!(matches!(err, EcEndpointError::InvalidInput { .. }));
        assert!(err.to_string().contains("no cluster name provided"));
    }

    #[test]
    fn test_profile_not_found_passes_through_core() {
        let err = EcEndpointError::from(CoreError::Config(ConfigError::ProfileNotFound {
            name: "prod".to_string(),
        }));
        assert!(matches!(err, EcEndpointError::ProfileNotFound { ref name } if name == "prod"));
    }

    #[test]
    fn test_throttled_upstream_suggests_retry() {
        let err = EcEndpointError::from(CoreError::Upstream {
            operation: "DescribeReplicationGroups",
            code: Some("Throttling".to_string()),
            message: "Rate exceeded".to_string(),
        });
        assert!(matches!(err, EcEndpointError::ApiError { retryable: true, .. }));
        assert!(err.suggestions()[0].contains("retry"));
    }

    #[test]
    fn test_aborted_keeps_message_and_drops_suggestions() {
        let err = EcEndpointError::from(CoreError::NotFound {
            cluster_id: "x".to_string(),
        })
        .into_aborted();
        assert!(err.to_string().contains("associated with 'x'"));
        assert!(err.suggestions().is_empty());
    }

    #[test]
    fn test_partial_failure_message() {
        let err = EcEndpointError::PartialFailure {
            failed: 2,
            total: 3,
        };
        assert_eq!(err.to_string(), "2 of 3 clusters failed to resolve");
    }
}
