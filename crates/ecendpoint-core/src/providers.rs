//! Credential sources and their SDK providers
//!
//! A [`CredentialSource`] is a plain descriptor held by
//! [`ClientConfig`](crate::ClientConfig). Sources are only materialized into
//! SDK providers when the session is built, so environment variables and
//! credential files are read at resolution time, not at configuration time.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use aws_config::ecs::EcsCredentialsProvider;
use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_config::imds::client::Client as ImdsClient;
use aws_config::imds::credentials::ImdsCredentialsProvider;
use aws_config::meta::credentials::CredentialsProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, Result};

/// Connect and read timeout for instance metadata calls
pub const INSTANCE_METADATA_TIMEOUT: Duration = Duration::from_secs(3);

/// How long before expiry instance-role credentials are refreshed
pub const INSTANCE_ROLE_EXPIRY_WINDOW: Duration = Duration::from_secs(3);

/// Profile section used when none is given
pub const DEFAULT_FILE_PROFILE: &str = "default";

/// Static access key pair with an optional session token
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl StaticCredentials {
    /// Returns `None` unless both keys are non-empty; an empty token is dropped
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Option<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();
        if access_key.is_empty() || secret_key.is_empty() {
            return None;
        }
        Some(Self {
            access_key,
            secret_key,
            session_token: session_token.filter(|t| !t.is_empty()),
        })
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field(
                "access_key",
                &format!("{}...", self.access_key.chars().take(4).collect::<String>()),
            )
            .field("secret_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// One entry of the credential-provider chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Static(StaticCredentials),
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
    Environment,
    /// Shared credentials file; `None` path means the SDK default locations
    File {
        path: Option<PathBuf>,
        profile: Option<String>,
    },
    /// Container credentials, then the EC2 instance role via IMDS
    InstanceRole,
}

/// Credential source names as written in profiles and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    Static,
    Environment,
    File,
    InstanceRole,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Static => write!(f, "static"),
            CredentialKind::Environment => write!(f, "environment"),
            CredentialKind::File => write!(f, "file"),
            CredentialKind::InstanceRole => write!(f, "instance-role"),
        }
    }
}

impl CredentialSource {
    /// Name reported by the SDK chain when this provider supplies credentials
    pub fn name(&self) -> &'static str {
        match self {
            CredentialSource::Static(_) => "Static",
            CredentialSource::Environment => "Environment",
            CredentialSource::File { .. } => "SharedCredentialsFile",
            CredentialSource::InstanceRole => "InstanceRole",
        }
    }

    pub fn kind(&self) -> CredentialKind {
        match self {
            CredentialSource::Static(_) => CredentialKind::Static,
            CredentialSource::Environment => CredentialKind::Environment,
            CredentialSource::File { .. } => CredentialKind::File,
            CredentialSource::InstanceRole => CredentialKind::InstanceRole,
        }
    }

    /// Profile section a `File` source reads
    pub fn file_profile(&self) -> Option<&str> {
        match self {
            CredentialSource::File { profile, .. } => {
                Some(profile.as_deref().unwrap_or(DEFAULT_FILE_PROFILE))
            }
            _ => None,
        }
    }

    /// Build the SDK provider for this source
    ///
    /// `imds_endpoint` overrides the instance metadata endpoint for
    /// [`CredentialSource::InstanceRole`]; it is ignored by other sources.
    pub fn into_provider(self, imds_endpoint: Option<&str>) -> Result<SharedCredentialsProvider> {
        let provider = match self {
            CredentialSource::Static(keys) => SharedCredentialsProvider::new(Credentials::new(
                keys.access_key,
                keys.secret_key,
                keys.session_token,
                None,
                "Static",
            )),
            CredentialSource::Environment => {
                SharedCredentialsProvider::new(EnvironmentVariableCredentialsProvider::new())
            }
            CredentialSource::File { path, profile } => {
                let profile = profile.unwrap_or_else(|| DEFAULT_FILE_PROFILE.to_string());
                let mut builder = ProfileFileCredentialsProvider::builder().profile_name(&profile);
                if let Some(path) = path {
                    debug!("Reading credentials file {:?} [{}]", path, profile);
                    builder = builder.profile_files(
                        EnvConfigFiles::builder()
                            .with_file(EnvConfigFileKind::Credentials, path)
                            .build(),
                    );
                }
                SharedCredentialsProvider::new(builder.build())
            }
            CredentialSource::InstanceRole => {
                let mut imds = ImdsClient::builder()
                    .connect_timeout(INSTANCE_METADATA_TIMEOUT)
                    .read_timeout(INSTANCE_METADATA_TIMEOUT);
                if let Some(endpoint) = imds_endpoint {
                    imds = imds
                        .endpoint(endpoint)
                        .map_err(|e| ConfigError::InstanceMetadata(e.to_string()))?;
                }
                let role = ImdsCredentialsProvider::builder()
                    .imds_client(imds.build())
                    .build();
                let chain = CredentialsProviderChain::first_try(
                    "EcsContainer",
                    EcsCredentialsProvider::builder().build(),
                )
                .or_else("Ec2InstanceMetadata", role);
                SharedCredentialsProvider::new(chain)
            }
        };
        Ok(provider)
    }
}

/// Fold named providers into a first-wins chain; `None` for an empty list
pub fn provider_chain(
    providers: Vec<(&'static str, SharedCredentialsProvider)>,
) -> Option<CredentialsProviderChain> {
    let mut providers = providers.into_iter();
    let (name, first) = providers.next()?;
    Some(
        providers.fold(CredentialsProviderChain::first_try(name, first), |chain, (name, p)| {
            chain.or_else(name, p)
        }),
    )
}
