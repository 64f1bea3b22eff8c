//! Client configuration and session building
//!
//! [`ClientConfig`] is an owned value threaded through chained calls. Setters
//! that take user input return `Result<Self, ConfigError>` so an empty or
//! malformed value fails at the call site instead of being skipped.
//!
//! ```rust,no_run
//! use ecendpoint_core::ClientConfig;
//!
//! # async fn run() -> ecendpoint_core::Result<()> {
//! let session = ClientConfig::new()
//!     .with_region("eu-west-1")?
//!     .with_environment_credentials()
//!     .with_file_credentials(None, Some("ops"))
//!     .with_instance_role_credentials()
//!     .build_session()
//!     .await?;
//! let client = session.elasticache_client();
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use aws_config::identity::IdentityCache;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::{debug, info, trace, warn};

use crate::config::{ConfigError, Result};
use crate::providers::{
    CredentialKind, CredentialSource, INSTANCE_ROLE_EXPIRY_WINDOW, StaticCredentials,
    provider_chain,
};
use crate::resolver::{EndpointResolver, ResolverOptions};

/// Environment variable consulted when no region is configured
pub const REGION_ENV_VAR: &str = "AWS_DEFAULT_REGION";

/// Region used when neither the config nor the environment names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Accumulated settings for an ElastiCache session
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    region: Option<String>,
    endpoint_url: Option<String>,
    providers: Vec<CredentialSource>,
    instance_metadata_endpoint: Option<String>,
    panic_on_error: bool,
}

fn non_empty(field: &'static str, value: impl Into<String>) -> Result<String> {
    let value = value.into();
    if value.is_empty() {
        warn!("Rejected empty {}", field);
        return Err(ConfigError::EmptyValue { field });
    }
    Ok(value)
}

fn validated_url(field: &'static str, value: impl Into<String>) -> Result<String> {
    let value = non_empty(field, value)?;
    url::Url::parse(&value).map_err(|e| {
        warn!("Rejected {} '{}': {}", field, value, e);
        ConfigError::InvalidEndpoint {
            url: value.clone(),
            reason: e.to_string(),
        }
    })?;
    Ok(value)
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region; the last call wins
    pub fn with_region(mut self, region: impl Into<String>) -> Result<Self> {
        self.region = Some(non_empty("region", region)?);
        Ok(self)
    }

    /// Send API calls to `url` instead of the regional endpoint
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Result<Self> {
        self.endpoint_url = Some(validated_url("endpoint_url", url)?);
        Ok(self)
    }

    /// Append a static key pair to the provider chain
    pub fn with_static_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Result<Self> {
        let access_key = non_empty("access_key", access_key)?;
        let secret_key = non_empty("secret_key", secret_key)?;
        if let Some(keys) = StaticCredentials::new(access_key, secret_key, session_token) {
            self.providers.push(CredentialSource::Static(keys));
        }
        Ok(self)
    }

    pub fn with_environment_credentials(mut self) -> Self {
        self.providers.push(CredentialSource::Environment);
        self
    }

    /// Append a shared credentials file provider
    ///
    /// An empty or absent `path` uses the SDK's default search locations; an
    /// empty or absent `profile` reads the `default` section.
    pub fn with_file_credentials(mut self, path: Option<&str>, profile: Option<&str>) -> Self {
        self.providers.push(CredentialSource::File {
            path: path.filter(|p| !p.is_empty()).map(PathBuf::from),
            profile: profile.filter(|p| !p.is_empty()).map(str::to_string),
        });
        self
    }

    /// Append the container/instance role provider (3 second metadata timeout)
    pub fn with_instance_role_credentials(mut self) -> Self {
        self.providers.push(CredentialSource::InstanceRole);
        self
    }

    /// Override the instance metadata endpoint used by the instance role provider
    pub fn with_instance_metadata_endpoint(mut self, url: impl Into<String>) -> Result<Self> {
        self.instance_metadata_endpoint = Some(validated_url("instance_metadata_endpoint", url)?);
        Ok(self)
    }

    /// Append static (when given), environment, file and instance role providers
    pub fn with_default_providers(mut self, static_keys: Option<StaticCredentials>) -> Self {
        if let Some(keys) = static_keys {
            self.providers.push(CredentialSource::Static(keys));
        } else {
            debug!("No static credentials supplied, skipping static provider");
        }
        self.with_environment_credentials()
            .with_file_credentials(None, None)
            .with_instance_role_credentials()
    }

    /// Ask the top-level caller to stop at the first failure
    pub fn enable_panic(mut self) -> Self {
        self.panic_on_error = true;
        self
    }

    pub fn disable_panic(mut self) -> Self {
        self.panic_on_error = false;
        self
    }

    pub fn panics_on_error(&self) -> bool {
        self.panic_on_error
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    pub fn providers(&self) -> &[CredentialSource] {
        &self.providers
    }

    pub fn provider_kinds(&self) -> Vec<CredentialKind> {
        self.providers.iter().map(CredentialSource::kind).collect()
    }

    /// Explicit region, then `AWS_DEFAULT_REGION`, then `us-east-1`
    pub fn resolved_region(&self) -> String {
        if let Some(region) = &self.region {
            return region.clone();
        }
        match std::env::var(REGION_ENV_VAR) {
            Ok(region) if !region.is_empty() => {
                debug!("Using region from {}", REGION_ENV_VAR);
                region
            }
            _ => DEFAULT_REGION.to_string(),
        }
    }

    /// Materialize the provider chain and load the SDK configuration
    pub async fn build_session(self) -> Result<Session> {
        let region = self.resolved_region();
        info!("Building ElastiCache session in region {}", region);

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));

        if let Some(url) = &self.endpoint_url {
            debug!("Using endpoint override {}", url);
            loader = loader.endpoint_url(url);
        }

        let uses_instance_role = self
            .providers
            .iter()
            .any(|p| matches!(p, CredentialSource::InstanceRole));

        let mut named = Vec::with_capacity(self.providers.len());
        for source in self.providers {
            let name = source.name();
            trace!("Adding credential provider {}", name);
            named.push((
                name,
                source.into_provider(self.instance_metadata_endpoint.as_deref())?,
            ));
        }

        loader = match provider_chain(named) {
            Some(chain) => loader.credentials_provider(chain),
            None => {
                warn!("No credential providers configured; requests will not be signed");
                loader.no_credentials()
            }
        };

        if uses_instance_role {
            loader = loader.identity_cache(
                IdentityCache::lazy()
                    .buffer_time(INSTANCE_ROLE_EXPIRY_WINDOW)
                    .build(),
            );
        }

        let sdk_config = loader.load().await;
        debug!("ElastiCache session ready");

        Ok(Session {
            sdk_config,
            panic_on_error: self.panic_on_error,
        })
    }
}

/// A loaded SDK configuration plus the caller's failure policy
#[derive(Debug, Clone)]
pub struct Session {
    sdk_config: SdkConfig,
    panic_on_error: bool,
}

impl Session {
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.sdk_config
    }

    pub fn region(&self) -> Option<&str> {
        self.sdk_config.region().map(|r| r.as_ref())
    }

    pub fn panics_on_error(&self) -> bool {
        self.panic_on_error
    }

    pub fn elasticache_client(&self) -> aws_sdk_elasticache::Client {
        aws_sdk_elasticache::Client::new(&self.sdk_config)
    }

    /// Endpoint resolver backed by a fresh ElastiCache client
    pub fn resolver(&self, options: ResolverOptions) -> EndpointResolver<aws_sdk_elasticache::Client> {
        EndpointResolver::with_options(self.elasticache_client(), options)
    }
}
