//! Session management: profile plus command-line overrides into an AWS session

use crate::error::{EcEndpointError, Result as CliResult};
use anyhow::Context;
use ecendpoint_core::{
    ClientConfig, Config, ConfigError, ReadEndpointPolicy, ResolverOptions, Session,
};
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Command-line values that win over the selected profile
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOverrides<'a> {
    pub profile: Option<&'a str>,
    pub region: Option<&'a str>,
    pub endpoint_url: Option<&'a str>,
    pub panic_on_error: bool,
    pub replicas_only: bool,
}

/// Builds sessions from the loaded configuration
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    #[allow(dead_code)]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Path the configuration is read from and written to
    pub fn effective_config_path(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Save a modified configuration to the same location it was loaded from
    pub fn save_config(&self, config: &Config) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Client configuration for the selected profile with overrides applied
    ///
    /// Without any profile the default provider chain is used.
    pub fn client_config(
        &self,
        overrides: &SessionOverrides<'_>,
    ) -> CliResult<(ClientConfig, ResolverOptions)> {
        trace!("Session overrides: {:?}", overrides);

        let resolved = self.config.resolve_profile(overrides.profile)?;

        let (mut client, mut read_endpoints) = match resolved {
            Some(name) => {
                info!("Using profile: {}", name);
                let profile = self.config.profile(&name)?;
                let client = profile.to_client_config().map_err(|e| match e {
                    ConfigError::CredentialError(_) => {
                        debug!("Credential resolution failed: {}", e);
                        EcEndpointError::MissingCredentials { name: name.clone() }
                    }
                    other => EcEndpointError::from(other),
                })?;
                (client, profile.read_endpoints)
            }
            None => {
                debug!("No profile configured, using the default credential chain");
                (
                    ClientConfig::new().with_default_providers(None),
                    ReadEndpointPolicy::default(),
                )
            }
        };

        if let Some(region) = overrides.region {
            client = client.with_region(region)?;
        }
        if let Some(url) = overrides.endpoint_url {
            client = client.with_endpoint_url(url)?;
        }
        if overrides.panic_on_error {
            client = client.enable_panic();
        }
        if overrides.replicas_only {
            read_endpoints = ReadEndpointPolicy::ReplicasOnly;
        }

        debug!(
            "Credential providers: {:?}, read endpoints: {:?}",
            client.provider_kinds(),
            read_endpoints
        );

        Ok((client, ResolverOptions { read_endpoints }))
    }

    /// Build an AWS session for the selected profile
    ///
    /// Under panic-on-error, from the command line or the profile, a failure
    /// here is returned as [`EcEndpointError::Aborted`].
    pub async fn create_session(
        &self,
        overrides: &SessionOverrides<'_>,
    ) -> CliResult<(Session, ResolverOptions)> {
        let abort = overrides.panic_on_error || self.profile_panics(overrides);
        let (client, options) = self
            .client_config(overrides)
            .map_err(|e| e.aborted_if(abort))?;
        let abort = client.panics_on_error();
        let session = client
            .build_session()
            .await
            .map_err(|e| EcEndpointError::from(e).aborted_if(abort))?;
        Ok((session, options))
    }

    /// Panic policy of the profile `overrides` selects, false when none resolves
    fn profile_panics(&self, overrides: &SessionOverrides<'_>) -> bool {
        self.config
            .resolve_profile(overrides.profile)
            .ok()
            .flatten()
            .and_then(|name| self.config.profiles.get(&name))
            .is_some_and(|profile| profile.panic_on_error)
    }
}
