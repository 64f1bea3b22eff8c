//! Configuration management for ecendpoint
//!
//! Profiles are stored in TOML. Each profile names a region, an optional
//! endpoint override and the ordered credential sources used to reach
//! ElastiCache.
//!
//! ```toml
//! default_profile = "prod"
//!
//! [profiles.prod]
//! region = "us-west-2"
//! credentials = ["environment", "file", "instance-role"]
//! credentials_file = "${HOME}/.aws/credentials"
//! aws_profile = "prod"
//! read_endpoints = "replicas-only"
//! ```

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use crate::providers::{CredentialKind, StaticCredentials};
use crate::resolver::ReadEndpointPolicy;
use crate::session::ClientConfig;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Alternate ElastiCache API endpoint (e.g. LocalStack)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Ordered credential sources; empty means the default chain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    /// Supports the keyring: prefix for secure storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Supports the keyring: prefix for secure storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// Shared credentials file for the `file` source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
    /// Section of the shared credentials file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_metadata_endpoint: Option<String>,
    /// Stop at the first resolution failure
    #[serde(default)]
    pub panic_on_error: bool,
    #[serde(default)]
    pub read_endpoints: ReadEndpointPolicy,
}

impl Profile {
    /// Check if this profile stores a secret key
    pub fn has_secret(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Resolve the stored key pair, looking up keyring references
    ///
    /// Only the profile's own values are used; environment keys belong to the
    /// `environment` source. Returns `None` unless both the access key and a
    /// secret are stored.
    pub fn resolve_static_credentials(&self) -> Result<Option<StaticCredentials>> {
        let Some(access_key) = self.access_key.as_deref().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let store = CredentialStore::new();

        let secret_key = self
            .secret_key
            .as_deref()
            .map(|s| store.get_credential(s))
            .transpose()
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve secret key: {}", e))
            })?;
        let session_token = self
            .session_token
            .as_deref()
            .map(|t| store.get_credential(t))
            .transpose()
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve session token: {}", e))
            })?;

        Ok(secret_key.and_then(|secret| StaticCredentials::new(access_key, secret, session_token)))
    }

    /// Build a [`ClientConfig`] from this profile
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let mut client = ClientConfig::new();

        if let Some(region) = &self.region {
            client = client.with_region(region)?;
        }
        if let Some(url) = &self.endpoint_url {
            client = client.with_endpoint_url(url)?;
        }
        if let Some(url) = &self.instance_metadata_endpoint {
            client = client.with_instance_metadata_endpoint(url)?;
        }

        let static_keys = self.resolve_static_credentials()?;

        if self.credentials.is_empty() {
            client = client.with_default_providers(static_keys);
        } else {
            for kind in &self.credentials {
                client = match kind {
                    CredentialKind::Static => {
                        let keys = static_keys.clone().ok_or_else(|| {
                            ConfigError::CredentialError(
                                "static credentials selected but access_key/secret_key are not set"
                                    .to_string(),
                            )
                        })?;
                        client.with_static_credentials(
                            keys.access_key,
                            keys.secret_key,
                            keys.session_token,
                        )?
                    }
                    CredentialKind::Environment => client.with_environment_credentials(),
                    CredentialKind::File => client.with_file_credentials(
                        self.credentials_file.as_deref(),
                        self.aws_profile.as_deref(),
                    ),
                    CredentialKind::InstanceRole => client.with_instance_role_credentials(),
                };
            }
        }

        if self.panic_on_error {
            client = client.enable_panic();
        }

        Ok(client)
    }
}

impl Config {
    /// Resolve which profile to use
    ///
    /// Resolution order: explicit name, `default_profile`, then the first
    /// profile alphabetically. `None` when no profiles exist.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<Option<String>> {
        if let Some(name) = explicit_profile {
            if !self.profiles.contains_key(name) {
                return Err(ConfigError::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            return Ok(Some(name.to_string()));
        }

        if let Some(ref default) = self.default_profile {
            return Ok(Some(default.clone()));
        }

        Ok(self.list_profiles().first().map(|(name, _)| (*name).clone()))
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name, clearing the default if it pointed there
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On Linux: ~/.config/ecendpoint/config.toml
    /// On macOS: ~/.config/ecendpoint/config.toml when that directory exists,
    /// otherwise ~/Library/Application Support/com.ecendpoint.ecendpoint/config.toml
    /// On Windows: %APPDATA%\ecendpoint\ecendpoint\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_dir = base_dirs.home_dir().join(".config").join("ecendpoint");
                if linux_style_dir.exists() {
                    return Ok(linux_style_dir.join("config.toml"));
                }
            }
        }

        let proj_dirs = ProjectDirs::from("com", "ecendpoint", "ecendpoint")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references
    ///
    /// Unset variables without a default are left as-is.
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok())
            .to_string()
    }
}
