//! Normalized Redis endpoint topology
//!
//! [`RedisEndpoints`] is what the resolver returns for one cluster id. The
//! serialized form keeps the field names downstream tooling already parses:
//!
//! ```json
//! {"Primary":{"Host":"h","Port":"6379"},"ClusterConfig":null,"ReadEndpoints":[],
//!  "ReplicationGroup":true,"ReadReplicas":false,"ClusterEnabled":false}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single host/port pair; the port is kept as its base-10 string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RedisEndpoint {
    pub host: String,
    pub port: String,
}

impl RedisEndpoint {
    pub fn new(host: impl Into<String>, port: i32) -> Self {
        Self {
            host: host.into(),
            port: port.to_string(),
        }
    }
}

/// `host:port`, the form redis clients take
impl fmt::Display for RedisEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Resolved topology for one named cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RedisEndpoints {
    /// Read/write endpoint when cluster mode is disabled
    pub primary: Option<RedisEndpoint>,
    /// Configuration endpoint when cluster mode is enabled
    pub cluster_config: Option<RedisEndpoint>,
    #[serde(default)]
    pub read_endpoints: Vec<RedisEndpoint>,
    pub replication_group: bool,
    pub read_replicas: bool,
    pub cluster_enabled: bool,
}

impl RedisEndpoints {
    /// Primary as `host:port`, empty when there is none
    pub fn primary_string(&self) -> String {
        self.primary
            .as_ref()
            .map(RedisEndpoint::to_string)
            .unwrap_or_default()
    }

    /// Configuration endpoint as `host:port`; empty unless cluster mode is enabled
    pub fn cluster_config_string(&self) -> String {
        if !self.cluster_enabled {
            return String::new();
        }
        self.cluster_config
            .as_ref()
            .map(RedisEndpoint::to_string)
            .unwrap_or_default()
    }

    /// Every read endpoint as `host:port`, in the order the API returned them
    pub fn readers(&self) -> Vec<String> {
        self.read_endpoints.iter().map(RedisEndpoint::to_string).collect()
    }

    /// The address a client should connect to for this topology
    pub fn connect_address(&self) -> String {
        if self.cluster_enabled {
            self.cluster_config_string()
        } else {
            self.primary_string()
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Compact JSON, for logs
impl fmt::Display for RedisEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
