//! # ecendpoint-core
//!
//! Shared engine for the `ecendpoint` CLI: builds AWS sessions from an ordered
//! credential-provider chain and resolves ElastiCache Redis topology into a
//! uniform endpoint descriptor.
//!
//! ## Layers
//!
//! - **Session** - [`ClientConfig`] accumulates region, endpoint override and
//!   credential sources, then [`ClientConfig::build_session`] yields a [`Session`]
//! - **Resolver** - [`EndpointResolver`] describes a replication group (falling
//!   back to a cache cluster) and normalizes the result into [`RedisEndpoints`]
//! - **Config** - TOML profiles that map onto a [`ClientConfig`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use ecendpoint_core::{ClientConfig, ResolverOptions};
//!
//! # async fn run() -> ecendpoint_core::Result<()> {
//! let session = ClientConfig::new()
//!     .with_region("us-west-2")?
//!     .with_default_providers(None)
//!     .build_session()
//!     .await?;
//!
//! let endpoints = session
//!     .resolver(ResolverOptions::default())
//!     .resolve_primary_endpoint("my-redis")
//!     .await?;
//!
//! println!("connect to {}", endpoints.connect_address());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod endpoints;
pub mod error;
pub mod providers;
pub mod resolver;
pub mod session;

pub use config::{Config, ConfigError, Profile};
pub use endpoints::{RedisEndpoint, RedisEndpoints};
pub use error::{CoreError, LookupKind, Result};
pub use providers::{CredentialKind, CredentialSource, StaticCredentials};
pub use resolver::{
    ElastiCacheApi, EndpointResolver, ReadEndpointPolicy, ReplicationGroupLookup,
    ResolverOptions,
};
pub use session::{ClientConfig, Session};
