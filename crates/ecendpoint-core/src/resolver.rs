//! Redis endpoint resolution over ElastiCache
//!
//! A cluster id is first looked up as a replication group. Cluster-mode groups
//! resolve to their configuration endpoint, other groups to the first node
//! group's primary plus member read endpoints. Ids that are not replication
//! groups are looked up as standalone cache clusters.

use std::fmt;

use async_trait::async_trait;
use aws_sdk_elasticache::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_elasticache::types::{CacheCluster, Endpoint, NodeGroupMember, ReplicationGroup};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::endpoints::{RedisEndpoint, RedisEndpoints};
use crate::error::{CoreError, LookupKind, Result};

/// Member role ElastiCache reports for the node taking writes
const PRIMARY_ROLE: &str = "primary";

/// The two describe calls the resolver needs
///
/// Implemented for [`aws_sdk_elasticache::Client`]. A missing resource is an
/// empty list, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ElastiCacheApi: Send + Sync {
    /// `DescribeReplicationGroups` for one replication group id
    async fn replication_groups(&self, cluster_id: &str) -> Result<Vec<ReplicationGroup>>;

    /// `DescribeCacheClusters` for one cache cluster id, with node info
    async fn cache_clusters(&self, cluster_id: &str) -> Result<Vec<CacheCluster>>;
}

fn upstream<E, R>(operation: &'static str, err: SdkError<E, R>) -> CoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: fmt::Debug,
{
    CoreError::Upstream {
        operation,
        code: err
            .as_service_error()
            .and_then(|e| e.code())
            .map(str::to_string),
        message: DisplayErrorContext(&err).to_string(),
    }
}

#[async_trait]
impl ElastiCacheApi for aws_sdk_elasticache::Client {
    async fn replication_groups(&self, cluster_id: &str) -> Result<Vec<ReplicationGroup>> {
        trace!("DescribeReplicationGroups {}", cluster_id);
        match self
            .describe_replication_groups()
            .replication_group_id(cluster_id)
            .send()
            .await
        {
            Ok(output) => Ok(output.replication_groups.unwrap_or_default()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_replication_group_not_found_fault()) =>
            {
                debug!("No replication group named {}", cluster_id);
                Ok(Vec::new())
            }
            Err(err) => Err(upstream("DescribeReplicationGroups", err)),
        }
    }

    async fn cache_clusters(&self, cluster_id: &str) -> Result<Vec<CacheCluster>> {
        trace!("DescribeCacheClusters {}", cluster_id);
        match self
            .describe_cache_clusters()
            .cache_cluster_id(cluster_id)
            .show_cache_node_info(true)
            .send()
            .await
        {
            Ok(output) => Ok(output.cache_clusters.unwrap_or_default()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_cache_cluster_not_found_fault()) =>
            {
                debug!("No cache cluster named {}", cluster_id);
                Ok(Vec::new())
            }
            Err(err) => Err(upstream("DescribeCacheClusters", err)),
        }
    }
}

/// Which node-group members contribute read endpoints
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReadEndpointPolicy {
    /// Every member, the primary's own node included
    #[default]
    IncludePrimary,
    /// Only members whose current role is not `primary`
    ReplicasOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    pub read_endpoints: ReadEndpointPolicy,
}

/// Replication groups returned for one id
#[derive(Debug, Clone, Default)]
pub struct ReplicationGroupLookup {
    groups: Vec<ReplicationGroup>,
}

impl ReplicationGroupLookup {
    pub fn count(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> &[ReplicationGroup] {
        &self.groups
    }

    /// The group when exactly one matched
    pub fn single(&self) -> Option<&ReplicationGroup> {
        match self.groups.as_slice() {
            [group] => Some(group),
            _ => None,
        }
    }
}

fn to_endpoint(endpoint: Option<&Endpoint>) -> Option<RedisEndpoint> {
    let endpoint = endpoint?;
    Some(RedisEndpoint::new(endpoint.address()?, endpoint.port()?))
}

fn require_id(cluster_id: &str) -> Result<()> {
    if cluster_id.is_empty() {
        return Err(CoreError::MissingIdentifier);
    }
    Ok(())
}

/// Resolves cluster ids into [`RedisEndpoints`]
#[derive(Debug, Clone)]
pub struct EndpointResolver<C> {
    client: C,
    options: ResolverOptions,
}

impl<C: ElastiCacheApi> EndpointResolver<C> {
    pub fn new(client: C) -> Self {
        Self::with_options(client, ResolverOptions::default())
    }

    pub fn with_options(client: C, options: ResolverOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Describe the replication groups matching `cluster_id`
    pub async fn replication_group(&self, cluster_id: &str) -> Result<ReplicationGroupLookup> {
        require_id(cluster_id)?;
        let groups = self.client.replication_groups(cluster_id).await?;
        debug!("{} replication group(s) match {}", groups.len(), cluster_id);
        Ok(ReplicationGroupLookup { groups })
    }

    /// Describe the cache clusters matching `cluster_id`, including node endpoints
    pub async fn cache_cluster_details(&self, cluster_id: &str) -> Result<Vec<CacheCluster>> {
        require_id(cluster_id)?;
        self.client.cache_clusters(cluster_id).await
    }

    /// Resolve the endpoints a client should use for `cluster_id`
    ///
    /// Cluster-mode groups populate `cluster_config` only; everything else
    /// populates `primary`, plus `read_endpoints` when the group has replicas.
    pub async fn resolve_primary_endpoint(&self, cluster_id: &str) -> Result<RedisEndpoints> {
        require_id(cluster_id)?;

        let lookup = self.replication_group(cluster_id).await?;
        match lookup.count() {
            0 => self.resolve_cache_cluster(cluster_id).await,
            1 => {
                let group = &lookup.groups[0];
                if group.cluster_enabled().unwrap_or(false) {
                    debug!("{} has cluster mode enabled", cluster_id);
                    let cluster_config = self.resolve_cluster_config_endpoint(cluster_id).await?;
                    Ok(RedisEndpoints {
                        cluster_config: Some(cluster_config),
                        replication_group: true,
                        cluster_enabled: true,
                        ..Default::default()
                    })
                } else {
                    self.resolve_replicated(cluster_id, group)
                }
            }
            count => Err(CoreError::Ambiguous {
                cluster_id: cluster_id.to_string(),
                kind: LookupKind::ReplicationGroup,
                count,
            }),
        }
    }

    /// Configuration endpoint of a cluster-mode replication group
    pub async fn resolve_cluster_config_endpoint(&self, cluster_id: &str) -> Result<RedisEndpoint> {
        let lookup = self.replication_group(cluster_id).await?;
        let group = match lookup.count() {
            0 => {
                return Err(CoreError::NotFound {
                    cluster_id: cluster_id.to_string(),
                });
            }
            1 => &lookup.groups[0],
            count => {
                return Err(CoreError::Ambiguous {
                    cluster_id: cluster_id.to_string(),
                    kind: LookupKind::ReplicationGroup,
                    count,
                });
            }
        };

        to_endpoint(group.configuration_endpoint()).ok_or_else(|| {
            CoreError::NotClusterConfiguration {
                cluster_id: cluster_id.to_string(),
            }
        })
    }

    fn resolve_replicated(
        &self,
        cluster_id: &str,
        group: &ReplicationGroup,
    ) -> Result<RedisEndpoints> {
        let no_endpoint = || CoreError::NoEndpoint {
            cluster_id: cluster_id.to_string(),
        };
        let node_group = group.node_groups().first().ok_or_else(no_endpoint)?;
        let primary = to_endpoint(node_group.primary_endpoint()).ok_or_else(no_endpoint)?;

        let members = node_group.node_group_members();
        let read_replicas = members.len() > 1;
        let read_endpoints = if read_replicas {
            members
                .iter()
                .filter(|m| self.includes_member(m))
                .filter_map(|m| {
                    let endpoint = to_endpoint(m.read_endpoint());
                    if endpoint.is_none() {
                        debug!(
                            "Skipping member {:?} of {} without a read endpoint",
                            m.cache_cluster_id(),
                            cluster_id
                        );
                    }
                    endpoint
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(RedisEndpoints {
            primary: Some(primary),
            cluster_config: None,
            read_endpoints,
            replication_group: true,
            read_replicas,
            cluster_enabled: false,
        })
    }

    fn includes_member(&self, member: &NodeGroupMember) -> bool {
        match self.options.read_endpoints {
            ReadEndpointPolicy::IncludePrimary => true,
            ReadEndpointPolicy::ReplicasOnly => member.current_role() != Some(PRIMARY_ROLE),
        }
    }

    async fn resolve_cache_cluster(&self, cluster_id: &str) -> Result<RedisEndpoints> {
        let clusters = self.cache_cluster_details(cluster_id).await?;
        let cluster = match clusters.as_slice() {
            [] => {
                return Err(CoreError::NotFound {
                    cluster_id: cluster_id.to_string(),
                });
            }
            [cluster] => cluster,
            _ => {
                return Err(CoreError::Ambiguous {
                    cluster_id: cluster_id.to_string(),
                    kind: LookupKind::CacheCluster,
                    count: clusters.len(),
                });
            }
        };

        let primary = cluster
            .cache_nodes()
            .first()
            .and_then(|node| to_endpoint(node.endpoint()))
            .ok_or_else(|| CoreError::NoEndpoint {
                cluster_id: cluster_id.to_string(),
            })?;

        Ok(RedisEndpoints {
            primary: Some(primary),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_elasticache::types::{CacheNode, NodeGroup};
    use pretty_assertions::assert_eq;

    fn endpoint(host: &str, port: i32) -> Endpoint {
        Endpoint::builder().address(host).port(port).build()
    }

    fn member(host: &str, role: &str) -> NodeGroupMember {
        NodeGroupMember::builder()
            .cache_cluster_id(host.split('.').next().unwrap_or(host))
            .read_endpoint(endpoint(host, 6379))
            .current_role(role)
            .build()
    }

    fn replicated_group(id: &str, members: Vec<NodeGroupMember>) -> ReplicationGroup {
        let node_group = NodeGroup::builder()
            .node_group_id("0001")
            .primary_endpoint(endpoint("primary.cache.local", 6379))
            .set_node_group_members(Some(members))
            .build();
        ReplicationGroup::builder()
            .replication_group_id(id)
            .cluster_enabled(false)
            .node_groups(node_group)
            .build()
    }

    fn cluster_mode_group(id: &str) -> ReplicationGroup {
        ReplicationGroup::builder()
            .replication_group_id(id)
            .cluster_enabled(true)
            .configuration_endpoint(endpoint("cfg.cache.local", 6379))
            .build()
    }

    fn cache_cluster(id: &str, node_endpoint: Option<Endpoint>) -> CacheCluster {
        let node = CacheNode::builder()
            .cache_node_id("0001")
            .set_endpoint(node_endpoint)
            .build();
        CacheCluster::builder()
            .cache_cluster_id(id)
            .cache_nodes(node)
            .build()
    }

    fn expect_groups(mock: &mut MockElastiCacheApi, times: usize, groups: Vec<ReplicationGroup>) {
        mock.expect_replication_groups()
            .times(times)
            .returning(move |_| Ok(groups.clone()));
    }

    fn expect_clusters(mock: &mut MockElastiCacheApi, clusters: Vec<CacheCluster>) {
        mock.expect_cache_clusters()
            .times(1)
            .returning(move |_| Ok(clusters.clone()));
    }

    #[tokio::test]
    async fn test_empty_identifier_makes_no_calls() {
        let mut mock = MockElastiCacheApi::new();
        mock.expect_replication_groups().never();
        mock.expect_cache_clusters().never();

        let resolver = EndpointResolver::new(mock);
        let err = resolver.resolve_primary_endpoint("").await.unwrap_err();
        assert!(matches!(err, CoreError::MissingIdentifier));

        let err = resolver.resolve_cluster_config_endpoint("").await.unwrap_err();
        assert!(matches!(err, CoreError::MissingIdentifier));
    }

    #[tokio::test]
    async fn test_single_member_group_has_no_readers() {
        let mut mock = MockElastiCacheApi::new();
        mock.expect_replication_groups()
            .withf(|id: &str| id == "sessions")
            .times(1)
            .returning(|id| Ok(vec![replicated_group(id, vec![member("node-001.cache.local", "primary")])]));

        let endpoints = EndpointResolver::new(mock)
            .resolve_primary_endpoint("sessions")
            .await
            .unwrap();

        assert_eq!(
            endpoints,
            RedisEndpoints {
                primary: Some(RedisEndpoint::new("primary.cache.local", 6379)),
                cluster_config: None,
                read_endpoints: Vec::new(),
                replication_group: true,
                read_replicas: false,
                cluster_enabled: false,
            }
        );
        assert!(endpoints.readers().is_empty());
    }

    #[tokio::test]
    async fn test_three_member_group_lists_every_member() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(
            &mut mock,
            1,
            vec![replicated_group(
                "sessions",
                vec![
                    member("node-001.cache.local", "primary"),
                    member("node-002.cache.local", "replica"),
                    member("node-003.cache.local", "replica"),
                ],
            )],
        );

        let endpoints = EndpointResolver::new(mock)
            .resolve_primary_endpoint("sessions")
            .await
            .unwrap();

        assert!(endpoints.read_replicas);
        assert!(!endpoints.cluster_enabled);
        assert_eq!(endpoints.primary_string(), "primary.cache.local:6379");
        assert_eq!(
            endpoints.readers(),
            vec![
                "node-001.cache.local:6379",
                "node-002.cache.local:6379",
                "node-003.cache.local:6379",
            ]
        );
    }

    #[tokio::test]
    async fn test_replicas_only_excludes_primary_member() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(
            &mut mock,
            1,
            vec![replicated_group(
                "sessions",
                vec![
                    member("node-001.cache.local", "primary"),
                    member("node-002.cache.local", "replica"),
                    member("node-003.cache.local", "replica"),
                ],
            )],
        );

        let resolver = EndpointResolver::with_options(
            mock,
            ResolverOptions {
                read_endpoints: ReadEndpointPolicy::ReplicasOnly,
            },
        );
        let endpoints = resolver.resolve_primary_endpoint("sessions").await.unwrap();

        assert!(endpoints.read_replicas);
        assert_eq!(
            endpoints.readers(),
            vec!["node-002.cache.local:6379", "node-003.cache.local:6379"]
        );
    }

    #[tokio::test]
    async fn test_cluster_mode_uses_configuration_endpoint() {
        let mut mock = MockElastiCacheApi::new();
        // once for the group itself, once for the configuration endpoint
        expect_groups(&mut mock, 2, vec![cluster_mode_group("sharded")]);
        mock.expect_cache_clusters().never();

        let endpoints = EndpointResolver::new(mock)
            .resolve_primary_endpoint("sharded")
            .await
            .unwrap();

        assert!(endpoints.cluster_enabled);
        assert!(endpoints.replication_group);
        assert!(endpoints.primary.is_none());
        assert_eq!(endpoints.cluster_config_string(), "cfg.cache.local:6379");
        assert_eq!(endpoints.connect_address(), "cfg.cache.local:6379");
    }

    #[tokio::test]
    async fn test_two_groups_is_ambiguous_without_further_calls() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(
            &mut mock,
            1,
            vec![cluster_mode_group("dup"), cluster_mode_group("dup")],
        );
        mock.expect_cache_clusters().never();

        let err = EndpointResolver::new(mock)
            .resolve_primary_endpoint("dup")
            .await
            .unwrap_err();

        assert!(err.is_ambiguous());
        assert!(matches!(
            err,
            CoreError::Ambiguous {
                kind: LookupKind::ReplicationGroup,
                count: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_nothing_matches_is_not_found() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(&mut mock, 1, Vec::new());
        expect_clusters(&mut mock, Vec::new());

        let err = EndpointResolver::new(mock)
            .resolve_primary_endpoint("missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_cache_cluster_fallback() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(&mut mock, 1, Vec::new());
        mock.expect_cache_clusters()
            .withf(|id: &str| id == "standalone")
            .times(1)
            .returning(|id| Ok(vec![cache_cluster(id, Some(endpoint("standalone.cache.local", 6380)))]));

        let endpoints = EndpointResolver::new(mock)
            .resolve_primary_endpoint("standalone")
            .await
            .unwrap();

        assert!(!endpoints.replication_group);
        assert!(!endpoints.read_replicas);
        assert_eq!(endpoints.primary_string(), "standalone.cache.local:6380");
    }

    #[tokio::test]
    async fn test_multiple_cache_clusters_is_ambiguous() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(&mut mock, 1, Vec::new());
        expect_clusters(
            &mut mock,
            vec![
                cache_cluster("a", Some(endpoint("a.cache.local", 6379))),
                cache_cluster("a", Some(endpoint("b.cache.local", 6379))),
            ],
        );

        let err = EndpointResolver::new(mock)
            .resolve_primary_endpoint("a")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Ambiguous {
                kind: LookupKind::CacheCluster,
                count: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cache_cluster_without_endpoint() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(&mut mock, 1, Vec::new());
        expect_clusters(&mut mock, vec![cache_cluster("creating", None)]);

        let err = EndpointResolver::new(mock)
            .resolve_primary_endpoint("creating")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NoEndpoint { .. }));
        assert!(err.is_incompatible());
    }

    #[tokio::test]
    async fn test_cluster_config_on_non_cluster_group() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(
            &mut mock,
            1,
            vec![replicated_group("plain", vec![member("node-001.cache.local", "primary")])],
        );

        let err = EndpointResolver::new(mock)
            .resolve_cluster_config_endpoint("plain")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotClusterConfiguration { .. }));
    }

    #[tokio::test]
    async fn test_cluster_config_not_found() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(&mut mock, 1, Vec::new());

        let err = EndpointResolver::new(mock)
            .resolve_cluster_config_endpoint("missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_group_without_node_groups_has_no_endpoint() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(
            &mut mock,
            1,
            vec![
                ReplicationGroup::builder()
                    .replication_group_id("empty")
                    .cluster_enabled(false)
                    .build(),
            ],
        );

        let err = EndpointResolver::new(mock)
            .resolve_primary_endpoint("empty")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NoEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_upstream_error_is_forwarded() {
        let mut mock = MockElastiCacheApi::new();
        mock.expect_replication_groups().times(1).returning(|_| {
            Err(CoreError::Upstream {
                operation: "DescribeReplicationGroups",
                code: Some("Throttling".to_string()),
                message: "Rate exceeded".to_string(),
            })
        });
        mock.expect_cache_clusters().never();

        let err = EndpointResolver::new(mock)
            .resolve_primary_endpoint("busy")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_lookup_counts() {
        let mut mock = MockElastiCacheApi::new();
        expect_groups(&mut mock, 1, vec![cluster_mode_group("sharded")]);

        let lookup = EndpointResolver::new(mock)
            .replication_group("sharded")
            .await
            .unwrap();
        assert_eq!(lookup.count(), 1);
        assert_eq!(
            lookup.single().and_then(|g| g.replication_group_id()),
            Some("sharded")
        );
    }

    mod sdk_client {
        use super::*;
        use aws_sdk_elasticache::Client;
        use aws_sdk_elasticache::config::retry::RetryConfig;
        use aws_sdk_elasticache::error::ErrorMetadata;
        use aws_sdk_elasticache::operation::describe_cache_clusters::{
            DescribeCacheClustersError, DescribeCacheClustersOutput,
        };
        use aws_sdk_elasticache::operation::describe_replication_groups::{
            DescribeReplicationGroupsError, DescribeReplicationGroupsOutput,
        };
        use aws_sdk_elasticache::types::error::{
            CacheClusterNotFoundFault, ReplicationGroupNotFoundFault,
        };
        use aws_smithy_mocks::{RuleMode, mock, mock_client};
        use pretty_assertions::assert_eq;

        fn throttled() -> ErrorMetadata {
            ErrorMetadata::builder()
                .code("Throttling")
                .message("Rate exceeded")
                .build()
        }

        #[tokio::test]
        async fn test_replication_group_not_found_fault_is_empty() {
            let rule = mock!(Client::describe_replication_groups).then_error(|| {
                DescribeReplicationGroupsError::ReplicationGroupNotFoundFault(
                    ReplicationGroupNotFoundFault::builder()
                        .message("ReplicationGroup missing not found.")
                        .build(),
                )
            });
            let client = mock_client!(aws_sdk_elasticache, [&rule]);

            let groups = client.replication_groups("missing").await.unwrap();
            assert!(groups.is_empty());
        }

        #[tokio::test]
        async fn test_cache_cluster_not_found_fault_is_empty() {
            let rule = mock!(Client::describe_cache_clusters).then_error(|| {
                DescribeCacheClustersError::CacheClusterNotFoundFault(
                    CacheClusterNotFoundFault::builder()
                        .message("CacheCluster missing not found.")
                        .build(),
                )
            });
            let client = mock_client!(aws_sdk_elasticache, [&rule]);

            let clusters = client.cache_clusters("missing").await.unwrap();
            assert!(clusters.is_empty());
        }

        #[tokio::test]
        async fn test_other_faults_become_upstream_with_code() {
            let groups = mock!(Client::describe_replication_groups)
                .then_error(|| DescribeReplicationGroupsError::generic(throttled()));
            let clusters = mock!(Client::describe_cache_clusters)
                .then_error(|| DescribeCacheClustersError::generic(throttled()));
            let client = mock_client!(
                aws_sdk_elasticache,
                RuleMode::MatchAny,
                [&groups, &clusters],
                |conf| conf.retry_config(RetryConfig::disabled())
            );

            let err = client.replication_groups("busy").await.unwrap_err();
            assert!(matches!(
                &err,
                CoreError::Upstream {
                    operation: "DescribeReplicationGroups",
                    code: Some(code),
                    ..
                } if code == "Throttling"
            ));
            assert!(err.is_retryable());

            let err = client.cache_clusters("busy").await.unwrap_err();
            assert!(matches!(
                &err,
                CoreError::Upstream {
                    operation: "DescribeCacheClusters",
                    code: Some(code),
                    ..
                } if code == "Throttling"
            ));
        }

        #[tokio::test]
        async fn test_standalone_cluster_resolves_after_group_fault() {
            let groups = mock!(Client::describe_replication_groups).then_error(|| {
                DescribeReplicationGroupsError::ReplicationGroupNotFoundFault(
                    ReplicationGroupNotFoundFault::builder().build(),
                )
            });
            let clusters = mock!(Client::describe_cache_clusters)
                .match_requests(|req| {
                    req.cache_cluster_id() == Some("standalone")
                        && req.show_cache_node_info() == Some(true)
                })
                .then_output(|| {
                    DescribeCacheClustersOutput::builder()
                        .cache_clusters(cache_cluster(
                            "standalone",
                            Some(endpoint("standalone.cache.local", 6379)),
                        ))
                        .build()
                });
            let client = mock_client!(aws_sdk_elasticache, RuleMode::MatchAny, [&groups, &clusters]);

            let endpoints = EndpointResolver::new(client)
                .resolve_primary_endpoint("standalone")
                .await
                .unwrap();
            assert!(!endpoints.replication_group);
            assert_eq!(endpoints.primary_string(), "standalone.cache.local:6379");
        }

        #[tokio::test]
        async fn test_group_output_is_passed_through() {
            let rule = mock!(Client::describe_replication_groups)
                .match_requests(|req| req.replication_group_id() == Some("sharded"))
                .then_output(|| {
                    DescribeReplicationGroupsOutput::builder()
                        .replication_groups(cluster_mode_group("sharded"))
                        .build()
                });
            let client = mock_client!(aws_sdk_elasticache, [&rule]);

            let groups = client.replication_groups("sharded").await.unwrap();
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].replication_group_id(), Some("sharded"));
        }
    }
}
