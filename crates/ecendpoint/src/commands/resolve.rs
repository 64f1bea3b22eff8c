//! Endpoint resolution commands

use crate::cli::OutputFormat;
use crate::connection::{ConnectionManager, SessionOverrides};
use crate::error::{EcEndpointError, Result};
use crate::output::{self, print_output};
use comfy_table::Table;
use ecendpoint_core::{CoreError, RedisEndpoints};
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, info};

/// Apply the session's failure policy to a resolution error
fn failure(err: CoreError, abort: bool) -> EcEndpointError {
    EcEndpointError::from(err).aborted_if(abort)
}

/// Rows of `cluster | role | address` for table output
fn endpoint_rows(cluster_id: &str, endpoints: &RedisEndpoints) -> Vec<[String; 3]> {
    let mut rows = Vec::new();
    if let Some(primary) = &endpoints.primary {
        rows.push([cluster_id.to_string(), "primary".to_string(), primary.to_string()]);
    }
    if endpoints.cluster_enabled {
        rows.push([
            cluster_id.to_string(),
            "cluster-config".to_string(),
            endpoints.cluster_config_string(),
        ]);
    }
    for reader in endpoints.readers() {
        rows.push([cluster_id.to_string(), "reader".to_string(), reader]);
    }
    rows
}

fn print_endpoints_table(resolved: &[(String, RedisEndpoints)]) {
    let mut table = Table::new();
    table.set_header(vec!["Cluster", "Role", "Address"]);
    for (cluster_id, endpoints) in resolved {
        for row in endpoint_rows(cluster_id, endpoints) {
            table.add_row(row.to_vec());
        }
    }
    println!("{}", table);
}

fn print_resolved(resolved: &[(String, RedisEndpoints)], output_format: OutputFormat) -> Result<()> {
    match output::OutputFormat::resolve(output_format, output::OutputFormat::Json) {
        output::OutputFormat::Table => print_endpoints_table(resolved),
        fmt => {
            if let [(_, endpoints)] = resolved {
                print_output(endpoints, fmt)?;
            } else {
                let by_id: serde_json::Map<String, serde_json::Value> = resolved
                    .iter()
                    .map(|(id, endpoints)| serde_json::to_value(endpoints).map(|v| (id.clone(), v)))
                    .collect::<serde_json::Result<_>>()?;
                print_output(by_id, fmt)?;
            }
        }
    }
    Ok(())
}

/// Ids in first-seen order with repeats dropped
fn unique_ids(cluster_ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    cluster_ids
        .iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Resolve every distinct id, reporting failures as they happen
///
/// Under panic-on-error the first failure ends the command.
pub async fn handle_resolve(
    conn_mgr: &ConnectionManager,
    overrides: &SessionOverrides<'_>,
    cluster_ids: &[String],
    output_format: OutputFormat,
) -> Result<()> {
    let cluster_ids = unique_ids(cluster_ids);

    let (session, options) = conn_mgr.create_session(overrides).await?;
    let resolver = session.resolver(options);
    let abort = session.panics_on_error();

    if let [cluster_id] = cluster_ids.as_slice() {
        let endpoints = resolver
            .resolve_primary_endpoint(cluster_id)
            .await
            .map_err(|e| failure(e, abort))?;
        info!("Resolved {}: {}", cluster_id, endpoints);
        return print_resolved(&[(cluster_id.to_string(), endpoints)], output_format);
    }

    let mut resolved = Vec::with_capacity(cluster_ids.len());
    let mut failed = 0;

    for &cluster_id in &cluster_ids {
        match resolver.resolve_primary_endpoint(cluster_id).await {
            Ok(endpoints) => {
                info!("Resolved {}: {}", cluster_id, endpoints);
                resolved.push((cluster_id.to_string(), endpoints));
            }
            Err(e) => {
                let err = failure(e, abort);
                if abort {
                    return Err(err);
                }
                debug!("Failed to resolve {}: {}", cluster_id, err);
                err.print_diagnostic();
                failed += 1;
            }
        }
    }

    if !resolved.is_empty() {
        print_resolved(&resolved, output_format)?;
    }

    if failed > 0 {
        return Err(EcEndpointError::PartialFailure {
            failed,
            total: cluster_ids.len(),
        });
    }
    Ok(())
}

pub async fn handle_primary(
    conn_mgr: &ConnectionManager,
    overrides: &SessionOverrides<'_>,
    cluster_id: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let (session, options) = conn_mgr.create_session(overrides).await?;
    let endpoints = session
        .resolver(options)
        .resolve_primary_endpoint(cluster_id)
        .await
        .map_err(|e| failure(e, session.panics_on_error()))?;

    let address = endpoints.connect_address();
    debug!("Connect address for {}: {}", cluster_id, address);

    if output_format == OutputFormat::Auto {
        println!("{}", address);
        return Ok(());
    }

    let data = json!({
        "cluster_id": cluster_id,
        "address": address,
        "cluster_enabled": endpoints.cluster_enabled,
    });
    print_output(data, output::OutputFormat::resolve(output_format, output::OutputFormat::Json))?;
    Ok(())
}

pub async fn handle_cluster_config(
    conn_mgr: &ConnectionManager,
    overrides: &SessionOverrides<'_>,
    cluster_id: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let (session, options) = conn_mgr.create_session(overrides).await?;
    let endpoint = session
        .resolver(options)
        .resolve_cluster_config_endpoint(cluster_id)
        .await
        .map_err(|e| failure(e, session.panics_on_error()))?;

    if output_format == OutputFormat::Auto {
        println!("{}", endpoint);
        return Ok(());
    }

    print_output(
        &endpoint,
        output::OutputFormat::resolve(output_format, output::OutputFormat::Json),
    )?;
    Ok(())
}

pub async fn handle_readers(
    conn_mgr: &ConnectionManager,
    overrides: &SessionOverrides<'_>,
    cluster_id: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let (session, options) = conn_mgr.create_session(overrides).await?;
    let endpoints = session
        .resolver(options)
        .resolve_primary_endpoint(cluster_id)
        .await
        .map_err(|e| failure(e, session.panics_on_error()))?;

    let readers = endpoints.readers();
    if readers.is_empty() {
        debug!("{} has no read endpoints", cluster_id);
    }

    if output_format == OutputFormat::Auto {
        for reader in &readers {
            println!("{}", reader);
        }
        return Ok(());
    }

    print_output(
        readers,
        output::OutputFormat::resolve(output_format, output::OutputFormat::Json),
    )?;
    Ok(())
}
