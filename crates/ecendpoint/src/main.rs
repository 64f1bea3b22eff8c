use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells};
use ecendpoint_core::Config;
use tracing::{debug, error, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::{ConnectionManager, SessionOverrides};
use error::EcEndpointError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load configuration from specified path or default location
    let (config, config_path) = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        let config = Config::load_from_path(&path)?;
        (config, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    let conn_mgr = ConnectionManager::with_config_path(config, config_path);

    if let Err(e) = execute_command(&cli, &conn_mgr).await {
        match e {
            EcEndpointError::Aborted { .. } => eprintln!("error: {}", e),
            _ => e.print_diagnostic(),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "ecendpoint=warn,ecendpoint_core=warn",
            1 => "ecendpoint=info,ecendpoint_core=info",
            2 => "ecendpoint=debug,ecendpoint_core=debug,aws_config=info",
            _ => "ecendpoint=trace,ecendpoint_core=trace,aws_config=debug,aws_smithy_runtime=debug",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

fn format_command(command: &Commands) -> String {
    match command {
        Commands::Resolve { cluster_ids, .. } => format!("resolve ({} ids)", cluster_ids.len()),
        Commands::Primary { cluster_id } => format!("primary {}", cluster_id),
        Commands::ClusterConfig { cluster_id } => format!("cluster-config {}", cluster_id),
        Commands::Readers { cluster_id, .. } => format!("readers {}", cluster_id),
        // Profile arguments may carry secrets
        Commands::Profile(_) => "profile".to_string(),
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
    }
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), EcEndpointError> {
    info!("Command: {}", format_command(&cli.command));

    let overrides = SessionOverrides {
        profile: cli.profile.as_deref(),
        region: cli.region.as_deref(),
        endpoint_url: cli.endpoint_url.as_deref(),
        panic_on_error: cli.panic_on_error,
        replicas_only: false,
    };
    trace!("Global overrides: {:?}", overrides);

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Resolve {
            cluster_ids,
            replicas_only,
        } => {
            let overrides = SessionOverrides {
                replicas_only: *replicas_only,
                ..overrides
            };
            commands::resolve::handle_resolve(conn_mgr, &overrides, cluster_ids, cli.output).await
        }
        Commands::Primary { cluster_id } => {
            commands::resolve::handle_primary(conn_mgr, &overrides, cluster_id, cli.output).await
        }
        Commands::ClusterConfig { cluster_id } => {
            commands::resolve::handle_cluster_config(conn_mgr, &overrides, cluster_id, cli.output)
                .await
        }
        Commands::Readers {
            cluster_id,
            replicas_only,
        } => {
            let overrides = SessionOverrides {
                replicas_only: *replicas_only,
                ..overrides
            };
            commands::resolve::handle_readers(conn_mgr, &overrides, cluster_id, cli.output).await
        }
        Commands::Profile(profile_cmd) => {
            debug!("Executing profile command");
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, &overrides, cli.output)
                .await
        }
        Commands::Version => {
            debug!("Showing version information");
            match cli.output {
                cli::OutputFormat::Json | cli::OutputFormat::Yaml => {
                    let output_data = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "name": env!("CARGO_PKG_NAME"),
                    });
                    output::print_output(
                        &output_data,
                        output::OutputFormat::resolve(cli.output, output::OutputFormat::Json),
                    )
                    .map_err(EcEndpointError::from)
                }
                _ => {
                    println!("ecendpoint {}", env!("CARGO_PKG_VERSION"));
                    Ok(())
                }
            }
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(*shell);
            Ok(())
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

/// Generate shell completions
fn generate_completions(shell: cli::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}
