//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};
use ecendpoint_core::{CredentialKind, ReadEndpointPolicy};

/// Resolve AWS ElastiCache Redis endpoints
#[derive(Parser, Debug)]
#[command(name = "ecendpoint")]
#[command(version, about = "Resolve AWS ElastiCache Redis endpoints")]
#[command(long_about = "
Resolve AWS ElastiCache Redis endpoints

Looks up a replication group (falling back to a single cache cluster) and
prints the primary, configuration and read endpoints a client should use.

EXAMPLES:
    # Full topology for one cluster
    ecendpoint resolve my-redis

    # Just the address to connect to
    ecendpoint primary my-redis --region eu-west-1

    # Reader addresses, one per line, excluding the primary node
    ecendpoint readers my-redis --replicas-only

    # Point at a local emulator
    ecendpoint resolve my-redis --endpoint-url http://localhost:4566

    # Save a profile that uses a named AWS credentials profile
    ecendpoint profile set prod --region us-west-2 --credentials file --aws-profile prod

For more help on a specific command, run:
    ecendpoint <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "ECENDPOINT_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ECENDPOINT_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// AWS region (overrides the profile)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Custom ElastiCache API endpoint URL (overrides the profile)
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Abort on the first resolution failure
    #[arg(long, global = true)]
    pub panic_on_error: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Automatically choose format based on command and context
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the full endpoint topology of one or more clusters
    #[command(visible_alias = "res")]
    #[command(after_help = "EXAMPLES:
    # One cluster, JSON descriptor
    ecendpoint resolve my-redis

    # Several clusters, keep going past failures
    ecendpoint resolve cache-a cache-b cache-c

    # Stop at the first failure
    ecendpoint resolve cache-a cache-b --panic-on-error
")]
    Resolve {
        /// Replication group or cache cluster ids
        #[arg(required = true)]
        cluster_ids: Vec<String>,

        /// Leave the primary node out of the read endpoints
        #[arg(long)]
        replicas_only: bool,
    },

    /// Print the address a client should connect to
    #[command(visible_alias = "pri")]
    Primary {
        /// Replication group or cache cluster id
        cluster_id: String,
    },

    /// Print the configuration endpoint of a cluster-mode replication group
    #[command(name = "cluster-config", visible_alias = "cfg")]
    ClusterConfig {
        /// Replication group id
        cluster_id: String,
    },

    /// Print read endpoints, one per line
    #[command(visible_alias = "rd")]
    Readers {
        /// Replication group or cache cluster id
        cluster_id: String,

        /// Leave the primary node out of the read endpoints
        #[arg(long)]
        replicas_only: bool,
    },

    /// Profile management
    #[command(subcommand, visible_alias = "prof", visible_alias = "pr")]
    Profile(ProfileCommands),

    /// Version information
    #[command(visible_alias = "ver", visible_alias = "v")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly Interactive Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    /// Elvish
    Elvish,
}

/// Profile management commands
#[derive(Subcommand, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls", visible_alias = "l")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "sh", visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add", visible_alias = "create")]
    #[command(after_help = "EXAMPLES:
    # Default provider chain in a fixed region
    ecendpoint profile set prod --region us-west-2

    # Static keys only
    ecendpoint profile set ci --region us-east-1 --credentials static \\
        --access-key AKIAEXAMPLE --secret-key SECRET

    # Shared credentials file, then instance role
    ecendpoint profile set ops --credentials file,instance-role \\
        --credentials-file ~/.aws/credentials --aws-profile ops

    # Local emulator with replicas-only readers
    ecendpoint profile set local --endpoint-url http://localhost:4566 \\
        --read-endpoints replicas-only
")]
    Set(ProfileSetArgs),

    /// Remove a profile
    #[command(visible_alias = "rm", visible_alias = "del", visible_alias = "delete")]
    Remove {
        /// Profile name to remove
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Set the default profile
    #[command(visible_alias = "def")]
    Default {
        /// Profile name to use by default
        name: String,
    },
}

/// Settings for `profile set`
///
/// The global `--region`, `--endpoint-url` and `--panic-on-error` flags are
/// stored into the profile as well.
#[derive(Args, Debug)]
pub struct ProfileSetArgs {
    /// Profile name
    pub name: String,

    /// Credential sources to try, in order (default chain when omitted)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub credentials: Vec<CredentialKind>,

    /// Static access key id
    #[arg(long, requires = "secret_key")]
    pub access_key: Option<String>,

    /// Static secret access key
    #[arg(long, requires = "access_key")]
    pub secret_key: Option<String>,

    /// Static session token
    #[arg(long, requires = "access_key")]
    pub session_token: Option<String>,

    /// Shared credentials file for the `file` source
    #[arg(long)]
    pub credentials_file: Option<String>,

    /// Profile inside the shared credentials file
    #[arg(long)]
    pub aws_profile: Option<String>,

    /// Instance metadata endpoint for the `instance-role` source
    #[arg(long)]
    pub instance_metadata_endpoint: Option<String>,

    /// Which node-group members contribute read endpoints
    #[arg(long, value_enum, default_value = "include-primary")]
    pub read_endpoints: ReadEndpointPolicy,

    /// Make this the default profile
    #[arg(long)]
    pub default: bool,

    /// Store credentials in OS keyring instead of config file
    #[cfg(feature = "secure-storage")]
    #[arg(long)]
    pub use_keyring: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_accepts_multiple_ids() {
        let cli = Cli::try_parse_from(["ecendpoint", "resolve", "a", "b", "--replicas-only"]).unwrap();
        match cli.command {
            Commands::Resolve {
                cluster_ids,
                replicas_only,
            } => {
                assert_eq!(cluster_ids, vec!["a", "b"]);
                assert!(replicas_only);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ecendpoint",
            "primary",
            "my-redis",
            "--region",
            "eu-west-1",
            "--panic-on-error",
            "-o",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert!(cli.panic_on_error);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_profile_set_credential_list() {
        let cli = Cli::try_parse_from([
            "ecendpoint",
            "profile",
            "set",
            "ops",
            "--credentials",
            "file,instance-role",
        ])
        .unwrap();
        match cli.command {
            Commands::Profile(ProfileCommands::Set(args)) => {
                assert_eq!(
                    args.credentials,
                    vec![CredentialKind::File, CredentialKind::InstanceRole]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_secret_key_requires_access_key() {
        let result =
            Cli::try_parse_from(["ecendpoint", "profile", "set", "ci", "--secret-key", "s"]);
        assert!(result.is_err());
    }
}
