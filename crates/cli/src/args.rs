//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "sitedeploy",
    version,
    about = "Deploy static sites from the command line"
)]
pub struct Cli {
    /// API endpoint (falls back to the config file, then the default).
    #[arg(long, global = true, env = "SITEDEPLOY_API")]
    pub api: Option<String>,

    /// API token (falls back to SITEDEPLOY_TOKEN, then the config file).
    #[arg(long, global = true, env = "SITEDEPLOY_TOKEN")]
    pub token: Option<String>,

    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy files or directories.
    Deploy {
        /// Files or directories to deploy.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Keep original paths instead of flattening the common parent.
        #[arg(long)]
        keep_paths: bool,

        /// Disable single-page-app detection.
        #[arg(long)]
        no_spa: bool,

        /// Validate the file set and print a report without uploading.
        #[arg(long)]
        check: bool,
    },
    /// List deployments.
    List,
    /// Show one deployment.
    Info { id: String },
    /// Delete a deployment.
    Remove { id: String },
    /// Manage aliases.
    Alias {
        #[command(subcommand)]
        command: AliasCommands,
    },
    /// Show account information.
    Account,
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AliasCommands {
    /// List aliases.
    List,
    /// Point an alias at a deployment.
    Set { name: String, deployment_id: String },
    /// Delete an alias.
    Remove { name: String },
}
