//! Command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sitemender", version, about = "SEO issue remediation engine")]
pub struct Cli {
    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .sitemender/config.yaml)
    #[arg(long, global = true, env = "SITEMENDER_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remediate fixable issues on a website
    Fix(FixArgs),
    /// Show which issue types can currently be fixed
    FixTypes(FixTypesArgs),
}

#[derive(clap::Args)]
pub struct FixArgs {
    /// Website to remediate
    pub website_id: Uuid,

    /// Acting user (website owner)
    #[arg(long, env = "SITEMENDER_USER_ID")]
    pub user_id: Uuid,

    /// Simulate only; no content is mutated and no statuses change
    #[arg(long)]
    pub dry_run: bool,

    /// Cap the number of fixes applied this run
    #[arg(long)]
    pub max_changes: Option<usize>,

    /// Restrict the run to these issue types (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub fix_types: Vec<String>,

    /// Skip the backup request before mutating
    #[arg(long)]
    pub no_backup: bool,

    /// Skip the post-remediation score pass
    #[arg(long)]
    pub no_reanalysis: bool,
}

#[derive(clap::Args)]
pub struct FixTypesArgs {
    /// Website to inspect
    pub website_id: Uuid,

    /// Acting user (website owner)
    #[arg(long, env = "SITEMENDER_USER_ID")]
    pub user_id: Uuid,
}

/// Print an error and exit non-zero, honoring the JSON flag.
pub fn handle_error(err: anyhow::Error, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": err.to_string() });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
