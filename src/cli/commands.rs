//! Command handlers: wire config, stores, and the engine together.

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::sqlite::{
    all_embedded_migrations, create_pool, Migrator, PoolConfig, SqliteActivityLog,
    SqliteIssueStore, SqliteWebsiteStore,
};
use crate::domain::models::{Config, IssueType, RemediationOptions};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::content::{ContentClient, ContentClientConfig};
use crate::infrastructure::generation::ProviderRegistry;
use crate::services::{EngineSettings, RemediationEngine};

use super::{FixArgs, FixTypesArgs};

pub async fn fix(args: FixArgs, config: Option<String>, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let engine = build_engine(&config).await?;

    let mut fix_types = Vec::new();
    for name in &args.fix_types {
        let ty = IssueType::parse_str(name)
            .ok_or_else(|| anyhow!("unknown issue type '{name}'"))?;
        fix_types.push(ty);
    }

    let options = RemediationOptions {
        max_changes: args.max_changes,
        fix_types,
        request_backup: !args.no_backup,
        run_reanalysis: !args.no_reanalysis,
        propagation_delay: Duration::from_secs(config.remediation.propagation_delay_secs),
    };

    let result = engine
        .analyze_and_fix(args.website_id, args.user_id, args.dry_run, options)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.message);
        println!(
            "  Found: {}  Attempted: {}  Succeeded: {}  Failed: {}",
            result.stats.total_issues_found,
            result.stats.fixes_attempted,
            result.stats.fixes_succeeded,
            result.stats.fixes_failed
        );
        if let Some(reanalysis) = &result.reanalysis {
            println!(
                "  Score: {:.1} -> {:.1} ({:+.1})",
                reanalysis.initial_score, reanalysis.final_score, reanalysis.score_improvement
            );
        }
        for error in &result.errors {
            println!("  error: {error}");
        }
        for line in &result.detailed_log {
            println!("  {line}");
        }
    }

    if result.success {
        Ok(())
    } else {
        Err(anyhow!("{}", result.message))
    }
}

pub async fn fix_types(args: FixTypesArgs, config: Option<String>, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let engine = build_engine(&config).await?;

    let summary = engine
        .available_fix_types(args.website_id, args.user_id)
        .await
        .context("Failed to summarize fixable issues")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.total_fixable_issues == 0 {
        println!("No fixable issues.");
    } else {
        println!(
            "{} fixable issue(s), ~{}s estimated",
            summary.total_fixable_issues, summary.estimated_time_secs
        );
        for fix_type in &summary.available_fixes {
            let count = summary.breakdown.get(fix_type).copied().unwrap_or(0);
            println!("  {fix_type}: {count}");
        }
    }
    Ok(())
}

fn load_config(path: Option<String>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

async fn build_engine(config: &Config) -> Result<RemediationEngine> {
    let pool = create_pool(
        &config.database.path,
        Some(PoolConfig {
            max_connections: config.database.max_connections,
            ..Default::default()
        }),
    )
    .await
    .context("Failed to open database")?;

    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to run migrations")?;

    let content = ContentClient::new(ContentClientConfig::default())
        .map_err(|e| anyhow!("failed to build content client: {e}"))?;
    let generator =
        ProviderRegistry::from_config(&config.generation).context("Failed to build providers")?;

    Ok(RemediationEngine::new(
        Arc::new(SqliteIssueStore::new(pool.clone())),
        Arc::new(SqliteWebsiteStore::new(pool.clone())),
        Arc::new(content),
        Arc::new(generator),
        Arc::new(SqliteActivityLog::new(pool)),
        EngineSettings::from(&config.remediation),
    ))
}
