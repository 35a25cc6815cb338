//! CLI administration tool for short.
//!
//! Runs maintenance tasks against the database without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired links and hits now
//! cargo run --bin admin -- sweep
//!
//! # Show a link and its 24-hour redirect count
//! cargo run --bin admin -- stats aB3xYz
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (see `short::config`). Only
//! `DATABASE_URL` is required.

use short::application::services::{RetentionService, StatsService, SweepReport};
use short::config::{self, Config};
use short::domain::repositories::{HitRepository, LinkRepository};
use short::infrastructure::persistence::{PgHitRepository, PgLinkRepository};
use short::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing short.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Delete links and hits older than their retention periods
    Sweep {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a link and its redirects over the last 24 hours
    Stats {
        /// Short code
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and show row counts
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    let pool_arc = Arc::new(pool.clone());
    let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool_arc.clone()));
    let hits: Arc<dyn HitRepository> = Arc::new(PgHitRepository::new(pool_arc));

    let result = match cli.command {
        Commands::Sweep { yes } => handle_sweep(&config, links, hits, yes).await,
        Commands::Stats { code } => handle_stats(&code, links, hits).await,
        Commands::Db { action } => handle_db_action(action, links, hits).await,
    };

    pool.close().await;
    result
}

/// Runs one retention sweep after confirmation.
async fn handle_sweep(
    config: &Config,
    links: Arc<dyn LinkRepository>,
    hits: Arc<dyn HitRepository>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🧹 Retention sweep".bright_blue().bold());
    println!();
    println!(
        "  Links older than: {}",
        format!("{}s", config.link_retention_seconds).cyan()
    );
    println!(
        "  Hits older than:  {}",
        format!("{}s", config.hit_retention_seconds).cyan()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete expired rows now?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let retention = RetentionService::new(
        links,
        hits,
        config.link_retention(),
        config.hit_retention(),
    );
    let report = retention.run_once().await;

    print_report(&report);

    if report.is_complete() {
        Ok(())
    } else {
        anyhow::bail!("Sweep finished with errors, see log output")
    }
}

fn print_report(report: &SweepReport) {
    let show = |n: Option<u64>| match n {
        Some(n) => n.to_string().bright_green().bold(),
        None => "failed".red().bold(),
    };

    println!();
    println!("  Links deleted: {}", show(report.links_deleted));
    println!("  Hits deleted:  {}", show(report.hits_deleted));
    println!();

    if report.is_complete() {
        println!("{}", "✅ Sweep complete".green().bold());
    } else {
        println!("{}", "⚠️  Sweep incomplete".yellow().bold());
    }
}

/// Shows the target URL of `code` and its 24-hour redirect count.
async fn handle_stats(
    code: &str,
    links: Arc<dyn LinkRepository>,
    hits: Arc<dyn HitRepository>,
) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let Some(link) = links.get(code).await? else {
        println!("{}", format!("  No link with code '{code}'").yellow());
        println!();
        return Ok(());
    };

    let stats = StatsService::new(hits, links);
    let redirects = stats.redirects_in_24_hours(code).await?;

    println!("  Code:          {}", link.code.cyan());
    println!("  Target:        {}", link.target_url.bright_white());
    println!(
        "  Created:       {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!(
        "  Redirects 24h: {}",
        redirects.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(
    action: DbAction,
    links: Arc<dyn LinkRepository>,
    hits: Arc<dyn HitRepository>,
) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            links.ping().await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!();

            let links_count = links.count().await?;
            let hits_count = hits.count().await?;

            println!(
                "  Links: {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Hits:  {}",
                hits_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
