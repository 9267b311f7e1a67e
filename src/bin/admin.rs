//! CLI administration tool for link-shortener.
//!
//! Inspects and manages links, runs the lifecycle step on demand, and
//! performs database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List an owner's links
//! cargo run --bin admin -- links list --user 3f2b... --page 2 --limit 20
//!
//! # Delete a link on behalf of its owner
//! cargo run --bin admin -- links delete aZ3kL9xQ2m --user 3f2b...
//!
//! # Age every link by one day right now
//! cargo run --bin admin -- lifecycle tick
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server: `DATABASE_URL`, or `DB_HOST`,
//! `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.

use link_shortener::application::services::LinkService;
use link_shortener::config;
use link_shortener::domain::entities::Link;
use link_shortener::infrastructure::persistence::PgLinkRepository;
use link_shortener::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and delete links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Run lifecycle steps by hand
    Lifecycle {
        #[command(subcommand)]
        action: LifecycleAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List an owner's live links, newest first
    List {
        /// Owner id
        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },

    /// Soft-delete a link owned by the given user
    Delete {
        /// Hash of the link
        hash: String,

        /// Owner id
        #[arg(short, long)]
        user: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Lifecycle subcommands.
#[derive(Subcommand)]
enum LifecycleAction {
    /// Decrement every live lifetime once and purge expired links
    Tick {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    let pool = connect_pool(&config).await?;

    let service = LinkService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        config.default_lifetime_days,
    );

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &service).await?,
        Commands::Lifecycle { action } => handle_lifecycle_action(action, &service).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;

    Ok(())
}

/// Dispatches link commands.
async fn handle_links_action(action: LinksAction, service: &LinkService) -> Result<()> {
    match action {
        LinksAction::List { user, page, limit } => list_links(service, &user, page, limit).await,
        LinksAction::Delete { hash, user, yes } => delete_link(service, &hash, &user, yes).await,
    }
}

/// Prints one page of an owner's links.
///
/// # Output Format
///
/// ```text
/// 📋 Links for 3f2b...
///
///   Hash         Clicks  Days  Created           URL
///   ─────────────────────────────────────────────────────────────────────────
///   aZ3kL9xQ2m   12      87    2025-04-23 10:30  https://example.com
///
///   Page 1 of 1 (1 links)
/// ```
async fn list_links(service: &LinkService, user: &str, page: i64, limit: i64) -> Result<()> {
    println!("{} {}", "📋 Links for".bright_blue().bold(), user.cyan());
    println!();

    let result = service
        .list_links(Some(user), page, limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if result.links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<7} {:<5} {:<17} {}",
        "Hash".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Days".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &result.links {
        print_link_row(link);
    }

    println!();
    println!(
        "  Page {} of {} ({} links)",
        result.page.to_string().bright_white().bold(),
        result.total_pages.to_string().bright_white().bold(),
        result.total_links.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

fn print_link_row(link: &Link) {
    let days = if link.is_expired() || link.remaining_lifetime == 1 {
        link.remaining_lifetime.to_string().red()
    } else {
        link.remaining_lifetime.to_string().green()
    };

    println!(
        "  {:<12} {:<7} {:<5} {:<17} {}",
        link.hash.cyan(),
        link.click_count,
        days,
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black(),
        link.url
    );
}

/// Soft-deletes a link after confirmation (default: No).
async fn delete_link(service: &LinkService, hash: &str, user: &str, yes: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_link(hash, Some(user))
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Hash:   {}", link.hash.cyan());
    println!("  URL:    {}", link.url);
    println!("  Clicks: {}", link.click_count.to_string().bright_black());
    println!();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(hash, user)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

/// Dispatches lifecycle commands.
async fn handle_lifecycle_action(action: LifecycleAction, service: &LinkService) -> Result<()> {
    match action {
        LifecycleAction::Tick { yes } => {
            println!("{}", "⏳ Lifecycle Tick".bright_blue().bold());
            println!();
            println!(
                "{}",
                "  Every live link loses one day; links reaching zero are deleted.".yellow()
            );
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Run one tick now?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let report = service.run_lifecycle_tick().await;

            println!(
                "  Decremented: {}",
                report.decremented.to_string().bright_green().bold()
            );
            println!(
                "  Expired:     {}",
                report.expired.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Displays link and click totals.
async fn handle_stats(service: &LinkService) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = service
        .summary()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  Live links:    {}",
        summary.live_links.to_string().bright_green().bold()
    );
    println!(
        "  Deleted links: {}",
        summary.deleted_links.to_string().bright_black()
    );
    println!(
        "  Total clicks:  {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
