//! CLI administration tool for snip.
//!
//! Inspects slugs, resolves them against the database and drives the guardian without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Convert between ids and slugs
//! cargo run --bin admin -- slug encode 125
//! cargo run --bin admin -- slug decode 21
//!
//! # Look up the original URL of a slug
//! cargo run --bin admin -- resolve 21
//!
//! # Guardian
//! cargo run --bin admin -- guardian refresh
//! cargo run --bin admin -- guardian check "http://198.51.100.7/bins/mozi.m"
//! cargo run --bin admin -- guardian status
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! `slug` needs no environment; `resolve` and `db` need the database settings; `guardian`
//! needs the full service configuration (see `snip::config`).

use snip::application::services::GuardianService;
use snip::config::{self, Config};
use snip::domain::entities::RefreshOutcome;
use snip::domain::errors::StoreError;
use snip::domain::repositories::{UrlGuardian, UrlRepository};
use snip::infrastructure::persistence::PgUrlRepository;
use snip::utils::slug_codec;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snip.
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
    /// Convert between ids and slugs
    Slug {
        #[command(subcommand)]
        action: SlugAction,
    },

    /// Print the original URL behind a slug
    Resolve {
        /// Slug as it appears in the short URL
        slug: String,
    },

    /// Inspect and refresh the malicious-URL blocklist
    Guardian {
        #[command(subcommand)]
        action: GuardianAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SlugAction {
    /// Encode a positive id as a slug
    Encode { id: u64 },

    /// Decode a slug into its id
    Decode { slug: String },
}

#[derive(Subcommand)]
enum GuardianAction {
    /// Run one refresh cycle against the threat feed
    Refresh,

    /// Check whether a URL is blocklisted
    Check { url: String },

    /// Show the number of blocklisted URLs and the last refresh time
    Status,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Slug { action } => handle_slug_action(action)?,
        Commands::Resolve { slug } => resolve(&connect_database().await?, &slug).await?,
        Commands::Guardian { action } => handle_guardian_action(action).await?,
        Commands::Db { action } => handle_db_action(action).await?,
    }

    Ok(())
}

async fn connect_database() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn handle_slug_action(action: SlugAction) -> Result<()> {
    match action {
        SlugAction::Encode { id } => {
            if id == 0 {
                anyhow::bail!("ids start at 1");
            }
            println!("{}", slug_codec::encode(id).bright_green().bold());
        }
        SlugAction::Decode { slug } => {
            let id = slug_codec::decode(&slug)
                .with_context(|| format!("'{slug}' is not a valid slug"))?;
            println!("{}", id.to_string().bright_green().bold());
        }
    }

    Ok(())
}

/// Looks up a slug without going through the redirect endpoint.
async fn resolve(pool: &PgPool, slug: &str) -> Result<()> {
    let id = slug_codec::decode(slug).with_context(|| format!("'{slug}' is not a valid slug"))?;
    let id = i64::try_from(id).context("slug is beyond the id range")?;

    let repo = PgUrlRepository::new(Arc::new(pool.clone()));

    match repo.find(id).await {
        Ok(record) => {
            println!("  Slug:     {}", record.slug.cyan());
            println!("  Id:       {}", record.id.to_string().bright_black());
            println!("  URL:      {}", record.original_url.bright_white());
            println!(
                "  Created:  {}",
                record
                    .created_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
        }
        Err(StoreError::NotFound) => {
            println!("{}", format!("No short URL for '{slug}'").yellow());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {e}")),
    }

    Ok(())
}

async fn handle_guardian_action(action: GuardianAction) -> Result<()> {
    let config = config::load_from_env().context("Invalid configuration")?;
    let redis = snip::infrastructure::redis::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;
    let guardian: Arc<GuardianService> = snip::server::build_guardian(&config, redis)?;

    match action {
        GuardianAction::Refresh => {
            println!("{}", "🔄 Refreshing blocklist...".bright_blue());

            let outcome = guardian
                .refresh_from_feed()
                .await
                .map_err(|e| anyhow::anyhow!("Refresh failed: {e}"))?;

            match outcome {
                RefreshOutcome::Locked => {
                    println!(
                        "{}",
                        "⚠️  Another instance is refreshing right now".yellow()
                    );
                }
                RefreshOutcome::Skipped { last_updated_at } => {
                    println!(
                        "{} (last refresh {})",
                        "⏭️  Blocklist is fresh, nothing fetched".yellow(),
                        last_updated_at.to_rfc3339().bright_black()
                    );
                }
                RefreshOutcome::Reconciled {
                    fetched,
                    added,
                    evicted,
                } => {
                    println!("{}", "✅ Blocklist refreshed".green().bold());
                    println!("  Fetched: {}", fetched.to_string().bright_white());
                    println!("  Added:   {}", added.to_string().bright_green());
                    println!("  Evicted: {}", evicted.to_string().bright_red());
                }
            }
        }
        GuardianAction::Check { url } => {
            let safe = guardian
                .safe_url(&url)
                .await
                .map_err(|e| anyhow::anyhow!("Blocklist check failed: {e}"))?;

            if safe {
                println!("{}", "✅ Not blocklisted".green().bold());
            } else {
                println!("{}", "⛔ Blocklisted".red().bold());
            }
        }
        GuardianAction::Status => {
            let status = guardian
                .status()
                .await
                .map_err(|e| anyhow::anyhow!("Blocklist unavailable: {e}"))?;

            println!("{}", "🛡️  Guardian".bright_blue().bold());
            println!();
            println!(
                "  Entries:      {}",
                status.entries.to_string().bright_green().bold()
            );
            println!(
                "  Last refresh: {}",
                status
                    .last_updated_at
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string())
                    .bright_white()
            );
            println!();
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let pool = connect_database().await?;
            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            let mappings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_map")
                .fetch_one(&pool)
                .await
                .context("url_map table is missing; start the server once to migrate")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Short URLs: {}", mappings.to_string().bright_white());
        }
    }

    Ok(())
}
