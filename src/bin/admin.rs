//! CLI administration tool for dwarf.
//!
//! Manages short links and performs database operations directly against
//! PostgreSQL, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/some/long/path
//!
//! # Look up where a code points
//! cargo run --bin admin -- resolve aB3xY9
//!
//! # List links, 25 per page
//! cargo run --bin admin -- list --page 2
//!
//! # Delete a link
//! cargo run --bin admin -- delete 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `BASE_URL`: origin used when printing short URLs
//! - `CODE_MAX_ATTEMPTS`: collision resolution budget

use dwarf::application::services::LinkService;
use dwarf::config::{self, Config};
use dwarf::domain::repositories::Page;
use dwarf::infrastructure::cache::{CacheService, NullCache, RedisCache};
use dwarf::infrastructure::persistence::PgLinkRepository;
use dwarf::server::connect_database;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing dwarf.
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
    /// Shorten and store a URL
    Shorten {
        /// URL to shorten (http or https)
        url: String,
    },

    /// Show the URL a code points to
    Resolve {
        /// Short code (case-sensitive)
        code: String,
    },

    /// List stored links
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Links per page
        #[arg(short = 's', long, default_value_t = 25)]
        page_size: u32,
    },

    /// Delete a link by id
    Delete {
        /// Link id
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

type PgLinkService = LinkService<PgLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_database(&config)
        .await
        .context("Failed to connect to database")?;

    let service = build_service(&config, &pool);

    match cli.command {
        Commands::Shorten { url } => shorten(&service, url).await?,
        Commands::Resolve { code } => resolve(&service, &code).await?,
        Commands::List { page, page_size } => list(&service, page, page_size).await?,
        Commands::Delete { id, yes } => delete(&service, &config, id, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn build_service(config: &Config, pool: &PgPool) -> PgLinkService {
    let repository = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    LinkService::new(repository, config.base_url.clone(), config.code_max_attempts)
}

async fn shorten(service: &PgLinkService, url: String) -> Result<()> {
    println!("{}", "✂️  Shorten URL".bright_blue().bold());
    println!();

    let link = service
        .create_short_link(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  URL:       {}", link.url.cyan());
    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!(
        "  Short URL: {}",
        service.short_url(&link.code).bright_green().bold()
    );
    println!();

    Ok(())
}

async fn resolve(service: &PgLinkService, code: &str) -> Result<()> {
    let url = service
        .resolve_url(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match url {
        Some(url) => println!("  {} → {}", code.bright_yellow(), url.cyan()),
        None => println!("{}", format!("❌ No URL for code '{code}'").red()),
    }

    Ok(())
}

/// Lists links in id order.
///
/// # Output Format
///
/// ```text
/// 📋 Short Links
///
///   ID     Code      Created            URL
///   ────────────────────────────────────────────────────────────
///   1      aB3xY9    2026-01-15 10:30   https://example.com
/// ```
async fn list(service: &PgLinkService, page: u32, page_size: u32) -> Result<()> {
    println!("{}", "📋 Short Links".bright_blue().bold());
    println!();

    anyhow::ensure!(page > 0, "Page must be greater than 0");
    anyhow::ensure!(page_size > 0, "Page size must be greater than 0");

    let links = service
        .list_links(Some(Page {
            offset: i64::from(page - 1) * i64::from(page_size),
            limit: i64::from(page_size),
        }))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    let total = service
        .count_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<6} {:<9} {:<18} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<6} {:<9} {:<18} {}",
            link.id.to_string().bright_black(),
            link.code.bright_yellow(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.url.cyan()
        );
    }

    println!();
    println!(
        "  Page {} · showing {} of {}",
        page,
        links.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Connects to Redis when configured so deletes can evict cached redirects.
async fn connect_cache(config: &Config) -> Box<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        return Box::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => Box::new(redis),
        Err(e) => {
            println!(
                "{}",
                format!("⚠️  Redis unavailable ({e}), cached redirects expire after their TTL")
                    .yellow()
            );
            Box::new(NullCache::new())
        }
    }
}

/// Deletes a link after confirmation (default: No) and evicts its cached redirect.
async fn delete(service: &PgLinkService, config: &Config, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code: {}", link.code.bright_yellow());
    println!("  URL:  {}", link.url.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let cache = connect_cache(config).await;

    service
        .delete_link_and_evict(id, cache.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
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

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Links:      {}",
                links_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
