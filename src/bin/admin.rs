//! CLI administration tool for tunlink.
//!
//! Provides commands for generating API keys, browsing and deleting short
//! links, and checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Generate a value for API_KEY
//! cargo run --bin admin -- key generate
//!
//! # List short links
//! cargo run --bin admin -- url list --filter Google --page 1 --limit 20
//!
//! # Delete a short link by its code
//! cargo run --bin admin -- url delete 3fa85f6457
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components: PostgreSQL connection (`url`, `db`)
//! - `HOST`: short link base (`url`)

use tunlink::application::services::UrlService;
use tunlink::config::Config;
use tunlink::domain::repositories::UrlRepository;
use tunlink::infrastructure::persistence::PgUrlRepository;
use tunlink::utils::code_generator;
use tunlink::utils::masking::mask_connection_string;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tunlink.
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
    /// Manage the API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Manage short links
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Generate a random value for API_KEY
    Generate {
        /// Number of hex characters
        #[arg(short, long)]
        length: Option<usize>,
    },
}

#[derive(Subcommand)]
enum UrlAction {
    /// List short links
    List {
        /// Substring to look for in title, redirect or description
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Delete a short link by its code
    Delete {
        uid: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

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
        Commands::Key { action } => handle_key_action(action)?,
        Commands::Url { action } => handle_url_action(action).await?,
        Commands::Db { action } => handle_db_action(action).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })
}

fn handle_key_action(action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Generate { length } => {
            let key = match length {
                Some(length) => code_generator::generate(length)?,
                None => code_generator::generate_default()?,
            };

            println!("{}", "🔑 Generated API key".bright_blue().bold());
            println!();
            println!("  {}", key.bright_yellow().bold());
            println!();
            println!("{}", "Add this to your environment:".bright_white());
            println!("  {}={}", "API_KEY".bright_cyan(), key);
            println!();
        }
    }

    Ok(())
}

/// Dispatches short link commands through the same service the API uses.
async fn handle_url_action(action: UrlAction) -> Result<()> {
    let host = Config::load_host()?;
    let pool = connect().await?;
    let repository: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let service = UrlService::new(repository, host);

    match action {
        UrlAction::List {
            filter,
            page,
            limit,
        } => list_urls(&service, filter, page, limit).await?,
        UrlAction::Delete { uid, yes } => delete_url(&service, &uid, yes).await?,
    }

    Ok(())
}

/// Prints one page of short links.
///
/// # Output Format
///
/// ```text
/// 📋 Short URLs (page 1 of 3, 25 total)
///
///   ID    Code        Title                    Redirect
///   ─────────────────────────────────────────────────────────────────
///   1     3fa85f6457  Google                   https://google.com
/// ```
async fn list_urls(
    service: &UrlService<dyn UrlRepository>,
    filter: Option<String>,
    page: u32,
    limit: u32,
) -> Result<()> {
    let result = service
        .find_all(filter, page, limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list short URLs: {}", e))?;

    println!(
        "{} (page {} of {}, {} total)",
        "📋 Short URLs".bright_blue().bold(),
        result.meta.current_page,
        result.meta.total_pages,
        result.meta.total_count.to_string().bright_white().bold()
    );
    println!();

    if result.data.is_empty() {
        println!("{}", "  No short URLs found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<5} {:<11} {:<24} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Title".bright_white().bold(),
        "Redirect".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for url in &result.data {
        println!(
            "  {:<5} {:<11} {:<24} {}",
            url.id.to_string().bright_black(),
            url.uid().cyan(),
            url.title,
            url.redirect.bright_black()
        );
    }

    println!();
    if let Some(next) = &result.meta.next_page {
        println!("  Next: {}", next.bright_black());
        println!();
    }

    Ok(())
}

/// Deletes a short link after confirmation (default: No).
async fn delete_url(
    service: &UrlService<dyn UrlRepository>,
    uid: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete Short URL".bright_blue().bold());
    println!();

    let url = service
        .find_one(uid)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Url with uid {uid} not found"))?;

    println!("  Short link: {}", url.url.cyan());
    println!("  Title:      {}", url.title);
    println!("  Redirect:   {}", url.redirect.bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .remove(url.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete short URL: {}", e))?;

    println!("{}", "✅ Short URL deleted".green().bold());
    println!();
    println!(
        "{}",
        "Cached redirects for this code expire on their own TTL.".bright_black()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let pool = connect().await?;
            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
