use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use crate::config::{Config, ResolverConfig};
use crate::domain::SiteSettings;
use crate::ports::TransactionRepository;
use crate::settings::{http_resolver, RefreshTrigger, SettingsResolver};

#[derive(Parser)]
#[command(name = "portfolio-core")]
#[command(about = "Portfolio Core - site settings and payment transactions backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction inspection commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Resolve site settings the way the public site does
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// List every transaction, newest first
    List,

    /// Show one transaction and its order
    Show {
        /// Provider transaction reference
        #[arg(value_name = "REFERENCE")]
        reference: String,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Resolve once and print the result
    Show,

    /// Keep refreshing and print every change; press Enter to simulate a focus event
    Watch,
}

pub async fn handle_tx_list(repo: &dyn TransactionRepository) -> anyhow::Result<()> {
    let transactions = repo.list_with_orders().await?;

    if transactions.is_empty() {
        println!("No transactions found");
        return Ok(());
    }

    println!(
        "{:<28} {:>14} {:<6} {:<10} {:<20}",
        "Reference", "Amount", "Cur", "Status", "Created"
    );
    println!("{}", "-".repeat(82));

    for item in transactions {
        let tx = item.transaction;
        println!(
            "{:<28} {:>14} {:<6} {:<10} {:<20}",
            tx.reference,
            tx.amount.to_string(),
            tx.currency,
            tx.status,
            tx.created_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }

    Ok(())
}

pub async fn handle_tx_show(repo: &dyn TransactionRepository, reference: &str) -> anyhow::Result<()> {
    match repo.find_by_reference(reference).await? {
        Some(transaction) => {
            println!("{}", serde_json::to_string_pretty(&transaction)?);
            Ok(())
        }
        None => anyhow::bail!("Transaction {} not found", reference),
    }
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool, Path::new(crate::db::MIGRATIONS_DIR)).await?;

    println!("✓ Database migrations completed");

    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  Admin API Key: {}", "*".repeat(config.admin_api_key.len().min(8)));
    println!("  CORS Origins: {:?}", config.cors_allowed_origins);
    println!("  Log Format: {:?}", config.log_format);
    println!("  Settings Base URL: {}", config.resolver.base_url);
    println!(
        "  Settings Stale After: {}s, Refresh Every: {}s",
        config.resolver.stale_after_secs, config.resolver.refresh_every_secs
    );

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

pub async fn handle_settings_show(config: &ResolverConfig) -> anyhow::Result<()> {
    let resolver = http_resolver(config);
    print_settings(&resolver.get_settings().await)
}

pub async fn handle_settings_watch(config: &ResolverConfig) -> anyhow::Result<()> {
    let resolver = Arc::new(http_resolver(config));
    let mut updates = resolver.subscribe();
    print_settings(&resolve_initial(&resolver, &mut updates).await)?;

    let (triggers, rx) = mpsc::channel(16);
    let refresh_loop = resolver.clone().spawn(config.refresh_every(), rx);

    tracing::info!(
        url = %config.base_url,
        every_secs = config.refresh_every_secs,
        "Watching site settings"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let settings = updates.borrow_and_update().clone();
                print_settings(&settings)?;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(_)) => {
                    triggers.send(RefreshTrigger::Focus).await?;
                }
                _ => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping settings watch");
                break;
            }
        }
    }

    drop(triggers);
    refresh_loop.await?;
    Ok(())
}

/// First resolution, marked as seen so the watch loop only prints later changes.
async fn resolve_initial(
    resolver: &SettingsResolver,
    updates: &mut watch::Receiver<SiteSettings>,
) -> SiteSettings {
    let settings = resolver.get_settings().await;
    updates.borrow_and_update();
    settings
}

fn print_settings(settings: &SiteSettings) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
