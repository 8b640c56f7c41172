use clap::Parser;
use portfolio_core::adapters::{PostgresSettingsRepository, PostgresTransactionRepository};
use portfolio_core::cli::{self, Cli, Commands, DbCommands, SettingsCommands, TxCommands};
use portfolio_core::config::{self, LogFormat, ResolverConfig};
use portfolio_core::{create_app, cors_layer, db, AppState};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env()?);

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Config => cli::handle_config_validate(&config::Config::from_env()?),
        Commands::Db(DbCommands::Migrate) => {
            cli::handle_db_migrate(&config::Config::from_env()?).await
        }
        Commands::Tx(command) => {
            let config = config::Config::from_env()?;
            let pool = db::create_pool(&config).await?;
            let repo = PostgresTransactionRepository::new(pool);
            match command {
                TxCommands::List => cli::handle_tx_list(&repo).await,
                TxCommands::Show { reference } => cli::handle_tx_show(&repo, &reference).await,
            }
        }
        Commands::Settings(command) => {
            let resolver_config = ResolverConfig::from_env("http://127.0.0.1:3000")?;
            match command {
                SettingsCommands::Show => cli::handle_settings_show(&resolver_config).await,
                SettingsCommands::Watch => cli::handle_settings_watch(&resolver_config).await,
            }
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool, Path::new(db::MIGRATIONS_DIR)).await?;

    let app_state = AppState {
        db: pool.clone(),
        transactions: Arc::new(PostgresTransactionRepository::new(pool.clone())),
        settings: Arc::new(PostgresSettingsRepository::new(pool)),
        admin_api_key: config.admin_api_key.clone(),
    };

    let app = create_app(app_state).layer(cors_layer(&config.cors_allowed_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
