//! kura-reg - member and aspirant registration service
//!
//! Serves the registration API, the admin record endpoints and the location
//! lookups used by the cascading registration form.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kura_common::api::AdminToken;
use kura_common::config::{ConfigOverrides, ServiceConfig};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kura_reg::{build_router, AppState, CatalogCache};

/// Command-line arguments for kura-reg
#[derive(Parser, Debug)]
#[command(name = "kura-reg")]
#[command(about = "Member and aspirant registration service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "KURA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "KURA_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "KURA_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "KURA_DATABASE")]
    database: Option<PathBuf>,

    /// Location catalog JSON file
    #[arg(long, env = "KURA_CATALOG")]
    catalog: Option<PathBuf>,

    /// Bearer token required for admin routes
    #[arg(long, env = "KURA_ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            config_file: args.config,
            host: args.host,
            port: args.port,
            database_path: args.database,
            catalog_path: args.catalog,
            admin_token: args.admin_token,
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kura_reg={level},kura_common={level},tower_http={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::resolve("kura-reg", args.into())
        .await
        .context("Failed to load configuration")?;

    init_tracing(&config.log_level);

    info!("Starting kura-reg v{}", env!("CARGO_PKG_VERSION"));
    info!("Database path: {}", config.database_path.display());
    info!("Catalog path: {}", config.catalog_path.display());

    let pool = kura_reg::db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    // Registration cannot work without the catalog, but listing and editing
    // can, so a bad catalog is reported here and retried on demand.
    let catalog = CatalogCache::new(&config.catalog_path);
    if let Err(e) = catalog.get().await {
        error!("{} - registrations will fail until this is fixed", e);
    }

    let admin_token = match &config.admin_token {
        Some(token) => {
            info!("✓ Admin token configured");
            Some(AdminToken::new(token))
        }
        None => {
            warn!("No admin token configured - admin routes are open");
            None
        }
    };

    let state = AppState::new(pool, catalog, admin_token);
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("kura-reg listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
