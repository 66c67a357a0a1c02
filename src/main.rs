use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hausmeister::admin::{AdminConfig, AdminServer, RuntimeHandles};
use hausmeister::logconf::DocumentStore;
use hausmeister::registry::{level_from_name, LoggerState, MemoryLoggerRegistry};

#[derive(Parser)]
#[command(
    name = "hausmeister",
    version,
    about = "Admin backend for a home-automation runtime",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the admin API
    Serve {
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        bind: String,

        /// Directory holding logging.yaml
        #[arg(long, default_value = "etc")]
        etc_dir: PathBuf,

        /// Bearer token for mutating routes
        #[arg(long)]
        token: Option<String>,

        /// Disable CORS
        #[arg(long, default_value = "false")]
        no_cors: bool,
    },

    /// Validate the logging document
    CheckConfig {
        /// Directory holding logging.yaml
        #[arg(long, default_value = "etc")]
        etc_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    tracing::info!("hausmeister admin backend starting");

    match cli.command {
        Commands::Serve {
            bind,
            etc_dir,
            token,
            no_cors,
        } => {
            tracing::info!(bind = %bind, etc_dir = %etc_dir.display(), "Starting serve command");
            serve(bind, etc_dir, token, no_cors).await?;
        }

        Commands::CheckConfig { etc_dir } => {
            check_config(etc_dir)?;
        }
    }

    Ok(())
}

async fn serve(bind: String, etc_dir: PathBuf, token: Option<String>, no_cors: bool) -> Result<()> {
    let mut builder = AdminConfig::builder()
        .bind_address_str(&bind)?
        .etc_dir(etc_dir.clone())
        .enable_cors(!no_cors);
    if let Some(token) = token {
        builder = builder.api_token(token);
    }
    let config = builder.build()?;

    let mut handles = RuntimeHandles::in_memory();
    handles.loggers = seed_loggers(&config)?;

    let server = AdminServer::new(config, handles)?;
    server
        .start_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

/// Seed the in-memory logger registry from the persisted document, so the
/// standalone server starts with every configured logger active.
fn seed_loggers(config: &AdminConfig) -> Result<Arc<MemoryLoggerRegistry>> {
    let registry = Arc::new(MemoryLoggerRegistry::new());
    let store = DocumentStore::new(&config.etc_dir, &config.runtime_version);

    match store.load() {
        Ok(doc) => {
            for (name, conf) in &doc.loggers {
                let level = conf
                    .level
                    .as_deref()
                    .and_then(level_from_name)
                    .unwrap_or_default();
                registry.insert(name, LoggerState::with_level(level));
            }
            if let Some(level) = doc
                .root
                .get("level")
                .and_then(|v| v.as_str())
                .and_then(level_from_name)
            {
                registry.set_root(LoggerState::with_level(level));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "no logging document found, starting empty");
        }
    }

    Ok(registry)
}

fn check_config(etc_dir: PathBuf) -> Result<()> {
    let store = DocumentStore::new(&etc_dir, env!("CARGO_PKG_VERSION"));
    let doc = store.load()?;

    println!("Logging document: {}", store.path().display());
    println!("  Version stamp: {}", doc.shng_version.as_deref().unwrap_or("-"));
    println!("  Configured loggers: {}", doc.loggers.len());
    for (name, conf) in &doc.loggers {
        println!("    {name}: {}", conf.level.as_deref().unwrap_or("inherited"));
    }
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("hausmeister=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("hausmeister=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
