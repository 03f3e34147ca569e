// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use release_mirror::utils::logging;
use release_mirror::{ArtifactStore, Config, ReleasePoller, server};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "release-mirror")]
#[command(version = "0.1.0")]
#[command(about = "Mirrors GitHub release artifacts into an object store and serves them over HTTP", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server and the poll scheduler
    Serve,

    /// Run a single poll pass over the registered repositories
    Sync,

    /// Check configuration and storage connectivity
    Verify,

    /// Print the mirrored objects
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.color, cli.verbose);

    info!("Release artifact mirror");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Serve => {
            cmd_serve(config).await?;
        }
        Commands::Sync => {
            cmd_sync(&config).await?;
        }
        Commands::Verify => {
            cmd_verify(&config).await?;
        }
        Commands::List => {
            cmd_list(&config).await?;
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> Result<Arc<ArtifactStore>> {
    let store = ArtifactStore::from_url(&config.storage.url)
        .with_context(|| format!("Failed to open object store at {}", config.storage.url))?;
    Ok(Arc::new(store))
}

async fn cmd_serve(config: Config) -> Result<()> {
    let store = open_store(&config)?;

    if config.webhook.secret.is_none() {
        warn!("No webhook secret configured, webhook deliveries will be rejected");
    }

    let interval = config.mirror.poll_interval_secs;
    if interval > 0 {
        let poller = ReleasePoller::new(config.mirror.clone(), Arc::clone(&store));
        tokio::spawn(async move {
            poller.run_forever(Duration::from_secs(interval)).await;
        });
        info!("Poll scheduler running every {}s", interval);
    } else {
        warn!("Polling disabled (poll_interval_secs = 0)");
    }

    let bind_address = config.server.bind_address.clone();
    let state = server::AppState::new(config, store);
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn cmd_sync(config: &Config) -> Result<()> {
    info!("Starting one-shot mirror pass");

    let store = open_store(config)?;
    let poller = ReleasePoller::new(config.mirror.clone(), store);
    let stats = poller.run().await;

    println!(
        "{}",
        logging::format_success(&format!(
            "Mirrored {} new artifacts ({} already present, {} irrelevant)",
            stats.mirrored, stats.skipped_existing, stats.skipped_irrelevant
        ))
    );
    if stats.failed > 0 {
        println!(
            "{}",
            logging::format_error(&format!(
                "{} transfers failed, they will be retried on the next pass",
                stats.failed
            ))
        );
    }

    Ok(())
}

async fn cmd_verify(config: &Config) -> Result<()> {
    info!("Verifying configuration and storage");

    if config.mirror.repositories.is_empty() {
        println!(
            "{}",
            logging::format_warning("No repositories registered, poll runs will be no-ops")
        );
    } else {
        println!(
            "{}",
            logging::format_success(&format!(
                "{} repositories registered",
                config.mirror.repositories.len()
            ))
        );
        for source in &config.mirror.repositories {
            let access = if source.token.is_some() {
                "authenticated"
            } else {
                "public"
            };
            println!("  - {} ({})", source.full_name(), access);
        }
    }

    match config.webhook.secret {
        Some(_) => println!("{}", logging::format_success("Webhook secret configured")),
        None => println!(
            "{}",
            logging::format_warning("No webhook secret, deliveries will be rejected")
        ),
    }

    let store = open_store(config)?;
    match store.list(1).await {
        Ok(_) => println!(
            "{}",
            logging::format_success(&format!("Object store reachable at {}", config.storage.url))
        ),
        Err(e) => println!(
            "{}",
            logging::format_error(&format!("Object store check failed: {}", e))
        ),
    }

    Ok(())
}

async fn cmd_list(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let objects = store
        .list(config.server.list_page_limit)
        .await
        .context("Failed to list mirrored objects")?;

    if objects.is_empty() {
        println!("No artifacts mirrored yet.");
        return Ok(());
    }

    for object in &objects {
        println!(
            "{:>12}  {}  {}",
            object.size,
            object.uploaded.format("%Y-%m-%d %H:%M:%S"),
            object.key
        );
    }
    println!("{} objects", objects.len());

    Ok(())
}
