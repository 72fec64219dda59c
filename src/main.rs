//! startup-swipe: HTTP service for the swipe-and-vote front end
//!
//! Serves the record and vote API on top of a local SQLite database. The
//! `token` subcommand mints session tokens for local testing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use startup_swipe::api::{self, AppState};
use startup_swipe::storage::Store;
use startup_swipe::Config;

#[derive(Parser)]
#[command(name = "startup-swipe")]
#[command(about = "Swipe on startup demos and vote")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "startup-swipe.toml")]
    config: PathBuf,

    /// Data directory
    #[arg(short, long, env = "SWIPE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP port (overrides config file)
    #[arg(short, long, env = "SWIPE_HTTP_PORT")]
    port: Option<u16>,

    /// Session token secret (overrides config file)
    #[arg(long, env = "SWIPE_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Accept tokens signed with the development secret
    #[arg(long, env = "SWIPE_DEV_MODE")]
    dev: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Mint a session token for a user id
    Token {
        /// User id placed in the token subject
        #[arg(long)]
        user_id: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("startup_swipe=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(port) = cli.port {
        config.server.http_port = port;
    }
    if let Some(secret) = cli.jwt_secret {
        config.auth.jwt_secret = Some(secret);
    }
    if cli.dev {
        config.auth.dev_mode = true;
    }

    config.validate()?;
    let jwt = config.jwt_validator()?;

    if let Some(Command::Token { user_id, name }) = cli.command {
        println!("{}", jwt.generate_token(&user_id, name.as_deref())?);
        return Ok(());
    }

    info!(config = %cli.config.display(), "Starting startup-swipe");
    info!("Data dir: {}", config.storage.data_dir.display());
    if config.auth.dev_mode {
        info!("Dev mode: accepting development session tokens");
    }

    let store = Store::open(&config.db_path())?;
    info!(records = store.record_count()?, "Store ready");

    let state = AppState::new(store, jwt);
    let app = api::create_router(state, Duration::from_secs(config.server.cors_max_age_secs));

    let addr = format!("{}:{}", config.server.bind_addr, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    api::serve(listener, app).await?;

    Ok(())
}
