//! palm-ra - Palm Reading Analysis microservice
//!
//! `serve` runs the HTTP API; `read` uploads an image to a running server,
//! polls until the analysis settles and prints the reading.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use palm_common::config::{load_or_default, TomlConfig};
use palm_common::AnalysisStatus;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palm_ra::client::{content_type_for_path, AnalysisClient};
use palm_ra::services::StageSchedule;
use palm_ra::{build_router, store, AppState};

/// Command-line arguments for palm-ra
#[derive(Parser, Debug)]
#[command(name = "palm-ra")]
#[command(about = "Palm reading analysis microservice")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "PALM_RA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve(ServeArgs),
    /// Upload an image to a running server and print its reading
    Read(ReadArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "PALM_RA_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "PALM_RA_HOST")]
    host: Option<String>,

    /// SQLite database file (enables SQLite storage)
    #[arg(long, env = "PALM_DATABASE")]
    database: Option<PathBuf>,

    /// Root folder holding palm.db when SQLite storage is configured
    #[arg(short, long)]
    root_folder: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// Image file to upload
    image: PathBuf,

    /// Server base URL
    #[arg(short, long, default_value = "http://127.0.0.1:5730")]
    server: String,
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("palm_ra={level},palm_common={level},tower_http={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_or_default(cli.config.as_deref(), "palm-ra")
        .context("Failed to load configuration")?;

    // the log level comes from the config, so its provenance is reported afterwards
    init_tracing(&loaded.config.logging.level);
    loaded.source.log();
    let config = loaded.config;

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(config, args).await,
        Command::Read(args) => read(config, args).await,
    }
}

async fn serve(mut config: TomlConfig, args: ServeArgs) -> Result<()> {
    // Log build identification immediately after tracing init
    info!(
        "Starting palm-ra v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(database) = args.database {
        config.database = Some(database);
    }

    let store = store::open_store(&config, args.root_folder)
        .await
        .context("Failed to open analysis store")?;

    let schedule = StageSchedule::scaled(config.analysis.delay_scale);
    info!(
        "Analysis schedule: {} stages, {} ms total dwell",
        schedule.stages().len(),
        schedule.total_delay().as_millis()
    );

    let state = AppState::new(store, schedule)
        .with_max_upload_bytes(config.analysis.max_upload_bytes);
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("palm-ra listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn read(config: TomlConfig, args: ReadArgs) -> Result<()> {
    let image = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let file_name = args
        .image
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("palm")
        .to_string();

    let client = AnalysisClient::new(args.server)?
        .with_poll_interval(Duration::from_millis(config.analysis.poll_interval_ms));

    let id = client
        .upload(image, &file_name, content_type_for_path(&args.image))
        .await?;
    info!(analysis_id = %id, "Uploaded {}", file_name);

    let analysis = client
        .wait_for_result(id, |snapshot| {
            info!(analysis_id = %snapshot.id, progress = snapshot.progress, "Analyzing your palm...");
        })
        .await?;

    match (analysis.status, analysis.result) {
        (AnalysisStatus::Completed, Some(reading)) => {
            println!("{}", reading);
            Ok(())
        }
        (status, _) => bail!("Analysis {} finished with status {}", id, status),
    }
}
