use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use jummix_notify::domain::traits::{DocumentStore, PushGateway};
use jummix_notify::infrastructure::adapters::{load_event, ConsoleListener};
use jummix_notify::infrastructure::fcm::FcmGateway;
use jummix_notify::infrastructure::firestore::FirestoreStore;
use jummix_notify::infrastructure::http::shared_client;
use jummix_notify::infrastructure::memory::MemoryGateway;
use jummix_notify::{Config, NotificationDispatcher, ServiceError};

#[derive(Parser)]
#[command(name = "jummix-notify")]
#[command(about = "Push notifications for new Jummix chat messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: String,

    /// Log notifications instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch one message-created event read from a JSON file
    Dispatch {
        #[arg(short, long)]
        event: PathBuf,
    },
    /// Dispatch newline-delimited events from stdin until EOF
    Listen,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dispatch { event } => dispatch(&cli.config, cli.dry_run, &event).await,
        Commands::Listen => listen(&cli.config, cli.dry_run).await,
        Commands::Version => {
            println!("jummix-notify v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &str) -> Result<Config, ServiceError> {
    let config = if Path::new(path).exists() {
        Config::load(path)?.with_env()
    } else {
        tracing::debug!("No config at {}, using defaults and environment", path);
        Config::load_env()
    };
    config.validate()?;
    Ok(config)
}

fn build_dispatcher(config: &Config, dry_run: bool) -> Result<NotificationDispatcher, ServiceError> {
    let client = shared_client(&config.http)?;

    let store: Arc<dyn DocumentStore> =
        Arc::new(FirestoreStore::new(client.clone(), &config.firebase, &config.store)?);

    let gateway: Arc<dyn PushGateway> = if dry_run {
        tracing::info!("Dry run: notifications are logged, not sent");
        Arc::new(MemoryGateway::new())
    } else {
        Arc::new(FcmGateway::new(client, &config.firebase, &config.push)?)
    };

    tracing::info!(
        project = %config.firebase.project_id,
        gateway = gateway.name(),
        "Notification dispatcher ready"
    );

    Ok(NotificationDispatcher::new(store, gateway, config.dispatcher.settings()))
}

async fn dispatch(config_path: &str, dry_run: bool, event_path: &Path) -> Result<(), ServiceError> {
    let config = load_config(config_path)?;
    let dispatcher = build_dispatcher(&config, dry_run)?;
    let event = load_event(event_path).await?;

    let summary = dispatcher.handle(&event).await;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn listen(config_path: &str, dry_run: bool) -> Result<(), ServiceError> {
    let config = load_config(config_path)?;
    let dispatcher = Arc::new(build_dispatcher(&config, dry_run)?);

    tracing::info!("Listening for events on stdin");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stats = ConsoleListener::new(dispatcher).run(stdin).await?;

    tracing::info!(
        dispatched = stats.dispatched,
        rejected = stats.rejected,
        aborted = stats.aborted,
        "Input closed"
    );
    Ok(())
}

fn init_config(path: &str) -> Result<(), ServiceError> {
    if Path::new(path).exists() {
        tracing::warn!("{} already exists, leaving it untouched", path);
        return Ok(());
    }

    std::fs::write(path, Config::default().to_yaml()?)?;
    println!("Created default config at {}", path);
    Ok(())
}
