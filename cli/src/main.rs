//! Tickity check-in CLI: runs the event check-in flow without a phone.

mod device;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use tickity_checkin::{
    CheckInConfig, CheckInDeps, CheckInScreen, RedeemOutcome, ScreenView, WalletSession,
};
use tickity_media::HttpImageUploader;
use tickity_relay::RelayClient;
use tickity_store::CheckInCache;
use tickity_store_lmdb::LmdbStore;
use tickity_types::{Coordinates, EventId, WalletAddress};
use tickity_utils::{init_logging, LogFormat};

use crate::device::{FileCamera, FixedLocation};

#[derive(Parser)]
#[command(name = "tickity", about = "Tickity event check-in")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "TICKITY_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the check-in cache.
    #[arg(long, env = "TICKITY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Relay JSON-RPC endpoint.
    #[arg(long, env = "TICKITY_RELAY_URL")]
    relay_url: Option<String>,

    /// Image upload endpoint.
    #[arg(long, env = "TICKITY_UPLOAD_URL")]
    upload_url: Option<String>,

    /// Block explorer base URL.
    #[arg(long, env = "TICKITY_EXPLORER_URL")]
    explorer_url: Option<String>,

    /// Refuse check-in outside the geofence radius.
    #[arg(long, env = "TICKITY_ENFORCE_GEOFENCE")]
    enforce_geofence: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "TICKITY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TICKITY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the full check-in flow for one event.
    #[command(name = "check-in")]
    CheckIn {
        #[arg(long)]
        event: EventId,

        /// Smart wallet address of the signed-in user.
        #[arg(long, env = "TICKITY_WALLET")]
        wallet: WalletAddress,

        /// Device latitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Device longitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Image file used as the check-in selfie.
        #[arg(long)]
        selfie: PathBuf,
    },

    /// Show the cached check-in record for an event.
    Status {
        #[arg(long)]
        event: EventId,

        #[arg(long, env = "TICKITY_WALLET")]
        wallet: WalletAddress,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<CheckInConfig> {
    let mut config = match &cli.config {
        Some(path) => CheckInConfig::from_toml_file(path.clone())
            .with_context(|| format!("loading {}", path.display()))?,
        None => CheckInConfig::default(),
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(url) = &cli.relay_url {
        config.relay_url = url.clone();
    }
    if let Some(url) = &cli.upload_url {
        config.upload_url = url.clone();
    }
    if let Some(url) = &cli.explorer_url {
        config.explorer_url = url.clone();
    }
    config.enforce_geofence |= cli.enforce_geofence;
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn open_store(config: &CheckInConfig) -> anyhow::Result<Arc<LmdbStore>> {
    let store = LmdbStore::open(&config.data_dir)
        .with_context(|| format!("opening check-in store in {}", config.data_dir.display()))?;
    Ok(Arc::new(store))
}

async fn check_in(
    config: &CheckInConfig,
    event: EventId,
    wallet: WalletAddress,
    position: Coordinates,
    selfie: PathBuf,
) -> anyhow::Result<()> {
    let deps = CheckInDeps {
        relay: Arc::new(RelayClient::new(config.relay_url.clone())?),
        uploader: Arc::new(HttpImageUploader::new(config.upload_url.clone())?),
        store: open_store(config)?,
        location: Arc::new(FixedLocation::new(position)),
        camera: Arc::new(FileCamera::new(selfie)),
    };

    let mut screen =
        CheckInScreen::mount(deps, config, event, Some(WalletSession::new(wallet)));

    if let ScreenView::AlreadyCheckedIn { explorer_url, .. } = screen.view().await {
        println!("Already checked in to {}.", screen.event());
        if let Some(url) = explorer_url {
            println!("Transaction: {url}");
        }
        return Ok(());
    }

    screen.verify_email()?;
    let decision = screen.verify_location().await?;
    println!(
        "Location verified: {:.0} m from the event{}",
        decision.distance_m,
        if decision.within_radius { "" } else { " (outside the check-in radius)" }
    );
    screen.take_selfie().await?;

    let ctrl_c = tokio::signal::ctrl_c();
    let outcome = tokio::select! {
        outcome = screen.redeem() => outcome?,
        _ = ctrl_c => {
            tracing::info!("Interrupted, cancelling check-in");
            screen.cancel();
            RedeemOutcome::Cancelled
        }
    };

    match outcome {
        RedeemOutcome::Succeeded { record, .. } => {
            println!("Checked in to {}.", screen.event());
            if let Some(url) = screen.explorer_url().await {
                println!("Transaction: {url}");
            }
            if let Some(image) = record.image_url {
                println!("Photo: {image}");
            }
            Ok(())
        }
        RedeemOutcome::Failed { message } => {
            if let Some(url) = screen.explorer_url().await {
                println!("Transaction: {url}");
            }
            bail!("check-in failed: {message}")
        }
        RedeemOutcome::Cancelled => bail!("check-in cancelled"),
        RedeemOutcome::Ignored => bail!("a check-in is already in progress"),
    }
}

fn status(config: &CheckInConfig, event: &EventId, wallet: &WalletAddress) -> anyhow::Result<()> {
    let cache = CheckInCache::new(open_store(config)?);
    match cache.get_for_wallet(event, wallet)? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("Not checked in to {event} with {wallet}."),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level).context("installing log subscriber")?;

    tracing::info!(
        relay = %config.relay_url,
        data_dir = %config.data_dir.display(),
        enforce_geofence = config.enforce_geofence,
        "tickity starting"
    );

    match cli.command {
        Command::CheckIn {
            event,
            wallet,
            lat,
            lon,
            selfie,
        } => check_in(&config, event, wallet, Coordinates::new(lat, lon), selfie).await,
        Command::Status { event, wallet } => status(&config, &event, &wallet),
    }
}
