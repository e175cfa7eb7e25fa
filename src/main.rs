// Headless ZoeTrack: watch the League client until Ctrl-C
//
// Startup order:
// 1. Initialize tracing (stdout + live log file)
// 2. Load settings
// 3. Fetch the champion roster
// 4. Build the client bridge and the ban/pick pipeline
// 5. Start the phase monitor, stop it on Ctrl-C

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use zoetrack_lib::champion_data::DataDragonRoster;
use zoetrack_lib::config;
use zoetrack_lib::lcu::league_detection::resolve_install_path;
use zoetrack_lib::lcu::{HttpLcuBridge, LcuBridge};
use zoetrack_lib::lcu_watcher::logging::open_live_log;
use zoetrack_lib::lcu_watcher::{
  ActionScheduler, ChampionSelector, LogStatusSink, MonitorContext, PhaseMonitor, SessionSource,
};

const DEFAULT_LOG_FILTER: &str = "zoetrack_lib=info,zoetrack=info,warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let log_dir = config::data_dir()?.join("logs");
  init_tracing(&log_dir)?;

  let settings_path = match std::env::args_os().nth(1) {
    Some(path) => PathBuf::from(path),
    None => config::default_settings_path()?,
  };
  let settings = config::load_settings(&settings_path)
    .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
  info!(
    "Region {}, auto-accept {}, auto ban/pick {}",
    settings.region, settings.auto_accept, settings.auto_ban_pick
  );

  let roster = match DataDragonRoster::new()?.fetch().await {
    Ok(roster) => {
      info!("Loaded {} champions for fallback", roster.len());
      roster
    }
    Err(e) => {
      warn!("Champion roster unavailable, fallback disabled: {}", e);
      Vec::new()
    }
  };

  let bridge: Arc<dyn LcuBridge> =
    Arc::new(HttpLcuBridge::new().context("failed to build LCU client")?);
  let selector = ChampionSelector::new(bridge.clone())
    .with_jitter(settings.preferred_jitter(), settings.fallback_jitter())
    .with_ownership_markers(settings.ownership_markers());
  let scheduler = ActionScheduler::new(bridge.clone(), selector, settings.preferences(), roster);

  let install_path = resolve_install_path(&settings.lol_path);
  info!("Watching League installation at {}", install_path.display());

  let ctx = MonitorContext {
    bridge,
    sink: Arc::new(LogStatusSink),
    scheduler,
    source: SessionSource::Lockfile(install_path),
  };
  let (_toggles_tx, toggles_rx) = watch::channel(settings.toggles());
  let monitor = PhaseMonitor::start(ctx, settings.poll_interval(), toggles_rx);

  tokio::signal::ctrl_c()
    .await
    .context("failed to listen for Ctrl-C")?;
  info!("Shutting down");
  monitor.stop().await;

  Ok(())
}

fn init_tracing(log_dir: &Path) -> anyhow::Result<()> {
  let live_log = open_live_log(log_dir)
    .with_context(|| format!("failed to open live log in {}", log_dir.display()))?;

  let subscriber = tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    )
    .with_writer(std::io::stdout.and(Mutex::new(live_log)))
    .with_ansi(false)
    .with_target(true)
    .finish();

  tracing::subscriber::set_global_default(subscriber)
    .context("failed to set tracing subscriber")?;

  Ok(())
}
