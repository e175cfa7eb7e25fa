// Phase monitor: polls the gameflow phase on a timer, one tick at a time

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::error::FailureKind;
use super::scheduler::ActionScheduler;
use super::status::{StatusKey, StatusSink, StatusUpdate};
use super::types::{AutomationToggles, Phase, SessionActionState};
use crate::lcu::{LcuBridge, LcuConnection};

/// How the monitor obtains the client connection.
#[derive(Debug, Clone)]
pub enum SessionSource {
  /// Supplied once by the caller and never rediscovered.
  Fixed(LcuConnection),
  /// Read from the lockfile under this installation path.
  Lockfile(PathBuf),
}

/// Collaborators shared by every tick of one activation.
pub struct MonitorContext {
  pub bridge: Arc<dyn LcuBridge>,
  pub sink: Arc<dyn StatusSink>,
  pub scheduler: ActionScheduler,
  pub source: SessionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
  ClientNotRunning,
  SessionUnavailable,
  FetchFailed,
  Cancelled,
  Classified(Phase),
}

/// State owned by one monitoring activation. Created on `start`, dropped
/// with the monitor; only ever touched from inside a tick.
#[derive(Debug)]
pub struct MonitorSession {
  id: Uuid,
  connection: Option<LcuConnection>,
  actions: SessionActionState,
  last_status: Option<StatusKey>,
}

impl Default for MonitorSession {
  fn default() -> Self {
    Self::new()
  }
}

impl MonitorSession {
  pub fn new() -> Self {
    Self {
      id: Uuid::new_v4(),
      connection: None,
      actions: SessionActionState::new(),
      last_status: None,
    }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn actions(&self) -> &SessionActionState {
    &self.actions
  }

  pub fn last_status(&self) -> Option<StatusKey> {
    self.last_status
  }

  fn publish(&mut self, sink: &dyn StatusSink, key: StatusKey) {
    self.last_status = Some(key);
    sink.publish(StatusUpdate::from(key));
  }

  // Idle states are only announced when entered.
  fn publish_once(&mut self, sink: &dyn StatusSink, key: StatusKey) {
    if self.last_status != Some(key) {
      self.publish(sink, key);
    }
  }

  async fn connection(&mut self, ctx: &MonitorContext) -> Option<LcuConnection> {
    if let Some(connection) = &self.connection {
      return Some(connection.clone());
    }

    let connection = match &ctx.source {
      SessionSource::Fixed(connection) => connection.clone(),
      SessionSource::Lockfile(install_path) => match ctx.bridge.read_lockfile(install_path).await {
        Ok(connection) => {
          info!("Connected to League client on port {}", connection.port);
          connection
        }
        Err(e) => {
          debug!(kind = ?FailureKind::SessionUnavailable, "Lockfile unavailable: {}", e);
          return None;
        }
      },
    };
    self.connection = Some(connection.clone());
    Some(connection)
  }

  /// One pass of the monitoring loop.
  pub async fn tick(
    &mut self,
    ctx: &MonitorContext,
    toggles: AutomationToggles,
    cancel: &CancellationToken,
  ) -> TickOutcome {
    if cancel.is_cancelled() {
      return TickOutcome::Cancelled;
    }

    let running = ctx.bridge.is_client_running().await;
    if cancel.is_cancelled() {
      return TickOutcome::Cancelled;
    }
    if !running {
      if matches!(ctx.source, SessionSource::Lockfile(_)) && self.connection.take().is_some() {
        info!("League client closed, dropping connection");
      }
      self.publish_once(ctx.sink.as_ref(), StatusKey::ClientWaiting);
      return TickOutcome::ClientNotRunning;
    }

    let connection = self.connection(ctx).await;
    if cancel.is_cancelled() {
      return TickOutcome::Cancelled;
    }
    let Some(connection) = connection else {
      self.publish_once(ctx.sink.as_ref(), StatusKey::LockfileNotFound);
      return TickOutcome::SessionUnavailable;
    };

    let raw = match ctx.bridge.gameflow_phase(&connection).await {
      Ok(raw) => raw,
      Err(e) => {
        warn!(kind = ?FailureKind::TransientFetch, "Failed to fetch gameflow phase: {}", e);
        return TickOutcome::FetchFailed;
      }
    };

    if cancel.is_cancelled() {
      return TickOutcome::Cancelled;
    }

    let phase = Phase::classify(&raw);
    let previous = self.actions.previous_phase();
    if self.actions.observe(phase) {
      match previous {
        Some(previous) => info!("Phase changed: {} -> {}", previous, phase),
        None => info!("Phase: {}", phase),
      }
    }
    self.publish(ctx.sink.as_ref(), StatusKey::for_phase(phase));

    let report = ctx
      .scheduler
      .run(&connection, phase, toggles, &mut self.actions, cancel)
      .await;
    if !report.launched.is_empty() {
      debug!("Launched {:?} this tick", report.launched);
    }

    TickOutcome::Classified(phase)
  }
}

// Forwards to the caller's sink until closed. Once closed nothing else
// gets through, so `Inactive` is always the last status of an activation.
struct GatedSink {
  inner: Arc<dyn StatusSink>,
  closed: StdMutex<bool>,
}

impl GatedSink {
  fn new(inner: Arc<dyn StatusSink>) -> Self {
    Self {
      inner,
      closed: StdMutex::new(false),
    }
  }

  fn close(&self, last: StatusKey) {
    let mut closed = self.closed.lock().unwrap_or_else(|e| e.into_inner());
    if !*closed {
      *closed = true;
      self.inner.publish(StatusUpdate::from(last));
    }
  }
}

impl StatusSink for GatedSink {
  fn publish(&self, update: StatusUpdate) {
    let closed = self.closed.lock().unwrap_or_else(|e| e.into_inner());
    if !*closed {
      self.inner.publish(update);
    }
  }
}

/// Handle to a running monitor. Dropping it stops the loop and any
/// ban/pick sequence in flight, like `stop` without waiting.
pub struct PhaseMonitor {
  cancel: CancellationToken,
  handle: Option<JoinHandle<()>>,
  sink: Arc<GatedSink>,
  session_id: Uuid,
}

impl PhaseMonitor {
  /// Start polling every `period`. Toggles are read from `toggles` at the
  /// beginning of each tick. Must be called inside a tokio runtime.
  pub fn start(
    mut ctx: MonitorContext,
    period: Duration,
    toggles: watch::Receiver<AutomationToggles>,
  ) -> Self {
    let sink = Arc::new(GatedSink::new(ctx.sink.clone()));
    let gated: Arc<dyn StatusSink> = sink.clone();
    ctx.sink = gated;

    let mut session = MonitorSession::new();
    let session_id = session.id();
    session.publish(ctx.sink.as_ref(), StatusKey::ClientWaiting);

    let cancel = CancellationToken::new();
    let span = info_span!("monitor", session = %session_id);
    let handle = tokio::spawn(
      run_loop(
        Arc::new(ctx),
        Arc::new(Mutex::new(session)),
        period,
        toggles,
        cancel.clone(),
      )
      .instrument(span),
    );

    Self {
      cancel,
      handle: Some(handle),
      sink,
      session_id,
    }
  }

  pub fn session_id(&self) -> Uuid {
    self.session_id
  }

  pub fn is_running(&self) -> bool {
    !self.cancel.is_cancelled() && self.handle.as_ref().map_or(false, |h| !h.is_finished())
  }

  /// Stop scheduling ticks and publish `Inactive`. A tick already in flight
  /// is not awaited; it bails out at its next cancellation check and can no
  /// longer publish.
  pub async fn stop(mut self) {
    self.cancel.cancel();
    if let Some(handle) = self.handle.take() {
      if let Err(e) = handle.await {
        warn!("Monitor loop ended abnormally: {}", e);
      }
    }
    self.sink.close(StatusKey::Inactive);
    info!(session = %self.session_id, "Monitor stopped");
  }
}

impl Drop for PhaseMonitor {
  fn drop(&mut self) {
    self.cancel.cancel();
    self.sink.close(StatusKey::Inactive);
  }
}

async fn run_loop(
  ctx: Arc<MonitorContext>,
  session: Arc<Mutex<MonitorSession>>,
  period: Duration,
  toggles: watch::Receiver<AutomationToggles>,
  cancel: CancellationToken,
) {
  info!("Monitor started, polling every {:?}", period);
  let mut ticker = interval(period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

  loop {
    tokio::select! {
      biased;
      _ = cancel.cancelled() => break,
      _ = ticker.tick() => {}
    }

    // Single flight: skip rather than queue behind a slow tick
    let mut guard = match session.clone().try_lock_owned() {
      Ok(guard) => guard,
      Err(_) => {
        debug!("Previous tick still running, skipping");
        continue;
      }
    };

    let current = *toggles.borrow();
    let ctx = ctx.clone();
    let cancel = cancel.clone();
    tokio::spawn(
      async move {
        guard.tick(&ctx, current, &cancel).await;
      }
      .in_current_span(),
    );
  }
}
