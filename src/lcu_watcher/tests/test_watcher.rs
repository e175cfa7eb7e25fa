// Tests for the monitor loop: status sequence, single flight, discovery, stop

use super::test_helpers::*;
use crate::lcu::ActionType;
use crate::lcu_watcher::status::StatusKey;
use crate::lcu_watcher::types::{AutomationToggles, Phase};
use crate::lcu_watcher::watcher::{MonitorSession, PhaseMonitor, SessionSource, TickOutcome};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod watcher_tests {
    use super::*;

    const GAME_SEQUENCE: [&str; 6] = [
        "Lobby",
        "Matchmaking",
        "ReadyCheck",
        "ChampSelect",
        "ChampSelect",
        "InProgress",
    ];

    const ALL_ON: AutomationToggles = AutomationToggles {
        auto_accept: true,
        auto_ban_pick: true,
    };

    fn game_bridge() -> Arc<MockBridge> {
        Arc::new(
            MockBridge::new()
                .with_phases(&GAME_SEQUENCE)
                .with_session(Some(session_with_pending(true, false))),
        )
    }

    /// Test: Full game walk-through, one tick per phase
    ///
    /// Scenario: Lobby -> Matchmaking -> ReadyCheck -> ChampSelect x2 -> InProgress
    /// with both toggles on and ban preference [Annie].
    /// Expected: One status per tick, one accept, one ban of champion 1.
    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_sequence() {
        let bridge = game_bridge();
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(vec![champion(1, "Annie")]),
            SessionSource::Fixed(test_connection()),
        );
        let cancel = CancellationToken::new();
        let mut session = MonitorSession::new();

        let mut outcomes = Vec::new();
        for _ in 0..GAME_SEQUENCE.len() {
            outcomes.push(session.tick(&ctx, ALL_ON, &cancel).await);
        }

        assert_eq!(
            sink.labels(),
            vec!["LOBBY", "QUEUE", "GAME_FOUND", "CHAMP_SELECT", "CHAMP_SELECT", "IN_GAME"]
        );
        assert_eq!(outcomes[5], TickOutcome::Classified(Phase::InProgress));
        assert_eq!(bridge.accepts(), 1);

        let submissions = bridge.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].champion_id, 1);
        assert_eq!(submissions[0].action_type, ActionType::Ban);
        assert!(session.actions().is_done(ActionType::Ban));
    }

    /// Test: Same walk-through driven by the timer
    #[tokio::test(start_paused = true)]
    async fn test_monitor_drives_sequence() {
        let bridge = game_bridge();
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(vec![champion(1, "Annie")]),
            SessionSource::Fixed(test_connection()),
        );
        let (_toggles_tx, toggles_rx) = watch::channel(ALL_ON);

        let monitor = PhaseMonitor::start(ctx, Duration::from_millis(500), toggles_rx);
        assert!(monitor.is_running());
        sleep(Duration::from_millis(10_200)).await;
        monitor.stop().await;

        let keys = sink.keys();
        assert_eq!(
            &keys[..7],
            &[
                StatusKey::ClientWaiting,
                StatusKey::Lobby,
                StatusKey::Queue,
                StatusKey::GameFound,
                StatusKey::ChampSelect,
                StatusKey::ChampSelect,
                StatusKey::InGame,
            ]
        );
        assert!(keys[7..keys.len() - 1].iter().all(|k| *k == StatusKey::InGame));
        assert_eq!(keys.last(), Some(&StatusKey::Inactive));
        assert_eq!(bridge.accepts(), 1);
        assert_eq!(bridge.submitted_ids(), vec![1]);
    }

    /// Test: Ticks never overlap
    ///
    /// Scenario: The phase query blocks; the timer keeps firing.
    /// Expected: Only one query is in flight; the next one starts only after
    /// the blocked tick finishes.
    #[tokio::test(start_paused = true)]
    async fn test_single_flight_skips_busy_ticks() {
        let gate = Arc::new(Semaphore::new(0));
        let bridge = Arc::new(
            MockBridge::new()
                .with_phases(&["Lobby"])
                .with_phase_gate(gate.clone()),
        );
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let (_toggles_tx, toggles_rx) = watch::channel(AutomationToggles::default());

        let monitor = PhaseMonitor::start(ctx, Duration::from_millis(100), toggles_rx);
        sleep(Duration::from_millis(2050)).await;
        assert_eq!(bridge.phase_calls.load(Ordering::SeqCst), 1);

        gate.add_permits(1);
        sleep(Duration::from_millis(150)).await;
        assert_eq!(bridge.phase_calls.load(Ordering::SeqCst), 2);
        assert_eq!(sink.keys(), vec![StatusKey::ClientWaiting, StatusKey::Lobby]);

        monitor.stop().await;
    }

    /// Test: Toggles are read at tick time
    #[tokio::test(start_paused = true)]
    async fn test_toggle_changes_apply_to_next_tick() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["ReadyCheck"]));
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink,
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let (toggles_tx, toggles_rx) = watch::channel(AutomationToggles::default());

        let monitor = PhaseMonitor::start(ctx, Duration::from_secs(1), toggles_rx);
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(bridge.accepts(), 0);

        toggles_tx
            .send(AutomationToggles {
                auto_accept: true,
                auto_ban_pick: false,
            })
            .unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(bridge.accepts(), 1);

        monitor.stop().await;
    }

    /// Test: Stop publishes Inactive and halts polling
    #[tokio::test(start_paused = true)]
    async fn test_stop_publishes_inactive() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["Lobby"]));
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let (_toggles_tx, toggles_rx) = watch::channel(AutomationToggles::default());

        let monitor = PhaseMonitor::start(ctx, Duration::from_secs(1), toggles_rx);
        sleep(Duration::from_millis(1500)).await;
        monitor.stop().await;

        let calls = bridge.phase_calls.load(Ordering::SeqCst);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(bridge.phase_calls.load(Ordering::SeqCst), calls);
        assert_eq!(sink.keys().last(), Some(&StatusKey::Inactive));
    }

    /// Test: Stop ends a ban sequence that is still walking the roster
    ///
    /// Scenario: Champ select with a pending ban; nothing is owned and the
    /// roster is large, so the sequence would run for minutes.
    /// Expected: No submission after stop returns; Inactive is the last status.
    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_running_sequence() {
        let bridge = Arc::new(
            MockBridge::new()
                .with_phases(&["ChampSelect"])
                .with_session(Some(session_with_pending(true, false))),
        );
        bridge.set_default_behavior(SubmitBehavior::NotOwned);
        let sink = Arc::new(RecordingSink::default());
        let ctx = context_with_roster(
            bridge.clone(),
            sink.clone(),
            ban_preferences(vec![champion(1, "Annie")]),
            roster(1..=200),
            SessionSource::Fixed(test_connection()),
        );
        let (_toggles_tx, toggles_rx) = watch::channel(ALL_ON);

        let monitor = PhaseMonitor::start(ctx, Duration::from_secs(1), toggles_rx);
        sleep(Duration::from_secs(5)).await;
        monitor.stop().await;

        let submitted = bridge.submitted_ids().len();
        assert!(submitted >= 1 && submitted < 200);

        sleep(Duration::from_secs(300)).await;
        assert_eq!(bridge.submitted_ids().len(), submitted);
        assert_eq!(sink.keys().last(), Some(&StatusKey::Inactive));
    }

    /// Test: A tick still checking the client cannot publish after stop
    ///
    /// Scenario: No lockfile and a slow process check; stop lands while the
    /// first tick is still waiting on the check.
    /// Expected: Only CLIENT_WAITING then INACTIVE, never LOCKFILE_NOT_FOUND.
    #[tokio::test(start_paused = true)]
    async fn test_stale_tick_does_not_publish_after_stop() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["Lobby"]));
        bridge.set_lockfile(None);
        bridge.set_client_check_delay(Duration::from_millis(300));
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Lockfile(PathBuf::from("/opt/league")),
        );
        let (_toggles_tx, toggles_rx) = watch::channel(AutomationToggles::default());

        let monitor = PhaseMonitor::start(ctx, Duration::from_secs(1), toggles_rx);
        sleep(Duration::from_millis(100)).await;
        monitor.stop().await;
        sleep(Duration::from_secs(2)).await;

        assert_eq!(sink.keys(), vec![StatusKey::ClientWaiting, StatusKey::Inactive]);
        assert_eq!(bridge.lockfile_reads.load(Ordering::SeqCst), 0);
    }

    /// Test: A cancelled tick does nothing
    #[tokio::test]
    async fn test_cancelled_tick_is_silent() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["Lobby"]));
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut session = MonitorSession::new();

        assert_eq!(
            session.tick(&ctx, AutomationToggles::default(), &cancel).await,
            TickOutcome::Cancelled
        );
        assert!(sink.keys().is_empty());
        assert_eq!(bridge.phase_calls.load(Ordering::SeqCst), 0);
    }

    /// Test: Dropping the handle stops polling
    ///
    /// Scenario: The monitor is dropped without calling stop.
    /// Expected: No phase query afterwards; INACTIVE is published.
    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_monitor() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["Lobby"]));
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let (_toggles_tx, toggles_rx) = watch::channel(AutomationToggles::default());

        let monitor = PhaseMonitor::start(ctx, Duration::from_secs(1), toggles_rx);
        sleep(Duration::from_millis(1500)).await;
        drop(monitor);

        let calls = bridge.phase_calls.load(Ordering::SeqCst);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(bridge.phase_calls.load(Ordering::SeqCst), calls);
        assert_eq!(sink.keys().last(), Some(&StatusKey::Inactive));
    }

    /// Test: Client not running
    ///
    /// Scenario: The client is closed for several ticks, then starts.
    /// Expected: CLIENT_WAITING is announced once; polling resumes after start.
    #[tokio::test(start_paused = true)]
    async fn test_client_not_running_idles() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["Lobby"]));
        bridge.set_running(false);
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let (_toggles_tx, toggles_rx) = watch::channel(AutomationToggles::default());

        let monitor = PhaseMonitor::start(ctx, Duration::from_secs(1), toggles_rx);
        sleep(Duration::from_millis(3500)).await;
        assert_eq!(sink.keys(), vec![StatusKey::ClientWaiting]);
        assert_eq!(bridge.phase_calls.load(Ordering::SeqCst), 0);

        bridge.set_running(true);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(sink.keys(), vec![StatusKey::ClientWaiting, StatusKey::Lobby]);

        monitor.stop().await;
    }

    /// Test: Unreadable lockfile
    ///
    /// Scenario: Client running but no lockfile, then the lockfile appears.
    /// Expected: LOCKFILE_NOT_FOUND once, then normal polling.
    #[tokio::test(start_paused = true)]
    async fn test_lockfile_not_found_then_recovers() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["Lobby"]));
        bridge.set_lockfile(None);
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Lockfile(PathBuf::from("/opt/league")),
        );
        let cancel = CancellationToken::new();
        let mut session = MonitorSession::new();

        for _ in 0..3 {
            assert_eq!(
                session.tick(&ctx, AutomationToggles::default(), &cancel).await,
                TickOutcome::SessionUnavailable
            );
        }
        assert_eq!(sink.keys(), vec![StatusKey::LockfileNotFound]);

        bridge.set_lockfile(Some(test_connection()));
        session.tick(&ctx, AutomationToggles::default(), &cancel).await;
        session.tick(&ctx, AutomationToggles::default(), &cancel).await;
        assert_eq!(
            sink.keys(),
            vec![StatusKey::LockfileNotFound, StatusKey::Lobby, StatusKey::Lobby]
        );
        // discovered once, then reused
        assert_eq!(bridge.lockfile_reads.load(Ordering::SeqCst), 4);
    }

    /// Test: A client restart triggers rediscovery
    #[tokio::test]
    async fn test_client_restart_rediscovers_connection() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["Lobby"]));
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Lockfile(PathBuf::from("/opt/league")),
        );
        let cancel = CancellationToken::new();
        let mut session = MonitorSession::new();

        session.tick(&ctx, AutomationToggles::default(), &cancel).await;
        bridge.set_running(false);
        assert_eq!(
            session.tick(&ctx, AutomationToggles::default(), &cancel).await,
            TickOutcome::ClientNotRunning
        );
        bridge.set_running(true);
        session.tick(&ctx, AutomationToggles::default(), &cancel).await;

        assert_eq!(bridge.lockfile_reads.load(Ordering::SeqCst), 2);
        assert_eq!(
            sink.keys(),
            vec![StatusKey::Lobby, StatusKey::ClientWaiting, StatusKey::Lobby]
        );
    }

    /// Test: Phase fetch failure keeps the monitor alive
    #[tokio::test]
    async fn test_fetch_failure_is_transient() {
        let bridge = Arc::new(MockBridge::new());
        bridge.set_phase_script(vec![None, Some("Matchmaking")]);
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge.clone(),
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let cancel = CancellationToken::new();
        let mut session = MonitorSession::new();

        assert_eq!(
            session.tick(&ctx, AutomationToggles::default(), &cancel).await,
            TickOutcome::FetchFailed
        );
        assert_eq!(
            session.tick(&ctx, AutomationToggles::default(), &cancel).await,
            TickOutcome::Classified(Phase::Matchmaking)
        );
        assert_eq!(sink.keys(), vec![StatusKey::Queue]);
    }

    /// Test: Unrecognized phases show the waiting record
    #[tokio::test]
    async fn test_unknown_phase_shows_waiting() {
        let bridge = Arc::new(MockBridge::new().with_phases(&["EndOfGame"]));
        let sink = Arc::new(RecordingSink::default());
        let ctx = context(
            bridge,
            sink.clone(),
            ban_preferences(Vec::new()),
            SessionSource::Fixed(test_connection()),
        );
        let mut session = MonitorSession::new();

        session
            .tick(&ctx, AutomationToggles::default(), &CancellationToken::new())
            .await;
        assert_eq!(sink.keys(), vec![StatusKey::LobbyWaiting]);
    }
}
