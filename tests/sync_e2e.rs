//! Two live sessions wired over loopback TCP.

use std::sync::Arc;
use std::time::{Duration, Instant};

use snake_versus::game::types::Cell;
use snake_versus::{GameSession, Intent, PlayerId, RunState, SharedState};

fn start_pair(port: u16) -> (GameSession, GameSession) {
    let host_thread =
        std::thread::spawn(move || GameSession::host(port, Arc::new(SharedState::new())).unwrap());

    let mut joiner = None;
    for _ in 0..50 {
        std::thread::sleep(Duration::from_millis(50));
        let shared = Arc::new(SharedState::new());
        if let Ok(s) = GameSession::join(&format!("127.0.0.1:{port}"), shared) {
            joiner = Some(s);
            break;
        }
    }

    (host_thread.join().unwrap(), joiner.unwrap())
}

fn past_countdown() -> Instant {
    Instant::now() + Duration::from_secs(4)
}

/// Poll until `cond` holds, failing the test after a few seconds.
fn wait_until(mut cond: impl FnMut() -> bool, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(4);
    while Instant::now() < deadline {
        if cond() {
            return;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("timed out waiting for: {what}");
}

#[test]
fn countdown_reaches_running_on_both_sides() {
    let (mut host, mut joiner) = start_pair(18481);

    assert!(host.is_host());
    assert!(!joiner.is_host());
    assert_eq!(host.local_player(), PlayerId::One);
    assert_eq!(joiner.local_player(), PlayerId::Two);
    assert!(host.peer_connected());
    assert!(joiner.peer_connected());

    assert_eq!(host.view().state, RunState::Countdown);
    assert!(host.view().countdown_remaining > 0.0);

    let t = past_countdown();
    host.tick_at(t);
    joiner.tick_at(t);
    assert_eq!(host.view().state, RunState::Running);
    assert_eq!(joiner.view().state, RunState::Running);
}

#[test]
fn pause_is_attributed_and_only_the_pauser_or_remote_resumes() {
    let (mut host, mut joiner) = start_pair(18482);
    let t = past_countdown();
    host.tick_at(t);
    joiner.tick_at(t);

    joiner.handle_intent(Intent::PauseToggle);
    assert_eq!(joiner.view().state, RunState::Paused);
    assert_eq!(joiner.view().paused_by, Some(PlayerId::Two));

    // The pause reaches the host through the receive pipeline alone.
    wait_until(|| host.view().state == RunState::Paused, "host paused");
    assert_eq!(host.view().paused_by, Some(PlayerId::Two));

    // The host did not pause, so its toggle must not resume.
    host.handle_intent(Intent::PauseToggle);
    assert_eq!(host.view().state, RunState::Paused);

    joiner.handle_intent(Intent::PauseToggle);
    assert_eq!(joiner.view().state, RunState::Running);
    wait_until(|| host.view().state == RunState::Running, "host resumed");
    assert_eq!(host.view().paused_by, None);
}

#[test]
fn reset_rewinds_both_sides_to_the_canonical_layout() {
    let (mut host, mut joiner) = start_pair(18483);
    let t = past_countdown();

    // Let both snakes move a few cells away from their templates.
    for i in 0..3 {
        let now = t + Duration::from_millis(100 * i);
        host.tick_at(now);
        joiner.tick_at(now);
        std::thread::sleep(Duration::from_millis(100));
    }
    assert_ne!(host.view().snakes[0].body[0], Cell::new(18, 24));

    host.handle_intent(Intent::Reset);
    assert_eq!(host.view().state, RunState::Countdown);
    assert_eq!(host.view().snakes[0].body[0], Cell::new(18, 24));
    assert_eq!(host.view().snakes[1].body[0], Cell::new(54, 24));

    wait_until(|| joiner.view().state == RunState::Countdown, "joiner reset");
    joiner.tick_at(Instant::now());

    let view = joiner.view();
    assert_eq!(view.snakes[0].body.len(), 4);
    assert_eq!(view.snakes[1].body.len(), 4);
    assert_eq!(view.snakes[0].body[0], Cell::new(18, 24));
    assert_eq!(view.snakes[1].body[0], Cell::new(54, 24));
    assert_eq!(view.snakes[0].score, 0);
    assert_eq!(view.snakes[1].score, 0);
    assert!(view.countdown_remaining > 0.0);
}

#[test]
fn dropping_one_peer_flips_the_survivors_flag() {
    let (mut host, joiner) = start_pair(18484);

    drop(joiner);
    wait_until(|| !host.peer_connected(), "host notices the disconnect");

    // The survivor keeps simulating against the frozen view.
    let t = past_countdown();
    host.tick_at(t);
    assert_eq!(host.view().state, RunState::Running);
    assert!(!host.view().peer_connected);
}
