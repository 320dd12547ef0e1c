use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::config::COUNTDOWN;
use crate::game::types::{PlayerId, RunState};
use crate::net::messages::{Message, RemoteSnapshot};

/// The region both loops touch: latest remote snapshot, run state, pause
/// attribution, countdown clock. Receive pipeline writes, tick loop reads,
/// all through the one mutex. Critical sections are field access only.
struct Shared {
    peer_connected: bool,
    run_state: RunState,
    paused_by: Option<PlayerId>,
    remote: Option<RemoteSnapshot>,
    reset_pending: bool,
    countdown_start: Instant,
}

pub struct SharedState {
    shutdown: AtomicBool,
    inner: Mutex<Shared>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            inner: Mutex::new(Shared {
                peer_connected: false,
                run_state: RunState::Countdown,
                paused_by: None,
                remote: None,
                reset_pending: false,
                countdown_start: Instant::now(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Drapeau d'arrêt coopératif, observé entre deux appels bloquants.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    // ---- receive pipeline side ----

    pub fn set_peer_connected(&self, connected: bool) {
        self.lock().peer_connected = connected;
    }

    pub fn publish_snapshot(&self, snap: RemoteSnapshot) {
        self.lock().remote = Some(snap);
    }

    pub fn set_paused(&self, by: PlayerId) {
        let mut s = self.lock();
        s.run_state = RunState::Paused;
        s.paused_by = Some(by);
    }

    pub fn set_running(&self) {
        let mut s = self.lock();
        s.run_state = RunState::Running;
        s.paused_by = None;
    }

    /// A remote reset: back to countdown, world rebuild deferred to the tick
    /// loop. The stale snapshot is cleared so the pre-reset opponent body
    /// cannot resurrect through the reconciler.
    pub fn request_reset(&self, now: Instant) {
        let mut s = self.lock();
        s.reset_pending = true;
        s.run_state = RunState::Countdown;
        s.countdown_start = now;
        s.paused_by = None;
        s.remote = None;
    }

    // ---- tick loop side ----

    pub fn peer_connected(&self) -> bool {
        self.lock().peer_connected
    }

    pub fn run_state(&self) -> RunState {
        self.lock().run_state
    }

    pub fn paused_by(&self) -> Option<PlayerId> {
        self.lock().paused_by
    }

    pub fn take_reset_pending(&self) -> bool {
        std::mem::take(&mut self.lock().reset_pending)
    }

    pub fn latest_snapshot(&self) -> Option<RemoteSnapshot> {
        self.lock().remote.clone()
    }

    pub fn clear_snapshot(&self) {
        self.lock().remote = None;
    }

    pub fn begin_countdown(&self, now: Instant) {
        let mut s = self.lock();
        s.run_state = RunState::Countdown;
        s.countdown_start = now;
        s.paused_by = None;
    }

    /// Countdown to running once the threshold elapses, under one lock so a
    /// racing remote reset is not overwritten. Returns the state after the
    /// check.
    pub fn advance_countdown(&self, now: Instant) -> RunState {
        let mut s = self.lock();
        if s.run_state == RunState::Countdown
            && now.saturating_duration_since(s.countdown_start) >= COUNTDOWN
        {
            s.run_state = RunState::Running;
        }
        s.run_state
    }

    pub fn countdown_remaining(&self, now: Instant) -> f32 {
        let s = self.lock();
        let elapsed = now.saturating_duration_since(s.countdown_start);
        (COUNTDOWN.as_secs_f32() - elapsed.as_secs_f32()).max(0.0)
    }

    pub fn set_game_over(&self) {
        self.lock().run_state = RunState::GameOver;
    }

    /// Local pause toggle. Pausing is allowed while running; resuming only
    /// by the player who paused. Returns the control message to send, the
    /// send happens outside the lock.
    pub fn toggle_pause(&self, local: PlayerId) -> Option<Message> {
        let mut s = self.lock();
        match s.run_state {
            RunState::Running => {
                s.run_state = RunState::Paused;
                s.paused_by = Some(local);
                Some(Message::Pause { by: local })
            }
            RunState::Paused if s.paused_by == Some(local) => {
                s.run_state = RunState::Running;
                s.paused_by = None;
                Some(Message::Resume)
            }
            _ => None,
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
