use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::game::types::{Cell, Direction, Intent, Outcome, PlayerId, RunState};
use crate::game::world::World;
use crate::net::messages::Message;
use crate::net::shared::SharedState;
use crate::net::tcp::{NetError, PeerLink};

/// One running game: the peer link, the shared mailbox both loops touch, and
/// the locally simulated world. Owns the tick; the receive pipeline runs on
/// the link's socket thread.
pub struct GameSession {
    link: PeerLink,
    shared: Arc<SharedState>,
    world: World,
    outcome: Option<Outcome>,
    rng: StdRng,
}

/// Read-only per-frame view for the presentation layer.
#[derive(Clone, Debug)]
pub struct RenderView {
    pub state: RunState,
    pub snakes: [SnakeView; 2],
    pub fruit: Cell,
    pub paused_by: Option<PlayerId>,
    pub countdown_remaining: f32,
    pub outcome: Option<Outcome>,
    pub peer_connected: bool,
}

#[derive(Clone, Debug)]
pub struct SnakeView {
    pub id: PlayerId,
    pub body: Vec<Cell>,
    pub direction: Direction,
    pub score: u32,
}

impl GameSession {
    /// Host a round: player 1, fruit authority. Blocks until a peer joins,
    /// the shutdown flag is raised, or setup fails.
    pub fn host(port: u16, shared: Arc<SharedState>) -> Result<Self, NetError> {
        let link = PeerLink::host(port, shared.clone())?;
        Ok(Self::new(link, shared))
    }

    /// Join a hosted round: player 2.
    pub fn join(addr: &str, shared: Arc<SharedState>) -> Result<Self, NetError> {
        let link = PeerLink::join(addr, shared.clone())?;
        Ok(Self::new(link, shared))
    }

    fn new(link: PeerLink, shared: Arc<SharedState>) -> Self {
        let mut rng = StdRng::from_entropy();
        let world = World::new(&mut rng);
        shared.begin_countdown(Instant::now());

        Self {
            link,
            shared,
            world,
            outcome: None,
            rng,
        }
    }

    pub fn local_player(&self) -> PlayerId {
        self.link.local_player()
    }

    pub fn is_host(&self) -> bool {
        self.link.is_host()
    }

    pub fn peer_connected(&self) -> bool {
        self.shared.peer_connected()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.is_shutdown()
    }

    /// One input event from the collaborator layer.
    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::TurnUp => self.queue_turn(Direction::Up),
            Intent::TurnDown => self.queue_turn(Direction::Down),
            Intent::TurnLeft => self.queue_turn(Direction::Left),
            Intent::TurnRight => self.queue_turn(Direction::Right),
            Intent::PauseToggle => {
                if !self.shared.peer_connected() {
                    return;
                }
                if let Some(msg) = self.shared.toggle_pause(self.local_player()) {
                    self.link.send(msg);
                }
            }
            Intent::Reset => {
                if !self.shared.peer_connected() {
                    return;
                }
                self.reset_round();
                self.link.send(Message::Reset);
            }
            Intent::Quit => self.shared.shutdown(),
        }
    }

    fn queue_turn(&mut self, dir: Direction) {
        // Les intentions de cap sont bufferisées pendant le compte à rebours
        // et la course, une seule est appliquée par tick.
        match self.shared.run_state() {
            RunState::Countdown | RunState::Running => {
                let local = self.local_player();
                self.world.snake_mut(local).queue_turn(dir);
            }
            RunState::Paused | RunState::GameOver => {}
        }
    }

    fn reset_round(&mut self) {
        self.world.reset(&mut self.rng);
        self.outcome = None;
        self.shared.clear_snapshot();
        self.shared.begin_countdown(Instant::now());
    }

    /// One fixed-rate simulation step.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        // A reset requested by the peer: rebuild from the templates. The
        // receive pipeline already rewound the shared state to countdown.
        if self.shared.take_reset_pending() {
            self.world.reset(&mut self.rng);
            self.outcome = None;
        }

        let state = self.shared.advance_countdown(now);

        // Merge the latest remote report before simulating.
        if let Some(snap) = self.shared.latest_snapshot() {
            self.world
                .apply_remote(&snap, self.local_player(), self.is_host());
        }

        let mut ate = false;
        if state == RunState::Running {
            ate = self.world.step_local(self.local_player());

            // Seul l'hôte replace le fruit, peu importe qui l'a mangé.
            if self.is_host() && self.world.fruit_eaten {
                self.world.respawn_fruit(&mut self.rng);
            }

            if let Some(outcome) = self.world.evaluate_collisions() {
                info!(?outcome, "round over");
                self.outcome = Some(outcome);
                self.shared.set_game_over();
            }
        }

        // Broadcast during countdown too, so the peer sees resets and the
        // initial layout before motion begins. The collision tick still goes
        // out: the peer needs the final head position to reach the same
        // conclusion on its side.
        if matches!(state, RunState::Countdown | RunState::Running) {
            let msg = self.state_message(ate);
            self.link.send(msg);
        }
    }

    fn state_message(&self, ate: bool) -> Message {
        let local = self.local_player();
        let snake = self.world.snake(local);
        Message::GameState {
            player: local,
            pos: snake.head(),
            body: snake.segments().to_vec(),
            direction: snake.direction,
            score: snake.score,
            fruit_pos: self.is_host().then(|| self.world.fruit.pos),
            ate_fruit: (!self.is_host()).then_some(ate),
        }
    }

    pub fn view(&self) -> RenderView {
        self.view_at(Instant::now())
    }

    pub fn view_at(&self, now: Instant) -> RenderView {
        let snakes = [
            self.snake_view(PlayerId::One),
            self.snake_view(PlayerId::Two),
        ];

        RenderView {
            state: self.shared.run_state(),
            snakes,
            fruit: self.world.fruit.pos,
            paused_by: self.shared.paused_by(),
            countdown_remaining: self.shared.countdown_remaining(now),
            outcome: self.outcome,
            peer_connected: self.shared.peer_connected(),
        }
    }

    fn snake_view(&self, id: PlayerId) -> SnakeView {
        let snake = self.world.snake(id);
        SnakeView {
            id,
            body: snake.segments().to_vec(),
            direction: snake.direction,
            score: snake.score,
        }
    }
}
