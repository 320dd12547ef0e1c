use rand::Rng;
use tracing::warn;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::game::collision;
use crate::game::fruit::Fruit;
use crate::game::snake::Snake;
use crate::game::types::{Cell, Outcome, PlayerId};
use crate::net::messages::RemoteSnapshot;

/// Both snakes and the single fruit. One instance per session, torn down and
/// rebuilt from the fixed templates on every reset.
pub struct World {
    pub snakes: [Snake; 2],
    pub fruit: Fruit,
    /// Fruit consumed and not yet replaced. Only the host acts on it.
    pub fruit_eaten: bool,
}

impl World {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let snakes = [Snake::spawn(PlayerId::One), Snake::spawn(PlayerId::Two)];
        let fruit = Fruit::spawn_avoiding(rng, &[&snakes[0], &snakes[1]]).unwrap_or(Fruit {
            pos: Cell::new(GRID_WIDTH / 2, GRID_HEIGHT / 4),
        });

        Self {
            snakes,
            fruit,
            fruit_eaten: false,
        }
    }

    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        *self = Self::new(rng);
    }

    pub fn snake(&self, id: PlayerId) -> &Snake {
        &self.snakes[id.index()]
    }

    pub fn snake_mut(&mut self, id: PlayerId) -> &mut Snake {
        &mut self.snakes[id.index()]
    }

    /// One movement step for the locally-owned snake: apply the buffered
    /// turn, advance one cell, handle the fruit. Returns whether it ate.
    pub fn step_local(&mut self, local: PlayerId) -> bool {
        let fruit = self.fruit.pos;
        let snake = self.snake_mut(local);
        snake.apply_turn();
        let ate = snake.advance(fruit);
        if ate {
            self.fruit_eaten = true;
        }
        ate
    }

    pub fn respawn_fruit<R: Rng>(&mut self, rng: &mut R) {
        match Fruit::spawn_avoiding(rng, &[&self.snakes[0], &self.snakes[1]]) {
            Some(fruit) => self.fruit = fruit,
            None => warn!("no free cell for the fruit, keeping previous position"),
        }
        self.fruit_eaten = false;
    }

    /// Merge the latest remote report. Trust boundaries: a report about the
    /// locally-owned snake is ignored; the other snake is replaced wholesale
    /// (last write wins); fruit only flows host -> joiner.
    pub fn apply_remote(&mut self, snap: &RemoteSnapshot, local: PlayerId, is_host: bool) {
        if snap.player == local {
            return;
        }

        self.snakes[snap.player.index()].overwrite(
            snap.pos,
            snap.body.clone(),
            snap.direction,
            snap.score,
        );

        if is_host {
            // Le drapeau explicite couvre la latence; l'égalité de position
            // seule peut rater l'événement.
            if snap.ate_fruit.unwrap_or(false) || snap.pos == self.fruit.pos {
                self.fruit_eaten = true;
            }
        } else if let Some(pos) = snap.fruit_pos {
            self.fruit.pos = pos;
        }
    }

    pub fn evaluate_collisions(&self) -> Option<Outcome> {
        collision::evaluate(&self.snakes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::START_BODY_LEN;
    use crate::game::types::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> World {
        World::new(&mut StdRng::seed_from_u64(7))
    }

    fn snapshot(player: PlayerId) -> RemoteSnapshot {
        RemoteSnapshot {
            player,
            pos: Cell::new(10, 10),
            body: vec![Cell::new(10, 10), Cell::new(11, 10)],
            direction: Direction::Left,
            score: 30,
            fruit_pos: None,
            ate_fruit: None,
        }
    }

    #[test]
    fn reset_restores_canonical_layout() {
        let mut w = world();
        w.step_local(PlayerId::One);
        w.snake_mut(PlayerId::One).score = 50;
        w.apply_remote(&snapshot(PlayerId::Two), PlayerId::One, true);

        w.reset(&mut StdRng::seed_from_u64(8));

        for id in [PlayerId::One, PlayerId::Two] {
            assert_eq!(w.snake(id).score, 0);
            assert_eq!(w.snake(id).segments().len(), START_BODY_LEN);
        }
        assert_eq!(w.snake(PlayerId::One).head(), Cell::new(18, 24));
        assert_eq!(w.snake(PlayerId::Two).head(), Cell::new(54, 24));
        assert!(!w.fruit_eaten);
    }

    #[test]
    fn report_about_own_snake_is_ignored() {
        let mut w = world();
        let before = w.snake(PlayerId::One).head();
        w.apply_remote(&snapshot(PlayerId::One), PlayerId::One, true);
        assert_eq!(w.snake(PlayerId::One).head(), before);
        assert_eq!(w.snake(PlayerId::One).score, 0);
    }

    #[test]
    fn latest_remote_report_wins() {
        let mut w = world();
        w.apply_remote(&snapshot(PlayerId::Two), PlayerId::One, true);
        assert_eq!(w.snake(PlayerId::Two).head(), Cell::new(10, 10));

        let mut later = snapshot(PlayerId::Two);
        later.pos = Cell::new(20, 20);
        later.body = vec![Cell::new(20, 20)];
        later.score = 40;
        w.apply_remote(&later, PlayerId::One, true);

        assert_eq!(w.snake(PlayerId::Two).head(), Cell::new(20, 20));
        assert_eq!(w.snake(PlayerId::Two).score, 40);
    }

    #[test]
    fn joiner_takes_fruit_from_host_report() {
        let mut w = world();
        let mut snap = snapshot(PlayerId::One);
        snap.fruit_pos = Some(Cell::new(40, 40));
        w.apply_remote(&snap, PlayerId::Two, false);
        assert_eq!(w.fruit.pos, Cell::new(40, 40));
    }

    #[test]
    fn joiner_keeps_fruit_when_report_has_none() {
        let mut w = world();
        let before = w.fruit.pos;
        w.apply_remote(&snapshot(PlayerId::One), PlayerId::Two, false);
        assert_eq!(w.fruit.pos, before);
    }

    #[test]
    fn host_marks_fruit_eaten_on_explicit_flag() {
        let mut w = world();
        let mut snap = snapshot(PlayerId::Two);
        snap.ate_fruit = Some(true);
        w.apply_remote(&snap, PlayerId::One, true);
        assert!(w.fruit_eaten);
    }

    #[test]
    fn host_marks_fruit_eaten_on_position_match() {
        let mut w = world();
        let mut snap = snapshot(PlayerId::Two);
        snap.pos = w.fruit.pos;
        w.apply_remote(&snap, PlayerId::One, true);
        assert!(w.fruit_eaten);
    }

    #[test]
    fn host_ignores_fruit_field_from_joiner() {
        let mut w = world();
        let before = w.fruit.pos;
        let mut snap = snapshot(PlayerId::Two);
        snap.fruit_pos = Some(Cell::new(1, 1));
        w.apply_remote(&snap, PlayerId::One, true);
        assert_eq!(w.fruit.pos, before);
    }

    #[test]
    fn respawn_leaves_no_overlap_and_clears_flag() {
        let mut w = world();
        w.fruit_eaten = true;
        let mut rng = StdRng::seed_from_u64(42);
        w.respawn_fruit(&mut rng);
        assert!(!w.fruit_eaten);
        assert!(!w.snakes[0].occupies(w.fruit.pos));
        assert!(!w.snakes[1].occupies(w.fruit.pos));
    }
}
