use rand::Rng;

use crate::config::{FRUIT_SPAWN_MAX_ATTEMPTS, GRID_HEIGHT, GRID_WIDTH};
use crate::game::snake::Snake;
use crate::game::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fruit {
    pub pos: Cell,
}

impl Fruit {
    /// Tire une case libre: jamais sur un segment de serpent.
    pub fn spawn_avoiding<R: Rng>(rng: &mut R, snakes: &[&Snake]) -> Option<Self> {
        for _ in 0..FRUIT_SPAWN_MAX_ATTEMPTS {
            let pos = Cell::new(
                rng.gen_range(1..GRID_WIDTH),
                rng.gen_range(1..GRID_HEIGHT),
            );

            if snakes.iter().any(|s| s.occupies(pos)) {
                continue;
            }

            return Some(Self { pos });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::PlayerId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_never_lands_on_a_snake() {
        let s1 = Snake::spawn(PlayerId::One);
        let s2 = Snake::spawn(PlayerId::Two);

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let fruit = Fruit::spawn_avoiding(&mut rng, &[&s1, &s2]).unwrap();
            assert!(!s1.occupies(fruit.pos));
            assert!(!s2.occupies(fruit.pos));
            assert!(fruit.pos.in_bounds(GRID_WIDTH, GRID_HEIGHT));
        }
    }
}
