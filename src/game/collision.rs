use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::game::snake::Snake;
use crate::game::types::Outcome;

pub fn check_walls(snakes: &[Snake; 2], to_die: &mut [bool; 2]) {
    for (i, s) in snakes.iter().enumerate() {
        if !s.head().in_bounds(GRID_WIDTH, GRID_HEIGHT) {
            to_die[i] = true;
        }
    }
}

pub fn check_self(snakes: &[Snake; 2], to_die: &mut [bool; 2]) {
    for (i, s) in snakes.iter().enumerate() {
        let head = s.head();
        if s.segments()[1..].contains(&head) {
            to_die[i] = true;
        }
    }
}

/// Tête contre n'importe quel segment adverse; tête contre tête élimine
/// les deux.
pub fn check_opponent_body(snakes: &[Snake; 2], to_die: &mut [bool; 2]) {
    for i in 0..snakes.len() {
        let head = snakes[i].head();
        if snakes[1 - i].occupies(head) {
            to_die[i] = true;
        }
    }
}

/// Evaluate all elimination conditions for the tick. Both eliminated in the
/// same tick is a draw; one eliminated hands the win to the survivor.
pub fn evaluate(snakes: &[Snake; 2]) -> Option<Outcome> {
    let mut to_die = [false; 2];
    check_walls(snakes, &mut to_die);
    check_self(snakes, &mut to_die);
    check_opponent_body(snakes, &mut to_die);

    match to_die {
        [true, true] => Some(Outcome::Draw),
        [true, false] => Some(Outcome::Winner(snakes[1].id)),
        [false, true] => Some(Outcome::Winner(snakes[0].id)),
        [false, false] => None,
    }
}
