use serde::{Deserialize, Serialize};

/// Grid cell, serialized as `[x, y]` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

impl From<[i32; 2]> for Cell {
    fn from(v: [i32; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<Cell> for [i32; 2] {
    fn from(c: Cell) -> Self {
        [c.x, c.y]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Player id, serialized as the integer `1` or `2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(format!("invalid player id {other}")),
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(p: PlayerId) -> Self {
        match p {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", u8::from(*self))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Countdown,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Winner(PlayerId),
    Draw,
}

/// What the input layer feeds in, one per observed input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    TurnUp,
    TurnDown,
    TurnLeft,
    TurnRight,
    PauseToggle,
    Reset,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_wire_shape_is_a_pair() {
        let json = serde_json::to_string(&Cell::new(40, 12)).unwrap();
        assert_eq!(json, "[40,12]");
        let back: Cell = serde_json::from_str("[40,12]").unwrap();
        assert_eq!(back, Cell::new(40, 12));
    }

    #[test]
    fn direction_wire_shape_is_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), "\"LEFT\"");
        let back: Direction = serde_json::from_str("\"UP\"").unwrap();
        assert_eq!(back, Direction::Up);
    }

    #[test]
    fn player_id_wire_shape_is_integer() {
        assert_eq!(serde_json::to_string(&PlayerId::Two).unwrap(), "2");
        assert!(serde_json::from_str::<PlayerId>("3").is_err());
    }

    #[test]
    fn opposites() {
        for d in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(d.opposite().opposite(), d);
        }
    }
}
