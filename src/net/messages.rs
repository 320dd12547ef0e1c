use serde::{Deserialize, Serialize};

use crate::game::types::{Cell, Direction, PlayerId};

/// One wire record. Newline-delimited JSON, discriminated by `type`, field
/// names fixed by the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Connect {
        player_id: PlayerId,
    },
    GameState {
        player: PlayerId,
        pos: Cell,
        body: Vec<Cell>,
        direction: Direction,
        score: u32,
        /// Host only: the authoritative fruit position.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fruit_pos: Option<Cell>,
        /// Joiner only: set on the tick it ate the fruit.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ate_fruit: Option<bool>,
    },
    Pause {
        by: PlayerId,
    },
    Resume,
    Reset,
}

/// Last received `game_state` payload, overwritten in place on every arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSnapshot {
    pub player: PlayerId,
    pub pos: Cell,
    pub body: Vec<Cell>,
    pub direction: Direction,
    pub score: u32,
    pub fruit_pos: Option<Cell>,
    pub ate_fruit: Option<bool>,
}
