use std::time::Duration;

// Plateau: 72x48 cellules (720x480 px à 10 px la cellule).
pub const GRID_WIDTH: i32 = 72;
pub const GRID_HEIGHT: i32 = 48;

pub const START_BODY_LEN: usize = 4;
pub const FRUIT_SCORE: u32 = 10;
pub const FRUIT_SPAWN_MAX_ATTEMPTS: usize = 20_000;

// Cadence de simulation (ticks logiques par seconde).
pub const TICK_RATE: u32 = 10;
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / TICK_RATE as u64);

pub const COUNTDOWN: Duration = Duration::from_secs(3);

// Réseau
pub const DEFAULT_PORT: u16 = 8468;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const ACCEPT_POLL: Duration = Duration::from_secs(1);
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);
pub const READ_CHUNK: usize = 4096;

// Garde-fou: pas de délimiteur dans 64 KiB = pair défaillant.
pub const MAX_DECODE_BUFFER: usize = 64 * 1024;
