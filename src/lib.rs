//! Two-player versus snake over a single peer-to-peer TCP connection.
//!
//! One peer hosts and holds fruit authority, the other joins; each side is
//! authoritative for its own snake and mirrors the opponent through periodic
//! newline-delimited JSON reports. Rendering, input mapping and the
//! connection menu live outside this crate, against [`session::GameSession`]
//! and its [`session::RenderView`].

pub mod config;
pub mod game;
pub mod net;
pub mod session;

pub use game::types::{Intent, Outcome, PlayerId, RunState};
pub use net::shared::SharedState;
pub use net::tcp::NetError;
pub use session::{GameSession, RenderView};
