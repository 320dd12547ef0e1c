use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snake_versus::config::{DEFAULT_PORT, TICK_INTERVAL};
use snake_versus::{GameSession, Intent, SharedState};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let shared = Arc::new(SharedState::new());
    let mut args = std::env::args().skip(1);

    let mut session = match args.next().as_deref() {
        Some("host") => {
            let port = match args.next() {
                Some(p) => p.parse().context("invalid port")?,
                None => DEFAULT_PORT,
            };
            GameSession::host(port, shared).context("failed to host")?
        }
        Some("join") => {
            let addr = args
                .next()
                .context("usage: snake-versus join <host[:port]>")?;
            GameSession::join(&addr, shared).context("failed to join")?
        }
        _ => {
            bail!("usage: snake-versus host [port] | snake-versus join <host[:port]>")
        }
    };

    let intents = spawn_stdin_intents();

    info!(player = %session.local_player(), host = session.is_host(), "session started");
    let mut last_state = session.view().state;

    while !session.is_shutdown() {
        let started = Instant::now();

        while let Ok(intent) = intents.try_recv() {
            session.handle_intent(intent);
        }
        session.tick_at(started);

        let view = session.view();
        if view.state != last_state {
            info!(state = ?view.state, outcome = ?view.outcome, "state changed");
            last_state = view.state;
        }

        if let Some(rest) = TICK_INTERVAL.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    info!("session stopped");
    Ok(())
}

/// Minimal stand-in for the input layer: one intent word per stdin line.
fn spawn_stdin_intents() -> Receiver<Intent> {
    let (tx, rx) = channel();

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                // EOF: plus d'entrée, la partie continue sans intentions.
                Ok(0) => break,
                Ok(_) => {
                    if let Some(intent) = parse_intent(line.trim()) {
                        if tx.send(intent).is_err() {
                            break;
                        }
                    }
                }
                Err(_) => break,
            }
        }
    });

    rx
}

fn parse_intent(word: &str) -> Option<Intent> {
    match word {
        "up" | "w" => Some(Intent::TurnUp),
        "down" | "s" => Some(Intent::TurnDown),
        "left" | "a" => Some(Intent::TurnLeft),
        "right" | "d" => Some(Intent::TurnRight),
        "pause" | "p" => Some(Intent::PauseToggle),
        "reset" | "r" => Some(Intent::Reset),
        "quit" | "q" => Some(Intent::Quit),
        _ => None,
    }
}
