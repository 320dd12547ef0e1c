use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{ACCEPT_POLL, CONNECT_TIMEOUT, DEFAULT_PORT, READ_CHUNK, READ_TIMEOUT};
use crate::game::types::PlayerId;
use crate::net::codec::{self, DecodeBuffer};
use crate::net::messages::{Message, RemoteSnapshot};
use crate::net::shared::SharedState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Host,
    Joiner,
}

/// Connection-setup failures. Reported once to the caller, who may retry.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to start io runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to bind 0.0.0.0:{port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("failed to accept a connection: {0}")]
    Accept(#[source] io::Error),
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("connection to {addr} timed out")]
    ConnectTimeout { addr: String },
    #[error("cancelled while waiting for a peer")]
    Cancelled,
}

/// The one peer connection: role, local player id, outbound queue and the
/// socket thread running the receive pipeline. Created once per process
/// lifetime, no reconnection.
pub struct PeerLink {
    role: Role,
    local_player: PlayerId,
    outbound_tx: Option<UnboundedSender<Message>>,
    io_thread: Option<JoinHandle<()>>,
}

impl PeerLink {
    /// Bind, then poll accept until a peer arrives or the shutdown flag is
    /// raised. The accepted side is player 1 and fruit authority.
    pub fn host(port: u16, shared: Arc<SharedState>) -> Result<Self, NetError> {
        let rt = Runtime::new().map_err(NetError::Runtime)?;
        let stream = rt.block_on(async {
            let listener = TcpListener::bind(("0.0.0.0", port))
                .await
                .map_err(|source| NetError::Bind { port, source })?;
            info!(port, "hosting, waiting for a peer");

            loop {
                if shared.is_shutdown() {
                    return Err(NetError::Cancelled);
                }
                match timeout(ACCEPT_POLL, listener.accept()).await {
                    Ok(Ok((stream, addr))) => {
                        info!(%addr, "peer connected");
                        return Ok(stream);
                    }
                    Ok(Err(err)) => return Err(NetError::Accept(err)),
                    // Poll timeout: re-check the shutdown flag.
                    Err(_) => continue,
                }
            }
        })?;

        Ok(Self::start(Role::Host, PlayerId::One, rt, stream, shared))
    }

    /// Connect to a host. A bare address gets the default port appended.
    pub fn join(addr: &str, shared: Arc<SharedState>) -> Result<Self, NetError> {
        let addr = if addr.contains(':') {
            addr.to_string()
        } else {
            format!("{addr}:{DEFAULT_PORT}")
        };

        let rt = Runtime::new().map_err(NetError::Runtime)?;
        let stream = rt.block_on(async {
            match timeout(CONNECT_TIMEOUT, TcpStream::connect(&addr)).await {
                Ok(Ok(stream)) => Ok(stream),
                Ok(Err(source)) => Err(NetError::Connect {
                    addr: addr.clone(),
                    source,
                }),
                Err(_) => Err(NetError::ConnectTimeout { addr: addr.clone() }),
            }
        })?;
        info!(%addr, "connected to host");

        Ok(Self::start(Role::Joiner, PlayerId::Two, rt, stream, shared))
    }

    fn start(
        role: Role,
        local_player: PlayerId,
        rt: Runtime,
        stream: TcpStream,
        shared: Arc<SharedState>,
    ) -> Self {
        let (outbound_tx, outbound_rx) = unbounded_channel();
        let io_shared = shared.clone();
        let io_thread = std::thread::spawn(move || {
            rt.block_on(io_loop(stream, outbound_rx, io_shared));
        });

        shared.set_peer_connected(true);
        let link = Self {
            role,
            local_player,
            outbound_tx: Some(outbound_tx),
            io_thread: Some(io_thread),
        };
        link.send(Message::Connect {
            player_id: local_player,
        });
        link
    }

    /// Queue a message for the socket thread. Fire and forget.
    pub fn send(&self, msg: Message) {
        if let Some(tx) = &self.outbound_tx {
            let _ = tx.send(msg);
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_host(&self) -> bool {
        self.role == Role::Host
    }

    pub fn local_player(&self) -> PlayerId {
        self.local_player
    }
}

impl Drop for PeerLink {
    fn drop(&mut self) {
        // Closing the outbound channel ends the io loop after it flushes.
        self.outbound_tx.take();
        if let Some(handle) = self.io_thread.take() {
            let _ = handle.join();
        }
    }
}

/// Socket task: drains the outbound queue and runs the receive pipeline.
/// Reads are bounded so the shutdown flag stays observable.
async fn io_loop(
    stream: TcpStream,
    mut outbound_rx: UnboundedReceiver<Message>,
    shared: Arc<SharedState>,
) {
    let (mut reader, mut writer) = stream.into_split();
    let mut decode = DecodeBuffer::new();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        if shared.is_shutdown() {
            break;
        }

        tokio::select! {
            queued = outbound_rx.recv() => match queued {
                Some(msg) => send_message(&mut writer, &msg).await,
                // Link dropped on the session side.
                None => break,
            },
            read = timeout(READ_TIMEOUT, reader.read(&mut buf)) => match read {
                // Read timeout: re-check the shutdown flag.
                Err(_) => continue,
                Ok(Ok(0)) => {
                    info!("connection closed by peer");
                    shared.set_peer_connected(false);
                    break;
                }
                Ok(Ok(n)) => {
                    if decode.feed(&buf[..n]).is_err() {
                        warn!("decode buffer overflow, dropping peer");
                        shared.set_peer_connected(false);
                        break;
                    }
                    while let Some(msg) = decode.next_message() {
                        apply_message(msg, &shared);
                    }
                }
                Ok(Err(err)) => {
                    warn!(error = %err, "receive failed");
                    shared.set_peer_connected(false);
                    break;
                }
            },
        }
    }
}

async fn send_message(writer: &mut OwnedWriteHalf, msg: &Message) {
    match codec::encode(msg) {
        Ok(bytes) => {
            // Best effort: a vanished peer must not take the tick loop down.
            if let Err(err) = writer.write_all(&bytes).await {
                debug!(error = %err, "send failed");
            }
        }
        Err(err) => debug!(error = %err, "encode failed"),
    }
}

/// Ingest one decoded message into shared state. No game logic here; the
/// tick loop draws its own conclusions from what gets published.
fn apply_message(msg: Message, shared: &SharedState) {
    match msg {
        Message::Connect { player_id } => {
            debug!(player = %player_id, "peer announced itself");
            shared.set_peer_connected(true);
        }
        Message::GameState {
            player,
            pos,
            body,
            direction,
            score,
            fruit_pos,
            ate_fruit,
        } => {
            shared.publish_snapshot(RemoteSnapshot {
                player,
                pos,
                body,
                direction,
                score,
                fruit_pos,
                ate_fruit,
            });
        }
        Message::Pause { by } => shared.set_paused(by),
        Message::Resume => shared.set_running(),
        Message::Reset => shared.request_reset(Instant::now()),
    }
}
