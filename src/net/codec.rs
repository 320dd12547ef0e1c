use thiserror::Error;
use tracing::debug;

use crate::config::MAX_DECODE_BUFFER;
use crate::net::messages::Message;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("decode buffer overflowed without a delimiter")]
    BufferOverflow,
}

/// One record per line. serde_json escapes control characters, so the
/// delimiter cannot appear inside an encoded record.
pub fn encode(msg: &Message) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = serde_json::to_vec(msg)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Accumulates raw reads and yields complete records. A record that fails to
/// decode is dropped and extraction continues with the remainder.
#[derive(Default)]
pub struct DecodeBuffer {
    buf: Vec<u8>,
}

impl DecodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.buf.extend_from_slice(bytes);
        if self.buf.len() > MAX_DECODE_BUFFER && !self.buf.contains(&b'\n') {
            return Err(CodecError::BufferOverflow);
        }
        Ok(())
    }

    pub fn next_message(&mut self) -> Option<Message> {
        while let Some(idx) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=idx).collect();
            let line = &line[..line.len() - 1];

            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            match serde_json::from_slice(line) {
                Ok(msg) => return Some(msg),
                Err(err) => {
                    debug!(error = %err, "dropping malformed record");
                    continue;
                }
            }
        }
        None
    }
}
