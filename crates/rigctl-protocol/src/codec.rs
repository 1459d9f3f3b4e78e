//! Streaming line framer
//!
//! Bytes arrive in arbitrary fragments; complete lines are terminated by
//! `\n`. Any `\r` or other whitespace around a line is removed by
//! [`CommandLine::parse`], so `\n`, `\r\n` and `\n\r` clients all work.

use tracing::warn;

use crate::command::CommandLine;
use crate::ProtocolCodec;

/// Longest line accepted, terminator excluded
pub const MAX_LINE_LEN: usize = 1024;

/// Line handed out in place of an overlong one so it still gets a reply
const OVERLONG_LINE: &[u8] = b"?\n";

/// Streaming rigctl line codec
///
/// A line longer than [`MAX_LINE_LEN`] is replaced by [`EMPTY_LINE_VERB`]
/// once its terminator arrives, however the bytes were fragmented.
///
/// [`EMPTY_LINE_VERB`]: crate::EMPTY_LINE_VERB
#[derive(Debug, Default)]
pub struct LineCodec {
    buffer: Vec<u8>,
    /// Dropping an overlong line until its terminator shows up
    discarding: bool,
}

impl LineCodec {
    /// Create a new line codec
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(128),
            discarding: false,
        }
    }

    /// Bytes buffered but not yet returned as a line
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Offset of the unterminated tail of the buffer
    fn partial_start(&self) -> usize {
        self.buffer
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1)
    }
}

impl ProtocolCodec for LineCodec {
    type Command = CommandLine;

    fn push_bytes(&mut self, data: &[u8]) {
        for chunk in data.split_inclusive(|&b| b == b'\n') {
            let terminated = chunk.last() == Some(&b'\n');

            if self.discarding {
                if terminated {
                    self.discarding = false;
                    self.buffer.extend_from_slice(OVERLONG_LINE);
                }
                continue;
            }

            let partial_start = self.partial_start();
            self.buffer.extend_from_slice(chunk);

            let line_len = self.buffer.len() - partial_start - usize::from(terminated);
            if line_len > MAX_LINE_LEN {
                warn!("Discarding rigctl line longer than {} bytes", MAX_LINE_LEN);
                self.buffer.truncate(partial_start);
                if terminated {
                    self.buffer.extend_from_slice(OVERLONG_LINE);
                } else {
                    self.discarding = true;
                }
            }
        }
    }

    fn next_command(&mut self) -> Option<Self::Command> {
        let term_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=term_pos).collect();
        Some(CommandLine::from_bytes(&line_bytes))
    }
}
