//! rigctl Protocol Library
//!
//! This crate provides parsing and encoding for the subset of hamlib's
//! `rigctl` TCP text protocol that digital-mode clients such as fldigi
//! rely on:
//!
//! - **get/set frequency** (`f`, `F <hz>`)
//! - **get mode and filter** (`m`)
//! - **get/set VFO** (`v`, `V <VFOA|VFOB>`)
//! - **RIT and split status** (`j`, `s`), always reported as disabled
//! - **PTT** (`T <0|1>`)
//! - **capability dump** (`\dump_state`)
//!
//! # Architecture
//!
//! - [`LineCodec`] frames a byte stream into [`CommandLine`]s
//! - [`RigctlCommand`] classifies a line into a tagged command
//! - [`Response`] encodes value lines or `RPRT` status lines
//! - [`RadioBackend`] is the capability set commands are executed against
//!
//! # Example
//!
//! ```rust
//! use rigctl_protocol::{LineCodec, ProtocolCodec, RigctlCommand};
//!
//! let mut codec = LineCodec::new();
//! codec.push_bytes(b"F 7100000\r\nf\n");
//!
//! let line = codec.next_command().unwrap();
//! assert!(matches!(
//!     RigctlCommand::from_line(&line),
//!     RigctlCommand::SetFrequency { hz: Some(7_100_000), .. }
//! ));
//! ```

pub mod codec;
pub mod command;
pub mod error;
pub mod response;

pub use codec::{LineCodec, MAX_LINE_LEN};
pub use command::{parse_leading_int, CommandLine, RigctlCommand, Vfo, EMPTY_LINE_VERB};
pub use error::{ProtocolError, ReturnCode};
pub use response::{Response, DUMP_STATE_LINES};

/// Trait for protocol codecs that can parse incoming data streams
pub trait ProtocolCodec {
    /// The command type produced by this codec
    type Command;

    /// Push raw bytes into the codec's buffer
    fn push_bytes(&mut self, data: &[u8]);

    /// Try to extract the next complete command from the buffer
    fn next_command(&mut self) -> Option<Self::Command>;
}

/// Radio control capabilities the command dispatcher relies on
///
/// Implementations use interior mutability so one backend can be shared by
/// every connection. Each call reads or writes a single field atomically;
/// setters accept any value without validation.
pub trait RadioBackend: Send + Sync {
    /// Current frequency in Hz
    fn frequency_hz(&self) -> i64;

    /// Store a new frequency in Hz
    fn set_frequency_hz(&self, hz: i64);

    /// Current operating mode token
    fn mode(&self) -> String;

    /// Current filter/passband token
    fn filter(&self) -> String;

    /// Currently selected VFO
    fn vfo(&self) -> Vfo;

    /// Select a VFO
    fn select_vfo(&self, vfo: Vfo);

    /// Current PTT state
    fn ptt(&self) -> bool;

    /// Store a new PTT state
    fn set_ptt(&self, enabled: bool);
}
