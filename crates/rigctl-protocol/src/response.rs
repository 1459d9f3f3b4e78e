//! Response encoding
//!
//! Get-style commands answer with bare value lines. Everything else answers
//! with a single `RPRT <code>` status line.

use crate::error::ReturnCode;

/// Capability block returned for `\dump_state`
///
/// Constant, independent of radio state. See `dump_state` in hamlib's
/// `rigctl_parse.c` for the field layout.
pub const DUMP_STATE_LINES: [&str; 21] = [
    // protocol version
    "0",
    // RIG_MODEL_NETRIGCTL
    "2",
    // RIG_ITU_REGION2
    "2",
    // rx range: start end modes low_power high_power vfo ant
    "150000.000000 30000000.000000  0x900af -1 -1 0x10000003 0x3",
    "0 0 0 0 0 0 0",
    // tx range
    "150000.000000 30000000.000000  0x900af -1 -1 0x10000003 0x3",
    "0 0 0 0 0 0 0",
    // tuning steps
    "0 0",
    // filters
    "0 0",
    "0",
    "0",
    "0",
    "0",
    "",
    "",
    "0x0",
    "0x0",
    "0x0",
    "0x0",
    "0x0",
    "0",
];

/// Response to one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Value lines, written without a trailing status line
    Lines(Vec<String>),
    /// `RPRT <code>` status line
    Status(ReturnCode),
}

impl Response {
    /// Successful set
    pub fn ok() -> Self {
        Self::Status(ReturnCode::Ok)
    }

    /// Unrecognized command
    pub fn not_implemented() -> Self {
        Self::Status(ReturnCode::NotImplemented)
    }

    /// Single value line
    pub fn line(value: impl Into<String>) -> Self {
        Self::Lines(vec![value.into()])
    }

    /// The capability dump
    pub fn dump_state() -> Self {
        Self::Lines(DUMP_STATE_LINES.iter().map(|s| s.to_string()).collect())
    }

    /// Return code if this is a status response
    pub fn return_code(&self) -> Option<ReturnCode> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Lines(_) => None,
        }
    }

    /// Encode to wire bytes, every line `\n` terminated
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Lines(lines) => {
                let mut out = Vec::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
                for line in lines {
                    out.extend_from_slice(line.as_bytes());
                    out.push(b'\n');
                }
                out
            }
            Self::Status(code) => format!("RPRT {}\n", code.code()).into_bytes(),
        }
    }
}
