//! rigctl command grammar
//!
//! A received line is first normalized into a [`CommandLine`] (verb plus
//! arguments) and then classified into a [`RigctlCommand`]. Classification
//! follows the responder's historical dispatch rules: most commands are
//! recognized by the first character of the line alone, `F` and
//! `\dump_state` by their full verb.

use std::fmt;

/// Verb substituted for a line with no content
pub const EMPTY_LINE_VERB: &str = "?";

/// VFO selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vfo {
    /// VFO A
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "VFOA"))]
    A,
    /// VFO B
    #[cfg_attr(feature = "serde", serde(rename = "VFOB"))]
    B,
}

impl Vfo {
    /// Token used for this VFO on the wire
    pub fn token(&self) -> &'static str {
        match self {
            Self::A => "VFOA",
            Self::B => "VFOB",
        }
    }
}

impl fmt::Display for Vfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One normalized input line
///
/// Leading and trailing whitespace (terminators included) is stripped and
/// internal whitespace runs collapse to a single space. Only the ASCII
/// whitespace of C's `isspace` counts; other Unicode spaces stay part of a
/// token. An empty line becomes [`EMPTY_LINE_VERB`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    raw: String,
    verb: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Parse a line of text, terminator included or not
    pub fn parse(line: &str) -> Self {
        let mut tokens = line
            .split(is_c_space)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        let Some(verb) = tokens.next() else {
            return Self {
                raw: EMPTY_LINE_VERB.to_string(),
                verb: EMPTY_LINE_VERB.to_string(),
                args: Vec::new(),
            };
        };
        let args: Vec<String> = tokens.collect();

        let mut raw = verb.clone();
        for arg in &args {
            raw.push(' ');
            raw.push_str(arg);
        }

        Self { raw, verb, args }
    }

    /// Parse raw bytes from the wire; invalid UTF-8 is replaced, not rejected
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// The simplified line (never empty)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First token
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Tokens after the verb
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Number of tokens, verb included
    pub fn token_count(&self) -> usize {
        1 + self.args.len()
    }

    /// First character of the simplified line
    pub fn first_char(&self) -> char {
        self.raw.chars().next().unwrap_or('?')
    }
}

/// Classified rigctl command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigctlCommand {
    /// `f`: read frequency
    GetFrequency,

    /// `F <hz>`: set frequency
    ///
    /// `hz` is `None` when the argument has no leading integer.
    SetFrequency { hz: Option<i64>, arg: String },

    /// `m`: read mode and filter
    GetMode,

    /// `v`: read the current VFO
    GetVfo,

    /// `V ...`: select VFOs in the listed order
    SetVfo { selections: Vec<Vfo> },

    /// `j`: read RIT offset
    GetRit,

    /// `s`: read split status
    GetSplitVfo,

    /// `T <n>`: set PTT
    ///
    /// `value` is `None` when the text after the first space is not an integer.
    SetPtt { value: Option<i32>, arg: String },

    /// `\dump_state` or a line starting with `1`
    DumpState,

    /// Anything else
    Unknown { line: String },
}

impl RigctlCommand {
    /// Classify a parsed line
    pub fn from_line(line: &CommandLine) -> Self {
        match line.first_char() {
            'f' => Self::GetFrequency,
            _ if line.verb() == "F" && line.token_count() == 2 => {
                let arg = line.args()[0].clone();
                Self::SetFrequency {
                    hz: parse_leading_int(&arg),
                    arg,
                }
            }
            'm' => Self::GetMode,
            'v' => Self::GetVfo,
            'V' => {
                // Both checks run; a line naming both VFOs ends on B.
                let mut selections = Vec::new();
                if line.raw().contains(Vfo::A.token()) {
                    selections.push(Vfo::A);
                }
                if line.raw().contains(Vfo::B.token()) {
                    selections.push(Vfo::B);
                }
                Self::SetVfo { selections }
            }
            'j' => Self::GetRit,
            's' => Self::GetSplitVfo,
            'T' => {
                // Without a space the whole line is the argument, which never parses.
                let arg = line
                    .raw()
                    .split_once(' ')
                    .map_or(line.raw(), |(_, rest)| rest)
                    .to_string();
                Self::SetPtt {
                    value: arg.parse::<i32>().ok(),
                    arg,
                }
            }
            _ if line.verb() == "\\dump_state" => Self::DumpState,
            '1' => Self::DumpState,
            _ => Self::Unknown {
                line: line.raw().to_string(),
            },
        }
    }

    /// Parse a line of text straight into a command
    pub fn parse(text: &str) -> Self {
        Self::from_line(&CommandLine::parse(text))
    }

    /// hamlib long name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetFrequency => "get_freq",
            Self::SetFrequency { .. } => "set_freq",
            Self::GetMode => "get_mode",
            Self::GetVfo => "get_vfo",
            Self::SetVfo { .. } => "set_vfo",
            Self::GetRit => "get_rit",
            Self::GetSplitVfo => "get_split_vfo",
            Self::SetPtt { .. } => "set_ptt",
            Self::DumpState => "dump_state",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Whitespace as classified by C's `isspace` in the "C" locale
fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Read the leading integer of `text` the way C's `atol` does
///
/// Leading whitespace and one sign are accepted, digits are consumed up to
/// the first non-digit. Returns `None` when no digit is present. Values
/// beyond the `i64` range saturate.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let s = text.trim_start_matches(is_c_space);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].bytes().fold(0i64, |acc, b| {
        let digit = i64::from(b - b'0');
        let acc = acc.saturating_mul(10);
        if negative {
            acc.saturating_sub(digit)
        } else {
            acc.saturating_add(digit)
        }
    });
    Some(value)
}
