//! Error types for rigctl command handling

use thiserror::Error;

/// Errors raised while interpreting command arguments
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Argument could not be read as the expected value
    #[error("invalid argument for {command}: {value:?}")]
    InvalidArgument {
        /// Command the argument belonged to
        command: &'static str,
        /// Offending argument text
        value: String,
    },
}

impl ProtocolError {
    /// rigctl return code reported to the client for this error
    pub fn return_code(&self) -> ReturnCode {
        match self {
            Self::InvalidArgument { .. } => ReturnCode::InvalidParameter,
        }
    }
}

/// Return codes carried by `RPRT` status lines
///
/// Values follow hamlib's negated `RIG_E*` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    /// Command completed (`RIG_OK`)
    Ok,
    /// Invalid parameter (`-RIG_EINVAL`)
    InvalidParameter,
    /// Command not implemented (`-RIG_ENIMPL`)
    NotImplemented,
}

impl ReturnCode {
    /// Numeric code as written on the wire
    pub fn code(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::InvalidParameter => -1,
            Self::NotImplemented => -11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_codes() {
        assert_eq!(ReturnCode::Ok.code(), 0);
        assert_eq!(ReturnCode::InvalidParameter.code(), -1);
        assert_eq!(ReturnCode::NotImplemented.code(), -11);
    }

    #[test]
    fn test_invalid_argument_maps_to_einval() {
        let err = ProtocolError::InvalidArgument {
            command: "set_freq",
            value: "abc".into(),
        };
        assert_eq!(err.return_code(), ReturnCode::InvalidParameter);
        assert_eq!(err.to_string(), "invalid argument for set_freq: \"abc\"");
    }
}
