//! Command dispatcher
//!
//! Executes one classified command against the radio backend and builds
//! the reply. Dispatch is synchronous: every backend call returns
//! immediately and there is no await point between parse and reply.

use std::sync::Arc;

use rigctl_protocol::{CommandLine, ProtocolError, RadioBackend, Response, RigctlCommand};
use tracing::{debug, info, warn};

/// Dispatch behavior switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Reject malformed numeric arguments instead of reading them as zero
    pub strict_arguments: bool,
}

/// Maps rigctl commands onto a shared [`RadioBackend`]
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn RadioBackend>,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Create a dispatcher over a backend
    pub fn new(backend: Arc<dyn RadioBackend>, options: DispatchOptions) -> Self {
        Self { backend, options }
    }

    /// Handle one parsed line
    pub fn handle_line(&self, line: &CommandLine) -> Response {
        self.execute(&RigctlCommand::from_line(line))
    }

    /// Execute a classified command
    pub fn execute(&self, command: &RigctlCommand) -> Response {
        match command {
            RigctlCommand::GetFrequency => Response::line(self.backend.frequency_hz().to_string()),

            RigctlCommand::SetFrequency { hz, arg } => {
                match self.numeric_argument(*hz, command.name(), arg) {
                    Ok(hz) => {
                        self.backend.set_frequency_hz(hz);
                        Response::ok()
                    }
                    Err(e) => Self::reject(e),
                }
            }

            RigctlCommand::GetMode => {
                Response::Lines(vec![self.backend.mode(), self.backend.filter()])
            }

            RigctlCommand::GetVfo => Response::line(self.backend.vfo().token()),

            RigctlCommand::SetVfo { selections } => {
                for vfo in selections {
                    self.backend.select_vfo(*vfo);
                }
                Response::ok()
            }

            RigctlCommand::GetRit => Response::line("0"),

            // Split is never enabled, but the current VFO still follows the
            // "0" line; clients already depend on this two-line reply.
            RigctlCommand::GetSplitVfo => Response::Lines(vec![
                "0".to_string(),
                self.backend.vfo().token().to_string(),
            ]),

            RigctlCommand::SetPtt { value, arg } => {
                match self.numeric_argument(value.map(i64::from), command.name(), arg) {
                    Ok(value) => {
                        let enabled = value != 0;
                        info!("PTT {} ({})", if enabled { "on" } else { "off" }, value);
                        self.backend.set_ptt(enabled);
                        Response::ok()
                    }
                    Err(e) => Self::reject(e),
                }
            }

            RigctlCommand::DumpState => Response::dump_state(),

            RigctlCommand::Unknown { line } => {
                warn!("rigctl: unknown command {:?}", line);
                Response::not_implemented()
            }
        }
    }

    /// Resolve an argument that may have failed to parse
    fn numeric_argument(
        &self,
        parsed: Option<i64>,
        command: &'static str,
        arg: &str,
    ) -> Result<i64, ProtocolError> {
        match parsed {
            Some(value) => Ok(value),
            None if self.options.strict_arguments => Err(ProtocolError::InvalidArgument {
                command,
                value: arg.to_string(),
            }),
            None => {
                debug!("{}: argument {:?} is not a number, using 0", command, arg);
                Ok(0)
            }
        }
    }

    fn reject(error: ProtocolError) -> Response {
        warn!("rigctl: {}", error);
        Response::Status(error.return_code())
    }
}
