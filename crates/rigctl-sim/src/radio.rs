//! Virtual radio state
//!
//! Provides the in-memory radio record shared by every client connection.
//! There is no hardware behind it: setters store whatever they are given.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rigctl_protocol::{RadioBackend, Vfo};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Frequency the radio starts on when not configured otherwise
pub const DEFAULT_FREQUENCY_HZ: i64 = 434_500_000;

/// Configuration for creating a virtual radio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualRadioConfig {
    /// Initial frequency in Hz
    pub initial_frequency_hz: i64,
    /// Initial operating mode token
    pub initial_mode: String,
    /// Initial filter/passband token
    pub initial_filter: String,
    /// Initially selected VFO
    pub initial_vfo: Vfo,
}

impl Default for VirtualRadioConfig {
    fn default() -> Self {
        Self {
            initial_frequency_hz: DEFAULT_FREQUENCY_HZ, // 70cm
            initial_mode: "USB".to_string(),
            initial_filter: "2400".to_string(),
            initial_vfo: Vfo::A,
        }
    }
}

/// Point-in-time copy of the radio state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioSnapshot {
    /// Frequency in Hz
    pub frequency_hz: i64,
    /// Operating mode token
    pub mode: String,
    /// Filter/passband token
    pub filter: String,
    /// Selected VFO
    pub vfo: Vfo,
    /// PTT flag
    pub ptt: bool,
}

/// A simulated radio shared between client connections
///
/// Every accessor takes the internal lock for exactly one field read or
/// write, so readers never see a partially written value and concurrent
/// writers resolve as last-write-wins.
#[derive(Debug)]
pub struct VirtualRadio {
    state: Mutex<RadioSnapshot>,
}

impl Default for VirtualRadio {
    fn default() -> Self {
        Self::from_config(VirtualRadioConfig::default())
    }
}

impl VirtualRadio {
    /// Create a virtual radio from configuration
    pub fn from_config(config: VirtualRadioConfig) -> Self {
        Self {
            state: Mutex::new(RadioSnapshot {
                frequency_hz: config.initial_frequency_hz,
                mode: config.initial_mode,
                filter: config.initial_filter,
                vfo: config.initial_vfo,
                ptt: false,
            }),
        }
    }

    /// Copy of the whole record
    pub fn snapshot(&self) -> RadioSnapshot {
        self.lock().clone()
    }

    /// Get a summary of current state
    pub fn state_summary(&self) -> String {
        let state = self.snapshot();
        format!(
            "{:.3} MHz {} {} {} {}",
            state.frequency_hz as f64 / 1_000_000.0,
            state.mode,
            state.filter,
            state.vfo,
            if state.ptt { "[TX]" } else { "" }
        )
        .trim_end()
        .to_string()
    }

    // A panic while holding the lock cannot leave a field half written,
    // so a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, RadioSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RadioBackend for VirtualRadio {
    fn frequency_hz(&self) -> i64 {
        self.lock().frequency_hz
    }

    fn set_frequency_hz(&self, hz: i64) {
        self.lock().frequency_hz = hz;
        debug!("Virtual radio frequency set to {} Hz", hz);
    }

    fn mode(&self) -> String {
        self.lock().mode.clone()
    }

    fn filter(&self) -> String {
        self.lock().filter.clone()
    }

    fn vfo(&self) -> Vfo {
        self.lock().vfo
    }

    fn select_vfo(&self, vfo: Vfo) {
        self.lock().vfo = vfo;
        debug!("Virtual radio selected {}", vfo);
    }

    fn ptt(&self) -> bool {
        self.lock().ptt
    }

    fn set_ptt(&self, enabled: bool) {
        self.lock().ptt = enabled;
    }
}
