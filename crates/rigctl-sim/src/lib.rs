//! rigctl Radio Simulation Library
//!
//! This crate provides the stub radio the responder answers for when no
//! hardware backend is attached:
//!
//! - **VirtualRadio**: shared in-memory record of frequency, mode, filter,
//!   VFO and PTT implementing [`RadioBackend`](rigctl_protocol::RadioBackend)
//!
//! # Example
//!
//! ```rust
//! use rigctl_protocol::{RadioBackend, Vfo};
//! use rigctl_sim::VirtualRadio;
//!
//! let radio = VirtualRadio::default();
//! radio.set_frequency_hz(7_074_000);
//! radio.select_vfo(Vfo::B);
//!
//! assert_eq!(radio.frequency_hz(), 7_074_000);
//! assert_eq!(radio.vfo(), Vfo::B);
//! ```

pub mod radio;

pub use radio::{RadioSnapshot, VirtualRadio, VirtualRadioConfig, DEFAULT_FREQUENCY_HZ};
