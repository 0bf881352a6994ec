//! EEG-Simulation: synthetic EEG generation and live streaming
//!
//! Provides the signal generator, the timer-driven live session with its
//! stress alert, and the mock emotion classifier.

pub mod config;
pub mod emotion;
pub mod live_session;
pub mod live_stream;
pub mod random;
pub mod signal_buffer;
pub mod signal_generator;
pub mod stress;

pub use config::*;
pub use emotion::*;
pub use live_session::*;
pub use live_stream::*;
pub use random::*;
pub use signal_buffer::SignalBuffer;
pub use signal_generator::{generate_eeg_data, ChannelProfile};
pub use stress::*;
