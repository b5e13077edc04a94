//! TIA Sound Emulator for the Atari 2600
//!
//! A sample-accurate emulator of the sound half of the Atari 2600 TIA
//! (Television Interface Adaptor). Two channels of polynomial-counter
//! waveforms are clocked through divide-by-N counters and decimated to a host
//! sample rate as signed 16-bit mono PCM.
//!
//! # Features
//! - All 16 AUDC waveform modes (pure tones, poly4/poly5/poly9, divide-by-31, divide-by-3)
//! - Integer 8.8 sample-rate divider, no drift
//! - Flush-before-write register timing through [`Tia`]
//! - Multi-chip banks, register trace replay and WAV export
//! - Optional real-time streaming playback
//!
//! # Crate feature flags
//! - `emulator` (default): Core TIA sound emulator
//! - `streaming` (optional): Real-time audio output via rodio
//!
//! # Quick start
//! ## Core generator
//! ```
//! use tia_sound::{TiaConfig, TiaSound};
//! let mut chip = TiaSound::new(TiaConfig::ntsc()).unwrap();
//! chip.write_register(0x15, 0x04); // AUDC0: pure tone
//! chip.write_register(0x17, 0x1F); // AUDF0: lowest pitch
//! chip.write_register(0x19, 0x0F); // AUDV0: max volume
//! let mut buffer = [0i16; 512];
//! chip.process(&mut buffer);
//! ```
//!
//! ## Emulated time
//! ```
//! use tia_sound::{Tia, TiaConfig};
//! let mut tia = Tia::new(TiaConfig::ntsc()).unwrap();
//! tia.write_register(0x19, 0x0F); // AUDV0
//! tia.advance(76);                // CPU ran for 76 audio clocks
//! tia.write_register(0x19, 0x00); // earlier samples keep the old volume
//! let samples = tia.take_samples();
//! assert_eq!(samples.len(), 76);
//! ```

#![warn(missing_docs)]

// Domain modules
pub mod backend; // Backend trait abstraction
pub mod bank; // Multi-chip banks
pub mod config; // Chip configuration
pub mod export; // WAV export
pub mod tia; // TIA sound emulation (core)
pub mod trace; // Register write traces

#[cfg(feature = "streaming")]
pub mod streaming; // Audio Output & Streaming

/// Error types for TIA sound operations
///
/// Register writes and rendering never fail; errors come from configuration,
/// trace parsing, file output and audio devices.
#[derive(thiserror::Error, Debug)]
pub enum TiaError {
    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed register trace CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing a WAV file
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Register trace is inconsistent
    #[error("Trace error: {0}")]
    TraceError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for TiaError {
    /// Converts a String into `TiaError::Other`.
    ///
    /// Prefer a specific variant (`ConfigError`, `TraceError`, ...) where one fits.
    fn from(msg: String) -> Self {
        TiaError::Other(msg)
    }
}

impl From<&str> for TiaError {
    /// Converts a string slice into `TiaError::Other`.
    fn from(msg: &str) -> Self {
        TiaError::Other(msg.to_string())
    }
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, TiaError>;

// Public API exports
pub use backend::TiaBackend;
pub use bank::TiaBank;
pub use config::TiaConfig;
pub use tia::{AudioControl, PolynomialTables, Register, Tia, TiaSound};
pub use trace::{RegisterTrace, TraceEvent};

#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, RingBuffer, StreamConfig};
