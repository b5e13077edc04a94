//! TIA Sound Emulation Domain
//!
//! Atari 2600 TIA audio: two channels of divide-by-N clocked polynomial
//! counters, mixed and decimated to a host sample rate.
//!
//! Implementation:
//! - `poly` - Polynomial and divide-by-31 tables
//! - `control` - AUDC mode decode
//! - `channel` - Per-channel state and tick logic
//! - `sound` - Two-channel mixer and sample divider
//! - `stream` - Emulated-time wrapper with flush-before-write

// Internal modules
pub mod channel;
pub mod control;
pub mod poly;
pub mod registers;
pub mod sound;
pub mod stream;

// Re-export public API
pub use channel::{ChannelState, DEFAULT_GAIN};
pub use control::AudioControl;
pub use poly::PolynomialTables;
pub use registers::Register;
pub use sound::TiaSound;
pub use stream::Tia;
