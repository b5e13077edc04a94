//! Backend trait abstraction for TIA sound implementations
//!
//! Hosts that mix several chips (see [`crate::TiaBank`]) or swap in
//! instrumented implementations program against this trait rather than the
//! concrete generator.

use crate::config::TiaConfig;
use crate::tia::registers::NUM_CHANNELS;
use crate::Result;

/// Common interface for TIA sound backends
///
/// # Example
///
/// ```
/// use tia_sound::{TiaBackend, TiaConfig, TiaSound};
///
/// fn buzz<B: TiaBackend>(chip: &mut B) -> Vec<i16> {
///     chip.write_register(0x15, 0x01); // AUDC0: poly4
///     chip.write_register(0x17, 0x04); // AUDF0
///     chip.write_register(0x19, 0x0F); // AUDV0: max volume
///     chip.generate_samples(256)
/// }
///
/// let mut chip = TiaSound::with_config(TiaConfig::ntsc()).unwrap();
/// assert_eq!(buzz(&mut chip).len(), 256);
/// ```
pub trait TiaBackend: Send {
    /// Create a backend from a configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::TiaError::ConfigError`] if the configuration fails validation.
    fn with_config(config: TiaConfig) -> Result<Self>
    where
        Self: Sized;

    /// Reset channel state; configuration is kept
    fn reset(&mut self);

    /// Write to an audio register (0x15-0x1A); other addresses are ignored
    fn write_register(&mut self, addr: u8, value: u8);

    /// Read the latched value of an audio register, 0 for other addresses
    fn read_register(&self, addr: u8) -> u8;

    /// Fill `buffer` with exactly `buffer.len()` samples
    fn render_into(&mut self, buffer: &mut [i16]);

    /// Generate `count` samples into a new vector
    fn generate_samples(&mut self, count: usize) -> Vec<i16> {
        let mut samples = vec![0; count];
        self.render_into(&mut samples);
        samples
    }

    /// Current per-channel output levels
    fn channel_outputs(&self) -> [i16; NUM_CHANNELS];

    /// Mute or unmute a channel (0 or 1); out-of-range channels are ignored
    fn set_channel_mute(&mut self, channel: usize, mute: bool);

    /// Check if a channel is muted
    fn is_channel_muted(&self, channel: usize) -> bool;
}
