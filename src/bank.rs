//! Multi-TIA bank for boards with more than one sound chip
//!
//! Each chip provides 2 channels, so a bank with N chips provides N×2
//! channels. Chips are rendered independently and either averaged into one
//! mono stream or interleaved chip by chip.
//!
//! # Examples
//!
//! ```
//! use tia_sound::{TiaBank, TiaConfig};
//!
//! let mut bank: TiaBank = TiaBank::new(2, TiaConfig::ntsc()).unwrap();
//! bank.write_register(0, 0x15, 0x04); // chip 0 AUDC0: pure tone
//! bank.write_register(0, 0x19, 0x0F); // chip 0 AUDV0
//! bank.write_register(1, 0x16, 0x08); // chip 1 AUDC1: poly9 noise
//! bank.write_register(1, 0x1A, 0x0F); // chip 1 AUDV1
//!
//! let mut buffer = vec![0i16; 524];
//! bank.generate_samples_interleaved(&mut buffer);
//! ```

use crate::backend::TiaBackend;
use crate::config::TiaConfig;
use crate::tia::registers::NUM_CHANNELS;
use crate::tia::TiaSound;
use crate::{Result, TiaError};

/// A bank of TIA chips sharing one output rate
#[derive(Debug)]
pub struct TiaBank<B: TiaBackend = TiaSound> {
    chips: Vec<B>,
    configs: Vec<TiaConfig>,
    /// Scratch buffer reused between calls to avoid per-call allocations
    scratch: Vec<i16>,
}

impl<B: TiaBackend> TiaBank<B> {
    /// Create `count` identical chips
    ///
    /// # Errors
    ///
    /// Returns [`TiaError::ConfigError`] if `count` is 0 or the config is invalid.
    pub fn new(count: usize, config: TiaConfig) -> Result<Self> {
        if count == 0 {
            return Err(TiaError::ConfigError(
                "TIA bank must have at least one chip".into(),
            ));
        }
        Self::with_configs(vec![config; count])
    }

    /// Create one chip per config; all configs must share a sample rate
    pub fn with_configs(configs: Vec<TiaConfig>) -> Result<Self> {
        let Some(first) = configs.first() else {
            return Err(TiaError::ConfigError(
                "TIA bank must have at least one chip".into(),
            ));
        };
        if let Some(other) = configs.iter().find(|c| c.sample_rate != first.sample_rate) {
            return Err(TiaError::ConfigError(format!(
                "mixed sample rates in bank: {} Hz and {} Hz",
                first.sample_rate, other.sample_rate
            )));
        }

        let chips = configs
            .iter()
            .map(|&config| B::with_config(config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            chips,
            configs,
            scratch: Vec::new(),
        })
    }

    /// Returns the number of chips in this bank
    #[inline]
    pub fn chip_count(&self) -> usize {
        self.chips.len()
    }

    /// Returns the total number of channels (chip count × 2)
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.chip_count() * NUM_CHANNELS
    }

    /// Configuration of one chip
    ///
    /// # Panics
    ///
    /// Panics if `chip` is out of bounds.
    #[inline]
    pub fn config(&self, chip: usize) -> &TiaConfig {
        &self.configs[chip]
    }

    /// Gets a reference to a specific chip
    ///
    /// # Panics
    ///
    /// Panics if `chip` is out of bounds.
    #[inline]
    pub fn chip(&self, chip: usize) -> &B {
        &self.chips[chip]
    }

    /// Gets a mutable reference to a specific chip
    ///
    /// # Panics
    ///
    /// Panics if `chip` is out of bounds.
    #[inline]
    pub fn chip_mut(&mut self, chip: usize) -> &mut B {
        &mut self.chips[chip]
    }

    /// Write a register on one chip
    ///
    /// # Panics
    ///
    /// Panics if `chip` is out of bounds.
    pub fn write_register(&mut self, chip: usize, addr: u8, value: u8) {
        self.chips[chip].write_register(addr, value);
    }

    /// Mute a channel by its bank-wide index
    pub fn set_channel_mute(&mut self, channel: usize, mute: bool) {
        let chip = channel / NUM_CHANNELS;
        if let Some(c) = self.chips.get_mut(chip) {
            c.set_channel_mute(channel % NUM_CHANNELS, mute);
        }
    }

    /// Reset every chip
    pub fn reset(&mut self) {
        for chip in &mut self.chips {
            chip.reset();
        }
    }

    /// Render all chips and average them into `buffer`
    pub fn generate_samples(&mut self, buffer: &mut [i16]) {
        let count = self.chips.len() as i32;
        let mut acc = vec![0i32; buffer.len()];
        self.scratch.resize(buffer.len(), 0);

        for chip in &mut self.chips {
            chip.render_into(&mut self.scratch);
            for (a, &s) in acc.iter_mut().zip(self.scratch.iter()) {
                *a += s as i32;
            }
        }

        for (out, a) in buffer.iter_mut().zip(acc) {
            *out = (a / count) as i16;
        }
    }

    /// Render all chips interleaved: `[chip0, chip1, ..., chip0, chip1, ...]`
    ///
    /// `buffer.len()` should be a multiple of the chip count; a trailing
    /// partial frame is left untouched.
    pub fn generate_samples_interleaved(&mut self, buffer: &mut [i16]) {
        let stride = self.chips.len();
        let frames = buffer.len() / stride;
        self.scratch.resize(frames, 0);

        for (index, chip) in self.chips.iter_mut().enumerate() {
            chip.render_into(&mut self.scratch);
            for (frame, &sample) in self.scratch.iter().enumerate() {
                buffer[frame * stride + index] = sample;
            }
        }
    }
}
