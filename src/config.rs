//! Chip configuration
//!
//! Construction-time parameters of a TIA sound instance. Configurations can be
//! built from presets or loaded from JSON so hosts can keep per-board settings
//! next to their other machine descriptions.

use crate::tia::channel::{DEFAULT_GAIN, VOLUME_SHIFT};
use crate::{Result, TiaError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// NTSC TIA audio clock (colour clock / 114, two audio ticks per scanline)
pub const NTSC_AUDIO_CLOCK: u32 = 31_400;

/// PAL TIA audio clock
pub const PAL_AUDIO_CLOCK: u32 = 31_113;

/// Largest gain for which two full-volume channels still fit in an i16
pub const MAX_GAIN: u32 = (i16::MAX as u32 * DEFAULT_GAIN) / (2 * (0x0F << VOLUME_SHIFT));

/// Clock, output rate and gain of one chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiaConfig {
    /// Chip audio clock in Hz
    pub clock: u32,
    /// Output sample rate in Hz (must not exceed `clock`)
    pub sample_rate: u32,
    /// Volume gain; [`DEFAULT_GAIN`] leaves volumes unscaled
    pub gain: u32,
}

impl TiaConfig {
    /// Build a config from its three parameters
    pub fn new(clock: u32, sample_rate: u32, gain: u32) -> Self {
        Self {
            clock,
            sample_rate,
            gain,
        }
    }

    /// NTSC console rendered at the native audio clock
    pub fn ntsc() -> Self {
        Self::new(NTSC_AUDIO_CLOCK, NTSC_AUDIO_CLOCK, DEFAULT_GAIN)
    }

    /// PAL console rendered at the native audio clock
    pub fn pal() -> Self {
        Self::new(PAL_AUDIO_CLOCK, PAL_AUDIO_CLOCK, DEFAULT_GAIN)
    }

    /// Replace the output sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace the gain
    pub fn with_gain(mut self, gain: u32) -> Self {
        self.gain = gain;
        self
    }

    /// Fixed-point (8 fractional bits) chip clocks per output sample
    pub fn sample_divide_max(&self) -> u32 {
        ((self.clock as u64) << 8).checked_div(self.sample_rate as u64).unwrap_or(0) as u32
    }

    /// Check the parameters describe a chip that can be rendered
    pub fn validate(&self) -> Result<()> {
        if self.clock == 0 {
            return Err(TiaError::ConfigError("clock must be non-zero".into()));
        }
        if self.sample_rate == 0 {
            return Err(TiaError::ConfigError("sample rate must be non-zero".into()));
        }
        if self.sample_rate > self.clock {
            return Err(TiaError::ConfigError(format!(
                "sample rate {} Hz exceeds chip clock {} Hz",
                self.sample_rate, self.clock
            )));
        }
        if (self.clock as u64) << 8 > u32::MAX as u64 {
            return Err(TiaError::ConfigError(format!(
                "clock {} Hz overflows the 8.8 sample divider",
                self.clock
            )));
        }
        if self.gain > MAX_GAIN {
            return Err(TiaError::ConfigError(format!(
                "gain {} exceeds maximum {MAX_GAIN}",
                self.gain
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for TiaConfig {
    fn default() -> Self {
        Self::ntsc()
    }
}
