//! Audio export for rendered TIA output
//!
//! # Examples
//!
//! ```no_run
//! use tia_sound::export::{export_trace_to_wav, ExportConfig};
//! use tia_sound::{RegisterTrace, TiaConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let trace = RegisterTrace::from_path("capture.csv")?;
//! export_trace_to_wav(&trace, TiaConfig::ntsc(), "capture.wav", ExportConfig::default())?;
//! # Ok(())
//! # }
//! ```

mod wav;
pub use wav::*;

/// History window of the DC adjuster, in samples (power of two)
const DC_ADJUST_HISTORY_BIT: usize = 11;
const DC_ADJUST_HISTORY_SIZE: usize = 1 << DC_ADJUST_HISTORY_BIT;

/// Channel layout of an exported file
///
/// The chip is mono; stereo duplicates every sample into both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    /// One channel
    #[default]
    Mono,
    /// Two identical channels
    Stereo,
}

impl ChannelLayout {
    /// Channel count written to the file header
    pub fn count(self) -> u16 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }
}

/// Export configuration options
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output channel layout
    pub channels: ChannelLayout,
    /// Remove the DC offset of the unipolar chip output
    pub remove_dc: bool,
    /// Fade out duration in seconds (0 = no fade)
    pub fade_out_duration: f32,
    /// Clocks rendered after the last trace write
    pub tail_clocks: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            channels: ChannelLayout::Mono,
            remove_dc: true,
            fade_out_duration: 0.0,
            tail_clocks: 0,
        }
    }
}

impl ExportConfig {
    /// Create config for stereo export
    pub fn stereo() -> Self {
        Self {
            channels: ChannelLayout::Stereo,
            ..Default::default()
        }
    }

    /// Enable or disable DC removal
    pub fn remove_dc(mut self, enable: bool) -> Self {
        self.remove_dc = enable;
        self
    }

    /// Add fade out at the end
    pub fn fade_out(mut self, duration_seconds: f32) -> Self {
        self.fade_out_duration = duration_seconds;
        self
    }

    /// Keep rendering for `clocks` after the last write
    pub fn tail(mut self, clocks: u64) -> Self {
        self.tail_clocks = clocks;
        self
    }
}

/// Subtract a running mean over the last 2048 samples
///
/// The TIA only ever outputs non-negative levels, so raw output sits well
/// above zero. The moving average follows the offset within ~50 ms.
pub fn remove_dc_offset(samples: &mut [i16]) {
    let mut history = [0i16; DC_ADJUST_HISTORY_SIZE];
    let mut pos = 0usize;
    let mut sum = 0i64;

    for sample in samples.iter_mut() {
        sum -= history[pos] as i64;
        sum += *sample as i64;
        history[pos] = *sample;
        pos = (pos + 1) & (DC_ADJUST_HISTORY_SIZE - 1);

        let adjusted = *sample as i64 - (sum >> DC_ADJUST_HISTORY_BIT);
        *sample = adjusted.clamp(i16::MIN as i64, i16::MAX as i64) as i16;
    }
}

/// Apply a linear fade out to the end of the samples
pub fn apply_fade_out(samples: &mut [i16], fade_duration: f32, sample_rate: u32) {
    if fade_duration <= 0.0 || samples.is_empty() {
        return;
    }

    let fade_samples = (fade_duration * sample_rate as f32) as usize;
    if fade_samples == 0 {
        return;
    }
    let start_fade = samples.len().saturating_sub(fade_samples);

    for (i, sample) in samples.iter_mut().enumerate().skip(start_fade) {
        let progress = (i - start_fade) as f32 / fade_samples as f32;
        *sample = (*sample as f32 * (1.0 - progress)) as i16;
    }
}
