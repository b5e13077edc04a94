//! Emulated-time stream around the sound core
//!
//! The host advances emulated chip clocks as its CPU runs. Samples owed for
//! that time are only rendered when someone needs them: before a register
//! write (so the old register state produces them) or when the host collects
//! audio. This keeps register changes on the sample boundary they happened at.

use super::channel::ChannelState;
use super::sound::TiaSound;
use crate::config::TiaConfig;
use crate::Result;

/// Samples reserved up front in the pending queue (about 1/10 s at native rate)
const PENDING_CAPACITY: usize = 4096;

/// TIA sound chip with flush-before-write register semantics
#[derive(Debug, Clone)]
pub struct Tia {
    sound: TiaSound,
    /// Remainder of `clocks * sample_rate` not yet worth a whole sample
    clock_remainder: u64,
    /// Samples due but not yet rendered
    owed_samples: usize,
    /// Rendered samples waiting to be collected
    pending: Vec<i16>,
    /// Total chip clocks advanced since construction or reset
    elapsed_clocks: u64,
}

impl Tia {
    /// Create a chip from a validated configuration
    pub fn new(config: TiaConfig) -> Result<Self> {
        Ok(Self {
            sound: TiaSound::new(config)?,
            clock_remainder: 0,
            owed_samples: 0,
            pending: Vec::with_capacity(PENDING_CAPACITY),
            elapsed_clocks: 0,
        })
    }

    /// Reset channels, emulated time and pending audio
    pub fn reset(&mut self) {
        self.sound.reset();
        self.clock_remainder = 0;
        self.owed_samples = 0;
        self.pending.clear();
        self.elapsed_clocks = 0;
    }

    /// Active configuration
    pub fn config(&self) -> &TiaConfig {
        self.sound.config()
    }

    /// Underlying sound core
    pub fn sound(&self) -> &TiaSound {
        &self.sound
    }

    /// Mutable access to the sound core (mutes, direct rendering)
    pub fn sound_mut(&mut self) -> &mut TiaSound {
        &mut self.sound
    }

    /// State of one channel (0 or 1)
    pub fn channel(&self, channel: usize) -> &ChannelState {
        self.sound.channel(channel)
    }

    /// Chip clocks advanced so far
    pub fn elapsed_clocks(&self) -> u64 {
        self.elapsed_clocks
    }

    /// Let `clocks` chip clocks of emulated time pass
    ///
    /// Nothing is rendered here; the owed sample count grows by exactly
    /// `clocks * sample_rate / clock`, carrying the remainder forward. Counts
    /// saturate instead of wrapping; bounding how much audio a caller asks
    /// for is up to the caller (see [`crate::trace::MAX_TRACE_CYCLES`]).
    pub fn advance(&mut self, clocks: u64) {
        let config = self.sound.config();
        let scaled = self.clock_remainder as u128 + clocks as u128 * config.sample_rate as u128;
        let clock = config.clock as u128;

        let owed = usize::try_from(scaled / clock).unwrap_or(usize::MAX);
        self.owed_samples = self.owed_samples.saturating_add(owed);
        self.clock_remainder = (scaled % clock) as u64;
        self.elapsed_clocks = self.elapsed_clocks.saturating_add(clocks);
    }

    /// Render every sample owed up to the current emulated time
    pub fn update(&mut self) {
        if self.owed_samples == 0 {
            return;
        }
        let start = self.pending.len();
        self.pending.resize(start + self.owed_samples, 0);
        self.sound.process(&mut self.pending[start..]);
        log::trace!(
            "Flushed {} samples at clock {}",
            self.owed_samples,
            self.elapsed_clocks
        );
        self.owed_samples = 0;
    }

    /// Flush owed audio with the old register state, then apply the write
    pub fn write_register(&mut self, addr: u8, value: u8) {
        self.update();
        self.sound.write_register(addr, value);
    }

    /// Read the latched value of an audio register
    pub fn read_register(&self, addr: u8) -> u8 {
        self.sound.read_register(addr)
    }

    /// Rendered samples waiting to be collected
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Samples due for emulated time but not rendered yet
    pub fn owed_samples(&self) -> usize {
        self.owed_samples
    }

    /// Flush, then move up to `out.len()` pending samples into `out`
    ///
    /// Returns the number of samples written.
    pub fn read_samples(&mut self, out: &mut [i16]) -> usize {
        self.update();
        let n = out.len().min(self.pending.len());
        out[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        n
    }

    /// Flush, then take every pending sample
    pub fn take_samples(&mut self) -> Vec<i16> {
        self.update();
        std::mem::take(&mut self.pending)
    }
}
