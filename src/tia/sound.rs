//! TIA sound core: two channels and the sample-rate divider
//!
//! Both channels are ticked in lockstep at the chip clock. An 8.8 fixed-point
//! counter decimates the chip clock to the output rate; every crossing emits
//! the sum of both channel levels as one signed 16-bit sample.

use super::channel::{scale_volume, ChannelState};
use super::control::AudioControl;
use super::poly::PolynomialTables;
use super::registers::{Register, RegisterKind, NUM_CHANNELS};
use crate::backend::TiaBackend;
use crate::config::TiaConfig;
use crate::Result;

/// One fixed-point chip clock
const CLOCK_UNIT: i64 = 256;

/// TIA sound generator
///
/// Register writes take effect immediately; the caller decides which samples
/// have already been rendered. [`crate::Tia`] wraps this type with emulated
/// time so writes land on the right sample boundary.
#[derive(Clone)]
pub struct TiaSound {
    config: TiaConfig,
    tables: &'static PolynomialTables,
    channels: [ChannelState; NUM_CHANNELS],
    sample_divide_max: i64,
    sample_divide_counter: i64,
    user_mute: [bool; NUM_CHANNELS],
}

impl TiaSound {
    /// Create a chip with a validated configuration
    pub fn new(config: TiaConfig) -> Result<Self> {
        config.validate()?;
        let sample_divide_max = config.sample_divide_max() as i64;

        log::debug!(
            "TIA sound init: clock={} Hz, sample_rate={} Hz, gain={}, divider=0x{:X}",
            config.clock,
            config.sample_rate,
            config.gain,
            sample_divide_max
        );

        Ok(Self {
            config,
            tables: PolynomialTables::shared(),
            channels: Default::default(),
            sample_divide_max,
            sample_divide_counter: sample_divide_max,
            user_mute: [false; NUM_CHANNELS],
        })
    }

    /// Reset channels and the sample divider; configuration and mutes are kept
    pub fn reset(&mut self) {
        self.channels = Default::default();
        self.sample_divide_counter = self.sample_divide_max;
    }

    /// Active configuration
    pub fn config(&self) -> &TiaConfig {
        &self.config
    }

    /// State of one channel (0 or 1)
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn channel(&self, channel: usize) -> &ChannelState {
        &self.channels[channel]
    }

    /// Apply a register write without rendering anything first
    ///
    /// Non-audio addresses are ignored.
    pub fn write_register(&mut self, addr: u8, value: u8) {
        let Some(register) = Register::from_addr(addr) else {
            log::trace!("Ignoring write to non-audio address {addr:02X}: {value:02X}");
            return;
        };
        log::trace!("Write to {register}: {value:02X}");

        let gain = self.config.gain;
        let ch = &mut self.channels[register.channel()];
        match register.kind() {
            RegisterKind::Control => ch.control = AudioControl::from_register(value),
            RegisterKind::Frequency => ch.frequency = value & register.mask(),
            RegisterKind::Volume => {
                ch.volume_register = value & register.mask();
                ch.volume = scale_volume(value, gain);
            }
        }
        ch.apply_registers();
    }

    /// Read back the latched value of an audio register (0 for other addresses)
    pub fn read_register(&self, addr: u8) -> u8 {
        let Some(register) = Register::from_addr(addr) else {
            return 0;
        };
        let ch = &self.channels[register.channel()];
        match register.kind() {
            RegisterKind::Control => ch.control.bits(),
            RegisterKind::Frequency => ch.frequency,
            RegisterKind::Volume => ch.volume_register,
        }
    }

    /// Fill `buffer` with exactly `buffer.len()` samples
    pub fn process(&mut self, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            loop {
                for ch in self.channels.iter_mut() {
                    ch.tick(self.tables);
                }

                self.sample_divide_counter -= CLOCK_UNIT;
                if self.sample_divide_counter < CLOCK_UNIT {
                    self.sample_divide_counter += self.sample_divide_max;
                    break;
                }
            }
            *sample = self.mix();
        }
    }

    /// Render `count` samples into a new buffer
    pub fn render(&mut self, count: usize) -> Vec<i16> {
        let mut samples = vec![0; count];
        self.process(&mut samples);
        samples
    }

    /// Current per-channel output levels, mutes applied
    pub fn channel_levels(&self) -> [i16; NUM_CHANNELS] {
        let mut levels = [0; NUM_CHANNELS];
        for (i, level) in levels.iter_mut().enumerate() {
            if !self.user_mute[i] {
                *level = self.channels[i].output_level;
            }
        }
        levels
    }

    #[inline]
    fn mix(&self) -> i16 {
        let [a, b] = self.channel_levels();
        a + b
    }
}

impl Default for TiaSound {
    fn default() -> Self {
        let config = TiaConfig::default();
        Self {
            config,
            tables: PolynomialTables::shared(),
            channels: Default::default(),
            sample_divide_max: config.sample_divide_max() as i64,
            sample_divide_counter: config.sample_divide_max() as i64,
            user_mute: [false; NUM_CHANNELS],
        }
    }
}

impl TiaBackend for TiaSound {
    fn with_config(config: TiaConfig) -> Result<Self> {
        TiaSound::new(config)
    }

    fn reset(&mut self) {
        TiaSound::reset(self)
    }

    fn write_register(&mut self, addr: u8, value: u8) {
        TiaSound::write_register(self, addr, value)
    }

    fn read_register(&self, addr: u8) -> u8 {
        TiaSound::read_register(self, addr)
    }

    fn render_into(&mut self, buffer: &mut [i16]) {
        self.process(buffer)
    }

    fn channel_outputs(&self) -> [i16; NUM_CHANNELS] {
        self.channel_levels()
    }

    fn set_channel_mute(&mut self, channel: usize, mute: bool) {
        if channel < NUM_CHANNELS {
            self.user_mute[channel] = mute;
        }
    }

    fn is_channel_muted(&self, channel: usize) -> bool {
        channel < NUM_CHANNELS && self.user_mute[channel]
    }
}

impl std::fmt::Debug for TiaSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiaSound")
            .field("config", &self.config)
            .field("channels", &self.channels)
            .field("sample_divide_counter", &self.sample_divide_counter)
            .finish()
    }
}
