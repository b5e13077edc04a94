//! Per-channel state and the divide-by-N tone generator
//!
//! Each channel counts its divide-by-N counter down once per chip clock. On
//! expiry the 5-bit polynomial position advances, the clock gate is checked,
//! and a gated clock recomputes the latched output level.

use super::control::{AudioControl, ClockGate, Waveform};
use super::poly::{PolynomialTables, POLY4_SIZE, POLY5_SIZE, POLY9_SIZE};

/// Left shift applied to the 4-bit AUDV value before gain scaling
pub const VOLUME_SHIFT: u32 = 10;

/// Gain that leaves the shifted volume unscaled
pub const DEFAULT_GAIN: u32 = 16;

/// Register and counter state of one TIA audio channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Decoded AUDC mode
    pub control: AudioControl,
    /// AUDF value (0-31)
    pub frequency: u8,
    /// AUDV value as written (0-15)
    pub volume_register: u8,
    /// Scaled output amplitude
    pub volume: i16,
    /// Remaining chip clocks until the next expiry (0 = not clocking)
    pub divide_counter: u16,
    /// Reload value of the divide counter
    pub divide_max: u16,
    /// Read position in the 4-bit polynomial
    pub poly4_pos: usize,
    /// Read position in the 5-bit polynomial and divide-by-31 pattern
    pub poly5_pos: usize,
    /// Read position in the 9-bit polynomial
    pub poly9_pos: usize,
    /// Currently latched output (0 or `volume`)
    pub output_level: i16,
}

/// Scale a 4-bit AUDV value to an output amplitude
#[inline]
pub fn scale_volume(value: u8, gain: u32) -> i16 {
    ((((value & 0x0F) as u32) << VOLUME_SHIFT) * gain / DEFAULT_GAIN) as i16
}

impl ChannelState {
    /// Create a zeroed channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Divide-by-N reload value implied by the current control and frequency
    pub fn target_divide_max(&self) -> u16 {
        if self.control.is_set_to_one() {
            return 0;
        }
        let divisor = self.frequency as u16 + 1;
        if self.control.is_div3() {
            divisor * 3
        } else {
            divisor
        }
    }

    /// Re-derive the divide-by-N period after any register write
    ///
    /// A volume-only channel latches its volume straight to the output. The
    /// counter is only restarted when the channel enters or leaves volume-only
    /// mode; otherwise a running count completes with its old length.
    pub fn apply_registers(&mut self) {
        if self.control.is_set_to_one() {
            self.output_level = self.volume;
        }

        let new_max = self.target_divide_max();
        if new_max != self.divide_max {
            self.divide_max = new_max;
            if self.divide_counter == 0 || new_max == 0 {
                self.divide_counter = new_max;
            }
        }
    }

    /// Advance the channel by one chip clock
    #[inline]
    pub fn tick(&mut self, tables: &PolynomialTables) {
        match self.divide_counter {
            0 => return,
            1 => {}
            _ => {
                self.divide_counter -= 1;
                return;
            }
        }

        self.divide_counter = self.divide_max;

        // The poly5 position also drives the divide-by-31 gate.
        self.poly5_pos = (self.poly5_pos + 1) % POLY5_SIZE;

        let clocked = match self.control.clock_gate() {
            ClockGate::Always => true,
            ClockGate::Div31 => tables.div31()[self.poly5_pos] != 0,
            ClockGate::Poly5 => tables.bit5()[self.poly5_pos] != 0,
        };
        if !clocked {
            return;
        }

        self.output_level = match self.control.waveform() {
            Waveform::Toggle => {
                if self.output_level != 0 {
                    0
                } else {
                    self.volume
                }
            }
            Waveform::Poly9 => {
                self.poly9_pos = (self.poly9_pos + 1) % POLY9_SIZE;
                self.level_if(tables.bit9()[self.poly9_pos])
            }
            Waveform::Poly5 => self.level_if(tables.bit5()[self.poly5_pos]),
            Waveform::Poly4 => {
                self.poly4_pos = (self.poly4_pos + 1) % POLY4_SIZE;
                self.level_if(tables.bit4()[self.poly4_pos])
            }
        };
    }

    #[inline]
    fn level_if(&self, bit: u8) -> i16 {
        if bit != 0 {
            self.volume
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(control: u8, frequency: u8, volume: u8) -> ChannelState {
        let mut ch = ChannelState::new();
        ch.control = AudioControl::from_register(control);
        ch.frequency = frequency;
        ch.volume_register = volume;
        ch.volume = scale_volume(volume, DEFAULT_GAIN);
        ch.apply_registers();
        ch
    }

    #[test]
    fn test_scale_volume() {
        assert_eq!(scale_volume(0, DEFAULT_GAIN), 0);
        assert_eq!(scale_volume(8, DEFAULT_GAIN), 8 << 10);
        assert_eq!(scale_volume(0xFF, DEFAULT_GAIN), 15 << 10);
        assert_eq!(scale_volume(15, 8), (15 << 10) / 2);
    }

    #[test]
    fn test_divide_max() {
        assert_eq!(channel(0x00, 5, 0).divide_max, 0);
        assert_eq!(channel(0x04, 5, 0).divide_max, 6);
        assert_eq!(channel(0x0C, 5, 0).divide_max, 18);
        assert_eq!(channel(0x0F, 31, 0).divide_max, 96);
    }

    #[test]
    fn test_set_to_one_latches_volume() {
        let tables = PolynomialTables::new();
        let mut ch = channel(0x00, 3, 9);
        assert_eq!(ch.output_level, scale_volume(9, DEFAULT_GAIN));
        for _ in 0..100 {
            ch.tick(&tables);
            assert_eq!(ch.output_level, scale_volume(9, DEFAULT_GAIN));
        }
    }

    #[test]
    fn test_pure_toggles_every_period() {
        let tables = PolynomialTables::new();
        let mut ch = channel(0x04, 2, 15);
        let v = scale_volume(15, DEFAULT_GAIN);

        let levels: Vec<i16> = (0..9)
            .map(|_| {
                ch.tick(&tables);
                ch.output_level
            })
            .collect();
        // counter starts at 3: expiry lands on ticks 3, 6, 9
        assert_eq!(levels, vec![0, 0, v, v, v, 0, 0, 0, v]);
    }

    #[test]
    fn test_running_count_completes_on_frequency_change() {
        let mut ch = channel(0x04, 9, 15);
        assert_eq!(ch.divide_counter, 10);
        ch.divide_counter = 4;

        ch.frequency = 1;
        ch.apply_registers();
        assert_eq!(ch.divide_max, 2);
        assert_eq!(ch.divide_counter, 4);
    }

    #[test]
    fn test_same_period_write_keeps_running_count() {
        let tables = PolynomialTables::new();
        let mut ch = channel(0x04, 9, 15);
        for _ in 0..4 {
            ch.tick(&tables);
        }
        assert_eq!(ch.divide_counter, 6);
        let before = ch.clone();

        ch.frequency = 9;
        ch.apply_registers();
        assert_eq!(ch, before);

        ch.volume_register = 7;
        ch.volume = scale_volume(7, DEFAULT_GAIN);
        ch.apply_registers();
        assert_eq!(ch.divide_counter, 6);
        assert_eq!(ch.divide_max, 10);
        assert_eq!(ch.poly5_pos, before.poly5_pos);
    }

    #[test]
    fn test_counter_reset_when_entering_volume_only() {
        let mut ch = channel(0x04, 9, 15);
        ch.divide_counter = 4;

        ch.control = AudioControl::SetToOne;
        ch.apply_registers();
        assert_eq!(ch.divide_max, 0);
        assert_eq!(ch.divide_counter, 0);
    }

    #[test]
    fn test_poly4_follows_table() {
        let tables = PolynomialTables::new();
        let mut ch = channel(0x01, 0, 15);
        let v = scale_volume(15, DEFAULT_GAIN);

        for step in 1..=30 {
            ch.tick(&tables);
            let expected = if tables.bit4()[step % POLY4_SIZE] != 0 { v } else { 0 };
            assert_eq!(ch.output_level, expected, "step {step}");
        }
    }

    #[test]
    fn test_poly9_advances_only_in_poly9_mode() {
        let tables = PolynomialTables::new();
        let mut ch = channel(0x08, 0, 15);
        for _ in 0..10 {
            ch.tick(&tables);
        }
        assert_eq!(ch.poly9_pos, 10);
        assert_eq!(ch.poly4_pos, 0);

        let mut ch = channel(0x09, 0, 15);
        for _ in 0..10 {
            ch.tick(&tables);
        }
        assert_eq!(ch.poly9_pos, 0);
        assert_eq!(ch.poly5_pos, 10);
    }

    #[test]
    fn test_div31_gate_holds_output() {
        let tables = PolynomialTables::new();
        let mut ch = channel(0x06, 0, 15);
        let v = scale_volume(15, DEFAULT_GAIN);

        let mut toggles = 0;
        let mut last = ch.output_level;
        for _ in 0..POLY5_SIZE {
            ch.tick(&tables);
            if ch.output_level != last {
                toggles += 1;
                last = ch.output_level;
            }
        }
        assert_eq!(toggles, 2);
        assert!(last == 0 || last == v);
    }
}
