//! AUDC waveform modes
//!
//! The 4-bit AUDC value combines a clock gate (bits 0-1), a divide-by-3
//! prescaler (bits 2-3 both set) and a waveform source. Each of the 16 values
//! is decoded once into a named mode; the tick logic only ever matches on the
//! derived [`ClockGate`] and [`Waveform`].

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;

/// Bits 2 and 3 of AUDC: when both are set the divide-by-N period is tripled
pub const DIV3_MASK: u8 = 0x0C;

/// Audio control mode (AUDC0/AUDC1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromPrimitive)]
pub enum AudioControl {
    /// Output latched to the volume level, no clocking
    #[default]
    SetToOne = 0x00,
    /// 4-bit polynomial
    Poly4 = 0x01,
    /// Divide-by-31 gated 4-bit polynomial
    Div31Poly4 = 0x02,
    /// 5-bit polynomial gated 4-bit polynomial
    Poly5Poly4 = 0x03,
    /// Pure tone (divide by 2)
    Pure = 0x04,
    /// Pure tone, alternate encoding
    Pure2 = 0x05,
    /// Divide-by-31 pure tone
    Div31Pure = 0x06,
    /// 5-bit polynomial gated pure tone
    Poly5Pure = 0x07,
    /// 9-bit polynomial (white noise)
    Poly9 = 0x08,
    /// 5-bit polynomial
    Poly5 = 0x09,
    /// Divide-by-31 gated 5-bit polynomial
    Div31Poly5 = 0x0A,
    /// 5-bit polynomial gated 5-bit polynomial
    Poly5Poly5 = 0x0B,
    /// Divide-by-3 pure tone
    Div3Pure = 0x0C,
    /// Divide-by-3 pure tone, alternate encoding
    Div3Pure2 = 0x0D,
    /// Divide-by-31 gated divide-by-3 pure tone
    Div31Div3 = 0x0E,
    /// 5-bit polynomial gated divide-by-3 pure tone
    Poly5Div3 = 0x0F,
}

/// Which event lets a divide-by-N expiry reach the waveform stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockGate {
    /// Every expiry clocks the waveform
    Always,
    /// Only expiries where the divide-by-31 pattern is high
    Div31,
    /// Only expiries where the 5-bit polynomial is high
    Poly5,
}

/// How the channel output is recomputed on a gated clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Flip between silence and the volume level
    Toggle,
    /// Sample the 4-bit polynomial after advancing it
    Poly4,
    /// Sample the 5-bit polynomial at its current position
    Poly5,
    /// Sample the 9-bit polynomial after advancing it
    Poly9,
}

impl AudioControl {
    /// Decode the low nibble of an AUDC write
    pub fn from_register(value: u8) -> Self {
        AudioControl::from_u8(value & 0x0F).unwrap_or_default()
    }

    /// Raw 4-bit register value
    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// True for the volume-only mode (AUDC = 0)
    #[inline]
    pub fn is_set_to_one(self) -> bool {
        self == AudioControl::SetToOne
    }

    /// True when the divide-by-N period is tripled
    #[inline]
    pub fn is_div3(self) -> bool {
        self.bits() & DIV3_MASK == DIV3_MASK
    }

    /// Clock gate applied after each divide-by-N expiry
    pub fn clock_gate(self) -> ClockGate {
        use AudioControl::*;
        match self {
            SetToOne | Poly4 | Pure | Pure2 | Poly9 | Poly5 | Div3Pure | Div3Pure2 => {
                ClockGate::Always
            }
            Div31Poly4 | Div31Pure | Div31Poly5 | Div31Div3 => ClockGate::Div31,
            Poly5Poly4 | Poly5Pure | Poly5Poly5 | Poly5Div3 => ClockGate::Poly5,
        }
    }

    /// Waveform source sampled on a gated clock
    pub fn waveform(self) -> Waveform {
        use AudioControl::*;
        match self {
            Pure | Pure2 | Div31Pure | Poly5Pure | Div3Pure | Div3Pure2 | Div31Div3
            | Poly5Div3 => Waveform::Toggle,
            Poly9 => Waveform::Poly9,
            Poly5 | Div31Poly5 | Poly5Poly5 => Waveform::Poly5,
            // SetToOne never clocks; it shares the poly4 encoding.
            SetToOne | Poly4 | Div31Poly4 | Poly5Poly4 => Waveform::Poly4,
        }
    }

    /// Short mnemonic for display
    pub fn name(self) -> &'static str {
        use AudioControl::*;
        match self {
            SetToOne => "SET_TO_1",
            Poly4 => "POLY4",
            Div31Poly4 => "DIV31_POLY4",
            Poly5Poly4 => "POLY5_POLY4",
            Pure => "PURE",
            Pure2 => "PURE2",
            Div31Pure => "DIV31_PURE",
            Poly5Pure => "POLY5_PURE",
            Poly9 => "POLY9",
            Poly5 => "POLY5",
            Div31Poly5 => "DIV31_POLY5",
            Poly5Poly5 => "POLY5_POLY5",
            Div3Pure => "DIV3_PURE",
            Div3Pure2 => "DIV3_PURE2",
            Div31Div3 => "DIV31_DIV3",
            Poly5Div3 => "POLY5_DIV3",
        }
    }
}

impl fmt::Display for AudioControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:X})", self.name(), self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_exhaustive() {
        for value in 0u8..=0xFF {
            let control = AudioControl::from_register(value);
            assert_eq!(control.bits(), value & 0x0F);
        }
    }

    #[test]
    fn test_clock_gate_matches_bits() {
        for value in 0u8..16 {
            let control = AudioControl::from_register(value);
            let expected = if value & 0x02 == 0 {
                ClockGate::Always
            } else if value & 0x01 == 0 {
                ClockGate::Div31
            } else {
                ClockGate::Poly5
            };
            assert_eq!(control.clock_gate(), expected, "{control}");
        }
    }

    #[test]
    fn test_waveform_matches_bits() {
        for value in 0u8..16 {
            let control = AudioControl::from_register(value);
            let expected = if value & 0x04 != 0 {
                Waveform::Toggle
            } else if value & 0x08 != 0 {
                if value == 0x08 {
                    Waveform::Poly9
                } else {
                    Waveform::Poly5
                }
            } else {
                Waveform::Poly4
            };
            assert_eq!(control.waveform(), expected, "{control}");
        }
    }

    #[test]
    fn test_div3_modes() {
        let div3: Vec<u8> = (0u8..16)
            .filter(|&v| AudioControl::from_register(v).is_div3())
            .collect();
        assert_eq!(div3, vec![0x0C, 0x0D, 0x0E, 0x0F]);
    }

    #[test]
    fn test_display() {
        assert_eq!(AudioControl::Poly9.to_string(), "POLY9 (0x8)");
        assert_eq!(AudioControl::Poly5Pure.to_string(), "POLY5_PURE (0x7)");
        assert!(AudioControl::from_register(0xF0).is_set_to_one());
    }
}
