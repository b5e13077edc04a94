//! TIA Audio Register Definitions
//!
//! The six audio registers sit at offsets 0x15-0x1A of the TIA write map.
//! Absolute addresses are assigned by the host's chip-select decode.

use std::fmt;

/// Number of audio channels on one TIA
pub const NUM_CHANNELS: usize = 2;

/// TIA audio register address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Channel 0 control (waveform mode) - AUDC0
    Audc0 = 0x15,
    /// Channel 1 control (waveform mode) - AUDC1
    Audc1 = 0x16,
    /// Channel 0 frequency divisor - AUDF0
    Audf0 = 0x17,
    /// Channel 1 frequency divisor - AUDF1
    Audf1 = 0x18,
    /// Channel 0 volume - AUDV0
    Audv0 = 0x19,
    /// Channel 1 volume - AUDV1
    Audv1 = 0x1A,
}

/// Field a register write lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    /// AUDCx
    Control,
    /// AUDFx
    Frequency,
    /// AUDVx
    Volume,
}

impl Register {
    /// All audio registers in address order
    pub const ALL: [Register; 6] = [
        Register::Audc0,
        Register::Audc1,
        Register::Audf0,
        Register::Audf1,
        Register::Audv0,
        Register::Audv1,
    ];

    /// Convert a raw address to a register, `None` for non-audio addresses
    pub fn from_addr(addr: u8) -> Option<Self> {
        match addr {
            0x15 => Some(Register::Audc0),
            0x16 => Some(Register::Audc1),
            0x17 => Some(Register::Audf0),
            0x18 => Some(Register::Audf1),
            0x19 => Some(Register::Audv0),
            0x1A => Some(Register::Audv1),
            _ => None,
        }
    }

    /// Look up a register by its datasheet name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AUDC0" => Some(Register::Audc0),
            "AUDC1" => Some(Register::Audc1),
            "AUDF0" => Some(Register::Audf0),
            "AUDF1" => Some(Register::Audf1),
            "AUDV0" => Some(Register::Audv0),
            "AUDV1" => Some(Register::Audv1),
            _ => None,
        }
    }

    /// Get the register address value
    pub fn addr(&self) -> u8 {
        *self as u8
    }

    /// Channel the register belongs to
    pub fn channel(&self) -> usize {
        match self {
            Register::Audc0 | Register::Audf0 | Register::Audv0 => 0,
            Register::Audc1 | Register::Audf1 | Register::Audv1 => 1,
        }
    }

    /// Channel field the register controls
    pub fn kind(&self) -> RegisterKind {
        match self {
            Register::Audc0 | Register::Audc1 => RegisterKind::Control,
            Register::Audf0 | Register::Audf1 => RegisterKind::Frequency,
            Register::Audv0 | Register::Audv1 => RegisterKind::Volume,
        }
    }

    /// Bits of a written value the register retains
    pub fn mask(&self) -> u8 {
        match self.kind() {
            RegisterKind::Control | RegisterKind::Volume => 0x0F,
            RegisterKind::Frequency => 0x1F,
        }
    }

    /// Datasheet name
    pub fn name(&self) -> &'static str {
        match self {
            Register::Audc0 => "AUDC0",
            Register::Audc1 => "AUDC1",
            Register::Audf0 => "AUDF0",
            Register::Audf1 => "AUDF1",
            Register::Audv0 => "AUDV0",
            Register::Audv1 => "AUDV1",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Audc0 => write!(f, "AUDC0 (Channel 0 Control)"),
            Register::Audc1 => write!(f, "AUDC1 (Channel 1 Control)"),
            Register::Audf0 => write!(f, "AUDF0 (Channel 0 Frequency)"),
            Register::Audf1 => write!(f, "AUDF1 (Channel 1 Frequency)"),
            Register::Audv0 => write!(f, "AUDV0 (Channel 0 Volume)"),
            Register::Audv1 => write!(f, "AUDV1 (Channel 1 Volume)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_conversion() {
        assert_eq!(Register::from_addr(0x15), Some(Register::Audc0));
        assert_eq!(Register::from_addr(0x1A), Some(Register::Audv1));
        assert_eq!(Register::from_addr(0x14), None);
        assert_eq!(Register::from_addr(0x1B), None);
        for reg in Register::ALL {
            assert_eq!(Register::from_addr(reg.addr()), Some(reg));
            assert_eq!(Register::from_name(reg.name()), Some(reg));
        }
    }

    #[test]
    fn test_register_layout() {
        assert_eq!(Register::Audf1.channel(), 1);
        assert_eq!(Register::Audv0.kind(), RegisterKind::Volume);
        assert_eq!(Register::Audf0.mask(), 0x1F);
        assert_eq!(Register::Audc1.mask(), 0x0F);
        assert_eq!(Register::from_name("audv1"), Some(Register::Audv1));
    }
}
