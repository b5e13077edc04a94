//! Polynomial counter tables
//!
//! The TIA derives its noise and buzz waveforms from short shift-register
//! sequences. Instead of clocking real shift registers every tick, the
//! sequences are precomputed once and read back by position.

use std::sync::OnceLock;

/// Length of the 4-bit polynomial sequence
pub const POLY4_SIZE: usize = (1 << 4) - 1;
/// Length of the 5-bit polynomial sequence (also the divide-by-31 cycle)
pub const POLY5_SIZE: usize = (1 << 5) - 1;
/// Length of the 9-bit polynomial sequence
pub const POLY9_SIZE: usize = (1 << 9) - 1;

/// Divide-by-31 duty pattern: two edges per cycle, 18 steps then 13 steps apart
pub const DIV31: [u8; POLY5_SIZE] = [
    0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, //
    0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

static SHARED: OnceLock<PolynomialTables> = OnceLock::new();

/// Generate a polynomial bit sequence of `2^size - 1` entries
///
/// Starting from zero, each step emits bit 0 of the accumulator and then
/// feeds it back as `((x << left_shift) + (x >> right_shift) + add) & mask`.
pub fn generate(size: u32, left_shift: u32, right_shift: u32, add: u32) -> Vec<u8> {
    let mask = (1u32 << size) - 1;
    let mut x = 0u32;

    (0..mask)
        .map(|_| {
            let bit = (x & 1) as u8;
            x = ((x << left_shift) + (x >> right_shift) + add) & mask;
            bit
        })
        .collect()
}

/// Precomputed poly4/poly5/poly9 sequences plus the divide-by-31 pattern
#[derive(Clone, PartialEq, Eq)]
pub struct PolynomialTables {
    bit4: [u8; POLY4_SIZE],
    bit5: [u8; POLY5_SIZE],
    bit9: [u8; POLY9_SIZE],
}

impl PolynomialTables {
    /// Build all tables from their recurrences
    pub fn new() -> Self {
        let mut tables = Self {
            bit4: [0; POLY4_SIZE],
            bit5: [0; POLY5_SIZE],
            bit9: [0; POLY9_SIZE],
        };
        tables.bit4.copy_from_slice(&generate(4, 3, 1, 0x04));
        tables.bit5.copy_from_slice(&generate(5, 3, 2, 0x08));
        tables.bit9.copy_from_slice(&generate(9, 2, 7, 0x80));
        tables
    }

    /// Process-wide instance, built on first use
    pub fn shared() -> &'static PolynomialTables {
        SHARED.get_or_init(PolynomialTables::new)
    }

    /// 4-bit sequence (15 entries)
    #[inline]
    pub fn bit4(&self) -> &[u8; POLY4_SIZE] {
        &self.bit4
    }

    /// 5-bit sequence (31 entries)
    #[inline]
    pub fn bit5(&self) -> &[u8; POLY5_SIZE] {
        &self.bit5
    }

    /// 9-bit sequence (511 entries)
    #[inline]
    pub fn bit9(&self) -> &[u8; POLY9_SIZE] {
        &self.bit9
    }

    /// Divide-by-31 duty pattern (31 entries)
    #[inline]
    pub fn div31(&self) -> &[u8; POLY5_SIZE] {
        &DIV31
    }
}

impl Default for PolynomialTables {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PolynomialTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolynomialTables")
            .field("bit4", &self.bit4.len())
            .field("bit5", &self.bit5.len())
            .field("bit9", &self.bit9.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        let tables = PolynomialTables::new();
        assert_eq!(tables.bit4().len(), 15);
        assert_eq!(tables.bit5().len(), 31);
        assert_eq!(tables.bit9().len(), 511);
        assert_eq!(tables.div31().len(), 31);
    }

    #[test]
    fn test_entries_are_bits() {
        let tables = PolynomialTables::new();
        let all = tables
            .bit4()
            .iter()
            .chain(tables.bit5().iter())
            .chain(tables.bit9().iter())
            .chain(tables.div31().iter());
        for &bit in all {
            assert!(bit <= 1, "table entry {bit} is not a single bit");
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate(4, 3, 1, 0x04), generate(4, 3, 1, 0x04));
        assert_eq!(generate(5, 3, 2, 0x08), generate(5, 3, 2, 0x08));
        assert_eq!(generate(9, 2, 7, 0x80), generate(9, 2, 7, 0x80));
        assert_eq!(PolynomialTables::new(), *PolynomialTables::shared());
    }

    #[test]
    fn test_bit4_prefix() {
        // x: 0 -> 4 -> 6 -> 7 -> 15 -> 3
        let bit4 = generate(4, 3, 1, 0x04);
        assert_eq!(&bit4[..6], &[0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_sequences_are_not_constant() {
        let tables = PolynomialTables::new();
        for table in [&tables.bit4()[..], &tables.bit5()[..], &tables.bit9()[..]] {
            assert!(table.contains(&0));
            assert!(table.contains(&1));
        }
    }

    #[test]
    fn test_div31_duty_split() {
        let edges: Vec<usize> = DIV31
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == 1)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(edges, vec![1, 19]);
        assert_eq!(edges[1] - edges[0], 18);
        assert_eq!(POLY5_SIZE - (edges[1] - edges[0]), 13);
    }
}
