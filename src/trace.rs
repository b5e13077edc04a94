//! Register write traces
//!
//! A trace is a CSV log of timestamped register writes, as captured from an
//! emulator or a logic analyser:
//!
//! ```text
//! cycle,register,value
//! 0,0x15,0x04
//! 0,AUDV0,15
//! 15700,0x17,0x1F
//! ```
//!
//! `cycle` counts TIA audio clocks. `register` accepts an address (decimal or
//! `0x` hex) or a datasheet name; `value` accepts decimal or hex. Replaying a
//! trace through [`Tia`] renders each write on the sample boundary it was
//! captured at.

use crate::config::NTSC_AUDIO_CLOCK;
use crate::tia::registers::Register;
use crate::tia::Tia;
use crate::{Result, TiaError};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

/// Latest cycle a trace may reach: one hour of NTSC audio clocks
pub const MAX_TRACE_CYCLES: u64 = 3600 * NTSC_AUDIO_CLOCK as u64;

/// One timestamped register write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TraceEvent {
    /// Chip clock at which the write happens
    pub cycle: u64,
    /// Register address
    #[serde(deserialize_with = "deserialize_register")]
    pub register: u8,
    /// Written value
    #[serde(deserialize_with = "deserialize_byte")]
    pub value: u8,
}

/// Ordered sequence of register writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterTrace {
    events: Vec<TraceEvent>,
}

fn parse_byte(text: &str) -> Option<u8> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn deserialize_byte<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u8, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_byte(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid byte value '{text}'")))
}

fn deserialize_register<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u8, D::Error> {
    let text = String::deserialize(deserializer)?;
    Register::from_name(text.trim())
        .map(|r| r.addr())
        .or_else(|| parse_byte(&text))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid register '{text}'")))
}

impl RegisterTrace {
    /// Build a trace from events, which must be in non-decreasing cycle order
    ///
    /// # Errors
    ///
    /// Returns [`TiaError::TraceError`] for out-of-order events or a cycle
    /// beyond [`MAX_TRACE_CYCLES`].
    pub fn from_events(events: Vec<TraceEvent>) -> Result<Self> {
        if let Some(event) = events.iter().find(|e| e.cycle > MAX_TRACE_CYCLES) {
            return Err(TiaError::TraceError(format!(
                "write at cycle {} is past the {MAX_TRACE_CYCLES} cycle limit",
                event.cycle
            )));
        }
        if let Some(pair) = events.windows(2).find(|w| w[1].cycle < w[0].cycle) {
            return Err(TiaError::TraceError(format!(
                "write at cycle {} follows write at cycle {}",
                pair[1].cycle, pair[0].cycle
            )));
        }
        Ok(Self { events })
    }

    /// Parse a CSV trace with a `cycle,register,value` header
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);
        let events = csv
            .deserialize()
            .collect::<std::result::Result<Vec<TraceEvent>, _>>()?;
        Self::from_events(events)
    }

    /// Load a CSV trace file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Recorded events
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the trace has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Cycle of the last write (0 for an empty trace)
    pub fn last_cycle(&self) -> u64 {
        self.events.last().map_or(0, |e| e.cycle)
    }

    /// Replay every write through `tia`, then run `tail_clocks` more clocks
    ///
    /// Emulated time is measured from the chip's current position, so the
    /// chip is normally fresh or reset. Returns all samples rendered.
    pub fn replay(&self, tia: &mut Tia, tail_clocks: u64) -> Vec<i16> {
        let mut now = 0u64;
        for event in &self.events {
            tia.advance(event.cycle - now);
            now = event.cycle;
            tia.write_register(event.register, event.value);
        }
        tia.advance(tail_clocks);
        log::debug!(
            "Replayed {} register writes over {} clocks",
            self.events.len(),
            now + tail_clocks
        );
        tia.take_samples()
    }
}
