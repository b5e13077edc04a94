//! Real-time streaming of TIA output
//!
//! A producer thread renders chip samples into a [`RingBuffer`]; the
//! [`AudioDevice`] pulls them from the audio callback. The chip itself is never
//! shared across threads, only the buffer is.

mod audio_device;

pub use audio_device::AudioDevice;

use crate::{Result, TiaError};

/// Producer back-off when the ring buffer is full
pub const BUFFER_BACKOFF_MICROS: u64 = 500;

/// Stream configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Output channels (the chip is mono; 2 duplicates it)
    pub channels: u16,
    /// Ring buffer size in samples
    pub ring_buffer_size: usize,
}

impl StreamConfig {
    /// Small buffer, ~65 ms at the native NTSC rate
    pub fn low_latency(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            ring_buffer_size: 2048,
        }
    }

    /// Large buffer that tolerates scheduling hiccups
    pub fn stable(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            ring_buffer_size: 16384,
        }
    }

    /// Replace the ring buffer size
    pub fn with_size(mut self, ring_buffer_size: usize) -> Self {
        self.ring_buffer_size = ring_buffer_size;
        self
    }

    /// Buffer latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        self.ring_buffer_size as f32 * 1000.0 / self.sample_rate as f32
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::low_latency(crate::config::NTSC_AUDIO_CLOCK).with_size(8192)
    }
}

/// Fixed-size ring buffer of PCM samples
///
/// Capacity is rounded up to a power of two; one slot stays free to tell a
/// full buffer from an empty one.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<i16>,
    write_pos: usize,
    read_pos: usize,
    mask: usize,
}

impl RingBuffer {
    /// Create a ring buffer holding at least `requested_capacity - 1` samples
    ///
    /// # Errors
    ///
    /// Returns an error if the requested capacity is 0.
    pub fn new(requested_capacity: usize) -> Result<Self> {
        if requested_capacity == 0 {
            return Err(TiaError::ConfigError(
                "Ring buffer capacity must be greater than 0".into(),
            ));
        }
        let capacity = requested_capacity.next_power_of_two().max(2);

        Ok(Self {
            buffer: vec![0; capacity],
            write_pos: 0,
            read_pos: 0,
            mask: capacity - 1,
        })
    }

    /// Total slots (one is always kept free)
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Samples available to read
    pub fn available_read(&self) -> usize {
        self.write_pos.wrapping_sub(self.read_pos) & self.mask
    }

    /// Samples that can be written without overwriting unread data
    pub fn available_write(&self) -> usize {
        self.capacity() - 1 - self.available_read()
    }

    /// Buffer fill level (0.0 to 1.0)
    pub fn fill_percentage(&self) -> f32 {
        self.available_read() as f32 / (self.capacity() - 1) as f32
    }

    /// Write as many samples as fit; returns the count written
    pub fn write(&mut self, samples: &[i16]) -> usize {
        let to_write = samples.len().min(self.available_write());
        for &sample in &samples[..to_write] {
            self.buffer[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) & self.mask;
        }
        to_write
    }

    /// Read up to `dest.len()` samples; returns the count read
    pub fn read(&mut self, dest: &mut [i16]) -> usize {
        let to_read = dest.len().min(self.available_read());
        for slot in &mut dest[..to_read] {
            *slot = self.buffer[self.read_pos];
            self.read_pos = (self.read_pos + 1) & self.mask;
        }
        to_read
    }

    /// Drop all unread samples
    pub fn flush(&mut self) {
        self.read_pos = self.write_pos;
    }
}
