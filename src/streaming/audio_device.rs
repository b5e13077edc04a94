//! Audio device integration using rodio
//!
//! Plays samples from the shared ring buffer on the system audio device.

use super::RingBuffer;
use crate::{Result, TiaError};
use parking_lot::Mutex;
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Samples pulled from the ring buffer per lock
const BATCH_SIZE: usize = 1024;

/// Audio source that reads from the ring buffer
struct RingBufferSource {
    ring_buffer: Arc<Mutex<RingBuffer>>,
    sample_rate: u32,
    channels: u16,
    finished: Arc<AtomicBool>,
    /// Internal buffer for batch reading (reduces lock contention)
    buffer: Vec<i16>,
    buffer_pos: usize,
}

impl RingBufferSource {
    fn new(
        ring_buffer: Arc<Mutex<RingBuffer>>,
        sample_rate: u32,
        channels: u16,
        finished: Arc<AtomicBool>,
    ) -> Self {
        Self {
            ring_buffer,
            sample_rate,
            channels,
            finished,
            buffer: vec![0; BATCH_SIZE],
            buffer_pos: BATCH_SIZE,
        }
    }
}

impl Source for RingBufferSource {
    fn current_frame_len(&self) -> Option<usize> {
        let available = self.ring_buffer.lock().available_read();
        Some(if available > 0 { available } else { BATCH_SIZE })
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for RingBufferSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }

        if self.buffer_pos >= self.buffer.len() {
            let read = self.ring_buffer.lock().read(&mut self.buffer);
            // Underrun: play silence to keep the stream alive
            self.buffer[read..].fill(0);
            self.buffer_pos = 0;
        }

        let sample = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Some(sample)
    }
}

/// Audio playback device using rodio
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    running: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl AudioDevice {
    /// Create a new audio device and start playback
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `channels` - Number of audio channels (1 for mono, 2 for stereo)
    /// * `ring_buffer` - Ring buffer the producer writes samples into
    pub fn new(
        sample_rate: u32,
        channels: u16,
        ring_buffer: Arc<Mutex<RingBuffer>>,
    ) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            TiaError::AudioDeviceError(format!("Failed to create audio stream: {e}"))
        })?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| TiaError::AudioDeviceError(format!("Failed to create audio sink: {e}")))?;

        let finished = Arc::new(AtomicBool::new(false));
        let source =
            RingBufferSource::new(ring_buffer, sample_rate, channels, Arc::clone(&finished));
        sink.append(source);

        Ok(Self {
            _stream: stream,
            sink,
            running: Arc::new(AtomicBool::new(true)),
            finished,
        })
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// Check if audio device is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Signal that no more samples will be produced
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.pause();
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(len: usize) -> Arc<Mutex<RingBuffer>> {
        Arc::new(Mutex::new(RingBuffer::new(len).unwrap()))
    }

    #[test]
    fn test_source_reports_format() {
        let source = RingBufferSource::new(ring(4096), 31_400, 1, Arc::new(AtomicBool::new(false)));
        assert_eq!(source.sample_rate(), 31_400);
        assert_eq!(source.channels(), 1);
        assert!(source.current_frame_len().is_some());
    }

    #[test]
    fn test_source_silence_on_underrun() {
        let mut source =
            RingBufferSource::new(ring(4096), 31_400, 1, Arc::new(AtomicBool::new(false)));
        assert_eq!(source.next(), Some(0));
    }

    #[test]
    fn test_source_reads_buffered_samples() {
        let buffer = ring(4096);
        buffer.lock().write(&[5, 6, 7]);
        let mut source =
            RingBufferSource::new(Arc::clone(&buffer), 31_400, 1, Arc::new(AtomicBool::new(false)));
        assert_eq!(source.next(), Some(5));
        assert_eq!(source.next(), Some(6));
        assert_eq!(source.next(), Some(7));
        assert_eq!(source.next(), Some(0));
    }

    #[test]
    fn test_source_stops_when_finished() {
        let finished = Arc::new(AtomicBool::new(false));
        let mut source = RingBufferSource::new(ring(4096), 31_400, 1, Arc::clone(&finished));
        assert!(source.next().is_some());
        finished.store(true, Ordering::Relaxed);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_audio_device_creation() {
        match AudioDevice::new(31_400, 1, ring(4096)) {
            Ok(device) => assert!(device.is_running()),
            Err(err) => eprintln!("Skipping audio device test (backend unavailable): {err}"),
        }
    }
}
