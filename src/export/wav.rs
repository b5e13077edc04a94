//! WAV file export functionality

use super::{apply_fade_out, remove_dc_offset, ChannelLayout, ExportConfig};
use crate::config::TiaConfig;
use crate::tia::Tia;
use crate::trace::{RegisterTrace, MAX_TRACE_CYCLES};
use crate::{Result, TiaError};
use std::path::Path;

/// Replay a register trace and write the result to a WAV file
///
/// # Arguments
///
/// * `trace` - Register writes to replay
/// * `chip` - Chip configuration (clock, output rate, gain)
/// * `output_path` - Path where the WAV file will be written
/// * `config` - Export configuration
///
/// # Errors
///
/// Returns [`TiaError::TraceError`] if the tail is longer than
/// [`MAX_TRACE_CYCLES`], and IO/WAV errors from writing the file.
pub fn export_trace_to_wav<P: AsRef<Path>>(
    trace: &RegisterTrace,
    chip: TiaConfig,
    output_path: P,
    config: ExportConfig,
) -> Result<usize> {
    if config.tail_clocks > MAX_TRACE_CYCLES {
        return Err(TiaError::TraceError(format!(
            "tail of {} clocks is past the {MAX_TRACE_CYCLES} cycle limit",
            config.tail_clocks
        )));
    }
    let mut tia = Tia::new(chip)?;

    log::info!(
        "Rendering {} register writes ({:.1}s)",
        trace.len(),
        (trace.last_cycle() + config.tail_clocks) as f32 / chip.clock as f32
    );
    let samples = trace.replay(&mut tia, config.tail_clocks);

    export_samples_to_wav(samples, chip.sample_rate, output_path, &config)
}

/// Post-process rendered samples and write them to a WAV file
///
/// Returns the number of sample frames written.
pub fn export_samples_to_wav<P: AsRef<Path>>(
    mut samples: Vec<i16>,
    sample_rate: u32,
    output_path: P,
    config: &ExportConfig,
) -> Result<usize> {
    if config.remove_dc {
        remove_dc_offset(&mut samples);
    }

    if config.fade_out_duration > 0.0 {
        log::info!("Applying {:.1}s fade out", config.fade_out_duration);
        apply_fade_out(&mut samples, config.fade_out_duration, sample_rate);
    }

    let frames = samples.len();
    let final_samples = match config.channels {
        ChannelLayout::Stereo => mono_to_stereo(&samples),
        ChannelLayout::Mono => samples,
    };

    log::info!("Writing WAV file to {}", output_path.as_ref().display());
    write_wav_file(
        output_path.as_ref(),
        &final_samples,
        sample_rate,
        config.channels,
    )?;

    Ok(frames)
}

/// Convert mono samples to stereo (duplicate each sample)
fn mono_to_stereo(mono: &[i16]) -> Vec<i16> {
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for &sample in mono {
        stereo.push(sample);
        stereo.push(sample);
    }
    stereo
}

/// Write 16-bit PCM samples to a WAV file
///
/// `samples` are interleaved for [`ChannelLayout::Stereo`].
pub fn write_wav_file(
    path: &Path,
    samples: &[i16],
    sample_rate: u32,
    channels: ChannelLayout,
) -> Result<()> {
    let spec = hound::WavSpec {
        channels: channels.count(),
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_to_stereo() {
        let stereo = mono_to_stereo(&[1, 2, 3]);
        assert_eq!(stereo, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<i16> = (0..100).map(|i| if i % 2 == 0 { 1024 } else { 0 }).collect();

        let config = ExportConfig::stereo().remove_dc(false);
        let frames = export_samples_to_wav(samples.clone(), 31_400, &path, &config).unwrap();
        assert_eq!(frames, 100);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 31_400);
        assert_eq!(spec.bits_per_sample, 16);

        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read.len(), 200);
        assert_eq!(&read[..4], &[1024, 1024, 0, 0]);
    }

    #[test]
    fn test_export_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.wav");
        let trace = RegisterTrace::from_reader("cycle,register,value\n0,AUDV0,15\n".as_bytes())
            .unwrap();

        let frames = export_trace_to_wav(
            &trace,
            TiaConfig::ntsc(),
            &path,
            ExportConfig::default().tail(314),
        )
        .unwrap();
        assert_eq!(frames, 314);
        assert_eq!(hound::WavReader::open(&path).unwrap().len(), 314);
    }

    #[test]
    fn test_export_trace_rejects_oversized_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tail.wav");
        let trace = RegisterTrace::from_reader("cycle,register,value\n0,AUDV0,15\n".as_bytes())
            .unwrap();

        let result = export_trace_to_wav(
            &trace,
            TiaConfig::ntsc(),
            &path,
            ExportConfig::default().tail(MAX_TRACE_CYCLES + 1),
        );
        assert!(matches!(result, Err(TiaError::TraceError(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_mono_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav_file(&path, &[0, 1, 2], 31_400, ChannelLayout::Mono).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, ChannelLayout::Mono.count());
        assert_eq!(reader.len(), 3);
    }
}
