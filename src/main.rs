//! Command-line front end for the TIA sound emulator.
//!
//! ```text
//! tia-sound render capture.csv -o capture.wav --tail-ms 500
//! tia-sound tone --control 4 --frequency 17 --volume 12 -o tone.wav
//! tia-sound tables
//! ```

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use tia_sound::export::{export_samples_to_wav, export_trace_to_wav, ExportConfig};
use tia_sound::tia::control::AudioControl;
use tia_sound::{PolynomialTables, Register, RegisterTrace, TiaConfig, TiaSound};

#[derive(Parser)]
#[command(name = "tia-sound")]
#[command(about = "Atari 2600 TIA sound emulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ChipArgs {
    /// JSON chip configuration (clock, sample_rate, gain)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output sample rate in Hz (overrides the config)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Volume gain, 16 = unscaled (overrides the config)
    #[arg(long)]
    gain: Option<u32>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write stereo instead of mono
    #[arg(long)]
    stereo: bool,

    /// Keep the raw unipolar output instead of removing DC
    #[arg(long)]
    keep_dc: bool,

    /// Fade out duration in seconds
    #[arg(long, default_value_t = 0.0)]
    fade_out: f32,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a CSV register trace (cycle,register,value) into a WAV file
    Render {
        /// Trace file
        trace: PathBuf,

        /// Milliseconds rendered after the last write
        #[arg(long, default_value_t = 500)]
        tail_ms: u64,

        #[command(flatten)]
        chip: ChipArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Render a single channel setting
    Tone {
        /// AUDC value (0-15)
        #[arg(long, default_value_t = 4)]
        control: u8,

        /// AUDF value (0-31)
        #[arg(long, default_value_t = 0x1F)]
        frequency: u8,

        /// AUDV value (0-15)
        #[arg(long, default_value_t = 0x0F)]
        volume: u8,

        /// Duration in seconds
        #[arg(long, default_value_t = 2.0)]
        seconds: f32,

        /// Play on the default audio device (needs the `streaming` feature)
        #[arg(long)]
        play: bool,

        #[command(flatten)]
        chip: ChipArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the polynomial tables
    Tables,
}

fn load_config(args: &ChipArgs) -> anyhow::Result<TiaConfig> {
    let mut config = match &args.config {
        Some(path) => TiaConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TiaConfig::default(),
    };
    if let Some(rate) = args.sample_rate {
        config = config.with_sample_rate(rate);
    }
    if let Some(gain) = args.gain {
        config = config.with_gain(gain);
    }
    config.validate()?;
    Ok(config)
}

fn export_config(args: &OutputArgs) -> ExportConfig {
    let config = if args.stereo {
        ExportConfig::stereo()
    } else {
        ExportConfig::default()
    };
    config.remove_dc(!args.keep_dc).fade_out(args.fade_out)
}

fn output_path(args: &OutputArgs, fallback: &Path) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| fallback.with_extension("wav"))
}

fn render(trace_path: &Path, tail_ms: u64, chip: &ChipArgs, output: &OutputArgs) -> anyhow::Result<()> {
    let config = load_config(chip)?;
    let trace = RegisterTrace::from_path(trace_path)
        .with_context(|| format!("reading trace {}", trace_path.display()))?;
    if trace.is_empty() {
        bail!("trace {} has no register writes", trace_path.display());
    }

    let tail_clocks = (config.clock as u64).saturating_mul(tail_ms) / 1000;
    let path = output_path(output, trace_path);
    let frames = export_trace_to_wav(&trace, config, &path, export_config(output).tail(tail_clocks))?;
    println!("Wrote {frames} samples to {}", path.display());
    Ok(())
}

fn tone_chip(config: TiaConfig, control: u8, frequency: u8, volume: u8) -> anyhow::Result<TiaSound> {
    let mut chip = TiaSound::new(config)?;
    chip.write_register(Register::Audc0.addr(), control);
    chip.write_register(Register::Audf0.addr(), frequency);
    chip.write_register(Register::Audv0.addr(), volume);
    Ok(chip)
}

fn describe_tone(config: &TiaConfig, control: u8, frequency: u8) {
    let control = AudioControl::from_register(control);
    println!("Channel 0: {control}, AUDF={}", frequency & 0x1F);
    if !control.is_set_to_one() {
        let divide = (frequency as u32 & 0x1F) + 1;
        let divide = if control.is_div3() { divide * 3 } else { divide };
        println!(
            "  divide-by-N clock: {:.1} Hz",
            config.clock as f32 / divide as f32
        );
    }
}

fn tone(
    control: u8,
    frequency: u8,
    volume: u8,
    seconds: f32,
    play: bool,
    chip_args: &ChipArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let config = load_config(chip_args)?;
    describe_tone(&config, control, frequency);
    let count = (seconds.max(0.0) * config.sample_rate as f32) as usize;
    let mut chip = tone_chip(config, control, frequency, volume)?;

    if play {
        return play_tone(&mut chip, count);
    }

    let path = output
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("tone.wav"));
    let samples = chip.render(count);
    let frames = export_samples_to_wav(samples, config.sample_rate, &path, &export_config(output))?;
    println!("Wrote {frames} samples to {}", path.display());
    Ok(())
}

#[cfg(feature = "streaming")]
fn play_tone(chip: &mut TiaSound, count: usize) -> anyhow::Result<()> {
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tia_sound::streaming::BUFFER_BACKOFF_MICROS;
    use tia_sound::{AudioDevice, RingBuffer, StreamConfig};

    let stream = StreamConfig::default();
    let sample_rate = chip.config().sample_rate;
    let buffer = Arc::new(Mutex::new(RingBuffer::new(stream.ring_buffer_size)?));
    let device = AudioDevice::new(sample_rate, 1, Arc::clone(&buffer))?;

    println!("Playing {:.1}s...", count as f32 / sample_rate as f32);
    let mut block = [0i16; 512];
    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(block.len());
        chip.process(&mut block[..n]);
        let mut pending = &block[..n];
        while !pending.is_empty() {
            let written = buffer.lock().write(pending);
            pending = &pending[written..];
            if written == 0 {
                std::thread::sleep(Duration::from_micros(BUFFER_BACKOFF_MICROS));
            }
        }
        remaining -= n;
    }

    while buffer.lock().available_read() > 0 {
        std::thread::sleep(Duration::from_millis(10));
    }
    device.finish();
    println!("Playback complete");
    Ok(())
}

#[cfg(not(feature = "streaming"))]
fn play_tone(_chip: &mut TiaSound, _count: usize) -> anyhow::Result<()> {
    bail!("playback requires the \"streaming\" feature; rebuild with `--features streaming`")
}

fn print_table(name: &str, table: &[u8]) {
    println!("{name} ({} entries):", table.len());
    for row in table.chunks(64) {
        let line: String = row.iter().map(|&b| if b != 0 { '1' } else { '0' }).collect();
        println!("  {line}");
    }
}

fn tables() {
    let tables = PolynomialTables::shared();
    print_table("Bit4", tables.bit4());
    print_table("Bit5", tables.bit5());
    print_table("Bit9", tables.bit9());
    print_table("Div31", tables.div31());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            trace,
            tail_ms,
            chip,
            output,
        } => render(&trace, tail_ms, &chip, &output),
        Command::Tone {
            control,
            frequency,
            volume,
            seconds,
            play,
            chip,
            output,
        } => tone(control, frequency, volume, seconds, play, &chip, &output),
        Command::Tables => {
            tables();
            Ok(())
        }
    }
}
