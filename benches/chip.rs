use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tia_sound::{Register, Tia, TiaBank, TiaConfig, TiaSound};

fn program(chip: &mut TiaSound, control: u8, frequency: u8, volume: u8) {
    chip.write_register(Register::Audc0.addr(), control);
    chip.write_register(Register::Audf0.addr(), frequency);
    chip.write_register(Register::Audv0.addr(), volume);
    chip.write_register(Register::Audc1.addr(), 0x08);
    chip.write_register(Register::Audf1.addr(), 0x1F);
    chip.write_register(Register::Audv1.addr(), volume);
}

fn bench_native_rate(c: &mut Criterion) {
    let mut chip = TiaSound::new(TiaConfig::ntsc()).unwrap();
    program(&mut chip, 0x04, 0x11, 0x0F);
    let mut buffer = vec![0i16; 1024];

    c.bench_function("process_1024_native", |b| {
        b.iter(|| {
            chip.process(&mut buffer);
            black_box(&buffer);
        });
    });
}

fn bench_decimated(c: &mut Criterion) {
    let mut chip = TiaSound::new(TiaConfig::ntsc().with_sample_rate(22_050)).unwrap();
    program(&mut chip, 0x07, 0x05, 0x0F);
    let mut buffer = vec![0i16; 1024];

    c.bench_function("process_1024_22khz", |b| {
        b.iter(|| {
            chip.process(&mut buffer);
            black_box(&buffer);
        });
    });
}

fn bench_poly_modes(c: &mut Criterion) {
    let mut chip = TiaSound::new(TiaConfig::ntsc()).unwrap();
    let mut buffer = vec![0i16; 256];

    c.bench_function("all_control_modes", |b| {
        b.iter(|| {
            for control in 0u8..16 {
                program(&mut chip, control, 0x03, 0x0F);
                chip.process(&mut buffer);
            }
            black_box(&buffer);
        });
    });
}

fn bench_register_updates(c: &mut Criterion) {
    let mut chip = TiaSound::new(TiaConfig::ntsc()).unwrap();

    c.bench_function("register_writes", |b| {
        b.iter(|| {
            for value in 0u8..32 {
                chip.write_register(black_box(Register::Audf0.addr()), value);
                chip.write_register(black_box(Register::Audv0.addr()), value);
            }
        });
    });
}

fn bench_video_frame(c: &mut Criterion) {
    // One NTSC frame is 262 lines of 76 CPU cycles; audio clocks twice per line
    let mut tia = Tia::new(TiaConfig::ntsc().with_sample_rate(44_100)).unwrap();
    let mut out = vec![0i16; 2048];

    c.bench_function("frame_with_line_writes", |b| {
        b.iter(|| {
            for line in 0u8..=255 {
                tia.write_register(Register::Audf0.addr(), line & 0x1F);
                tia.advance(2);
            }
            tia.advance(12);
            black_box(tia.read_samples(&mut out));
        });
    });
}

fn bench_bank(c: &mut Criterion) {
    let mut bank: TiaBank = TiaBank::new(2, TiaConfig::ntsc()).unwrap();
    for chip in 0..2 {
        bank.write_register(chip, Register::Audc0.addr(), 0x04);
        bank.write_register(chip, Register::Audf0.addr(), 0x10 + chip as u8);
        bank.write_register(chip, Register::Audv0.addr(), 0x0F);
    }
    let mut buffer = vec![0i16; 2048];

    c.bench_function("bank_two_chips_interleaved", |b| {
        b.iter(|| {
            bank.generate_samples_interleaved(&mut buffer);
            black_box(&buffer);
        });
    });
}

criterion_group!(
    benches,
    bench_native_rate,
    bench_decimated,
    bench_poly_modes,
    bench_register_updates,
    bench_video_frame,
    bench_bank
);
criterion_main!(benches);
