//! Extraction throughput on synthetic frames
//!
//! A frame of realistic size holds a handful of records spread across the data
//! section; the rest is zero filler, which the scanner rejects cheaply.

use byteorder::{LittleEndian, WriteBytesExt};
use codec::{ExtractionConfig, ExtractionEngine, NumericScanner};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn record() -> Vec<u8> {
    let mut record = Vec::new();
    record.write_f32::<LittleEndian>(0.00045).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.write_f64::<LittleEndian>(22_000.0).unwrap();
    record.write_u32::<LittleEndian>(357).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.write_f64::<LittleEndian>(18.0).unwrap();
    record.write_f32::<LittleEndian>(87_000.0).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.extend_from_slice(&[0u8; 16]);
    for text in ["pumpswap", "https://t.me/bonkcoin"] {
        record.push(text.len() as u8);
        record.extend_from_slice(text.as_bytes());
    }
    record
}

/// Header and marker followed by `records` records, one every 1000 bytes
fn synthetic_frame(records: usize) -> Vec<u8> {
    let mut frame = vec![0x00, b'\n'];
    frame.extend_from_slice(b"1.3.0\n");
    frame.extend_from_slice(b"pairs");
    frame.extend_from_slice(&[0u8; 15]);

    let record = record();
    let mut section = vec![0u8; records * 1000 + 500];
    for i in 0..records {
        let at = 64 + i * 1000;
        section[at..at + record.len()].copy_from_slice(&record);
    }

    frame.extend_from_slice(&section);
    frame
}

fn bench_extract_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_frame");
    let engine = ExtractionEngine::new(ExtractionConfig::default()).unwrap();

    for records in [1, 10, 50] {
        let frame = synthetic_frame(records);
        group.bench_with_input(BenchmarkId::from_parameter(records), &frame, |b, frame| {
            b.iter(|| engine.extract_frame_at(black_box(frame), 0))
        });
    }

    group.finish();
}

fn bench_scanner(c: &mut Criterion) {
    let scanner = NumericScanner::default();
    let window = &synthetic_frame(1)[28..528];

    c.bench_function("scan_window_500", |b| {
        b.iter(|| scanner.scan(black_box(window), 28))
    });
}

criterion_group!(benches, bench_extract_frame, bench_scanner);
criterion_main!(benches);
