
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use myo_monitor::acquisition::ring_buffer::{BoundedBuffer, Sample};
use myo_monitor::acquisition::sample_store::{PushCounts, SampleBatch, SampleStore};
use myo_monitor::hal::types::{Quaternion, Vector3};
use myo_monitor::monitor::{write_csv, SessionHistory};

const BUFFER_SIZES: &[usize] = &[8, 64, 512];

fn benchmark_bounded_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_buffer");

    for &size in BUFFER_SIZES {
        group.throughput(Throughput::Elements(1000));

        group.bench_with_input(BenchmarkId::new("push", size), &size, |b, &size| {
            let mut buffer = BoundedBuffer::new(size).unwrap();
            b.iter(|| {
                for ts in 0..1000u64 {
                    buffer.push(black_box(Sample::new(ts, [1i8; 8])));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("snapshot", size), &size, |b, &size| {
            let mut buffer = BoundedBuffer::new(size).unwrap();
            for ts in 0..size as u64 {
                buffer.push(Sample::new(ts, [1i8; 8]));
            }
            b.iter(|| black_box(buffer.snapshot()));
        });
    }

    group.finish();
}

fn benchmark_sample_store(c: &mut Criterion) {
    let store = SampleStore::with_default_capacity().unwrap();

    c.bench_function("store_push_emg", |b| {
        let mut ts = 0u64;
        b.iter(|| {
            ts += 1;
            store.push_emg(black_box(ts), [3; 8]);
        });
    });

    c.bench_function("store_push_motion", |b| {
        let mut ts = 0u64;
        b.iter(|| {
            ts += 1;
            store.push_motion(
                black_box(ts),
                Quaternion::IDENTITY,
                Vector3::new(0.1, 0.2, 0.3),
                Vector3::new(0.0, 0.0, 1.0),
            );
        });
    });

    c.bench_function("store_motion_samples", |b| {
        b.iter(|| black_box(store.motion_samples()));
    });
}

fn benchmark_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");

    group.bench_function("append_overlapping_window", |b| {
        let mut history = SessionHistory::new();
        let mut ts = 0u64;
        b.iter(|| {
            // Window of 8 sliding by 4 each poll
            let batch = SampleBatch {
                emg: (ts..ts + 8).map(|t| Sample::new(t, [t as i8; 8])).collect(),
                pushed: PushCounts { emg: ts + 8, ..Default::default() },
                ..Default::default()
            };
            ts += 4;
            black_box(history.append(&batch));
        });
    });

    let mut history = SessionHistory::new();
    history.append(&SampleBatch::from_samples(
        (0..10_000u64).map(|t| Sample::new(t, [t as i8; 8])).collect(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
    ));
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("write_csv_10k", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(512 * 1024);
            black_box(write_csv(&history, &mut out).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_bounded_buffer, benchmark_sample_store, benchmark_history);
criterion_main!(benches);
