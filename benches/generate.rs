//! Benchmarks for hydrosim sample generation

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hydrosim::{GenerationRequest, Series, SignalGenerator};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let generator = SignalGenerator::new();

    for days in [7u32, 365] {
        let request = GenerationRequest::new(f64::from(days));
        group.throughput(Throughput::Elements(u64::from(days) * 24));
        group.bench_function(format!("generate_{}_days", days), |b| {
            b.iter(|| {
                let samples = generator.run(black_box(request)).unwrap();
                black_box(samples);
            })
        });
    }

    group.finish();
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");

    let series = Series::generate(&SignalGenerator::new(), GenerationRequest::new(365.0)).unwrap();
    group.throughput(Throughput::Elements(series.len() as u64));

    group.bench_function("serialize_year", |b| {
        b.iter(|| {
            for record in series.records() {
                black_box(record.to_json().unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_records);
criterion_main!(benches);
