//! 排數分配與完整計算的效能測試

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eps_calc::{Compositions, EpsCalculator, ProductionPartitioner};
use eps_core::{AuxiliaryPart, ProductSpec};

fn partition_benchmark(c: &mut Criterion) {
    // 48 排 × 4 元件 = 20825 個組合
    let yields = [6_u64, 90, 90, 180];
    let required = [5_000_u64, 5_000, 5_000, 10_000];

    c.bench_function("search_48_rows_4_components", |b| {
        b.iter(|| {
            let outcome = ProductionPartitioner::search(
                Compositions::new(black_box(48), 4),
                black_box(&yields),
                black_box(&required),
            );
            black_box(outcome)
        })
    });
}

fn calculate_benchmark(c: &mut Criterion) {
    let calculator = EpsCalculator::default();
    let spec = ProductSpec::new(30.0, 30.0, 30.0, 1.0)
        .with_auxiliary_part(AuxiliaryPart::new("Ust Kapak", 1, 2.0))
        .with_auxiliary_part(AuxiliaryPart::new("Alt Kapak", 1, 2.0))
        .with_requested_quantity(500);

    c.bench_function("calculate_capped_cube_order", |b| {
        b.iter(|| black_box(calculator.calculate(black_box(&spec))))
    });
}

criterion_group!(benches, partition_benchmark, calculate_benchmark);
criterion_main!(benches);
