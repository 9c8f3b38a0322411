// ============================================================================
// Matching Engine Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Passive adds - orders resting without a match
// 2. Crossing adds - end-to-end matching against resting liquidity
// 3. Book maintenance - cancel and in-place modify
// 4. Market data - snapshot over a deep book
// ============================================================================

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use matchbook::prelude::*;

fn px(raw: i64) -> Price {
    Price::from_raw(raw)
}

// ============================================================================
// Passive Adds
// ============================================================================

fn benchmark_add_no_match(c: &mut Criterion) {
    c.bench_function("add_no_match", |b| {
        let mut book = OrderBook::new();
        let mut id: OrderId = 0;

        b.iter(|| {
            id += 1;
            // Empty bid side: the sell always rests
            black_box(book.add_order(Order::limit(id, px(50_000), 1, Side::Sell)));
        });
    });
}

fn benchmark_add_no_cross_deep_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_below_deep_opposite_side");

    for num_levels in [10i64, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_levels),
            &num_levels,
            |b, &num_levels| {
                let mut book = OrderBook::new();
                for i in 0..num_levels {
                    book.add_order(Order::limit(
                        i as OrderId + 1,
                        px(60_000 + i * 10),
                        1_000,
                        Side::Sell,
                    ));
                }

                let mut id: OrderId = 1_000_000;
                b.iter(|| {
                    id += 1;
                    // Below every ask: rests without touching a level
                    black_box(book.add_order(Order::limit(id, px(50_000), 1, Side::Buy)));
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Crossing Adds
// ============================================================================

fn benchmark_crossing_add(c: &mut Criterion) {
    c.bench_function("crossing_ioc_add", |b| {
        let mut book = OrderBook::new();
        // One effectively inexhaustible resting sell
        book.add_order(Order::limit(1, px(50_000), i64::MAX / 2, Side::Sell));

        let mut id: OrderId = 1;
        b.iter(|| {
            id += 1;
            let order = Order::limit(id, px(50_000), 1, Side::Buy)
                .with_time_in_force(TimeInForce::ImmediateOrCancel);
            black_box(book.add_order(order));
        });
    });
}

fn benchmark_multi_level_sweep(c: &mut Criterion) {
    c.bench_function("sweep_five_levels", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::new();
                for i in 0..5i64 {
                    book.add_order(Order::limit(
                        i as OrderId + 1,
                        px(50_000 + i * 10),
                        20,
                        Side::Sell,
                    ));
                }
                book
            },
            |mut book| {
                black_box(book.add_order(Order::limit(100, px(50_040), 100, Side::Buy)));
            },
            BatchSize::SmallInput,
        );
    });
}

// ============================================================================
// Book Maintenance
// ============================================================================

fn benchmark_cancel(c: &mut Criterion) {
    c.bench_function("cancel_resting", |b| {
        let mut book = OrderBook::new();
        let mut id: OrderId = 0;

        b.iter(|| {
            id += 1;
            book.add_order(Order::limit(id, px(50_000), 10, Side::Buy));
            black_box(book.cancel_order(id));
        });
    });
}

fn benchmark_modify_in_place(c: &mut Criterion) {
    c.bench_function("modify_in_place_decrease", |b| {
        let mut book = OrderBook::new();
        book.add_order(Order::limit(1, px(50_000), i64::MAX / 2, Side::Buy));

        let mut qty = i64::MAX / 2;
        b.iter(|| {
            qty -= 1;
            black_box(book.modify_order(1, px(50_000), qty));
        });
    });
}

// ============================================================================
// Market Data
// ============================================================================

fn benchmark_snapshot(c: &mut Criterion) {
    c.bench_function("snapshot_deep_book", |b| {
        let mut book = OrderBook::new();
        for i in 0..100i64 {
            book.add_order(Order::limit(
                (i + 1) as OrderId,
                px(49_900 - i * 10),
                1,
                Side::Buy,
            ));
            book.add_order(Order::limit(
                (i + 1_000) as OrderId,
                px(50_100 + i * 10),
                1,
                Side::Sell,
            ));
        }

        b.iter(|| {
            black_box(book.snapshot());
        });
    });
}

criterion_group!(
    benches,
    benchmark_add_no_match,
    benchmark_add_no_cross_deep_book,
    benchmark_crossing_add,
    benchmark_multi_level_sweep,
    benchmark_cancel,
    benchmark_modify_in_place,
    benchmark_snapshot,
);
criterion_main!(benches);
