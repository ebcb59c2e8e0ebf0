//! # Ordered-Write Benchmarks
//!
//! Cost of routing writes through the ordered context:
//!
//! | Path | Raw context | Ordered context |
//! |------|-------------|-----------------|
//! | External write | queued on the loop | queued on the loop |
//! | On-loop write | issued inline | queued on the loop |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use ow_ordering::testing::ConnectionFixture;
use ow_ordering::{HandlerContext, SharedContext};
use std::time::Duration;

const BATCH_SIZES: [u64; 3] = [10, 100, 1000];

fn fixture(name: &str) -> ConnectionFixture<u64> {
    ConnectionFixture::new(name).expect("loop thread should start")
}

fn context(conn: &ConnectionFixture<u64>, ordered: bool) -> SharedContext<u64> {
    if ordered {
        conn.ordered_context()
    } else {
        conn.raw_context()
    }
}

// ============================================================================
// External writers
// ============================================================================

fn bench_external_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("external-writes");
    group.measurement_time(Duration::from_secs(5));

    for size in BATCH_SIZES {
        group.throughput(Throughput::Elements(size));
        for (label, ordered) in [("raw", false), ("ordered", true)] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &size| {
                b.iter_batched(
                    || {
                        let conn = fixture("bench-external");
                        let ctx = context(&conn, ordered);
                        (conn, ctx)
                    },
                    |(conn, ctx)| {
                        let mut last = None;
                        for n in 0..size {
                            last = Some(ctx.write_and_flush(black_box(n)));
                        }
                        if let Some(promise) = last {
                            black_box(promise.wait().is_ok());
                        }
                        conn
                    },
                    BatchSize::PerIteration,
                );
            });
        }
    }

    group.finish();
}

// ============================================================================
// Writers on the loop
// ============================================================================

fn bench_on_loop_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("on-loop-writes");
    group.measurement_time(Duration::from_secs(5));

    for size in BATCH_SIZES {
        group.throughput(Throughput::Elements(size));
        for (label, ordered) in [("raw", false), ("ordered", true)] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &size| {
                b.iter_batched(
                    || {
                        let conn = fixture("bench-on-loop");
                        let ctx = context(&conn, ordered);
                        (conn, ctx)
                    },
                    |(conn, ctx)| {
                        let last = conn
                            .on_loop(move || {
                                let mut last = None;
                                for n in 0..size {
                                    let promise = if n + 1 == size {
                                        ctx.write_and_flush(black_box(n))
                                    } else {
                                        ctx.write(black_box(n))
                                    };
                                    last = Some(promise);
                                }
                                last
                            })
                            .expect("loop is running");
                        if let Some(promise) = last {
                            black_box(promise.wait().is_ok());
                        }
                        conn
                    },
                    BatchSize::PerIteration,
                );
            });
        }
    }

    group.finish();
}

// ============================================================================
// Wrapping
// ============================================================================

fn bench_wrap_marked_connection(c: &mut Criterion) {
    let conn = fixture("bench-wrap");
    let ordered = conn.ordered_context();

    c.bench_function("wrap-already-ordered", |b| {
        b.iter(|| black_box(ow_ordering::wrap(ordered.clone())))
    });
}

criterion_group!(
    benches,
    bench_external_writes,
    bench_on_loop_writes,
    bench_wrap_marked_connection
);
criterion_main!(benches);
