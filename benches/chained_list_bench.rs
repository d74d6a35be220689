use chained_hash::ChainedList;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

const N: u64 = 100_000;

fn bench_push_pop(c: &mut Criterion) {
    c.bench_function("list::push_back_100k", |b| {
        b.iter_batched(
            ChainedList::<u64>::new,
            |mut l| {
                for i in 0..N {
                    l.push_back(i).unwrap();
                }
                black_box(l)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("list::pop_front_100k", |b| {
        b.iter_batched(
            || (0..N).collect::<ChainedList<u64>>(),
            |mut l| {
                while let Some(v) = l.pop_front() {
                    black_box(v);
                }
                black_box(l)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cursor_edits(c: &mut Criterion) {
    // Walk once, deleting every odd value and inserting before every 10th.
    c.bench_function("list::cursor_filter_and_insert_100k", |b| {
        b.iter_batched(
            || (0..N).collect::<ChainedList<u64>>(),
            |mut l| {
                {
                    let mut cur = l.cursor_mut();
                    while let Some(&v) = cur.current() {
                        if v % 2 == 1 {
                            cur.delete_current();
                            continue;
                        }
                        if v % 10 == 0 {
                            cur.insert_before_current(u64::MAX).unwrap();
                            cur.advance();
                        }
                        cur.advance();
                    }
                }
                black_box(l)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate(c: &mut Criterion) {
    let l: ChainedList<u64> = (0..N).collect();
    c.bench_function("list::iter_sum_100k", |b| {
        b.iter(|| black_box(l.iter().fold(0u64, |a, v| a.wrapping_add(*v))))
    });
    c.bench_function("list::iterate_visitor_sum_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            l.iterate(|v| {
                sum = sum.wrapping_add(*v);
                true
            });
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_push_pop, bench_cursor_edits, bench_iterate
}
criterion_main!(benches);
