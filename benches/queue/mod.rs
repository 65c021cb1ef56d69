//! Queue benchmarks: burst (single-threaded fill/drain) and contention
//! (2 producers vs 2 consumers), each against channel baselines.

use std::{hint::black_box, sync::Arc, thread};

use criterion::Criterion;
use scambio::queue::{FlushPolicy, ProductionQueue};

const BURST_SIZE: usize = 1_000;
const CONTENTION_ITEMS: usize = 10_000;
const SIDES: usize = 2;

pub fn all(c: &mut Criterion) {
    burst(c);
    contention(c);
}

/// Fill completely, then drain completely, on one thread.
fn burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue/burst");

    group.bench_function("scambio_always", |b| {
        let queue = ProductionQueue::new();
        b.iter(|| {
            for i in 0..BURST_SIZE {
                queue.produce(i);
            }
            for _ in 0..BURST_SIZE {
                black_box(queue.consume());
            }
        })
    });

    // One swap per burst instead of one per produce.
    group.bench_function("scambio_batched", |b| {
        let queue = ProductionQueue::with_policy(FlushPolicy::BatchesOf(BURST_SIZE));
        b.iter(|| {
            for i in 0..BURST_SIZE {
                queue.produce(i);
            }
            queue.flush_production();
            for _ in 0..BURST_SIZE {
                black_box(queue.consume());
            }
        })
    });

    group.bench_function("crossbeam", |b| {
        let (tx, rx) = crossbeam_channel::unbounded();
        b.iter(|| {
            for i in 0..BURST_SIZE {
                tx.send(i).unwrap();
            }
            for _ in 0..BURST_SIZE {
                black_box(rx.recv().unwrap());
            }
        })
    });

    group.bench_function("flume", |b| {
        let (tx, rx) = flume::unbounded();
        b.iter(|| {
            for i in 0..BURST_SIZE {
                tx.send(i).unwrap();
            }
            for _ in 0..BURST_SIZE {
                black_box(rx.recv().unwrap());
            }
        })
    });

    group.bench_function("kanal", |b| {
        let (tx, rx) = kanal::unbounded();
        b.iter(|| {
            for i in 0..BURST_SIZE {
                tx.send(i).unwrap();
            }
            for _ in 0..BURST_SIZE {
                black_box(rx.recv().unwrap());
            }
        })
    });

    group.finish();
}

/// 2 producers and 2 consumers moving a fixed number of items.
fn contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue/contention");
    group.sample_size(10);

    group.bench_function("scambio", |b| {
        b.iter(|| {
            let queue = Arc::new(ProductionQueue::new());
            let producers: Vec<_> = (0..SIDES)
                .map(|i| {
                    let queue = queue.clone();
                    thread::spawn(move || {
                        for item in (i..CONTENTION_ITEMS).step_by(SIDES) {
                            queue.produce(item);
                        }
                    })
                })
                .collect();
            let consumers: Vec<_> = (0..SIDES)
                .map(|_| {
                    let queue = queue.clone();
                    thread::spawn(move || {
                        for _ in 0..CONTENTION_ITEMS / SIDES {
                            black_box(queue.consume());
                        }
                    })
                })
                .collect();
            for producer in producers {
                producer.join().unwrap();
            }
            for consumer in consumers {
                consumer.join().unwrap();
            }
        })
    });

    group.bench_function("crossbeam", |b| {
        b.iter(|| {
            let (tx, rx) = crossbeam_channel::unbounded();
            let producers: Vec<_> = (0..SIDES)
                .map(|i| {
                    let tx = tx.clone();
                    thread::spawn(move || {
                        for item in (i..CONTENTION_ITEMS).step_by(SIDES) {
                            tx.send(item).unwrap();
                        }
                    })
                })
                .collect();
            let consumers: Vec<_> = (0..SIDES)
                .map(|_| {
                    let rx = rx.clone();
                    thread::spawn(move || {
                        for _ in 0..CONTENTION_ITEMS / SIDES {
                            black_box(rx.recv().unwrap());
                        }
                    })
                })
                .collect();
            for producer in producers {
                producer.join().unwrap();
            }
            for consumer in consumers {
                consumer.join().unwrap();
            }
        })
    });

    group.bench_function("flume", |b| {
        b.iter(|| {
            let (tx, rx) = flume::unbounded();
            let producers: Vec<_> = (0..SIDES)
                .map(|i| {
                    let tx = tx.clone();
                    thread::spawn(move || {
                        for item in (i..CONTENTION_ITEMS).step_by(SIDES) {
                            tx.send(item).unwrap();
                        }
                    })
                })
                .collect();
            let consumers: Vec<_> = (0..SIDES)
                .map(|_| {
                    let rx = rx.clone();
                    thread::spawn(move || {
                        for _ in 0..CONTENTION_ITEMS / SIDES {
                            black_box(rx.recv().unwrap());
                        }
                    })
                })
                .collect();
            for producer in producers {
                producer.join().unwrap();
            }
            for consumer in consumers {
                consumer.join().unwrap();
            }
        })
    });

    group.finish();
}
