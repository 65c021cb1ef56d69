//! Thread pool benchmarks: a burst of trivial tasks under different flush
//! batch sizes, all workers busy.

use criterion::Criterion;
use scambio::{
    pool::ThreadPool,
    queue::FlushPolicy,
};

const TASKS: usize = 10_000;

pub fn all(c: &mut Criterion) {
    void_tasks(c);
}

fn void_tasks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/void_tasks");
    group.sample_size(20);

    for batch_size in [1_usize, 100, 1_000] {
        let policy = match batch_size {
            1 => FlushPolicy::Always,
            n => FlushPolicy::BatchesOf(n),
        };
        group.bench_function(format!("batches_of_{batch_size}"), |b| {
            let mut pool = ThreadPool::with_policy(num_cpus::get(), policy.clone());
            b.iter(|| {
                let handles: Vec<_> = (0..TASKS).map(|_| pool.exec(|| {}).unwrap()).collect();
                pool.complete_batch();
                for handle in handles {
                    handle.wait();
                }
            });
            pool.terminate();
        });
    }

    group.finish();
}
