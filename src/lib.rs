//! Parallel tools built around a double-buffered hand-off.
//!
//! The crate provides two cooperating primitives:
//!
//! - [`queue::ProductionQueue`]: a multi-producer multi-consumer FIFO that
//!   keeps producers and consumers on separate internal buffers and hands
//!   batches over through a policy-gated swap.
//! - [`pool::ThreadPool`]: a fixed set of OS worker threads draining a
//!   production queue of erased tasks, with one-shot [`pool::TaskHandle`]s
//!   for awaiting results.
//!
//! [`Guarded`] is a small mutex-wrapped value holder used where a full
//! atomic type does not fit.
//!
//! ## Example
//!
//!```
//! use scambio::pool::ThreadPool;
//!
//! let mut pool = ThreadPool::new(2);
//!
//! let sum = pool.exec(|| 5 + 2).unwrap();
//! let difference = pool.exec(|| 10 - 2).unwrap();
//!
//! assert_eq!(sum.get(), 7);
//! assert_eq!(difference.get(), 8);
//!
//! pool.terminate();
//! ```
mod guarded;
pub mod pool;
pub mod queue;

pub use guarded::Guarded;
