use std::{fmt, sync::Arc};

/// Predicate deciding whether newly produced resources should be handed over
/// to consumers.
///
/// The policy is evaluated every time a swap could happen: after each
/// `produce`, and inside a blocked consumer's wait loop. It never blocks and
/// must not touch the queue it gates.
#[derive(Clone, Default)]
pub enum FlushPolicy {
    /// Hand over on every produce.
    #[default]
    Always,
    /// Never hand over automatically. Resources stay hidden until
    /// `flush_production` or a later `switch_policy`.
    Never,
    /// Hand over once at least `n` resources have accumulated.
    BatchesOf(usize),
    /// Hand over once strictly more than `k` consumers are blocked.
    MaxWaitingConsumers(usize),
    /// Caller-supplied predicate.
    Custom(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl FlushPolicy {
    /// Wraps a closure into a [`FlushPolicy::Custom`].
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    /// Single dispatch point for all variants.
    ///
    /// `unpublished` is the producers' buffer size, `waiting_consumers` the
    /// number of consumers currently blocked (the evaluating consumer counts
    /// itself).
    pub(super) fn permits(&self, unpublished: usize, waiting_consumers: usize) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::BatchesOf(n) => unpublished >= *n,
            Self::MaxWaitingConsumers(k) => waiting_consumers > *k,
            Self::Custom(predicate) => predicate(),
        }
    }
}

impl fmt::Debug for FlushPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Never => f.write_str("Never"),
            Self::BatchesOf(n) => f.debug_tuple("BatchesOf").field(n).finish(),
            Self::MaxWaitingConsumers(k) => f.debug_tuple("MaxWaitingConsumers").field(k).finish(),
            Self::Custom(..) => f.write_str("Custom(..)"),
        }
    }
}
