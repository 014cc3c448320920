//! Resolver metrics and observability module.
//!
//! Tracks how reads were served: cache hits and misses, entries evicted by
//! the staleness check, fallback lookups, and fallback rule evaluations.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by every resolver built from one configuration.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    /// Number of reads answered from the attribute cache
    cache_hits: AtomicUsize,

    /// Number of reads that had to consult the localization records
    cache_misses: AtomicUsize,

    /// Number of cache entries dropped because the live record disagreed
    stale_evictions: AtomicUsize,

    /// Number of times a blank value sent the read on to another locale
    fallback_lookups: AtomicUsize,

    /// Number of fallback rules actually evaluated
    rule_evaluations: AtomicUsize,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_eviction(&self) {
        self.stale_evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_lookup(&self) {
        self.fallback_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rule_evaluation(&self) {
        self.rule_evaluations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn stale_evictions(&self) -> usize {
        self.stale_evictions.load(Ordering::Relaxed)
    }

    pub fn fallback_lookups(&self) -> usize {
        self.fallback_lookups.load(Ordering::Relaxed)
    }

    pub fn rule_evaluations(&self) -> usize {
        self.rule_evaluations.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_reads = hits + misses;
        let cache_hit_rate = if total_reads > 0 {
            (hits as f64 / total_reads as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            stale_evictions: self.stale_evictions(),
            fallback_lookups: self.fallback_lookups(),
            rule_evaluations: self.rule_evaluations(),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.stale_evictions.store(0, Ordering::Relaxed);
        self.fallback_lookups.store(0, Ordering::Relaxed);
        self.rule_evaluations.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the resolver counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub stale_evictions: usize,
    pub fallback_lookups: usize,
    pub rule_evaluations: usize,
}
