//! Named scope timers
//!
//! ```ignore
//! let _scope = profiler.scope("upload");
//! // ... timed work ...
//! ```
//!
//! The guard records on drop: [`Profiler::scope`] replaces the entry with the
//! latest duration, [`Profiler::scope_accumulate`] adds to it (for work that
//! runs several times per frame; pair with [`Profiler::reset`]).

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct Profiler {
    entries: BTreeMap<String, Duration>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&mut self, name: &str) -> ProfileScope<'_> {
        ProfileScope::new(self, name, false)
    }

    pub fn scope_accumulate(&mut self, name: &str) -> ProfileScope<'_> {
        ProfileScope::new(self, name, true)
    }

    pub fn record(&mut self, name: &str, elapsed: Duration, accumulate: bool) {
        let entry = self.entries.entry(name.to_owned()).or_default();
        if accumulate {
            *entry += elapsed;
        } else {
            *entry = elapsed;
        }
    }

    /// Zero an entry (it stays listed)
    pub fn reset(&mut self, name: &str) {
        self.entries.insert(name.to_owned(), Duration::ZERO);
    }

    pub fn get(&self, name: &str) -> Option<Duration> {
        self.entries.get(name).copied()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Duration)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Records the elapsed time into its [`Profiler`] when dropped.
#[must_use = "the scope is timed until the guard is dropped"]
pub struct ProfileScope<'a> {
    profiler: &'a mut Profiler,
    name: String,
    start: Instant,
    accumulate: bool,
}

impl<'a> ProfileScope<'a> {
    fn new(profiler: &'a mut Profiler, name: &str, accumulate: bool) -> Self {
        Self {
            profiler,
            name: name.to_owned(),
            start: Instant::now(),
            accumulate,
        }
    }
}

impl Drop for ProfileScope<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        tracing::trace!(scope = %self.name, elapsed_us = elapsed.as_micros() as u64, "Scope finished");
        self.profiler.record(&self.name, elapsed, self.accumulate);
    }
}

/// Milliseconds with two decimals, as the profiler panel lists them
pub fn format_ms(elapsed: Duration) -> String {
    format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0)
}
