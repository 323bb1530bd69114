//! Named counters for tracking outcomes

use std::collections::BTreeMap;

/// Monotonic counters keyed by a static name.
///
/// A `BTreeMap` keeps iteration order stable so summaries print the same
/// way every run.
#[derive(Debug, Default, Clone)]
pub struct Counter {
    counters: BTreeMap<&'static str, usize>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            counters: BTreeMap::new(),
        }
    }

    pub fn increment(&mut self, name: &'static str, value: usize) {
        *self.counters.entry(name).or_insert(0) += value;
    }

    pub fn get(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.counters.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.counters.iter().map(|(name, value)| (*name, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_accumulates() {
        let mut counter = Counter::new();
        counter.increment("spawned", 1);
        counter.increment("spawned", 2);
        counter.increment("no_position", 1);

        assert_eq!(counter.get("spawned"), 3);
        assert_eq!(counter.get("pool_exhausted"), 0);

        let names: Vec<_> = counter.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["no_position", "spawned"]);
    }
}
