//! Bounded storage for trace records.
//!
//! Records are kept oldest first. Once the buffer is full the oldest record
//! is dropped for every new one, so long REPL sessions keep only their most
//! recent generations.

use std::collections::{BTreeMap, VecDeque};
use std::ops::RangeInclusive;

use super::record::{TraceEvent, TraceRecord};

/// Trace records from the most recent generations.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    next_id: u64,
}

impl TraceBuffer {
    /// Default capacity.
    pub const DEFAULT_SIZE: usize = 10_000;

    /// Creates a buffer that holds at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(256)),
            capacity,
            next_id: 0,
        }
    }

    /// Stores an event and returns its record ID.
    pub fn push(&mut self, generation: u64, depth: usize, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        if self.capacity > 0 {
            self.records
                .push_back(TraceRecord::new(id, generation, depth, event));
        }
        id
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of stored records.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every record. IDs are never reused.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterates over the stored records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Looks up a record by ID.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&TraceRecord> {
        let first = self.records.front()?.id;
        let index = usize::try_from(id.checked_sub(first)?).ok()?;
        self.records.get(index).filter(|r| r.id == id)
    }

    /// The oldest and newest generation still stored.
    #[must_use]
    pub fn generations(&self) -> Option<RangeInclusive<u64>> {
        let oldest = self.records.front()?.generation;
        let newest = self.records.back()?.generation;
        Some(oldest..=newest)
    }

    /// Records of one generation, in expansion order.
    #[must_use]
    pub fn records_for_generation(&self, generation: u64) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| r.generation == generation)
            .collect()
    }

    /// Records of every generation after `generation`.
    #[must_use]
    pub fn records_after(&self, generation: u64) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| r.generation > generation)
            .collect()
    }

    /// Records that report unknown modifiers or other expansion problems.
    #[must_use]
    pub fn problems(&self) -> Vec<&TraceRecord> {
        self.records.iter().filter(|r| r.event.is_problem()).collect()
    }

    /// Pushes and pops that touched `symbol`.
    #[must_use]
    pub fn bindings_of(&self, symbol: &str) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| match &r.event {
                TraceEvent::BindingPushed { target, .. }
                | TraceEvent::BindingPopped { target, .. } => target == symbol,
                _ => false,
            })
            .collect()
    }

    /// Number of stored records per event type.
    #[must_use]
    pub fn event_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.event_type()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}
