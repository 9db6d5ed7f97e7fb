//! Invalidation of cached read collections.
//!
//! Mutations and realtime events only mark collections stale; views decide
//! when to refetch.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    MoveRequests,
    Shifts,
    Bins,
    Zones,
    PotentialLocations,
}

/// Everything a move-request mutation can affect.
pub const AFTER_MOVE_MUTATION: [Collection; 3] =
    [Collection::MoveRequests, Collection::Shifts, Collection::Bins];

pub trait CacheInvalidator {
    fn invalidate(&self, collections: &[Collection]);
}

/// Generation counters per collection. A reader remembers the generation it
/// fetched at and refetches once it moves.
#[derive(Debug, Default)]
pub struct QueryCache {
    generations: Mutex<HashMap<Collection, u64>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self, collection: Collection) -> u64 {
        let generations = self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        generations.get(&collection).copied().unwrap_or(0)
    }
}

impl CacheInvalidator for QueryCache {
    fn invalidate(&self, collections: &[Collection]) {
        let mut generations = self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for collection in collections {
            *generations.entry(*collection).or_insert(0) += 1;
        }
        tracing::debug!(?collections, "cache collections invalidated");
    }
}

/// Collections a realtime event name refreshes. Unknown events refresh nothing.
#[must_use]
pub fn collections_for_event(event: &str) -> &'static [Collection] {
    let event = event.trim().to_ascii_lowercase();
    if event.starts_with("potential_location") {
        &[Collection::PotentialLocations]
    } else if event.starts_with("bin") {
        &[Collection::Bins]
    } else if event.starts_with("zone") {
        &[Collection::Zones]
    } else if event.starts_with("move_request") {
        &AFTER_MOVE_MUTATION
    } else if event.starts_with("shift") {
        &[Collection::Shifts]
    } else {
        &[]
    }
}
