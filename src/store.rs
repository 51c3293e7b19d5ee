//! In-memory itinerary store.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::itinerary::Itinerary;
use crate::traits::ItineraryStore;

/// Store-assigned identity of an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItineraryId(pub u64);

impl fmt::Display for ItineraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-local store for tests and single-node embedding.
#[derive(Debug, Default)]
pub struct MemoryItineraryStore {
    records: RwLock<HashMap<ItineraryId, Itinerary>>,
    next_id: AtomicU64,
}

impl MemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItineraryStore for MemoryItineraryStore {
    fn get(&self, id: ItineraryId) -> Option<Itinerary> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn put(&self, mut itinerary: Itinerary) -> ItineraryId {
        let id = match itinerary.id {
            Some(id) => id,
            None => ItineraryId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1),
        };
        itinerary.id = Some(id);
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, itinerary);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::{Itinerary, PlanRequest};
    use jiff::civil::date;

    fn sample() -> Itinerary {
        let request = PlanRequest::new("Hotel", (36.10, -115.17), date(2024, 6, 3), date(2024, 6, 4));
        Itinerary::new(&request, Vec::new(), 0.0)
    }

    #[test]
    fn test_put_assigns_sequential_ids() {
        let store = MemoryItineraryStore::new();
        assert!(store.is_empty());
        let first = store.put(sample());
        let second = store.put(sample());
        assert_eq!(first, ItineraryId(1));
        assert_eq!(second, ItineraryId(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_put_with_id_overwrites() {
        let store = MemoryItineraryStore::new();
        let id = store.put(sample());
        let mut stored = store.get(id).unwrap();
        assert_eq!(stored.id, Some(id));
        stored.party_size = 4;
        assert_eq!(store.put(stored), id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().party_size, 4);
    }

    #[test]
    fn test_missing_id() {
        let store = MemoryItineraryStore::new();
        assert!(store.get(ItineraryId(9)).is_none());
    }
}
