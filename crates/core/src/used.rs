use crate::EntityId;
use std::collections::{HashSet, VecDeque};

/// (entity, image index) combinations already liked in the current era.
///
/// Insertion order is kept so [`UsedSet::prune_oldest_half`] drops the
/// oldest records first.
#[derive(Debug, Clone, Default)]
pub struct UsedSet {
    entries: HashSet<(EntityId, usize)>,
    order: VecDeque<(EntityId, usize)>,
}

impl UsedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the pair was already recorded. Either way the
    /// pair becomes the newest entry.
    pub fn record(&mut self, entity: EntityId, image: usize) -> bool {
        let key = (entity, image);
        let fresh = self.entries.insert(key.clone());
        if !fresh {
            if let Some(pos) = self.order.iter().position(|existing| *existing == key) {
                self.order.remove(pos);
            }
        }
        self.order.push_back(key);
        fresh
    }

    pub fn contains(&self, entity: &EntityId, image: usize) -> bool {
        // HashSet<(K, V)> lookups need an owned tuple.
        self.entries.contains(&(entity.clone(), image))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Removes the oldest `len / 2` entries and returns how many went.
    pub fn prune_oldest_half(&mut self) -> usize {
        let count = self.order.len() / 2;
        for _ in 0..count {
            if let Some(key) = self.order.pop_front() {
                self.entries.remove(&key);
            }
        }
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, usize)> + '_ {
        self.order.iter().map(|(id, image)| (id, *image))
    }
}
