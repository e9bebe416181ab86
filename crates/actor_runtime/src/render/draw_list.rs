//! Draw-order sorted registry of drawable behaviors

use crate::ecs::{BehaviorId, EntityId};

/// Reference to one drawable behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawKey {
    /// Owning entity
    pub entity: EntityId,
    /// Behavior within the entity
    pub behavior: BehaviorId,
    /// Sort key, lower draws first
    pub draw_order: i32,
}

/// Drawable behaviors sorted by draw order
///
/// Uses the same stable rule as behavior update order: a new entry goes
/// before the first entry with a strictly greater draw order.
#[derive(Debug, Default)]
pub struct DrawList {
    entries: Vec<DrawKey>,
}

impl DrawList {
    /// Create an empty draw list
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the sorted position
    pub fn insert(&mut self, key: DrawKey) {
        let index = self.entries.partition_point(|existing| existing.draw_order <= key.draw_order);
        self.entries.insert(index, key);
    }

    /// Remove one behavior's entry, keeping the order of the rest
    pub fn remove(&mut self, entity: EntityId, behavior: BehaviorId) -> bool {
        match self.entries.iter().position(|key| key.entity == entity && key.behavior == behavior) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every entry belonging to `entity`
    pub fn remove_entity(&mut self, entity: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key| key.entity != entity);
        before - self.entries.len()
    }

    /// Entries in draw order
    pub fn iter(&self) -> impl Iterator<Item = &DrawKey> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
