//! Callback context handed to behaviors and hooks

use super::behavior::{Behavior, BehaviorId};
use super::entity::Entity;
use super::registry::{EntityId, EntityRegistry};

/// Access to the owning entity and the registry during a callback
///
/// The owner is guaranteed to exist for the whole callback: entities are only
/// removed by the end-of-tick sweep or by [`EntityRegistry::clear`], neither
/// of which can run while a dispatch is in progress.
pub struct TickContext<'a> {
    registry: &'a mut EntityRegistry,
    owner: EntityId,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(registry: &'a mut EntityRegistry, owner: EntityId) -> Self {
        Self { registry, owner }
    }

    /// Handle of the entity being dispatched
    pub fn owner_id(&self) -> EntityId {
        self.owner
    }

    /// The entity being dispatched
    pub fn owner(&self) -> &Entity {
        self.registry.expect_entity(self.owner)
    }

    /// The entity being dispatched, mutably
    pub fn owner_mut(&mut self) -> &mut Entity {
        self.registry.expect_entity_mut(self.owner)
    }

    /// The whole registry
    pub fn registry(&self) -> &EntityRegistry {
        self.registry
    }

    /// The whole registry, mutably
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        self.registry
    }

    /// Create an entity; during a tick it joins the pending set
    pub fn spawn(&mut self) -> EntityId {
        self.registry.create_entity()
    }

    /// Attach a behavior to the owner
    pub fn attach_to_owner(&mut self, behavior: impl Behavior) -> BehaviorId {
        self.registry.attach_behavior(self.owner, behavior)
    }

    /// Mark the owner for destruction at the end of the tick
    pub fn destroy_owner(&mut self) {
        self.owner_mut().destroy();
    }
}
