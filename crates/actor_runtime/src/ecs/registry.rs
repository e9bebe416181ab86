//! Entity registry and tick dispatch
//!
//! The registry owns every live entity and is the only place entities are
//! physically added or removed. Two rules keep the update pass safe while
//! callbacks create and destroy entities:
//!
//! - entities created while the update pass runs go to `pending` and join
//!   `active` after the pass, so they are first updated on the next tick;
//! - destruction only flags an entity [`EntityState::Dead`]; the sweep at the
//!   end of the tick removes it.
//!
//! The pass walks a snapshot of `active`, and each entity's behavior list is
//! lent out for the duration of its dispatch, so callbacks can borrow the
//! registry mutably through their [`TickContext`].

use slotmap::{new_key_type, SlotMap};

use super::behavior::{Behavior, BehaviorId, EntityHook};
use super::context::TickContext;
use super::entity::Entity;
use crate::input::KeyState;
use crate::render::{DrawKey, DrawList, RenderContext};

new_key_type! {
    /// Generational handle to an entity
    pub struct EntityId;
}

/// Counters for one call to [`EntityRegistry::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Entities that ran their update
    pub updated: usize,
    /// Pending entities moved into the active set
    pub spawned: usize,
    /// Dead entities destroyed by the sweep
    pub destroyed: usize,
}

/// Owner of all live entities
pub struct EntityRegistry {
    entities: SlotMap<EntityId, Entity>,
    active: Vec<EntityId>,
    pending: Vec<EntityId>,
    iterating: bool,
    dispatch_depth: u32,
    draw_list: DrawList,
    snapshot: Vec<EntityId>,
    last_tick: TickStats,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            active: Vec::new(),
            pending: Vec::new(),
            iterating: false,
            dispatch_depth: 0,
            draw_list: DrawList::new(),
            snapshot: Vec::new(),
            last_tick: TickStats::default(),
        }
    }

    // ---- membership ---------------------------------------------------

    /// Create an entity and register it
    ///
    /// While the update pass runs the entity is held in the pending set and
    /// is not updated until the next tick.
    pub fn create_entity(&mut self) -> EntityId {
        let id = self.entities.insert_with_key(Entity::new);
        self.register(id);
        log::debug!(
            "Created entity {:?} ({})",
            id,
            if self.iterating { "pending" } else { "active" }
        );
        id
    }

    fn register(&mut self, id: EntityId) {
        if self.iterating {
            self.pending.push(id);
        } else {
            self.active.push(id);
        }
    }

    /// Remove `id` from whichever set holds it
    ///
    /// Swap-with-last removal: O(1), order of the remaining ids not kept.
    /// Removing an absent id does nothing.
    pub(crate) fn unregister(&mut self, id: EntityId) {
        for set in [&mut self.pending, &mut self.active] {
            if let Some(index) = set.iter().position(|&candidate| candidate == id) {
                set.swap_remove(index);
            }
        }
    }

    /// Mark an entity for destruction at the end of the tick
    ///
    /// Returns `false` if the entity no longer exists.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.destroy();
                true
            }
            None => false,
        }
    }

    /// Destroy every entity immediately
    ///
    /// # Panics
    ///
    /// Panics when called from inside a dispatch.
    pub fn clear(&mut self) {
        assert!(
            self.dispatch_depth == 0 && !self.iterating,
            "EntityRegistry::clear called during dispatch"
        );
        let count = self.entities.len();
        while let Some(&id) = self.active.last().or_else(|| self.pending.last()) {
            self.destroy_now(id);
        }
        log::debug!("Cleared {} entities", count);
    }

    fn destroy_now(&mut self, id: EntityId) {
        self.unregister(id);
        self.draw_list.remove_entity(id);
        if self.entities.remove(id).is_some() {
            log::debug!("Destroyed entity {:?}", id);
        }
    }

    // ---- lookup -------------------------------------------------------

    /// Entity by handle
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Entity by handle, mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub(crate) fn expect_entity(&self, id: EntityId) -> &Entity {
        &self.entities[id]
    }

    pub(crate) fn expect_entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id]
    }

    /// Whether the handle refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of live entities, pending included
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether there are no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Active set in registration order (modulo swap removals)
    pub fn active_ids(&self) -> &[EntityId] {
        &self.active
    }

    /// Entities created during the current update pass
    pub fn pending_ids(&self) -> &[EntityId] {
        &self.pending
    }

    /// Whether `id` is in the active set
    pub fn is_active_member(&self, id: EntityId) -> bool {
        self.active.contains(&id)
    }

    /// Whether `id` is in the pending set
    pub fn is_pending(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    /// Whether the update pass is running
    pub fn is_iterating(&self) -> bool {
        self.iterating
    }

    /// Counters from the most recent tick
    pub fn last_tick(&self) -> TickStats {
        self.last_tick
    }

    // ---- behaviors ----------------------------------------------------

    /// Attach a behavior to an entity
    ///
    /// Drawable behaviors are also entered into the draw list.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live entity.
    pub fn attach_behavior(&mut self, id: EntityId, behavior: impl Behavior) -> BehaviorId {
        let draw_order = behavior.draw_order();
        let Some(entity) = self.entities.get_mut(id) else {
            panic!("attach_behavior: entity {id:?} is not registered");
        };
        let behavior_id = entity.attach_behavior(Box::new(behavior));

        if let Some(draw_order) = draw_order {
            self.draw_list.insert(DrawKey { entity: id, behavior: behavior_id, draw_order });
        }
        behavior_id
    }

    /// Detach and drop a behavior
    ///
    /// Returns `false` when the entity or behavior is absent.
    pub fn detach_behavior(&mut self, id: EntityId, behavior: BehaviorId) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        let detached = entity.detach_behavior(behavior);
        if detached {
            self.draw_list.remove(id, behavior);
        }
        detached
    }

    /// Install the entity-level hook
    ///
    /// Returns `false` if the entity no longer exists.
    pub fn set_hook(&mut self, id: EntityId, hook: impl EntityHook) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.set_hook(hook);
                true
            }
            None => false,
        }
    }

    // ---- per-frame ----------------------------------------------------

    /// Fan the key snapshot out to every active entity
    ///
    /// Behaviors see it in update order, then the entity hook. Paused and dead
    /// entities are skipped entirely.
    pub fn process_input(&mut self, keys: &KeyState) {
        let mut snapshot = self.take_snapshot();
        for &id in &snapshot {
            match self.entities.get_mut(id) {
                Some(entity) if entity.is_active() => {
                    if !entity.begin_dispatch() {
                        continue;
                    }
                }
                _ => continue,
            }
            self.dispatch_behaviors(id, |behavior, ctx| behavior.process_input(ctx, keys));
            self.dispatch_hook(id, |hook, ctx| hook.entity_input(ctx, keys));
            self.expect_entity_mut(id).end_dispatch();
        }
        snapshot.clear();
        self.snapshot = snapshot;
    }

    /// Run one simulation step
    ///
    /// Updates every active entity, moves pending entities into the active
    /// set, then destroys every dead entity.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a dispatch.
    pub fn tick(&mut self, delta_time: f32) -> TickStats {
        assert!(
            !self.iterating && self.dispatch_depth == 0,
            "EntityRegistry::tick is not reentrant"
        );

        let mut stats = TickStats::default();

        self.iterating = true;
        let mut snapshot = self.take_snapshot();
        for &id in &snapshot {
            if self.entities.get(id).is_some_and(Entity::is_active) {
                self.update_entity(id, delta_time);
                stats.updated += 1;
            }
        }
        snapshot.clear();
        self.snapshot = snapshot;
        self.iterating = false;

        stats.spawned = self.flush_pending();
        stats.destroyed = self.sweep_dead();

        log::trace!(
            "Tick dt={:.4}: updated {}, spawned {}, destroyed {}, live {}",
            delta_time,
            stats.updated,
            stats.spawned,
            stats.destroyed,
            self.entities.len()
        );
        self.last_tick = stats;
        stats
    }

    /// Update a single entity
    ///
    /// No-op unless the entity is active. Otherwise: recompute the world
    /// transform, update its behaviors in order, run the hook's update, and
    /// recompute again so pose changes made during the update are reflected
    /// before the tick ends.
    ///
    /// Also a no-op when called for an entity from inside its own dispatch.
    pub fn update_entity(&mut self, id: EntityId, delta_time: f32) {
        match self.entities.get_mut(id) {
            Some(entity) if entity.is_active() => {
                if !entity.begin_dispatch() {
                    return;
                }
                entity.recompute_world_transform_if_dirty();
            }
            _ => return,
        }

        self.dispatch_behaviors(id, |behavior, ctx| behavior.update(ctx, delta_time));
        self.dispatch_hook(id, |hook, ctx| hook.update_entity(ctx, delta_time));

        let entity = self.expect_entity_mut(id);
        entity.recompute_world_transform_if_dirty();
        entity.end_dispatch();
    }

    fn take_snapshot(&mut self) -> Vec<EntityId> {
        let mut snapshot = std::mem::take(&mut self.snapshot);
        snapshot.clear();
        snapshot.extend_from_slice(&self.active);
        snapshot
    }

    fn dispatch_behaviors(
        &mut self,
        id: EntityId,
        mut call: impl FnMut(&mut dyn Behavior, &mut TickContext<'_>),
    ) {
        let Some(mut behaviors) = self.entities.get_mut(id).and_then(Entity::check_out_behaviors) else {
            return;
        };

        self.dispatch_depth += 1;
        for attached in &mut behaviors {
            if self.expect_entity(id).is_detach_pending(attached.id) {
                continue;
            }
            let mut ctx = TickContext::new(self, id);
            call(attached.behavior.as_mut(), &mut ctx);
        }
        self.dispatch_depth -= 1;

        self.expect_entity_mut(id).return_behaviors(behaviors);
    }

    fn dispatch_hook(
        &mut self,
        id: EntityId,
        call: impl FnOnce(&mut dyn EntityHook, &mut TickContext<'_>),
    ) {
        let Some(mut hook) = self.entities.get_mut(id).and_then(Entity::take_hook) else {
            return;
        };

        self.dispatch_depth += 1;
        call(hook.as_mut(), &mut TickContext::new(self, id));
        self.dispatch_depth -= 1;

        self.expect_entity_mut(id).restore_hook(hook);
    }

    fn flush_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for id in pending {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.recompute_world_transform_if_dirty();
                self.active.push(id);
            }
        }
        count
    }

    fn sweep_dead(&mut self) -> usize {
        let dead: Vec<EntityId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| self.entities.get(id).is_some_and(Entity::is_dead))
            .collect();

        for &id in &dead {
            self.destroy_now(id);
        }
        dead.len()
    }

    // ---- rendering ----------------------------------------------------

    /// Draw-order sorted drawable behaviors
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Emit draw calls for every drawable behavior in draw order
    pub fn render(&self, render: &mut dyn RenderContext) {
        for key in self.draw_list.iter() {
            let Some(entity) = self.entities.get(key.entity) else {
                continue;
            };
            if let Some(behavior) = entity.behavior_dyn(key.behavior) {
                behavior.draw(entity, render);
            }
        }
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.entities.len())
            .field("active", &self.active.len())
            .field("pending", &self.pending.len())
            .field("iterating", &self.iterating)
            .field("drawables", &self.draw_list.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_outside_tick_goes_active() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        assert!(registry.is_active_member(id));
        assert!(!registry.is_pending(id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_swap_removes_and_is_idempotent() {
        let mut registry = EntityRegistry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();
        let c = registry.create_entity();

        registry.unregister(a);
        assert_eq!(registry.active_ids(), &[c, b]);

        registry.unregister(a);
        assert_eq!(registry.active_ids(), &[c, b]);
    }

    #[test]
    fn test_destroy_entity_is_deferred_to_tick() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();

        assert!(registry.destroy_entity(id));
        assert!(registry.contains(id));

        let stats = registry.tick(0.016);
        assert_eq!(stats.destroyed, 1);
        assert!(!registry.contains(id));
        assert!(!registry.destroy_entity(id));
    }

    #[test]
    fn test_clear_destroys_everything() {
        let mut registry = EntityRegistry::new();
        for _ in 0..5 {
            registry.create_entity();
        }
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.active_ids().is_empty());
    }

    #[test]
    fn test_detach_from_missing_entity_is_noop() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.destroy_entity(id);
        registry.tick(0.0);
        assert!(!registry.detach_behavior(id, BehaviorId(0)));
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_attach_to_missing_entity_panics() {
        struct Nothing;
        impl Behavior for Nothing {}

        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.destroy_entity(id);
        registry.tick(0.0);
        registry.attach_behavior(id, Nothing);
    }
}
