//! Entity implementation
//!
//! An entity owns its behaviors, its pose and the cached world matrix derived
//! from that pose. Entities are created and destroyed only through the
//! [`EntityRegistry`](super::EntityRegistry).

use std::mem;

use super::behavior::{Behavior, BehaviorId, EntityHook};
use super::registry::EntityId;
use super::transform::Pose;
use crate::foundation::math::{Mat4, Quat, Vec2, Vec3};

/// Lifecycle state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityState {
    /// Receives input and updates
    #[default]
    Active,
    /// Frozen: no input, no updates, still drawn
    Paused,
    /// Destroyed by the registry at the end of the current tick
    Dead,
}

/// A behavior together with the bookkeeping its owner needs
pub(crate) struct AttachedBehavior {
    pub(crate) id: BehaviorId,
    pub(crate) update_order: i32,
    pub(crate) behavior: Box<dyn Behavior>,
}

/// Behaviors lent out to the registry for dispatch
#[derive(Default)]
struct Checkout {
    ids: Vec<BehaviorId>,
    detached: Vec<BehaviorId>,
    missed_transforms: Vec<Mat4>,
}

/// A live simulation object
pub struct Entity {
    id: EntityId,
    state: EntityState,
    pose: Pose,
    world_transform: Mat4,
    transform_dirty: bool,
    behaviors: Vec<AttachedBehavior>,
    next_behavior_id: u32,
    hook: Option<Box<dyn EntityHook>>,
    checkout: Option<Checkout>,
    dispatching: bool,
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("pose", &self.pose)
            .field("transform_dirty", &self.transform_dirty)
            .field("behaviors", &self.behaviors.len())
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        let pose = Pose::default();
        Self {
            id,
            state: EntityState::Active,
            world_transform: pose.world_matrix(),
            pose,
            transform_dirty: false,
            behaviors: Vec::new(),
            next_behavior_id: 0,
            hook: None,
            checkout: None,
            dispatching: false,
        }
    }

    /// Handle of this entity in its registry
    pub fn id(&self) -> EntityId {
        self.id
    }

    // ---- lifecycle ----------------------------------------------------

    /// Current lifecycle state
    pub fn state(&self) -> EntityState {
        self.state
    }

    /// Set the lifecycle state
    pub fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }

    /// Whether the entity takes part in dispatch
    pub fn is_active(&self) -> bool {
        self.state == EntityState::Active
    }

    /// Whether the entity is waiting for the end-of-tick sweep
    pub fn is_dead(&self) -> bool {
        self.state == EntityState::Dead
    }

    /// Mark for destruction at the end of the current (or next) tick
    pub fn destroy(&mut self) {
        self.state = EntityState::Dead;
    }

    // ---- pose ---------------------------------------------------------

    /// Full pose
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Replace the whole pose
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.transform_dirty = true;
    }

    /// 3-D position
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Set the 3-D position
    pub fn set_position(&mut self, position: Vec3) {
        self.set_pose_3d(Some(position), None);
    }

    /// Orientation quaternion
    pub fn orientation(&self) -> Quat {
        self.pose.orientation
    }

    /// Set the orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.set_pose_3d(None, Some(orientation));
    }

    /// Update position and/or orientation and mark the transform dirty
    pub fn set_pose_3d(&mut self, position: Option<Vec3>, orientation: Option<Quat>) {
        if let Some(position) = position {
            self.pose.position = position;
        }
        if let Some(orientation) = orientation {
            self.pose.orientation = orientation;
        }
        self.transform_dirty = true;
    }

    /// Uniform scale
    pub fn scale(&self) -> f32 {
        self.pose.scale
    }

    /// Set the uniform scale
    pub fn set_scale(&mut self, scale: f32) {
        self.pose.scale = scale;
        self.transform_dirty = true;
    }

    /// Planar rotation in radians
    pub fn planar_rotation(&self) -> f32 {
        self.pose.planar_rotation
    }

    /// Set the planar rotation in radians
    pub fn set_planar_rotation(&mut self, rotation: f32) {
        self.pose.planar_rotation = rotation;
        self.transform_dirty = true;
    }

    /// Planar position
    pub fn planar_position(&self) -> Vec2 {
        self.pose.planar_position
    }

    /// Set the planar position
    pub fn set_planar_position(&mut self, position: Vec2) {
        self.pose.planar_position = position;
        self.transform_dirty = true;
    }

    /// Forward direction in world space
    pub fn forward(&self) -> Vec3 {
        self.pose.forward()
    }

    // ---- world transform cache ----------------------------------------

    /// Cached world matrix
    ///
    /// Only guaranteed to match the pose when [`Self::is_transform_dirty`] is
    /// false; setters called since the last recompute are reflected on the
    /// next one.
    pub fn world_transform(&self) -> &Mat4 {
        &self.world_transform
    }

    /// Whether the pose changed since the last recompute
    pub fn is_transform_dirty(&self) -> bool {
        self.transform_dirty
    }

    /// Recompose the world matrix if the pose is dirty
    ///
    /// Notifies every attached behavior exactly once per recomposition.
    /// Returns `false`, doing nothing, when the cache is already current.
    pub fn recompute_world_transform_if_dirty(&mut self) -> bool {
        if !self.transform_dirty {
            return false;
        }

        self.world_transform = self.pose.world_matrix();
        self.transform_dirty = false;

        let world = self.world_transform;
        for attached in &mut self.behaviors {
            attached.behavior.on_world_transform_changed(&world);
        }
        // Behaviors lent out for dispatch hear about it when they come back
        if let Some(checkout) = self.checkout.as_mut() {
            checkout.missed_transforms.push(world);
        }
        true
    }

    // ---- behaviors ----------------------------------------------------

    /// Insert a behavior at its sorted position
    ///
    /// Lands immediately before the first behavior with a strictly greater
    /// update order, so equal orders keep insertion order.
    pub(crate) fn attach_behavior(&mut self, behavior: Box<dyn Behavior>) -> BehaviorId {
        let id = BehaviorId(self.next_behavior_id);
        self.next_behavior_id += 1;

        let update_order = behavior.update_order();
        self.insert_sorted(AttachedBehavior { id, update_order, behavior });
        id
    }

    fn insert_sorted(&mut self, attached: AttachedBehavior) {
        let order = attached.update_order;
        let index = self.behaviors.partition_point(|existing| existing.update_order <= order);
        self.behaviors.insert(index, attached);
    }

    /// Remove a behavior, keeping the order of the rest
    ///
    /// Returns whether the behavior was attached. A behavior currently lent
    /// out for dispatch is removed when the dispatch hands it back.
    pub(crate) fn detach_behavior(&mut self, id: BehaviorId) -> bool {
        if let Some(index) = self.behaviors.iter().position(|attached| attached.id == id) {
            self.behaviors.remove(index);
            return true;
        }

        match self.checkout.as_mut() {
            Some(checkout) if checkout.ids.contains(&id) && !checkout.detached.contains(&id) => {
                checkout.detached.push(id);
                true
            }
            _ => false,
        }
    }

    /// Number of attached behaviors
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len() + self.checkout.as_ref().map_or(0, |c| c.ids.len() - c.detached.len())
    }

    /// Behavior ids in dispatch order
    ///
    /// Behaviors lent out for dispatch are not listed until they are returned.
    pub fn behavior_ids(&self) -> impl Iterator<Item = BehaviorId> + '_ {
        self.behaviors.iter().map(|attached| attached.id)
    }

    /// Update orders in dispatch order
    pub fn update_orders(&self) -> impl Iterator<Item = i32> + '_ {
        self.behaviors.iter().map(|attached| attached.update_order)
    }

    /// Behavior `id` viewed as its concrete type
    pub fn behavior<T: Behavior>(&self, id: BehaviorId) -> Option<&T> {
        let attached = self.behaviors.iter().find(|attached| attached.id == id)?;
        let behavior: &dyn Behavior = attached.behavior.as_ref();
        behavior.as_any().downcast_ref::<T>()
    }

    /// Behavior `id` viewed mutably as its concrete type
    pub fn behavior_mut<T: Behavior>(&mut self, id: BehaviorId) -> Option<&mut T> {
        let attached = self.behaviors.iter_mut().find(|attached| attached.id == id)?;
        let behavior: &mut dyn Behavior = attached.behavior.as_mut();
        behavior.as_any_mut().downcast_mut::<T>()
    }

    /// First behavior of type `T` in dispatch order
    pub fn find_behavior<T: Behavior>(&self) -> Option<&T> {
        self.behaviors.iter().find_map(|attached| {
            let behavior: &dyn Behavior = attached.behavior.as_ref();
            behavior.as_any().downcast_ref::<T>()
        })
    }

    /// First behavior of type `T` in dispatch order, mutably
    pub fn find_behavior_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        self.behaviors.iter_mut().find_map(|attached| {
            let behavior: &mut dyn Behavior = attached.behavior.as_mut();
            behavior.as_any_mut().downcast_mut::<T>()
        })
    }

    pub(crate) fn behavior_dyn(&self, id: BehaviorId) -> Option<&dyn Behavior> {
        self.behaviors
            .iter()
            .find(|attached| attached.id == id)
            .map(|attached| attached.behavior.as_ref())
    }

    /// Lend the behavior list out for dispatch
    ///
    /// Returns `None` if it is already lent out (a dispatch re-entering its own
    /// owner). Behaviors attached while lent out go to the entity's own list and
    /// are merged back in sorted order by [`Self::return_behaviors`].
    pub(crate) fn check_out_behaviors(&mut self) -> Option<Vec<AttachedBehavior>> {
        if self.checkout.is_some() {
            return None;
        }
        let behaviors = mem::take(&mut self.behaviors);
        self.checkout = Some(Checkout {
            ids: behaviors.iter().map(|attached| attached.id).collect(),
            ..Checkout::default()
        });
        Some(behaviors)
    }

    /// Whether a lent-out behavior was detached during the current dispatch
    pub(crate) fn is_detach_pending(&self, id: BehaviorId) -> bool {
        self.checkout.as_ref().is_some_and(|checkout| checkout.detached.contains(&id))
    }

    /// Take back behaviors lent out by [`Self::check_out_behaviors`]
    pub(crate) fn return_behaviors(&mut self, mut returned: Vec<AttachedBehavior>) {
        let checkout = self.checkout.take().unwrap_or_default();
        returned.retain(|attached| !checkout.detached.contains(&attached.id));

        // One notification per recomposition, in the order they happened
        for world in &checkout.missed_transforms {
            for attached in &mut returned {
                attached.behavior.on_world_transform_changed(world);
            }
        }

        let attached_meanwhile = mem::replace(&mut self.behaviors, returned);
        for attached in attached_meanwhile {
            self.insert_sorted(attached);
        }
    }

    /// Mark the start of an update or input dispatch on this entity
    ///
    /// Returns `false` if one is already running, in which case the caller
    /// must not dispatch again.
    pub(crate) fn begin_dispatch(&mut self) -> bool {
        !mem::replace(&mut self.dispatching, true)
    }

    pub(crate) fn end_dispatch(&mut self) {
        self.dispatching = false;
    }

    // ---- hook ---------------------------------------------------------

    /// Install the entity-level hook, replacing any previous one
    pub fn set_hook(&mut self, hook: impl EntityHook) {
        self.hook = Some(Box::new(hook));
    }

    /// Whether a hook is installed
    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    /// Installed hook viewed as its concrete type
    pub fn hook<T: EntityHook>(&self) -> Option<&T> {
        let hook: &dyn EntityHook = self.hook.as_deref()?;
        hook.as_any().downcast_ref::<T>()
    }

    pub(crate) fn take_hook(&mut self) -> Option<Box<dyn EntityHook>> {
        self.hook.take()
    }

    /// Put a hook back after dispatch unless it was replaced meanwhile
    pub(crate) fn restore_hook(&mut self, hook: Box<dyn EntityHook>) {
        if self.hook.is_none() {
            self.hook = Some(hook);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityRegistry;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tagged {
        order: i32,
        tag: &'static str,
    }

    impl Behavior for Tagged {
        fn update_order(&self) -> i32 {
            self.order
        }
    }

    #[derive(Default)]
    struct TransformWatcher {
        notifications: Rc<RefCell<Vec<Mat4>>>,
    }

    impl Behavior for TransformWatcher {
        fn on_world_transform_changed(&mut self, world_transform: &Mat4) {
            self.notifications.borrow_mut().push(*world_transform);
        }
    }

    fn detached_entity() -> Entity {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        Entity::new(id)
    }

    fn tags(entity: &Entity) -> Vec<&'static str> {
        entity
            .behavior_ids()
            .filter_map(|id| entity.behavior::<Tagged>(id).map(|t| t.tag))
            .collect()
    }

    #[test]
    fn test_behaviors_sorted_with_stable_ties() {
        let mut entity = detached_entity();
        for (order, tag) in [(100, "a"), (50, "b"), (100, "c"), (200, "d"), (50, "e"), (100, "f")] {
            entity.attach_behavior(Box::new(Tagged { order, tag }));
        }

        let orders: Vec<i32> = entity.update_orders().collect();
        assert!(orders.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(tags(&entity), vec!["b", "e", "a", "c", "f", "d"]);
    }

    #[test]
    fn test_detach_keeps_order_and_is_idempotent() {
        let mut entity = detached_entity();
        let a = entity.attach_behavior(Box::new(Tagged { order: 1, tag: "a" }));
        entity.attach_behavior(Box::new(Tagged { order: 2, tag: "b" }));
        entity.attach_behavior(Box::new(Tagged { order: 3, tag: "c" }));

        assert!(entity.detach_behavior(a));
        assert!(!entity.detach_behavior(a));
        assert_eq!(tags(&entity), vec!["b", "c"]);
        assert_eq!(entity.behavior_count(), 2);
    }

    #[test]
    fn test_setters_mark_transform_dirty() {
        let mut entity = detached_entity();
        assert!(!entity.is_transform_dirty());

        entity.set_position(Vec3::new(1.0, 0.0, 0.0));
        assert!(entity.is_transform_dirty());
        assert!(entity.recompute_world_transform_if_dirty());

        entity.set_scale(2.0);
        assert!(entity.is_transform_dirty());
        entity.recompute_world_transform_if_dirty();

        entity.set_planar_position(Vec2::new(0.0, 1.0));
        assert!(entity.is_transform_dirty());
        entity.recompute_world_transform_if_dirty();

        entity.set_pose_3d(None, Some(Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI)));
        assert!(entity.is_transform_dirty());
    }

    #[test]
    fn test_recompute_is_idempotent_and_notifies_once() {
        let mut entity = detached_entity();
        let watcher = TransformWatcher::default();
        let notifications = Rc::clone(&watcher.notifications);
        entity.attach_behavior(Box::new(watcher));

        entity.set_pose_3d(
            Some(Vec3::new(3.0, -2.0, 1.0)),
            Some(Quat::from_axis_angle(&Vec3::z_axis(), 0.3)),
        );

        assert!(entity.recompute_world_transform_if_dirty());
        let first = *entity.world_transform();
        assert!(!entity.recompute_world_transform_if_dirty());
        let second = *entity.world_transform();

        assert_eq!(first, second);
        assert_eq!(notifications.borrow().len(), 1);
        assert_eq!(notifications.borrow()[0], first);
        assert_relative_eq!(first[(0, 3)], 3.0);
    }

    #[test]
    fn test_world_transform_matches_pose_when_clean() {
        let mut entity = detached_entity();
        entity.set_scale(4.0);
        entity.set_planar_rotation(HALF_PI);
        entity.set_position(Vec3::new(0.0, 0.0, 9.0));
        entity.recompute_world_transform_if_dirty();

        assert_eq!(*entity.world_transform(), entity.pose().world_matrix());
    }

    #[test]
    fn test_checkout_merges_new_behaviors_and_applies_deferred_detach() {
        let mut entity = detached_entity();
        let a = entity.attach_behavior(Box::new(Tagged { order: 10, tag: "a" }));
        entity.attach_behavior(Box::new(Tagged { order: 30, tag: "c" }));

        let lent = entity.check_out_behaviors().unwrap();
        assert!(entity.check_out_behaviors().is_none());

        entity.attach_behavior(Box::new(Tagged { order: 20, tag: "b" }));
        entity.attach_behavior(Box::new(Tagged { order: 30, tag: "d" }));
        assert!(entity.detach_behavior(a));
        assert!(entity.is_detach_pending(a));
        assert_eq!(entity.behavior_count(), 3);

        entity.return_behaviors(lent);
        assert_eq!(tags(&entity), vec!["b", "c", "d"]);
        assert!(!entity.is_detach_pending(a));
    }

    #[test]
    fn test_recompute_during_checkout_notifies_on_return() {
        let mut entity = detached_entity();
        let watcher = TransformWatcher::default();
        let notifications = Rc::clone(&watcher.notifications);
        entity.attach_behavior(Box::new(watcher));

        let lent = entity.check_out_behaviors().unwrap();
        entity.set_position(Vec3::new(1.0, 1.0, 1.0));
        entity.recompute_world_transform_if_dirty();
        assert!(notifications.borrow().is_empty());

        entity.return_behaviors(lent);
        assert_eq!(notifications.borrow().len(), 1);
    }

    #[test]
    fn test_each_recompute_during_checkout_is_replayed_in_order() {
        let mut entity = detached_entity();
        let watcher = TransformWatcher::default();
        let notifications = Rc::clone(&watcher.notifications);
        entity.attach_behavior(Box::new(watcher));

        let lent = entity.check_out_behaviors().unwrap();
        entity.set_position(Vec3::new(1.0, 0.0, 0.0));
        assert!(entity.recompute_world_transform_if_dirty());
        let first = *entity.world_transform();
        entity.set_position(Vec3::new(2.0, 0.0, 0.0));
        assert!(entity.recompute_world_transform_if_dirty());
        let second = *entity.world_transform();

        entity.return_behaviors(lent);
        assert_eq!(*notifications.borrow(), vec![first, second]);

        let lent = entity.check_out_behaviors().unwrap();
        entity.return_behaviors(lent);
        assert_eq!(notifications.borrow().len(), 2);
    }
}
