//! Behavior trait and entity hooks
//!
//! A behavior is a unit of per-tick logic owned by exactly one entity. The
//! registry hands every callback a [`TickContext`] that reaches the owner and
//! the rest of the world, so behaviors never hold pointers back to either.

use std::any::Any;

use super::context::TickContext;
use super::entity::Entity;
use crate::foundation::math::Mat4;
use crate::input::KeyState;
use crate::render::RenderContext;

/// Update order assigned to behaviors that do not override it
pub const DEFAULT_UPDATE_ORDER: i32 = 100;

/// Identifier of a behavior within its owning entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BehaviorId(pub(crate) u32);

impl BehaviorId {
    /// Raw index, unique within the owning entity
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Upcast helper so trait objects can be downcast to their concrete type
pub trait AsAny: Any {
    /// View as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// View as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Attachable per-tick logic
///
/// All hooks default to no-ops. `update_order` is read once, when the behavior
/// is attached; lower orders run first and equal orders keep attach order.
pub trait Behavior: AsAny {
    /// Sort key for dispatch within the owning entity
    fn update_order(&self) -> i32 {
        DEFAULT_UPDATE_ORDER
    }

    /// Advance by `delta_time` seconds
    fn update(&mut self, _ctx: &mut TickContext<'_>, _delta_time: f32) {}

    /// React to this frame's key snapshot
    fn process_input(&mut self, _ctx: &mut TickContext<'_>, _keys: &KeyState) {}

    /// Called once each time the owner's world transform is recomputed
    fn on_world_transform_changed(&mut self, _world_transform: &Mat4) {}

    /// Draw order if this behavior renders anything
    ///
    /// Read once on attach; drawable behaviors are entered into the registry's
    /// draw list, sorted independently of update order.
    fn draw_order(&self) -> Option<i32> {
        None
    }

    /// Emit draw calls for this frame
    fn draw(&self, _owner: &Entity, _render: &mut dyn RenderContext) {}
}

/// Entity-level logic, run after the entity's behaviors
///
/// An entity carries at most one hook. It plays the role of the per-entity
/// override points: `update_entity` runs after every behavior has updated,
/// `entity_input` after every behavior has seen the input.
pub trait EntityHook: AsAny {
    /// Entity-specific update
    fn update_entity(&mut self, _ctx: &mut TickContext<'_>, _delta_time: f32) {}

    /// Entity-specific input handling
    fn entity_input(&mut self, _ctx: &mut TickContext<'_>, _keys: &KeyState) {}
}
