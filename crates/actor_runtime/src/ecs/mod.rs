//! Entity registry, behaviors and the per-tick update pass
//!
//! Entities own an ordered list of [`Behavior`]s and a cached world transform.
//! The [`EntityRegistry`] drives them once per tick.

pub mod transform;
pub mod behavior;
pub mod entity;
pub mod context;
pub mod registry;
pub mod behaviors;

#[cfg(test)]
mod tests;

pub use transform::Pose;
pub use behavior::{AsAny, Behavior, BehaviorId, EntityHook, DEFAULT_UPDATE_ORDER};
pub use entity::{Entity, EntityState};
pub use context::TickContext;
pub use registry::{EntityId, EntityRegistry, TickStats};
