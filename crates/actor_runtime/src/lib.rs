//! # Actor Runtime
//!
//! Runtime core for small real-time simulations: a registry of live entities,
//! each carrying an ordered list of behaviors, driven by a per-tick update loop
//! that stays correct while entities and behaviors are created and destroyed
//! during that same tick.
//!
//! ## Features
//!
//! - **Entity Registry**: deferred insertion and deferred destruction around the update pass
//! - **Ordered Behaviors**: stable sort by update order, dispatched every tick
//! - **Cached World Transforms**: recomputed only when the pose is dirty
//! - **Render Hand-off**: draw-order sorted list walked into an external render context
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_runtime::prelude::*;
//!
//! let mut registry = EntityRegistry::new();
//! let ship = registry.create_entity();
//! registry.attach_behavior(ship, MoveBehavior::new().with_forward_speed(10.0));
//!
//! registry.tick(0.5);
//!
//! let position = registry.entity(ship).map(Entity::position);
//! assert_eq!(position, Some(Vec3::new(5.0, 0.0, 0.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod input;

mod application;
mod engine;

pub use application::{Application, AppError, FrameControl};
pub use engine::{Engine, EngineError};

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        Application, AppError, FrameControl,
        Engine, EngineError,
        foundation::{
            math::{Vec2, Vec3, Mat4, Quat},
            time::FrameTimer,
        },
        config::{Config, ConfigError, RuntimeConfig},
        ecs::{
            Behavior, BehaviorId, Entity, EntityHook, EntityId, EntityRegistry, EntityState,
            Pose, TickContext, TickStats, DEFAULT_UPDATE_ORDER,
            behaviors::{
                AnimatedSpriteBehavior, InputMoveBehavior, LifetimeBehavior, MeshBehavior,
                MoveBehavior, ScrollingBackgroundBehavior, SpriteBehavior,
            },
        },
        assets::{MeshHandle, TextureHandle},
        render::{CommandBuffer, DrawCommand, DrawList, RenderContext, DEFAULT_DRAW_ORDER},
        input::{KeyCode, KeyState},
    };
}
