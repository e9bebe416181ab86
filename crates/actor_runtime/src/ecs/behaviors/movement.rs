//! Velocity-driven pose integration

use crate::ecs::{Behavior, Entity, TickContext, DEFAULT_UPDATE_ORDER};
use crate::foundation::math::{axes, utils, Quat};

/// Turns the owner about the up axis and moves it along its forward vector
///
/// Speeds within the near-zero epsilon are skipped, so an idle mover never
/// touches the pose or dirties the world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBehavior {
    /// Units per second along the owner's forward vector
    pub forward_speed: f32,
    /// Radians per second about +Z
    pub angular_speed: f32,
    update_order: i32,
}

impl Default for MoveBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveBehavior {
    /// Create a stationary mover
    pub fn new() -> Self {
        Self {
            forward_speed: 0.0,
            angular_speed: 0.0,
            update_order: DEFAULT_UPDATE_ORDER,
        }
    }

    /// Builder pattern: Set forward speed
    pub fn with_forward_speed(mut self, speed: f32) -> Self {
        self.forward_speed = speed;
        self
    }

    /// Builder pattern: Set angular speed
    pub fn with_angular_speed(mut self, speed: f32) -> Self {
        self.angular_speed = speed;
        self
    }

    /// Builder pattern: Set update order
    pub fn with_update_order(mut self, update_order: i32) -> Self {
        self.update_order = update_order;
        self
    }

    /// Set forward speed
    pub fn set_forward_speed(&mut self, speed: f32) {
        self.forward_speed = speed;
    }

    /// Set angular speed
    pub fn set_angular_speed(&mut self, speed: f32) {
        self.angular_speed = speed;
    }

    /// Integrate one step onto `entity`'s pose
    ///
    /// The rotation is applied first, so the step forward follows the new
    /// heading.
    pub fn apply(&self, entity: &mut Entity, delta_time: f32) {
        if !utils::near_zero(self.angular_speed) {
            let increment = Quat::from_axis_angle(&axes::up(), self.angular_speed * delta_time);
            entity.set_orientation(increment * entity.orientation());
        }

        if !utils::near_zero(self.forward_speed) {
            let position = entity.position() + entity.forward() * self.forward_speed * delta_time;
            entity.set_position(position);
        }
    }
}

impl Behavior for MoveBehavior {
    fn update_order(&self) -> i32 {
        self.update_order
    }

    fn update(&mut self, ctx: &mut TickContext<'_>, delta_time: f32) {
        self.apply(ctx.owner_mut(), delta_time);
    }
}
