//! Keyboard-steered movement

use super::MoveBehavior;
use crate::ecs::{Behavior, TickContext};
use crate::input::{KeyCode, KeyState};

/// [`MoveBehavior`] whose speeds are set from held keys every frame
///
/// Opposing keys cancel out. With no key held the entity stops.
#[derive(Debug, Clone)]
pub struct InputMoveBehavior {
    movement: MoveBehavior,
    max_forward_speed: f32,
    max_angular_speed: f32,
    forward_key: KeyCode,
    back_key: KeyCode,
    clockwise_key: KeyCode,
    counter_clockwise_key: KeyCode,
}

impl InputMoveBehavior {
    /// Create a mover steered with W/S and A/D
    pub fn new(max_forward_speed: f32, max_angular_speed: f32) -> Self {
        Self {
            movement: MoveBehavior::new(),
            max_forward_speed,
            max_angular_speed,
            forward_key: KeyCode::W,
            back_key: KeyCode::S,
            clockwise_key: KeyCode::D,
            counter_clockwise_key: KeyCode::A,
        }
    }

    /// Builder pattern: Set key bindings
    pub fn with_keys(
        mut self,
        forward: KeyCode,
        back: KeyCode,
        clockwise: KeyCode,
        counter_clockwise: KeyCode,
    ) -> Self {
        self.forward_key = forward;
        self.back_key = back;
        self.clockwise_key = clockwise;
        self.counter_clockwise_key = counter_clockwise;
        self
    }

    /// Builder pattern: Set update order
    pub fn with_update_order(mut self, update_order: i32) -> Self {
        self.movement = self.movement.with_update_order(update_order);
        self
    }

    /// Speeds chosen from the last key snapshot
    pub fn movement(&self) -> &MoveBehavior {
        &self.movement
    }

    fn steer(&mut self, keys: &KeyState) {
        let mut forward = 0.0;
        if keys.is_pressed(self.forward_key) {
            forward += self.max_forward_speed;
        }
        if keys.is_pressed(self.back_key) {
            forward -= self.max_forward_speed;
        }

        let mut angular = 0.0;
        if keys.is_pressed(self.counter_clockwise_key) {
            angular += self.max_angular_speed;
        }
        if keys.is_pressed(self.clockwise_key) {
            angular -= self.max_angular_speed;
        }

        self.movement.set_forward_speed(forward);
        self.movement.set_angular_speed(angular);
    }
}

impl Behavior for InputMoveBehavior {
    fn update_order(&self) -> i32 {
        self.movement.update_order()
    }

    fn process_input(&mut self, _ctx: &mut TickContext<'_>, keys: &KeyState) {
        self.steer(keys);
    }

    fn update(&mut self, ctx: &mut TickContext<'_>, delta_time: f32) {
        self.movement.apply(ctx.owner_mut(), delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityRegistry;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_keys_set_speeds() {
        let mut mover = InputMoveBehavior::new(300.0, 2.0);

        mover.steer(&KeyState::with_pressed([KeyCode::W, KeyCode::A]));
        assert_relative_eq!(mover.movement().forward_speed, 300.0);
        assert_relative_eq!(mover.movement().angular_speed, 2.0);

        mover.steer(&KeyState::with_pressed([KeyCode::S, KeyCode::D]));
        assert_relative_eq!(mover.movement().forward_speed, -300.0);
        assert_relative_eq!(mover.movement().angular_speed, -2.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut mover = InputMoveBehavior::new(300.0, 2.0);
        mover.steer(&KeyState::with_pressed([KeyCode::W, KeyCode::S, KeyCode::A, KeyCode::D]));
        assert_relative_eq!(mover.movement().forward_speed, 0.0);
        assert_relative_eq!(mover.movement().angular_speed, 0.0);
    }

    #[test]
    fn test_custom_bindings() {
        let mut mover = InputMoveBehavior::new(1.0, 1.0)
            .with_keys(KeyCode::Up, KeyCode::Down, KeyCode::Right, KeyCode::Left);
        mover.steer(&KeyState::with_pressed([KeyCode::W]));
        assert_relative_eq!(mover.movement().forward_speed, 0.0);
        mover.steer(&KeyState::with_pressed([KeyCode::Up]));
        assert_relative_eq!(mover.movement().forward_speed, 1.0);
    }

    #[test]
    fn test_input_then_tick_moves_entity() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.attach_behavior(id, InputMoveBehavior::new(10.0, 0.0));

        registry.process_input(&KeyState::with_pressed([KeyCode::W]));
        registry.tick(0.5);

        let entity = registry.entity(id).expect("entity is live");
        assert_relative_eq!(entity.position(), Vec3::new(5.0, 0.0, 0.0));

        registry.process_input(&KeyState::new());
        registry.tick(0.5);
        let entity = registry.entity(id).expect("entity is live");
        assert_relative_eq!(entity.position(), Vec3::new(5.0, 0.0, 0.0));
    }
}
