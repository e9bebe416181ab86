//! Self-destructing entities

use crate::ecs::{Behavior, TickContext};

/// Destroys its owner once `duration` seconds of updates have elapsed
///
/// A duration of zero or less never expires.
#[derive(Debug, Clone, Copy)]
pub struct LifetimeBehavior {
    duration: f32,
    elapsed: f32,
}

impl LifetimeBehavior {
    /// Create a lifetime of `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self { duration, elapsed: 0.0 }
    }

    /// Check if the lifetime has run out
    pub fn is_expired(&self) -> bool {
        self.duration > 0.0 && self.elapsed >= self.duration
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.duration - self.elapsed).max(0.0)
        }
    }
}

impl Behavior for LifetimeBehavior {
    fn update(&mut self, ctx: &mut TickContext<'_>, delta_time: f32) {
        self.elapsed += delta_time;
        if self.is_expired() {
            ctx.destroy_owner();
        }
    }
}
