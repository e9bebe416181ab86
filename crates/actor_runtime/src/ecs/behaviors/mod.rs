//! Built-in behaviors
//!
//! Sprite variants compose a [`SpriteBehavior`] instead of extending it.

pub mod sprite;
pub mod animated_sprite;
pub mod background;
pub mod movement;
pub mod input_move;
pub mod mesh;
pub mod lifetime;

pub use sprite::SpriteBehavior;
pub use animated_sprite::AnimatedSpriteBehavior;
pub use background::{BackgroundLayer, ScrollingBackgroundBehavior};
pub use movement::MoveBehavior;
pub use input_move::InputMoveBehavior;
pub use mesh::MeshBehavior;
pub use lifetime::LifetimeBehavior;
