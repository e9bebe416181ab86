//! Render hand-off
//!
//! The runtime does not talk to a graphics API. Drawable behaviors are kept in
//! a draw-order sorted [`DrawList`] owned by the registry, and each frame they
//! emit calls into whatever [`RenderContext`] the backend provides.

pub mod draw_list;
pub mod commands;

pub use draw_list::{DrawKey, DrawList};
pub use commands::{CommandBuffer, DrawCommand};

use crate::assets::{MeshHandle, TextureHandle};
use crate::foundation::math::Mat4;

/// Draw order assigned to drawable behaviors that do not override it
pub const DEFAULT_DRAW_ORDER: i32 = 100;

/// Opaque rendering backend
pub trait RenderContext {
    /// Draw a textured unit quad transformed by `world_transform`
    ///
    /// The transform already includes the sprite's pixel size.
    fn draw_sprite(&mut self, texture: TextureHandle, world_transform: &Mat4);

    /// Draw a mesh transformed by `world_transform`
    fn draw_mesh(&mut self, mesh: MeshHandle, world_transform: &Mat4);
}
