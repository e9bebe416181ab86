//! Recorded draw commands
//!
//! [`CommandBuffer`] is a [`RenderContext`] that just records what it is
//! asked to draw. Headless runs and tests use it in place of a GPU backend.

use super::RenderContext;
use crate::assets::{MeshHandle, TextureHandle};
use crate::foundation::math::Mat4;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Textured quad
    Sprite {
        /// Texture to sample
        texture: TextureHandle,
        /// Final transform including the sprite size
        world_transform: Mat4,
    },
    /// Mesh instance
    Mesh {
        /// Mesh to draw
        mesh: MeshHandle,
        /// Owner world transform
        world_transform: Mat4,
    },
}

/// Render context recording draw calls in submission order
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every recorded command, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Textures drawn, in submission order
    pub fn sprite_textures(&self) -> Vec<TextureHandle> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Sprite { texture, .. } => Some(*texture),
                DrawCommand::Mesh { .. } => None,
            })
            .collect()
    }
}

impl RenderContext for CommandBuffer {
    fn draw_sprite(&mut self, texture: TextureHandle, world_transform: &Mat4) {
        self.commands.push(DrawCommand::Sprite { texture, world_transform: *world_transform });
    }

    fn draw_mesh(&mut self, mesh: MeshHandle, world_transform: &Mat4) {
        self.commands.push(DrawCommand::Mesh { mesh, world_transform: *world_transform });
    }
}
