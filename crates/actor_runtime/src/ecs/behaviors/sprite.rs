//! Textured quad sized to its texture

use crate::assets::TextureHandle;
use crate::ecs::{Behavior, Entity, DEFAULT_UPDATE_ORDER};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{RenderContext, DEFAULT_DRAW_ORDER};

/// Draws one texture with the owner's world transform
///
/// The unit quad is scaled to the texture's pixel size before the owner's
/// transform is applied. Without a texture the behavior draws nothing.
#[derive(Debug, Clone)]
pub struct SpriteBehavior {
    texture: Option<TextureHandle>,
    draw_order: i32,
    update_order: i32,
}

impl Default for SpriteBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteBehavior {
    /// Create a sprite with no texture and default orders
    pub fn new() -> Self {
        Self {
            texture: None,
            draw_order: DEFAULT_DRAW_ORDER,
            update_order: DEFAULT_UPDATE_ORDER,
        }
    }

    /// Builder pattern: Set draw order (read once, on attach)
    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.draw_order = draw_order;
        self
    }

    /// Builder pattern: Set update order (read once, on attach)
    pub fn with_update_order(mut self, update_order: i32) -> Self {
        self.update_order = update_order;
        self
    }

    /// Builder pattern: Set texture
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Replace the texture
    pub fn set_texture(&mut self, texture: TextureHandle) {
        self.texture = Some(texture);
    }

    /// Remove the texture; the sprite stops drawing
    pub fn clear_texture(&mut self) {
        self.texture = None;
    }

    /// Current texture
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Texture size in pixels, zero without a texture
    pub fn texture_size(&self) -> (u32, u32) {
        self.texture.map_or((0, 0), |texture| (texture.width(), texture.height()))
    }

    /// Draw order this sprite registers with
    pub fn draw_order_key(&self) -> i32 {
        self.draw_order
    }

    /// Transform of the sized quad under `world_transform`
    pub fn quad_transform(&self, world_transform: &Mat4) -> Mat4 {
        let (width, height) = self.texture_size();
        world_transform * Mat4::new_nonuniform_scaling(&Vec3::new(width as f32, height as f32, 1.0))
    }
}

impl Behavior for SpriteBehavior {
    fn update_order(&self) -> i32 {
        self.update_order
    }

    fn draw_order(&self) -> Option<i32> {
        Some(self.draw_order)
    }

    fn draw(&self, owner: &Entity, render: &mut dyn RenderContext) {
        if let Some(texture) = self.texture {
            render.draw_sprite(texture, &self.quad_transform(owner.world_transform()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityRegistry;
    use crate::render::{CommandBuffer, DrawCommand};
    use approx::assert_relative_eq;

    #[test]
    fn test_sprite_without_texture_draws_nothing() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.attach_behavior(id, SpriteBehavior::new());
        assert_eq!(registry.draw_list().len(), 1);

        let mut buffer = CommandBuffer::new();
        registry.render(&mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_sprite_scales_quad_to_texture_size() {
        let texture = TextureHandle::new(7, 64, 32);
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.attach_behavior(id, SpriteBehavior::new().with_texture(texture));
        if let Some(entity) = registry.entity_mut(id) {
            entity.set_position(Vec3::new(10.0, 20.0, 0.0));
            entity.set_scale(2.0);
        }
        registry.tick(0.016);

        let mut buffer = CommandBuffer::new();
        registry.render(&mut buffer);

        let [DrawCommand::Sprite { texture: drawn, world_transform }] = buffer.commands() else {
            panic!("expected exactly one sprite command, got {:?}", buffer.commands());
        };
        assert_eq!(*drawn, texture);
        assert_relative_eq!(world_transform[(0, 0)], 128.0);
        assert_relative_eq!(world_transform[(1, 1)], 64.0);
        assert_relative_eq!(world_transform[(2, 2)], 2.0);
        assert_relative_eq!(world_transform[(0, 3)], 10.0);
        assert_relative_eq!(world_transform[(1, 3)], 20.0);
    }

    #[test]
    fn test_texture_size_defaults_to_zero() {
        let mut sprite = SpriteBehavior::new();
        assert_eq!(sprite.texture_size(), (0, 0));
        sprite.set_texture(TextureHandle::new(1, 3, 4));
        assert_eq!(sprite.texture_size(), (3, 4));
        sprite.clear_texture();
        assert_eq!(sprite.texture(), None);
    }
}
