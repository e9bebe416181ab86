//! Endlessly scrolling background

use crate::assets::TextureHandle;
use crate::ecs::{Behavior, Entity, TickContext, DEFAULT_UPDATE_ORDER};
use crate::foundation::math::{Mat4, Mat4Ext, Vec2, Vec3};
use crate::render::{RenderContext, DEFAULT_DRAW_ORDER};

/// One screen-sized background panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundLayer {
    /// Texture drawn for this panel
    pub texture: TextureHandle,
    /// Offset from the owner, in screen units
    pub offset: Vec2,
}

/// Horizontal loop across N equal-width layers
///
/// Layer `i` starts at `i * screen_width`. Every update moves all layers by
/// `scroll_speed * delta_time`; a layer that has left the screen entirely
/// on the left jumps to just past the right edge of the last layer.
#[derive(Debug, Clone)]
pub struct ScrollingBackgroundBehavior {
    layers: Vec<BackgroundLayer>,
    screen_size: Vec2,
    scroll_speed: f32,
    draw_order: i32,
    update_order: i32,
}

impl ScrollingBackgroundBehavior {
    /// Create a background for a screen of `screen_size`
    pub fn new(screen_size: Vec2) -> Self {
        Self {
            layers: Vec::new(),
            screen_size,
            scroll_speed: 0.0,
            draw_order: DEFAULT_DRAW_ORDER,
            update_order: DEFAULT_UPDATE_ORDER,
        }
    }

    /// Builder pattern: Set draw order
    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.draw_order = draw_order;
        self
    }

    /// Builder pattern: Set update order
    pub fn with_update_order(mut self, update_order: i32) -> Self {
        self.update_order = update_order;
        self
    }

    /// Builder pattern: Set scroll speed
    pub fn with_scroll_speed(mut self, speed: f32) -> Self {
        self.scroll_speed = speed;
        self
    }

    /// Builder pattern: Set layers
    pub fn with_layers(mut self, textures: impl IntoIterator<Item = TextureHandle>) -> Self {
        self.set_layers(textures);
        self
    }

    /// Replace the layers, laying them out side by side from offset zero
    pub fn set_layers(&mut self, textures: impl IntoIterator<Item = TextureHandle>) {
        let width = self.screen_size.x;
        self.layers = textures
            .into_iter()
            .enumerate()
            .map(|(index, texture)| BackgroundLayer {
                texture,
                offset: Vec2::new(index as f32 * width, 0.0),
            })
            .collect();

        if self.layers.is_empty() {
            log::warn!("Scrolling background has no layers and will draw nothing");
        }
    }

    /// Layers in draw order
    pub fn layers(&self) -> &[BackgroundLayer] {
        &self.layers
    }

    /// Screen size the layers are laid out for
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Set screen size; takes effect on the next [`Self::set_layers`]
    pub fn set_screen_size(&mut self, screen_size: Vec2) {
        self.screen_size = screen_size;
    }

    /// Horizontal speed in units per second
    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    /// Set horizontal speed
    pub fn set_scroll_speed(&mut self, speed: f32) {
        self.scroll_speed = speed;
    }

    fn scroll(&mut self, delta_time: f32) {
        let width = self.screen_size.x;
        let wrap_to = (self.layers.len() as f32 - 1.0) * width - 1.0;

        for layer in &mut self.layers {
            layer.offset.x += self.scroll_speed * delta_time;
            if layer.offset.x < -width {
                layer.offset.x = wrap_to;
            }
        }
    }
}

impl Behavior for ScrollingBackgroundBehavior {
    fn update_order(&self) -> i32 {
        self.update_order
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>, delta_time: f32) {
        self.scroll(delta_time);
    }

    fn draw_order(&self) -> Option<i32> {
        Some(self.draw_order)
    }

    fn draw(&self, owner: &Entity, render: &mut dyn RenderContext) {
        let size = Mat4::new_nonuniform_scaling(&Vec3::new(self.screen_size.x, self.screen_size.y, 1.0));
        for layer in &self.layers {
            let transform = owner.world_transform() * Mat4::planar_translation(layer.offset) * size;
            render.draw_sprite(layer.texture, &transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityRegistry;
    use crate::render::{CommandBuffer, DrawCommand};
    use approx::assert_relative_eq;

    fn three_layers() -> ScrollingBackgroundBehavior {
        ScrollingBackgroundBehavior::new(Vec2::new(100.0, 50.0))
            .with_scroll_speed(-50.0)
            .with_layers((0..3).map(|id| TextureHandle::new(id, 100, 50)))
    }

    fn offsets(background: &ScrollingBackgroundBehavior) -> Vec<f32> {
        background.layers().iter().map(|layer| layer.offset.x).collect()
    }

    #[test]
    fn test_layers_start_side_by_side() {
        assert_eq!(offsets(&three_layers()), vec![0.0, 100.0, 200.0]);
    }

    #[test]
    fn test_update_order_sets_position_in_behavior_list() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.attach_behavior(id, three_layers());
        registry.attach_behavior(id, three_layers().with_update_order(5));

        let entity = registry.entity(id).expect("entity is live");
        assert_eq!(entity.update_orders().collect::<Vec<_>>(), [5, DEFAULT_UPDATE_ORDER]);
    }

    #[test]
    fn test_first_layer_wraps_past_last() {
        let mut background = three_layers();

        background.scroll(1.0);
        background.scroll(1.0);
        assert_eq!(offsets(&background), vec![-100.0, 0.0, 100.0]);

        background.scroll(1.0);
        assert_eq!(offsets(&background), vec![199.0, -50.0, 50.0]);
    }

    #[test]
    fn test_set_layers_replaces_previous_layers() {
        let mut background = three_layers();
        background.set_layers([TextureHandle::new(9, 100, 50)]);
        assert_eq!(background.layers().len(), 1);
        assert_relative_eq!(background.layers()[0].offset.x, 0.0);
    }

    #[test]
    fn test_draws_every_layer_at_its_offset() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        registry.attach_behavior(id, three_layers());

        let mut buffer = CommandBuffer::new();
        registry.render(&mut buffer);
        assert_eq!(buffer.len(), 3);

        let x_offsets: Vec<f32> = buffer
            .commands()
            .iter()
            .map(|command| match command {
                DrawCommand::Sprite { world_transform, .. } => world_transform[(0, 3)],
                DrawCommand::Mesh { .. } => f32::NAN,
            })
            .collect();
        assert_eq!(x_offsets, vec![0.0, 100.0, 200.0]);

        if let DrawCommand::Sprite { world_transform, .. } = &buffer.commands()[0] {
            assert_relative_eq!(world_transform[(0, 0)], 100.0);
            assert_relative_eq!(world_transform[(1, 1)], 50.0);
        }
    }
}
