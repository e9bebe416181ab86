//! Frame-cycling sprite

use super::SpriteBehavior;
use crate::assets::TextureHandle;
use crate::ecs::{Behavior, Entity, TickContext};
use crate::render::RenderContext;

/// Playback rate used when none is given
pub const DEFAULT_ANIMATION_FPS: f32 = 24.0;

/// Loop count past which the cursor is wrapped with a remainder instead
const MAX_WRAP_STEPS: f32 = 1.0e4;

/// Sprite that loops through a list of frames
///
/// The frame cursor is fractional: it advances by `fps * delta_time` each
/// update and the frame shown is `floor(cursor)`.
#[derive(Debug, Clone)]
pub struct AnimatedSpriteBehavior {
    sprite: SpriteBehavior,
    frames: Vec<TextureHandle>,
    current_frame: f32,
    fps: f32,
}

impl Default for AnimatedSpriteBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedSpriteBehavior {
    /// Create an animation with no frames at [`DEFAULT_ANIMATION_FPS`]
    pub fn new() -> Self {
        Self {
            sprite: SpriteBehavior::new(),
            frames: Vec::new(),
            current_frame: 0.0,
            fps: DEFAULT_ANIMATION_FPS,
        }
    }

    /// Builder pattern: Set draw order
    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.sprite = self.sprite.with_draw_order(draw_order);
        self
    }

    /// Builder pattern: Set update order
    pub fn with_update_order(mut self, update_order: i32) -> Self {
        self.sprite = self.sprite.with_update_order(update_order);
        self
    }

    /// Builder pattern: Set playback rate
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Builder pattern: Set frames
    pub fn with_frames(mut self, frames: Vec<TextureHandle>) -> Self {
        self.set_frames(frames);
        self
    }

    /// Replace the frames
    ///
    /// A non-empty list rewinds the cursor and shows the first frame.
    pub fn set_frames(&mut self, frames: Vec<TextureHandle>) {
        self.frames = frames;
        if let Some(&first) = self.frames.first() {
            self.current_frame = 0.0;
            self.sprite.set_texture(first);
        }
    }

    /// Frames in playback order
    pub fn frames(&self) -> &[TextureHandle] {
        &self.frames
    }

    /// Playback rate in frames per second
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Set playback rate
    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    /// Fractional frame cursor
    pub fn current_frame(&self) -> f32 {
        self.current_frame
    }

    /// Index of the frame being shown
    pub fn frame_index(&self) -> usize {
        if self.frames.is_empty() {
            return 0;
        }
        (self.current_frame as usize).min(self.frames.len() - 1)
    }

    /// Texture currently shown
    pub fn texture(&self) -> Option<TextureHandle> {
        self.sprite.texture()
    }

    /// Underlying sprite
    pub fn sprite(&self) -> &SpriteBehavior {
        &self.sprite
    }

    fn advance(&mut self, delta_time: f32) {
        if self.frames.is_empty() {
            return;
        }

        let count = self.frames.len() as f32;
        self.current_frame += self.fps * delta_time;
        if !self.current_frame.is_finite() {
            self.current_frame = 0.0;
        }

        // Repeated subtraction keeps precision for the usual small overshoot.
        if (self.current_frame / count).abs() > MAX_WRAP_STEPS {
            self.current_frame = self.current_frame.rem_euclid(count);
        }
        while self.current_frame >= count {
            self.current_frame -= count;
        }
        while self.current_frame < 0.0 {
            self.current_frame += count;
        }

        let frame = self.frames[self.frame_index()];
        self.sprite.set_texture(frame);
    }
}

impl Behavior for AnimatedSpriteBehavior {
    fn update_order(&self) -> i32 {
        self.sprite.update_order()
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>, delta_time: f32) {
        self.advance(delta_time);
    }

    fn draw_order(&self) -> Option<i32> {
        self.sprite.draw_order()
    }

    fn draw(&self, owner: &Entity, render: &mut dyn RenderContext) {
        self.sprite.draw(owner, render);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityRegistry;
    use crate::render::CommandBuffer;
    use approx::assert_relative_eq;

    fn frames(count: u64) -> Vec<TextureHandle> {
        (0..count).map(|id| TextureHandle::new(id, 16, 16)).collect()
    }

    #[test]
    fn test_set_frames_shows_first_frame() {
        let anim = AnimatedSpriteBehavior::new().with_frames(frames(3));
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.texture(), Some(TextureHandle::new(0, 16, 16)));
        assert_relative_eq!(anim.fps(), DEFAULT_ANIMATION_FPS);
    }

    #[test]
    fn test_full_loop_lands_on_first_frame() {
        let mut anim = AnimatedSpriteBehavior::new().with_frames(frames(4));

        anim.advance(4.0 / 24.0);

        assert_eq!(anim.frame_index(), 0);
        assert_relative_eq!(anim.current_frame(), 0.0);
        assert_eq!(anim.texture(), Some(TextureHandle::new(0, 16, 16)));
    }

    #[test]
    fn test_huge_step_wraps_without_looping() {
        let mut anim = AnimatedSpriteBehavior::new().with_frames(frames(4)).with_fps(1.0e10);

        anim.advance(0.05);

        assert!(anim.current_frame() >= 0.0 && anim.current_frame() < 4.0);
        assert!(anim.frame_index() < 4);

        anim.set_fps(-1.0e10);
        anim.advance(0.05);

        assert!(anim.current_frame() >= 0.0 && anim.current_frame() < 4.0);
    }

    #[test]
    fn test_cursor_accumulates_across_ticks() {
        let mut anim = AnimatedSpriteBehavior::new().with_frames(frames(4));

        anim.advance(2.5 / 24.0);
        assert_eq!(anim.frame_index(), 2);

        anim.advance(1.0 / 24.0);
        assert_eq!(anim.frame_index(), 3);
        assert_eq!(anim.texture(), Some(TextureHandle::new(3, 16, 16)));
    }

    #[test]
    fn test_large_step_wraps_several_times() {
        let mut anim = AnimatedSpriteBehavior::new().with_frames(frames(4)).with_fps(10.0);

        anim.advance(1.0);

        assert_eq!(anim.frame_index(), 2);
    }

    #[test]
    fn test_no_frames_is_inert() {
        let mut anim = AnimatedSpriteBehavior::new();
        anim.advance(1.0);
        assert_eq!(anim.texture(), None);
        assert_relative_eq!(anim.current_frame(), 0.0);
    }

    #[test]
    fn test_animation_through_registry() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_entity();
        let anim = registry.attach_behavior(id, AnimatedSpriteBehavior::new().with_frames(frames(4)));

        registry.tick(2.0 / 24.0);
        registry.tick(2.0 / 24.0);

        let entity = registry.entity(id).expect("entity is live");
        let behavior = entity.behavior::<AnimatedSpriteBehavior>(anim).expect("attached");
        assert_eq!(behavior.frame_index(), 0);

        let mut buffer = CommandBuffer::new();
        registry.render(&mut buffer);
        assert_eq!(buffer.sprite_textures(), vec![TextureHandle::new(0, 16, 16)]);
    }
}
