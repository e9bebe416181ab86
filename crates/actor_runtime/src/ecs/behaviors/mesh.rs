//! Mesh drawn at the owner's world transform

use crate::assets::MeshHandle;
use crate::ecs::{Behavior, Entity};
use crate::render::{RenderContext, DEFAULT_DRAW_ORDER};

/// Draws a mesh with the owner's world transform, or nothing without one
#[derive(Debug, Clone)]
pub struct MeshBehavior {
    mesh: Option<MeshHandle>,
    draw_order: i32,
}

impl Default for MeshBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBehavior {
    /// Create a behavior with no mesh
    pub fn new() -> Self {
        Self { mesh: None, draw_order: DEFAULT_DRAW_ORDER }
    }

    /// Builder pattern: Set mesh
    pub fn with_mesh(mut self, mesh: MeshHandle) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Builder pattern: Set draw order
    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.draw_order = draw_order;
        self
    }

    /// Replace the mesh
    pub fn set_mesh(&mut self, mesh: MeshHandle) {
        self.mesh = Some(mesh);
    }

    /// Current mesh
    pub fn mesh(&self) -> Option<MeshHandle> {
        self.mesh
    }
}

impl Behavior for MeshBehavior {
    fn draw_order(&self) -> Option<i32> {
        Some(self.draw_order)
    }

    fn draw(&self, owner: &Entity, render: &mut dyn RenderContext) {
        if let Some(mesh) = self.mesh {
            render.draw_mesh(mesh, owner.world_transform());
        }
    }
}
