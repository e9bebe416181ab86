//! Entity pose and world matrix composition
//!
//! A [`Pose`] is a plain value: the legacy planar fields (uniform scale,
//! rotation about Z, XY offset) plus a 3-D position and orientation. The
//! world matrix applies them in a fixed order, scale innermost and the 3-D
//! translation outermost:
//!
//! ```text
//! world = T(position) * R(orientation) * T(planar_position) * Rz(planar_rotation) * S(scale)
//! ```

use crate::foundation::math::{axes, Mat4, Mat4Ext, Quat, Vec2, Vec3};

/// Spatial state of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Uniform scale factor
    pub scale: f32,

    /// Rotation about the Z axis in radians (planar)
    pub planar_rotation: f32,

    /// Offset in the XY plane (planar)
    pub planar_position: Vec2,

    /// World space position
    pub position: Vec3,

    /// World space orientation
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            scale: 1.0,
            planar_rotation: 0.0,
            planar_position: Vec2::zeros(),
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }
}

impl Pose {
    /// Identity pose
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builder pattern: Set 3-D position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set orientation
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Builder pattern: Set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Compose the world matrix
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.orientation.to_homogeneous()
            * Mat4::planar_translation(self.planar_position)
            * Mat4::rotation_z(self.planar_rotation)
            * Mat4::uniform_scale(self.scale)
    }

    /// Forward direction: the local forward axis rotated by the orientation
    pub fn forward(&self) -> Vec3 {
        self.orientation * axes::forward()
    }
}
