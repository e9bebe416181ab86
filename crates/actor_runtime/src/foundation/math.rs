//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of helpers the runtime needs
//! to compose entity poses. Conventions: column vectors, +X is an entity's
//! forward direction and +Z is up.

pub use nalgebra::{
    Vector2, Vector3,
    Matrix4,
    UnitQuaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Tolerance below which a speed is treated as zero
    pub const NEAR_ZERO_EPSILON: f32 = 0.001;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Whether `value` lies within `epsilon` of zero (inclusive)
    pub fn near_zero_eps(value: f32, epsilon: f32) -> bool {
        value.abs() <= epsilon
    }

    /// Whether `value` lies within [`constants::NEAR_ZERO_EPSILON`] of zero
    pub fn near_zero(value: f32) -> bool {
        near_zero_eps(value, constants::NEAR_ZERO_EPSILON)
    }
}

/// Canonical axes of the runtime's coordinate frame
pub mod axes {
    use super::{Unit, Vec3};

    /// Local forward direction of an entity
    pub fn forward() -> Vec3 {
        Vec3::x()
    }

    /// World up axis, used for yaw rotations
    pub fn up() -> Unit<Vec3> {
        Vec3::z_axis()
    }
}

/// Extension trait for Mat4 with the constructors pose composition uses
pub trait Mat4Ext {
    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a uniform scale matrix (w row untouched)
    fn uniform_scale(scale: f32) -> Mat4;

    /// Create a translation in the XY plane
    fn planar_translation(offset: Vec2) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn uniform_scale(scale: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(scale, scale, scale))
    }

    fn planar_translation(offset: Vec2) -> Mat4 {
        Mat4::new_translation(&Vec3::new(offset.x, offset.y, 0.0))
    }
}
