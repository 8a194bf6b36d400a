/// Transform - position, rotation and scale of a scene object

use glam::{Mat4, Quat, Vec3};

/// Local transform of a scene object
///
/// Composed as scale, then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Orientation quaternion (x, y, z, w)
    pub rotation: Quat,
    /// Non-uniform scale
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, unit scale)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// World matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
