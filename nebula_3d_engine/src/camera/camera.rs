/// Camera - compact perspective camera
///
/// Computes right-handed view/projection matrices for Vulkan conventions
/// (depth 0..1, Y flipped). The engine does NOT store or manage cameras;
/// the application owns one and feeds its view-projection into the frame
/// context each frame.

use glam::{Mat4, Vec3};

/// Perspective camera
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov_y_radians: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
}

impl Camera {
    /// Create a camera looking from `position` at `target`
    pub fn new(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_radians: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov_y_radians,
            aspect,
            z_near,
            z_far,
        }
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// View matrix (right-handed look-at)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Projection matrix (right-handed, depth 0..1, Y flipped for Vulkan)
    pub fn projection_matrix(&self) -> Mat4 {
        let mut projection = Mat4::perspective_rh(
            self.fov_y_radians,
            self.aspect,
            self.z_near,
            self.z_far,
        );
        // Vulkan clip space has Y pointing down
        projection.y_axis.y *= -1.0;
        projection
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio (called on viewport resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
