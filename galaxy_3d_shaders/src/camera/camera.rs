/// Camera - passive data container read by the global uniform setters.
///
/// The Camera computes nothing beyond products of what it stores. The caller
/// sets the matrices and the eye frame; the binder copies them into
/// `u_projTrans`, `u_viewTrans`, `u_cameraPosition` and friends once per
/// `begin`.

use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn new(view: Mat4, projection: Mat4, position: Vec3, direction: Vec3, up: Vec3) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
            position,
            direction,
            up,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Right-handed perspective camera looking from `position` at `target`
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let direction = (target - position).normalize_or_zero();
        let mut camera = Self::new(
            Mat4::look_at_rh(position, target, up),
            Mat4::perspective_rh(fov_y, aspect, near, far),
            position,
            direction,
            up,
        );
        camera.set_near_far(near, far);
        camera
    }

    // ===== GETTERS =====

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// (near, far) clip distances
    pub fn near_far(&self) -> Vec2 {
        Vec2::new(self.near, self.far)
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    pub fn set_eye(&mut self, position: Vec3, direction: Vec3, up: Vec3) {
        self.position = position;
        self.direction = direction;
        self.up = up;
    }

    pub fn set_near_far(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
