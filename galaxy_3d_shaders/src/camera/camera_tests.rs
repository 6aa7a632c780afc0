use glam::{Mat4, Vec2, Vec3};
use super::*;

fn test_camera() -> Camera {
    Camera::look_at(
        Vec3::new(0.0, 0.0, 5.0),
        Vec3::ZERO,
        Vec3::Y,
        std::f32::consts::FRAC_PI_4,
        16.0 / 9.0,
        0.1,
        100.0,
    )
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_look_at() {
    let camera = test_camera();
    assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
    assert_eq!(camera.direction(), Vec3::NEG_Z);
    assert_eq!(camera.up(), Vec3::Y);
    assert_eq!(camera.near_far(), Vec2::new(0.1, 100.0));
    assert_eq!(
        *camera.view_matrix(),
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
    );
}

#[test]
fn test_view_projection_matrix() {
    let camera = test_camera();
    let expected = *camera.projection_matrix() * *camera.view_matrix();
    assert_eq!(camera.view_projection_matrix(), expected);
}

#[test]
fn test_default_is_identity() {
    let camera = Camera::default();
    assert_eq!(camera.view_projection_matrix(), Mat4::IDENTITY);
}

// ============================================================================
// Setters store, compute nothing
// ============================================================================

#[test]
fn test_setters() {
    let mut camera = Camera::default();
    let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0);
    camera.set_projection(proj);
    camera.set_eye(Vec3::X, Vec3::NEG_X, Vec3::Z);
    camera.set_near_far(1.0, 2.0);

    assert_eq!(*camera.projection_matrix(), proj);
    assert_eq!(camera.position(), Vec3::X);
    assert_eq!(camera.direction(), Vec3::NEG_X);
    assert_eq!(camera.up(), Vec3::Z);
    assert_eq!(camera.near_far(), Vec2::new(1.0, 2.0));
}
