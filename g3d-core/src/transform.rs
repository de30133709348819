//! 4x4 transform construction and composition.
//!
//! All matrices here follow the row-vector convention: a vector is a 1x4 row
//! multiplied on the left, `v' = v * M`, so the product `a * b` applies `a`
//! first and then `b`.

use nalgebra::Matrix4;

use crate::vector::Vector;

pub fn identity() -> Matrix4<f64> {
    Matrix4::identity()
}

/// Translation encoded in row 3, the row that multiplies against w = 1.
pub fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        x, y, z, 1.0,
    )
}

pub fn rotation_x(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, -s, 0.0, //
        0.0, s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

pub fn rotation_y(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    Matrix4::new(
        c, 0.0, s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

pub fn rotation_z(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    Matrix4::new(
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Perspective projection. After the divide by the output w (carried in the
/// third column), x and y land in normalized device coordinates and z maps
/// near -> 0, far -> `far`.
pub fn projection(aspect: f64, fov_scale: f64, near: f64, far: f64) -> Matrix4<f64> {
    Matrix4::new(
        aspect * fov_scale, 0.0, 0.0, 0.0, //
        0.0, fov_scale, 0.0, 0.0, //
        0.0, 0.0, far / (far - near), 1.0, //
        0.0, 0.0, (-far * near) / (far - near), 0.0,
    )
}

/// View matrix moving the world so the camera sits at the origin looking
/// down +z.
///
/// The supplied up vector is re-orthogonalized against the forward direction
/// (Gram-Schmidt) before building the basis. `target` must not equal
/// `position`.
pub fn look_at(position: &Vector, target: &Vector, up: &Vector) -> Matrix4<f64> {
    let forward = (*target - *position).normalize();
    let up = (*up - forward * up.dot(&forward)).normalize();
    let right = forward.cross(&up);
    Matrix4::new(
        right.x, up.x, forward.x, 0.0, //
        right.y, up.y, forward.y, 0.0, //
        right.z, up.z, forward.z, 0.0, //
        -position.dot(&right), -position.dot(&up), -position.dot(&forward), 1.0,
    )
}

/// Per-shape world matrix: rotation about x, then y, then z, then the
/// translation to the shape's location.
pub fn world(rotation: &Vector, location: &Vector) -> Matrix4<f64> {
    rotation_x(rotation.x)
        * rotation_y(rotation.y)
        * rotation_z(rotation.z)
        * translation(location.x, location.y, location.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_multiply() {
        let m = projection(0.5, 1.2, 0.1, 1000.0);
        assert!((identity() * m - m).norm() < 1e-12);
        assert!((m * identity() - m).norm() < 1e-12);
    }

    #[test]
    fn test_rotations_invert() {
        for m in [
            rotation_x(0.7) * rotation_x(-0.7),
            rotation_y(1.3) * rotation_y(-1.3),
            rotation_z(-0.4) * rotation_z(0.4),
        ] {
            assert!((m - Matrix4::identity()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_translation_moves_points() {
        let v = Vector::new(1.0, 1.0, 1.0);
        let out = v.transform(&translation(2.0, -3.0, 4.0));
        assert_eq!(out, Vector::with_w(3.0, -2.0, 5.0, 1.0));
    }

    #[test]
    fn test_projection_carries_depth_in_w() {
        let (near, far) = (0.1, 1000.0);
        let m = projection(1.0, 1.0, near, far);

        let at_near = Vector::new(0.0, 0.0, near).transform(&m);
        assert!((at_near.w - near).abs() < 1e-12);
        assert!(at_near.z.abs() < 1e-9);

        let at_far = Vector::new(0.0, 0.0, far).transform(&m);
        assert!((at_far.w - far).abs() < 1e-12);
        assert!((at_far.z - far).abs() < 1e-9);
    }

    #[test]
    fn test_look_at_centers_camera() {
        let position = Vector::new(3.0, -2.0, 7.0);
        let target = Vector::new(4.0, 0.0, 9.0);
        let up = Vector::new(0.0, 1.0, 0.0);
        let view = look_at(&position, &target, &up);

        // The camera position maps to the origin and the target lands on the
        // +z axis at its original distance.
        let origin = position.transform(&view);
        assert!(origin.x.abs() < 1e-12 && origin.y.abs() < 1e-12 && origin.z.abs() < 1e-12);

        let ahead = target.transform(&view);
        let distance = (target - position).length();
        assert!(ahead.x.abs() < 1e-9 && ahead.y.abs() < 1e-9);
        assert!((ahead.z - distance).abs() < 1e-9);
    }

    #[test]
    fn test_world_composition_order() {
        let rotation = Vector::new(0.1, 0.2, 0.3);
        let location = Vector::new(5.0, 6.0, 7.0);
        let expected =
            rotation_x(0.1) * rotation_y(0.2) * rotation_z(0.3) * translation(5.0, 6.0, 7.0);
        assert!((world(&rotation, &location) - expected).norm() < 1e-12);
    }
}
