pub mod polygon_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
///
/// Projective matrices are de-homogenized; a zero `w` leaves the affine part as is.
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    if (v.w - 1.0).abs() < TOLERANCE || v.w.abs() < TOLERANCE {
        Point3::new(v.x, v.y, v.z)
    } else {
        Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    }
}

/// Angle in radians between two unit vectors, robust to rounding past ±1.
#[must_use]
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn translation_moves_point() {
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let p = transform_point(&m, &Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn uniform_scale_applies() {
        let m = Matrix4::new_scaling(2.0);
        let p = transform_point(&m, &Point3::new(1.0, -1.0, 0.5));
        assert_relative_eq!(p, Point3::new(2.0, -2.0, 1.0));
    }

    #[test]
    fn angle_between_clamps_rounding() {
        let a = Vector3::new(0.0, 0.0, 1.0);
        let b = Vector3::new(0.0, 0.0, 1.000_000_000_000_1);
        assert_relative_eq!(angle_between(&a, &b), 0.0);
        assert_relative_eq!(angle_between(&a, &-a), std::f64::consts::PI);
    }
}
