use super::{Point3, Vector3, TOLERANCE};

/// Unnormalized polygon normal by Newell's method.
///
/// Its length is twice the polygon area, so it stays meaningful for
/// non-convex and slightly non-planar loops.
#[must_use]
pub fn newell_vector(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

/// Unit normal of a polygon loop, or `None` for a degenerate (zero-area) loop.
#[must_use]
pub fn polygon_normal(points: &[Point3]) -> Option<Vector3> {
    if points.len() < 3 {
        return None;
    }
    let normal = newell_vector(points);
    let len = normal.norm();
    if len < TOLERANCE {
        return None;
    }
    Some(normal / len)
}

/// Arithmetic mean of the loop's vertex z-coordinates.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_z(points: &[Point3]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.z).sum::<f64>() / points.len() as f64
}

/// Checks if `b` lies on the straight segment from `a` to `c`.
///
/// `tol` bounds the sine of the turning angle at `b`, so the test does not
/// depend on edge lengths. Reversals (`c` back towards `a`) are not collinear.
#[must_use]
pub fn is_collinear(a: &Point3, b: &Point3, c: &Point3, tol: f64) -> bool {
    let ab = b - a;
    let bc = c - b;
    let (lab, lbc) = (ab.norm(), bc.norm());
    if lab < TOLERANCE || lbc < TOLERANCE {
        return false;
    }
    let cross = ab.cross(&bc).norm() / (lab * lbc);
    cross < tol && ab.dot(&bc) > 0.0
}
