use crate::math::polygon_3d::polygon_normal;
use crate::math::{Point3, Vector3};

/// A polygon: an ordered loop of vertex indices plus a material index.
///
/// The normal is never stored; it is recomputed from the loop whenever it is
/// needed so it cannot go stale after a loop is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Vertex indices in winding order (counter-clockwise seen from outside).
    pub vertices: Vec<usize>,
    /// Index into the owning mesh's material palette.
    pub material: usize,
}

impl Face {
    /// Creates a new face.
    #[must_use]
    pub fn new(vertices: Vec<usize>, material: usize) -> Self {
        Self { vertices, material }
    }

    /// Number of vertices in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the loop has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Directed edges of the loop as `(from, to)` pairs, closing back to the start.
    pub fn directed_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Resolves the loop against a vertex array.
    ///
    /// Callers must have validated the owning mesh first.
    #[must_use]
    pub fn points(&self, vertices: &[Point3]) -> Vec<Point3> {
        self.vertices.iter().map(|&i| vertices[i]).collect()
    }

    /// Unit normal of the loop, `None` if the loop is degenerate.
    #[must_use]
    pub fn normal(&self, vertices: &[Point3]) -> Option<Vector3> {
        polygon_normal(&self.points(vertices))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn directed_edges_close_the_loop() {
        let face = Face::new(vec![4, 7, 9], 0);
        let edges: Vec<_> = face.directed_edges().collect();
        assert_eq!(edges, vec![(4, 7), (7, 9), (9, 4)]);
    }

    #[test]
    fn normal_follows_winding() {
        let verts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let up = Face::new(vec![0, 1, 2], 0).normal(&verts).unwrap();
        let down = Face::new(vec![0, 2, 1], 0).normal(&verts).unwrap();
        assert!((up.z - 1.0).abs() < 1e-12);
        assert!((down.z + 1.0).abs() < 1e-12);
    }
}
