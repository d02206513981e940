mod face;
mod palette;

pub use face::Face;
pub use palette::{MaterialPalette, PaletteEntry};

use std::collections::BTreeSet;

use crate::error::MeshError;
use crate::math::Point3;

/// A polygon mesh in world space: vertices, faces and a material palette.
///
/// Edges are not stored; they are derived from the face loops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Polygons referencing `vertices` and `palette`.
    pub faces: Vec<Face>,
    /// Materials referenced by `faces`.
    pub palette: MaterialPalette,
}

impl Mesh {
    /// Creates a new, empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Checks the index invariants of every face.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: a loop shorter than three vertices,
    /// a vertex index past the vertex array, or a material index past the palette.
    pub fn validate(&self) -> Result<(), MeshError> {
        let count = self.vertices.len();
        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::ShortLoop {
                    face: face_idx,
                    len: face.len(),
                });
            }
            if let Some(&index) = face.vertices.iter().find(|&&v| v >= count) {
                return Err(MeshError::VertexOutOfRange {
                    face: face_idx,
                    index,
                    count,
                });
            }
            if face.material >= self.palette.len() {
                return Err(MeshError::MaterialOutOfRange {
                    face: face_idx,
                    index: face.material,
                    count: self.palette.len(),
                });
            }
        }
        Ok(())
    }

    /// Resolves a face's loop to positions.
    #[must_use]
    pub fn face_points(&self, face: &Face) -> Vec<Point3> {
        face.points(&self.vertices)
    }

    /// Unique undirected edges, each as `(low, high)`, in sorted order.
    #[must_use]
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let set: BTreeSet<(usize, usize)> = self
            .faces
            .iter()
            .flat_map(Face::directed_edges)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        set.into_iter().collect()
    }

    /// Minimum and maximum z over the vertices referenced by any face.
    #[must_use]
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.faces
            .iter()
            .flat_map(|f| f.vertices.iter())
            .map(|&i| self.vertices[i].z)
            .fold(None, |acc, z| match acc {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }

    /// Removes vertices not referenced by any face and renumbers the loops.
    ///
    /// Surviving vertices keep their relative order. Returns the number removed.
    pub fn prune_unreferenced(&mut self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for &v in &face.vertices {
                used[v] = true;
            }
        }

        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for (old, point) in self.vertices.iter().enumerate() {
            if used[old] {
                remap[old] = kept.len();
                kept.push(*point);
            }
        }

        let removed = self.vertices.len() - kept.len();
        if removed == 0 {
            return 0;
        }
        for face in &mut self.faces {
            for v in &mut face.vertices {
                *v = remap[*v];
            }
        }
        self.vertices = kept;
        removed
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::unit_cube;
    use super::*;

    #[test]
    fn cube_is_valid() {
        let cube = unit_cube();
        cube.validate().unwrap();
        assert_eq!(cube.edges().len(), 12);
        assert_eq!(cube.z_range(), Some((0.0, 1.0)));
    }

    #[test]
    fn validate_catches_bad_vertex() {
        let mut cube = unit_cube();
        cube.faces[3].vertices[1] = 8;
        assert!(matches!(
            cube.validate(),
            Err(MeshError::VertexOutOfRange {
                face: 3,
                index: 8,
                count: 8
            })
        ));
    }

    #[test]
    fn validate_catches_bad_material() {
        let mut cube = unit_cube();
        cube.faces[0].material = 1;
        assert!(matches!(
            cube.validate(),
            Err(MeshError::MaterialOutOfRange { face: 0, .. })
        ));
    }

    #[test]
    fn z_range_ignores_unreferenced_vertices() {
        let mut cube = unit_cube();
        cube.vertices.push(Point3::new(0.0, 0.0, 100.0));
        assert_eq!(cube.z_range(), Some((0.0, 1.0)));
    }

    #[test]
    fn prune_renumbers_loops() {
        let mut cube = unit_cube();
        cube.vertices.insert(0, Point3::new(9.0, 9.0, 9.0));
        for face in &mut cube.faces {
            for v in &mut face.vertices {
                *v += 1;
            }
        }
        assert_eq!(cube.prune_unreferenced(), 1);
        assert_eq!(cube, unit_cube());
    }

    #[test]
    fn empty_mesh_has_no_range() {
        assert_eq!(Mesh::new().z_range(), None);
    }
}
