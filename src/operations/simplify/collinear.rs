use std::collections::BTreeSet;

use crate::math::polygon_3d::is_collinear;
use crate::mesh::Mesh;

/// Removes straight-through vertices left on fused boundaries.
///
/// A vertex goes only when exactly two distinct neighbours surround it across
/// all loops and it lies on the segment between them, with `sin_tol` bounding
/// the sine of the turn. Removal is all or nothing: if any loop using the
/// vertex would fall below three vertices, every loop keeps it, so no
/// T-junction is introduced. Returns the number of vertex uses removed.
pub(super) fn dissolve_collinear(mesh: &mut Mesh, sin_tol: f64) -> usize {
    let mut neighbours: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); mesh.vertices.len()];
    for face in &mesh.faces {
        for (a, b) in face.directed_edges() {
            neighbours[a].insert(b);
            neighbours[b].insert(a);
        }
    }

    let mut removable: Vec<bool> = neighbours
        .iter()
        .enumerate()
        .map(|(v, around)| {
            let mut it = around.iter();
            match (it.next(), it.next(), it.next()) {
                (Some(&a), Some(&b), None) => is_collinear(
                    &mesh.vertices[a],
                    &mesh.vertices[v],
                    &mesh.vertices[b],
                    sin_tol,
                ),
                _ => false,
            }
        })
        .collect();

    for face in &mesh.faces {
        let kept = face.vertices.iter().filter(|&&v| !removable[v]).count();
        if kept < 3 {
            for &v in &face.vertices {
                removable[v] = false;
            }
        }
    }

    let mut removed = 0;
    for face in &mut mesh.faces {
        let kept: Vec<usize> = face
            .vertices
            .iter()
            .copied()
            .filter(|&v| !removable[v])
            .collect();
        if kept.len() < face.vertices.len() {
            removed += face.vertices.len() - kept.len();
            face.vertices = kept;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::mesh::Face;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn mesh_with(vertices: Vec<Point3>, faces: Vec<Face>) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.palette.intern(None);
        mesh.vertices = vertices;
        mesh.faces = faces;
        mesh
    }

    #[test]
    fn removes_mid_vertex_on_boundary() {
        let mut mesh = mesh_with(
            vec![
                p(0.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0), // collinear mid-point on bottom edge
                p(4.0, 0.0, 0.0),
                p(4.0, 4.0, 0.0),
                p(0.0, 4.0, 0.0),
            ],
            vec![Face::new(vec![0, 1, 2, 3, 4], 0)],
        );
        assert_eq!(dissolve_collinear(&mut mesh, 1e-8), 1);
        assert_eq!(mesh.faces[0].vertices, vec![0, 2, 3, 4]);
    }

    #[test]
    fn keeps_t_junction() {
        // Vertex 1 sits on the bottom edge of face 0 but is also a corner of face 1
        let mut mesh = mesh_with(
            vec![
                p(0.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                p(4.0, 0.0, 0.0),
                p(4.0, 4.0, 0.0),
                p(0.0, 4.0, 0.0),
                p(2.0, -2.0, 0.0),
            ],
            vec![
                Face::new(vec![0, 1, 2, 3, 4], 0),
                Face::new(vec![0, 5, 1], 0),
            ],
        );
        assert_eq!(dissolve_collinear(&mut mesh, 1e-8), 0);
    }

    #[test]
    fn shared_mid_vertex_leaves_both_faces() {
        // Two stacked rectangles after their seam was dissolved elsewhere: vertex 2
        // lies on the shared vertical edge of both side faces.
        let mut mesh = mesh_with(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 0.0, 1.0),
                p(1.0, 0.0, 2.0),
                p(0.0, 0.0, 2.0),
                p(1.0, 1.0, 0.0),
                p(1.0, 1.0, 2.0),
            ],
            vec![
                Face::new(vec![0, 1, 2, 3, 4], 0),
                Face::new(vec![1, 5, 6, 3, 2], 0),
            ],
        );
        assert_eq!(dissolve_collinear(&mut mesh, 1e-8), 2);
        assert_eq!(mesh.faces[0].vertices, vec![0, 1, 3, 4]);
        assert_eq!(mesh.faces[1].vertices, vec![1, 5, 6, 3]);
    }

    #[test]
    fn vertex_stays_everywhere_when_one_loop_needs_it() {
        // Vertex 1 is straight-through, but dropping it would leave the
        // sliver [0, 1, 2] with two vertices; the quad must keep it too.
        let mut mesh = mesh_with(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                p(1.0, -1.0, 0.0),
            ],
            vec![
                Face::new(vec![0, 1, 2], 0),
                Face::new(vec![1, 0, 3, 2], 0),
            ],
        );
        assert_eq!(dissolve_collinear(&mut mesh, 1e-8), 0);
        assert_eq!(mesh.faces[1].vertices, vec![1, 0, 3, 2]);
    }

    #[test]
    fn gently_turning_boundary_is_kept() {
        // 0.5 degree turns are real shape, not noise
        let mut vertices = vec![p(0.0, 0.0, 0.0)];
        vertices.extend((0..40).map(|k| {
            let a = (0.5 * f64::from(k)).to_radians();
            p(100.0 * a.cos(), 100.0 * a.sin(), 0.0)
        }));
        let mut mesh = mesh_with(vertices, vec![Face::new((0..41).collect(), 0)]);
        assert_eq!(dissolve_collinear(&mut mesh, crate::math::TOLERANCE), 0);
        assert_eq!(mesh.faces[0].len(), 41);
    }

    #[test]
    fn triangle_is_never_reduced() {
        let mut mesh = mesh_with(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
            vec![Face::new(vec![0, 1, 2], 0)],
        );
        assert_eq!(dissolve_collinear(&mut mesh, 1e-8), 0);
    }
}
