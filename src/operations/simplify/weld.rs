use std::collections::HashMap;

use crate::math::Point3;
use crate::mesh::Mesh;

/// Key for hashing points by grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PointKey {
    /// Cell of size `grid` containing `p`.
    #[allow(clippy::cast_possible_truncation)]
    fn cell(p: &Point3, grid: f64) -> Self {
        Self {
            x: (p.x / grid).floor() as i64,
            y: (p.y / grid).floor() as i64,
            z: (p.z / grid).floor() as i64,
        }
    }

    /// Exact bit pattern of `p`, with -0.0 folded onto +0.0.
    #[allow(clippy::cast_possible_wrap)]
    fn exact(p: &Point3) -> Self {
        let bits = |v: f64| (v + 0.0).to_bits() as i64;
        Self {
            x: bits(p.x),
            y: bits(p.y),
            z: bits(p.z),
        }
    }

    /// This cell and its 26 neighbours.
    fn around(self) -> impl Iterator<Item = Self> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).map(move |dz| Self {
                    x: self.x + dx,
                    y: self.y + dy,
                    z: self.z + dz,
                })
            })
        })
    }
}

/// Index every vertex should be referenced by: the lowest earlier vertex
/// within `grid` of it, or itself. A zero grid matches exact positions only.
fn canonical_indices(vertices: &[Point3], grid: f64) -> Vec<usize> {
    if grid <= 0.0 {
        let mut first_at: HashMap<PointKey, usize> = HashMap::with_capacity(vertices.len());
        return vertices
            .iter()
            .enumerate()
            .map(|(i, p)| *first_at.entry(PointKey::exact(p)).or_insert(i))
            .collect();
    }

    // Canonical vertices by cell; a match may sit across a cell boundary.
    let mut cells: HashMap<PointKey, Vec<usize>> = HashMap::with_capacity(vertices.len());
    let mut canonical = Vec::with_capacity(vertices.len());
    for (i, p) in vertices.iter().enumerate() {
        let key = PointKey::cell(p, grid);
        let found = key
            .around()
            .filter_map(|k| cells.get(&k))
            .flatten()
            .copied()
            .filter(|&j| (vertices[j] - p).norm() <= grid)
            .min();
        match found {
            Some(j) => canonical.push(j),
            None => {
                cells.entry(key).or_default().push(i);
                canonical.push(i);
            }
        }
    }
    canonical
}

/// Rewrites every loop so coincident vertices share the lowest index among them.
///
/// Vertices within `grid` of each other are coincident. Positions are
/// untouched; duplicates simply stop being referenced. Consecutive repeats
/// created by the rewrite are collapsed, and faces left with fewer than three
/// distinct vertices are dropped. Returns the number of faces dropped.
pub(super) fn unify_coincident(mesh: &mut Mesh, grid: f64) -> usize {
    let canonical = canonical_indices(&mesh.vertices, grid);

    let before = mesh.faces.len();
    mesh.faces.retain_mut(|face| {
        for v in &mut face.vertices {
            *v = canonical[*v];
        }
        face.vertices.dedup();
        while face.vertices.len() > 1 && face.vertices.first() == face.vertices.last() {
            face.vertices.pop();
        }
        face.vertices.len() >= 3
    });
    before - mesh.faces.len()
}
