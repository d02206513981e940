use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::math::polygon_3d::polygon_normal;
use crate::math::{angle_between, Point3, Vector3, TOLERANCE};
use crate::mesh::Face;

/// Corners turning less than this (as a sine) say nothing reliable about
/// the plane they sit in.
const CORNER_MIN_SINE: f64 = 0.5;

/// Normals closer than this are stored once.
const NORMAL_EPS: f64 = 1e-9;

/// One use of an undirected edge by a face.
#[derive(Debug, Clone, Copy)]
struct EdgeUse {
    face: usize,
    from: usize,
}

/// A polygon together with the normals of everything fused into it.
///
/// `normals` holds the loop normal and every sharp corner normal of each
/// input polygon the region absorbed. Two regions may fuse only if every
/// pair of normals across them stays within the angle tolerance, so small
/// bends cannot add up past it however long the chain of merges gets.
#[derive(Debug, Clone)]
pub(super) struct Region {
    pub face: Face,
    normals: Vec<Vector3>,
}

impl Region {
    pub(super) fn new(face: Face, vertices: &[Point3]) -> Self {
        let normals = sampled_normals(&face, vertices);
        Self { face, normals }
    }

    /// Largest angle between any normal of `self` and any of `other` is within `tol`.
    fn fits(&self, other: &Self, tol: f64) -> bool {
        !self.normals.is_empty()
            && !other.normals.is_empty()
            && self
                .normals
                .iter()
                .all(|a| other.normals.iter().all(|b| angle_between(a, b) <= tol))
    }

    fn absorb(&mut self, other: Self, merged: Vec<usize>) {
        self.face.vertices = merged;
        for normal in other.normals {
            push_unique(&mut self.normals, normal);
        }
    }
}

/// Loop normal plus the normals of corners sharp enough to define a plane,
/// oriented to agree with the loop normal. Empty for a degenerate loop.
fn sampled_normals(face: &Face, vertices: &[Point3]) -> Vec<Vector3> {
    let points = face.points(vertices);
    let Some(normal) = polygon_normal(&points) else {
        return Vec::new();
    };

    let mut normals = vec![normal];
    let n = points.len();
    for i in 0..n {
        let incoming = points[i] - points[(i + n - 1) % n];
        let outgoing = points[(i + 1) % n] - points[i];
        let scale = incoming.norm() * outgoing.norm();
        if scale < TOLERANCE {
            continue;
        }
        let cross = incoming.cross(&outgoing);
        if cross.norm() / scale < CORNER_MIN_SINE {
            continue;
        }
        let corner = cross.normalize();
        push_unique(
            &mut normals,
            if corner.dot(&normal) < 0.0 { -corner } else { corner },
        );
    }
    normals
}

fn push_unique(normals: &mut Vec<Vector3>, normal: Vector3) {
    if !normals.iter().any(|n| (n - normal).norm() < NORMAL_EPS) {
        normals.push(normal);
    }
}

/// Outcome of a single dissolution pass.
pub(super) struct PassResult {
    pub regions: Vec<Region>,
    /// Shared edges removed by accepted merges.
    pub dissolved: usize,
    /// Candidate edges whose merge was refused.
    pub rejected: usize,
}

/// Runs one dissolution pass over `regions`.
///
/// Candidate edges are collected from the current polygons, then merged in
/// sorted `(face, face)` order with a union-find. Each surviving region sits
/// at the index of its lowest member, so output order follows the input order.
pub(super) fn dissolve_pass(regions: Vec<Region>, vertices: &[Point3], angle_tol: f64) -> PassResult {
    let faces: Vec<&Face> = regions.iter().map(|r| &r.face).collect();
    let (candidates, eligible) = collect_candidates(&faces, vertices, angle_tol);

    let mut parent: Vec<usize> = (0..regions.len()).collect();
    let mut slots: Vec<Option<Region>> = regions.into_iter().map(Some).collect();
    let mut dissolved = 0;
    let mut rejected = 0;

    for (fa, fb) in candidates {
        let ra = find(&mut parent, fa);
        let rb = find(&mut parent, fb);
        if ra == rb {
            continue;
        }
        let (keep, absorb) = (ra.min(rb), ra.max(rb));
        let (Some(kept), Some(absorbed)) = (&slots[keep], &slots[absorb]) else {
            continue;
        };

        if !kept.fits(absorbed, angle_tol) {
            rejected += 1;
            continue;
        }
        let Some((merged, cancelled)) =
            merge_loops(&kept.face.vertices, &absorbed.face.vertices, &eligible)
        else {
            rejected += 1;
            continue;
        };

        let (Some(absorbed), Some(kept)) = (slots[absorb].take(), slots[keep].as_mut()) else {
            continue;
        };
        kept.absorb(absorbed, merged);
        parent[absorb] = keep;
        dissolved += cancelled;
    }

    PassResult {
        regions: slots.into_iter().flatten().collect(),
        dissolved,
        rejected,
    }
}

/// Face pairs across edges eligible for dissolution, sorted and deduplicated,
/// plus the eligible undirected edges themselves.
///
/// An edge qualifies when exactly two faces use it, in opposite directions,
/// with equal materials and a dihedral angle within `angle_tol`.
fn collect_candidates(
    faces: &[&Face],
    vertices: &[Point3],
    angle_tol: f64,
) -> (Vec<(usize, usize)>, BTreeSet<(usize, usize)>) {
    let normals: Vec<Option<Vector3>> = faces.iter().map(|f| f.normal(vertices)).collect();

    let mut uses: BTreeMap<(usize, usize), Vec<EdgeUse>> = BTreeMap::new();
    for (face_idx, face) in faces.iter().enumerate() {
        for (from, to) in face.directed_edges() {
            uses.entry((from.min(to), from.max(to)))
                .or_default()
                .push(EdgeUse { face: face_idx, from });
        }
    }

    let mut candidates = Vec::new();
    let mut eligible = BTreeSet::new();
    for (&edge, edge_uses) in &uses {
        let [a, b] = edge_uses.as_slice() else {
            continue;
        };
        if a.face == b.face || a.from == b.from {
            continue;
        }
        if faces[a.face].material != faces[b.face].material {
            continue;
        }
        let (Some(na), Some(nb)) = (normals[a.face], normals[b.face]) else {
            continue;
        };
        if angle_between(&na, &nb) <= angle_tol {
            candidates.push((a.face.min(b.face), a.face.max(b.face)));
            eligible.insert(edge);
        }
    }
    candidates.sort_unstable();
    candidates.dedup();
    (candidates, eligible)
}

/// Union-find root lookup with path halving.
fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Fuses two loops by cancelling the edges one traverses opposite to the other.
///
/// Only edges in `eligible` may cancel; if the loops also share any other
/// edge (one a third face stands on) the merge is refused. Returns the fused
/// loop, starting at the first surviving edge of `a`, and the number of edges
/// cancelled. `None` if nothing cancels or the remaining edges do not form
/// exactly one simple loop (a ring around a hole, or two regions touching at
/// a single vertex).
pub(super) fn merge_loops(
    a: &[usize],
    b: &[usize],
    eligible: &BTreeSet<(usize, usize)>,
) -> Option<(Vec<usize>, usize)> {
    let directed = |l: &[usize]| {
        let n = l.len();
        (0..n).map(move |i| (l[i], l[(i + 1) % n])).collect::<Vec<_>>()
    };
    let edges: Vec<(usize, usize)> = directed(a).into_iter().chain(directed(b)).collect();

    let mut positions: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (i, &edge) in edges.iter().enumerate() {
        positions.entry(edge).or_default().push(i);
    }

    let mut live = vec![true; edges.len()];
    let mut cancelled = 0;
    for i in 0..edges.len() {
        if !live[i] {
            continue;
        }
        let (u, v) = edges[i];
        let partner = positions
            .get(&(v, u))
            .and_then(|js| js.iter().copied().find(|&j| j != i && live[j]));
        if let Some(j) = partner {
            if !eligible.contains(&(u.min(v), u.max(v))) {
                return None;
            }
            live[i] = false;
            live[j] = false;
            cancelled += 1;
        }
    }
    if cancelled == 0 {
        return None;
    }

    let remaining: Vec<(usize, usize)> = edges
        .iter()
        .zip(&live)
        .filter(|&(_, &alive)| alive)
        .map(|(&e, _)| e)
        .collect();
    if remaining.len() < 3 {
        return None;
    }

    let mut next: HashMap<usize, usize> = HashMap::with_capacity(remaining.len());
    for &(from, to) in &remaining {
        if next.insert(from, to).is_some() {
            return None;
        }
    }

    let start = remaining[0].0;
    let mut chain = Vec::with_capacity(remaining.len());
    let mut current = start;
    loop {
        chain.push(current);
        current = *next.get(&current)?;
        if current == start {
            break;
        }
        if chain.len() > remaining.len() {
            return None;
        }
    }

    (chain.len() == remaining.len()).then_some((chain, cancelled))
}
