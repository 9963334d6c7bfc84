//! Per-vertex normal computation for triangle meshes.
//!
//! Normals are computed in four optional stages:
//! - Consistency: neighbouring triangles are re-wound so every shared edge is
//!   traversed in opposite directions
//! - Auto-orientation: each connected component is flipped, if needed, so its
//!   normals point outward
//! - Splitting: vertices on sharp creases are duplicated so each side gets
//!   its own normal
//! - Averaging: each vertex normal is the area-weighted mean of the normals of
//!   the triangles around it

use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Policy for [`crate::TriangleMesh::with_normals`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalsOptions {
    /// Duplicate vertices on edges sharper than `feature_angle_degrees`.
    pub splitting: bool,

    /// Crease angle used when splitting.
    pub feature_angle_degrees: f32,

    /// Re-wind triangles so that neighbours agree on orientation.
    pub consistency: bool,

    /// Flip each connected component so its normals point outward.
    pub auto_orient: bool,

    /// Reverse every triangle after orientation.
    pub flip: bool,
}

impl Default for NormalsOptions {
    fn default() -> Self {
        Self {
            splitting: false,
            feature_angle_degrees: 30.0,
            consistency: true,
            auto_orient: true,
            flip: false,
        }
    }
}

/// Result of [`compute_normals`].
#[derive(Debug, Clone)]
pub(crate) struct ComputedNormals {
    /// Input vertices followed by the copies made by splitting.
    pub vertices: Vec<Vec3>,
    /// Re-wound triangles, pointing at copies where splitting applied.
    pub triangles: Vec<[u32; 3]>,
    /// One unit normal per vertex; zero for unused vertices.
    pub normals: Vec<Vec3>,
    /// Source vertex of each copy, in the order the copies were appended.
    pub split_sources: Vec<u32>,
}

/// Computes per-vertex normals.
///
/// Vertices not used by any non-degenerate triangle get a zero normal.
///
/// # Panics
///
/// Panics if a triangle index is out of range; [`crate::TriangleMesh`]
/// validates indices before calling this.
pub(crate) fn compute_normals(
    vertices: &[Vec3],
    triangles: &[[u32; 3]],
    options: &NormalsOptions,
) -> ComputedNormals {
    let mut triangles = triangles.to_vec();

    if options.consistency || options.auto_orient {
        let (components, num_components) = traverse_components(&mut triangles, options.consistency);
        if options.auto_orient {
            orient_outward(vertices, &mut triangles, &components, num_components);
        }
    }

    if options.flip {
        for tri in &mut triangles {
            tri.swap(1, 2);
        }
    }

    let mut vertices = vertices.to_vec();
    let split_sources = if options.splitting {
        split_sharp_vertices(&mut vertices, &mut triangles, options.feature_angle_degrees)
    } else {
        Vec::new()
    };

    let normals = vertex_normals(&vertices, &triangles);
    ComputedNormals {
        vertices,
        triangles,
        normals,
        split_sources,
    }
}

/// Unit normal of a triangle, or zero if it is degenerate.
pub(crate) fn face_normal(vertices: &[Vec3], tri: [u32; 3]) -> Vec3 {
    let [v0, v1, v2] = tri.map(|i| vertices[i as usize]);
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

fn triangle_area(vertices: &[Vec3], tri: [u32; 3]) -> f32 {
    let [v0, v1, v2] = tri.map(|i| vertices[i as usize]);
    (v1 - v0).cross(v2 - v0).length() * 0.5
}

/// Area-weighted average of incident face normals.
fn vertex_normals(vertices: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for &tri in triangles {
        let weighted = face_normal(vertices, tri) * triangle_area(vertices, tri);
        for vi in tri {
            normals[vi as usize] += weighted;
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Maps each undirected edge to the triangles using it.
fn edge_faces(triangles: &[[u32; 3]]) -> HashMap<(u32, u32), Vec<usize>> {
    let mut map: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (face, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            map.entry(edge_key(tri[k], tri[(k + 1) % 3]))
                .or_default()
                .push(face);
        }
    }
    map
}

fn has_directed_edge(tri: [u32; 3], a: u32, b: u32) -> bool {
    (0..3).any(|k| tri[k] == a && tri[(k + 1) % 3] == b)
}

/// Breadth-first traversal over edge-adjacent triangles.
///
/// Returns the component index of every triangle and the component count.
/// With `make_consistent`, a neighbour that walks a shared edge in the same
/// direction as the current triangle is flipped.
fn traverse_components(triangles: &mut [[u32; 3]], make_consistent: bool) -> (Vec<usize>, usize) {
    let adjacency = edge_faces(triangles);
    let mut component = vec![usize::MAX; triangles.len()];
    let mut num_components = 0;
    let mut queue = VecDeque::new();

    for seed in 0..triangles.len() {
        if component[seed] != usize::MAX {
            continue;
        }
        component[seed] = num_components;
        queue.push_back(seed);

        while let Some(face) = queue.pop_front() {
            let tri = triangles[face];
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let Some(neighbours) = adjacency.get(&edge_key(a, b)) else {
                    continue;
                };
                for &other in neighbours {
                    if component[other] != usize::MAX {
                        continue;
                    }
                    if make_consistent && has_directed_edge(triangles[other], a, b) {
                        triangles[other].swap(1, 2);
                    }
                    component[other] = num_components;
                    queue.push_back(other);
                }
            }
        }

        num_components += 1;
    }

    (component, num_components)
}

/// Flips components whose normals point inward.
///
/// For each component the left-most vertex is located, and among the
/// triangles using it the one whose normal is most aligned with the x axis
/// decides: that normal must point towards -x.
fn orient_outward(
    vertices: &[Vec3],
    triangles: &mut [[u32; 3]],
    components: &[usize],
    num_components: usize,
) {
    let mut leftmost: Vec<Option<u32>> = vec![None; num_components];
    for (face, tri) in triangles.iter().enumerate() {
        let slot = &mut leftmost[components[face]];
        for &vi in tri {
            if slot.map_or(true, |cur| vertices[vi as usize].x < vertices[cur as usize].x) {
                *slot = Some(vi);
            }
        }
    }

    let mut deciding: Vec<Option<Vec3>> = vec![None; num_components];
    for (face, &tri) in triangles.iter().enumerate() {
        let c = components[face];
        if leftmost[c].map_or(true, |vi| !tri.contains(&vi)) {
            continue;
        }
        let normal = face_normal(vertices, tri);
        if deciding[c].map_or(true, |best| normal.x.abs() > best.x.abs()) {
            deciding[c] = Some(normal);
        }
    }

    for (face, tri) in triangles.iter_mut().enumerate() {
        if deciding[components[face]].is_some_and(|n| n.x > 0.0) {
            tri.swap(1, 2);
        }
    }
}

/// Duplicates vertices whose incident faces disagree by more than `angle_degrees`.
///
/// Incident faces are grouped greedily: a face joins the first group whose
/// seed normal is within the feature angle of its own. The first group keeps
/// the original vertex; every further group gets a copy. Returns the source
/// vertex of every copy.
fn split_sharp_vertices(
    vertices: &mut Vec<Vec3>,
    triangles: &mut [[u32; 3]],
    angle_degrees: f32,
) -> Vec<u32> {
    let cos_angle = angle_degrees.to_radians().cos();
    let face_normals: Vec<Vec3> = triangles.iter().map(|&t| face_normal(vertices, t)).collect();

    let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); vertices.len()];
    for (face, tri) in triangles.iter().enumerate() {
        for (corner, &vi) in tri.iter().enumerate() {
            incident[vi as usize].push((face, corner));
        }
    }

    let mut sources = Vec::new();
    let mut exhausted = false;
    for (vi, corners) in incident.iter().enumerate() {
        let mut groups: Vec<(Vec3, u32)> = Vec::new();
        for &(face, corner) in corners {
            let normal = face_normals[face];
            let found = groups
                .iter()
                .find(|(seed, _)| seed.dot(normal) >= cos_angle)
                .map(|&(_, target)| target);
            let target = match (found, groups.first()) {
                (Some(target), _) => target,
                (None, None) => {
                    groups.push((normal, triangles[face][corner]));
                    continue;
                }
                (None, Some(&(_, shared))) => match next_vertex_index(vertices.len()) {
                    Some(copy) => {
                        vertices.push(vertices[vi]);
                        sources.push(shared);
                        groups.push((normal, copy));
                        copy
                    }
                    None => {
                        if !exhausted {
                            log::warn!("vertex index space exhausted, crease vertices stay shared");
                            exhausted = true;
                        }
                        shared
                    }
                },
            };
            triangles[face][corner] = target;
        }
    }
    sources
}

/// Index of a vertex appended to `len` vertices, if `u32` can hold it.
fn next_vertex_index(len: usize) -> Option<u32> {
    u32::try_from(len).ok().filter(|&i| i != u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
        let vertices = vec![
            Vec3::splat(-0.5),
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
        ];
        // Every face wound inward.
        let triangles = vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
        (vertices, triangles)
    }

    fn centroid(vertices: &[Vec3]) -> Vec3 {
        vertices.iter().copied().sum::<Vec3>() / vertices.len() as f32
    }

    #[test]
    fn test_consistency_flips_neighbour() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)];
        let options = NormalsOptions {
            auto_orient: false,
            ..NormalsOptions::default()
        };
        let ComputedNormals {
            triangles, normals, ..
        } = compute_normals(&vertices, &[[0, 1, 2], [1, 2, 3]], &options);

        assert_eq!(triangles, vec![[0, 1, 2], [1, 3, 2]]);
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_auto_orient_points_outward() {
        let (vertices, triangles) = tetrahedron();
        let ComputedNormals {
            triangles: oriented,
            normals,
            ..
        } = compute_normals(&vertices, &triangles, &NormalsOptions::default());

        let center = centroid(&vertices);
        for &tri in &oriented {
            let mid = centroid(&tri.map(|i| vertices[i as usize]));
            assert!(face_normal(&vertices, tri).dot(mid - center) > 0.0);
        }
        for (v, n) in vertices.iter().zip(&normals) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(*v - center) > 0.0);
        }
    }

    #[test]
    fn test_flip_reverses_orientation() {
        let (vertices, triangles) = tetrahedron();
        let options = NormalsOptions {
            flip: true,
            ..NormalsOptions::default()
        };
        let normals = compute_normals(&vertices, &triangles, &options).normals;
        let center = centroid(&vertices);
        for (v, n) in vertices.iter().zip(&normals) {
            assert!(n.dot(*v - center) < 0.0);
        }
    }

    #[test]
    fn test_splitting_duplicates_crease_vertices() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let triangles = [[0, 1, 2], [1, 0, 3]];
        let options = NormalsOptions {
            splitting: true,
            consistency: false,
            auto_orient: false,
            ..NormalsOptions::default()
        };
        let ComputedNormals {
            vertices: split_verts,
            triangles: split_tris,
            normals,
            split_sources,
        } = compute_normals(&vertices, &triangles, &options);

        assert_eq!(split_verts.len(), 6);
        assert_eq!(split_sources, vec![0, 1]);
        assert_eq!(split_tris[0], [0, 1, 2]);
        for vi in split_tris[0] {
            assert!((normals[vi as usize] - Vec3::Z).length() < 1e-6);
        }
        for vi in split_tris[1] {
            assert!((normals[vi as usize] - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_no_splitting_shares_normals() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let options = NormalsOptions {
            auto_orient: false,
            ..NormalsOptions::default()
        };
        let result = compute_normals(&vertices, &[[0, 1, 2], [1, 0, 3]], &options);
        assert_eq!(result.vertices.len(), 4);
        assert!(result.split_sources.is_empty());
        let normals = result.normals;
        let shared = normals[0];
        assert!((shared - (Vec3::Y + Vec3::Z).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_isolated_vertex_has_zero_normal() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::splat(5.0)];
        let normals = compute_normals(&vertices, &[[0, 1, 2]], &NormalsOptions::default()).normals;
        assert_eq!(normals[3], Vec3::ZERO);
    }

    #[test]
    fn test_next_vertex_index_stays_in_u32() {
        assert_eq!(next_vertex_index(6), Some(6));
        assert_eq!(next_vertex_index(u32::MAX as usize - 1), Some(u32::MAX - 1));
        assert_eq!(next_vertex_index(u32::MAX as usize), None);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_next_vertex_index_beyond_u32() {
        assert_eq!(next_vertex_index(u32::MAX as usize + 1), None);
    }
}
