//! Triangle mesh produced by the surface loader.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::error::{FsMeshError, Result};
use crate::normals::{compute_normals, ComputedNormals, NormalsOptions};

/// An indexed triangle mesh with optional per-vertex normals and named
/// per-vertex scalars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    normals: Option<Vec<Vec3>>,
    scalars: BTreeMap<String, Vec<f32>>,
    /// Source vertex of each vertex appended by normal splitting.
    split_sources: Vec<u32>,
}

impl TriangleMesh {
    /// Creates a mesh from vertices and triangles.
    ///
    /// Returns an error if a triangle references a vertex that does not exist.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self> {
        let num_vertices = vertices.len();
        for (face, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= num_vertices) {
                return Err(FsMeshError::FaceIndexOutOfRange {
                    face,
                    index: i64::from(index),
                    num_vertices,
                });
            }
        }

        Ok(Self {
            vertices,
            triangles,
            ..Self::default()
        })
    }

    /// Creates a mesh from signed face indices as stored in surface files.
    pub fn from_signed_faces(vertices: Vec<Vec3>, faces: &[[i32; 3]]) -> Result<Self> {
        let triangles = faces
            .iter()
            .enumerate()
            .map(|(face, tri)| {
                let mut out = [0u32; 3];
                for (slot, &index) in out.iter_mut().zip(tri) {
                    *slot = u32::try_from(index).map_err(|_| FsMeshError::NegativeFaceIndex {
                        face,
                        index: i64::from(index),
                    })?;
                }
                Ok(out)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(vertices, triangles)
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the vertices.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Returns the triangles.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the per-vertex normals, if computed.
    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    /// Returns whether per-vertex normals are attached.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Returns the axis-aligned bounding box, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
        )
    }

    /// Returns a copy of this mesh with per-vertex normals computed under `options`.
    ///
    /// Triangle winding may change when consistency or auto-orientation is on,
    /// and vertices may be duplicated when splitting is on.
    ///
    /// Scalars already attached are extended to the copies.
    #[must_use]
    pub fn with_normals(&self, options: &NormalsOptions) -> Self {
        let ComputedNormals {
            vertices,
            triangles,
            normals,
            split_sources,
        } = compute_normals(&self.vertices, &self.triangles, options);

        let mut all_sources = self.split_sources.clone();
        all_sources.extend(split_sources.iter().map(|&s| self.source_vertex(s)));

        let scalars = self
            .scalars
            .iter()
            .map(|(name, values)| {
                let copies = split_sources.iter().map(|&s| values[s as usize]);
                (name.clone(), values.iter().copied().chain(copies).collect())
            })
            .collect();

        Self {
            vertices,
            triangles,
            normals: Some(normals),
            scalars,
            split_sources: all_sources,
        }
    }

    /// Number of vertices before normal splitting added copies.
    pub fn num_source_vertices(&self) -> usize {
        self.vertices.len() - self.split_sources.len()
    }

    /// Attaches a named per-vertex scalar array, replacing one of the same name.
    ///
    /// `values` holds one entry per vertex, or one per source vertex if
    /// splitting added copies; copies then take their source's value.
    pub fn add_vertex_scalar(&mut self, name: impl Into<String>, mut values: Vec<f32>) -> Result<()> {
        let name = name.into();
        if values.len() == self.num_source_vertices() && !self.split_sources.is_empty() {
            let copies: Vec<f32> = self
                .split_sources
                .iter()
                .map(|&s| values[s as usize])
                .collect();
            values.extend(copies);
        }

        if values.len() != self.vertices.len() {
            return Err(FsMeshError::ScalarCountMismatch {
                name,
                expected: self.num_source_vertices(),
                found: values.len(),
            });
        }
        self.scalars.insert(name, values);
        Ok(())
    }

    /// Returns the named per-vertex scalar array.
    pub fn vertex_scalar(&self, name: &str) -> Option<&[f32]> {
        self.scalars.get(name).map(Vec::as_slice)
    }

    /// Returns whether a scalar array with this name is attached.
    pub fn has_vertex_scalar(&self, name: &str) -> bool {
        self.scalars.contains_key(name)
    }

    /// Names of the attached scalar arrays, in sorted order.
    pub fn vertex_scalar_names(&self) -> impl Iterator<Item = &str> {
        self.scalars.keys().map(String::as_str)
    }

    fn source_vertex(&self, index: u32) -> u32 {
        let first_copy = self.num_source_vertices();
        match (index as usize).checked_sub(first_copy) {
            Some(copy) => self.split_sources[copy],
            None => index,
        }
    }

    /// Consumes the mesh, returning its vertices and triangles.
    pub fn into_parts(self) -> (Vec<Vec3>, Vec<[u32; 3]>) {
        (self.vertices, self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_verts() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::X, Vec3::Y]
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = TriangleMesh::new(triangle_verts(), vec![[0, 1, 3]]).unwrap_err();
        assert!(matches!(
            err,
            FsMeshError::FaceIndexOutOfRange {
                face: 0,
                index: 3,
                num_vertices: 3
            }
        ));
    }

    #[test]
    fn test_signed_faces() {
        let mesh = TriangleMesh::from_signed_faces(triangle_verts(), &[[0, 1, 2]]).unwrap();
        assert_eq!(mesh.triangles(), &[[0, 1, 2]]);
        assert!(!mesh.has_normals());

        let err = TriangleMesh::from_signed_faces(triangle_verts(), &[[0, -1, 2]]).unwrap_err();
        assert!(matches!(
            err,
            FsMeshError::NegativeFaceIndex { face: 0, index: -1 }
        ));
    }

    #[test]
    fn test_bounding_box() {
        let mesh = TriangleMesh::new(
            vec![Vec3::new(-1.0, 2.0, 0.5), Vec3::new(3.0, -4.0, 0.0)],
            Vec::new(),
        )
        .unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(max, Vec3::new(3.0, 2.0, 0.5));

        assert!(TriangleMesh::default().bounding_box().is_none());
    }

    #[test]
    fn test_with_normals_attaches_normals() {
        let mesh = TriangleMesh::new(triangle_verts(), vec![[0, 1, 2]]).unwrap();
        let with = mesh.with_normals(&NormalsOptions::default());
        assert_eq!(with.normals().map(<[Vec3]>::len), Some(3));
    }

    #[test]
    fn test_vertex_scalars() {
        let mut mesh = TriangleMesh::new(triangle_verts(), vec![[0, 1, 2]]).unwrap();
        mesh.add_vertex_scalar("lh.curv", vec![0.1, -0.2, 0.3]).unwrap();
        assert!(mesh.has_vertex_scalar("lh.curv"));
        assert_eq!(mesh.vertex_scalar("lh.curv"), Some(&[0.1, -0.2, 0.3][..]));
        assert_eq!(mesh.vertex_scalar_names().collect::<Vec<_>>(), ["lh.curv"]);

        let err = mesh.add_vertex_scalar("lh.sulc", vec![1.0; 4]).unwrap_err();
        assert!(matches!(
            err,
            FsMeshError::ScalarCountMismatch {
                expected: 3,
                found: 4,
                ..
            }
        ));
        assert!(!mesh.has_vertex_scalar("lh.sulc"));
    }

    #[test]
    fn test_scalars_follow_split_vertices() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let mut mesh = TriangleMesh::new(vertices, vec![[0, 1, 2], [1, 0, 3]]).unwrap();
        mesh.add_vertex_scalar("before", vec![10.0, 11.0, 12.0, 13.0])
            .unwrap();

        let options = NormalsOptions {
            splitting: true,
            auto_orient: false,
            ..NormalsOptions::default()
        };
        let mut split = mesh.with_normals(&options);
        assert_eq!(split.num_vertices(), 6);
        assert_eq!(split.num_source_vertices(), 4);
        assert_eq!(
            split.vertex_scalar("before"),
            Some(&[10.0, 11.0, 12.0, 13.0, 10.0, 11.0][..])
        );

        split
            .add_vertex_scalar("after", vec![0.0, 1.0, 2.0, 3.0])
            .unwrap();
        assert_eq!(
            split.vertex_scalar("after"),
            Some(&[0.0, 1.0, 2.0, 3.0, 0.0, 1.0][..])
        );
    }
}
