//! Reading surface files from disk through the public API.

use byteorder::{BigEndian, WriteBytesExt};
use fsmesh_io::{has_surface_magic, is_surface_file, read_geometry, SurfaceError, NEW_QUAD_MAGIC};
use glam::Vec3;

fn quad_file(magic: u32, vertices: &[[f32; 3]], quads: &[[u32; 4]]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u24::<BigEndian>(magic).unwrap();
    out.write_u24::<BigEndian>(vertices.len() as u32).unwrap();
    out.write_u24::<BigEndian>(quads.len() as u32).unwrap();
    for v in vertices.iter().flatten() {
        out.write_f32::<BigEndian>(*v).unwrap();
    }
    for i in quads.iter().flatten() {
        out.write_u24::<BigEndian>(*i).unwrap();
    }
    out
}

#[test]
fn test_float_quad_file() {
    let vertices = [
        [0.0, 0.0, 0.0],
        [1.5, 0.0, 0.0],
        [1.5, 2.5, 0.0],
        [0.0, 2.5, 0.0],
        [0.0, 2.5, -1.0],
    ];
    let bytes = quad_file(NEW_QUAD_MAGIC, &vertices, &[[0, 1, 2, 3], [1, 2, 4, 3]]);
    assert!(has_surface_magic(&bytes));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lh.sphere");
    std::fs::write(&path, bytes).unwrap();
    assert!(is_surface_file(&path));

    let surface = read_geometry(&path).unwrap();
    assert_eq!(surface.vertices[2], Vec3::new(1.5, 2.5, 0.0));
    assert_eq!(surface.vertices[4], Vec3::new(0.0, 2.5, -1.0));
    assert_eq!(
        surface.faces,
        vec![[0, 1, 3], [2, 3, 1], [1, 2, 4], [1, 4, 3]]
    );
    assert!(surface.create_stamp.is_none());
    assert!(surface.volume_info.is_empty());
}

#[test]
fn test_truncated_file_on_disk() {
    let bytes = quad_file(NEW_QUAD_MAGIC, &[[0.0, 0.0, 0.0]], &[[0, 0, 0, 0]]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rh.white");
    std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

    assert!(matches!(read_geometry(&path), Err(SurfaceError::Truncated)));
}
