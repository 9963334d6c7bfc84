//! Shared fixtures: FreeSurfer triangle surfaces encoded on the fly.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};

/// Closed tetrahedron with outward winding.
pub const TETRA_VERTICES: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];
pub const TETRA_FACES: [[i32; 3]; 4] = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];

/// Footer of a conformed 256^3 volume centred at (1.5, -2.25, 3).
pub const CONFORMED_FOOTER: [&str; 8] = [
    "valid = 1  # volume info valid",
    "filename = ../mri/filled-pretess255.mgz",
    "volume = 256 256 256",
    "voxelsize = 1.000000000000000e+00 1.000000000000000e+00 1.000000000000000e+00",
    "xras   = -1.000000000000000e+00 0.000000000000000e+00 0.000000000000000e+00",
    "yras   = 0.000000000000000e+00 0.000000000000000e+00 -1.000000000000000e+00",
    "zras   = 0.000000000000000e+00 1.000000000000000e+00 0.000000000000000e+00",
    "cras   = 1.500000000000000e+00 -2.250000000000000e+00 3.000000000000000e+00",
];

/// Footer of an anisotropic volume with axes in LIA order.
pub const OBLIQUE_FOOTER: [&str; 8] = [
    "valid = 1  # volume info valid",
    "filename = ../mri/orig.mgz",
    "volume = 176 240 256",
    "voxelsize = 1.2 0.9 1.1",
    "xras   = 0 0 1",
    "yras   = -1 0 0",
    "zras   = 0 -1 0",
    "cras   = -4.5 12.75 -30",
];

/// Encodes a triangle surface with the new-style footer tag.
pub fn triangle_surface(vertices: &[[f32; 3]], faces: &[[i32; 3]], footer: &[&str]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xFF, 0xFE];
    out.extend_from_slice(b"created by fixture on Tue Feb  6 10:00:00 2024\n\n");
    out.write_i32::<BigEndian>(vertices.len() as i32).unwrap();
    out.write_i32::<BigEndian>(faces.len() as i32).unwrap();
    for v in vertices.iter().flatten() {
        out.write_f32::<BigEndian>(*v).unwrap();
    }
    for i in faces.iter().flatten() {
        out.write_i32::<BigEndian>(*i).unwrap();
    }
    if !footer.is_empty() {
        for tag in [2, 0, 20] {
            out.write_i32::<BigEndian>(tag).unwrap();
        }
        for line in footer {
            out.extend_from_slice(line.as_bytes());
            out.push(b'\n');
        }
    }
    out
}

/// Writes `bytes` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Writes the tetrahedron with the given footer to `dir/name`.
pub fn write_tetra(dir: &Path, name: &str, footer: &[&str]) -> PathBuf {
    write_file(dir, name, &triangle_surface(&TETRA_VERTICES, &TETRA_FACES, footer))
}

/// Encodes per-vertex values as a new-format curv file.
pub fn curv_bytes(values: &[f32]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xFF, 0xFF];
    out.write_i32::<BigEndian>(values.len() as i32).unwrap();
    out.write_i32::<BigEndian>(TETRA_FACES.len() as i32).unwrap();
    out.write_i32::<BigEndian>(1).unwrap();
    for v in values {
        out.write_f32::<BigEndian>(*v).unwrap();
    }
    out
}
