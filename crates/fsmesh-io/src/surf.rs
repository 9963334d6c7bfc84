//! Reader for FreeSurfer binary surface files (`lh.white`, `rh.pial`, ...).
//!
//! All values are big-endian. A file starts with a three-byte magic number:
//!
//! - `0xFFFFFE` triangle file: two text lines (create stamp and a blank line),
//!   `i32` vertex and face counts, `f32` coordinates, `i32` vertex indices,
//!   then an optional volume-geometry footer
//! - `0xFFFFFF` quad file: three-byte counts, `i16` coordinates in
//!   hundredths of a millimetre, three-byte indices per quad corner
//! - `0xFFFFFD` quad file with `f32` coordinates
//!
//! Quads are split into two triangles each.

use std::io::{BufRead, Cursor, Read};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use fsmesh_core::VolumeInfo;
use glam::Vec3;

use crate::error::{truncated, Result, SurfaceError};
use crate::footer::read_volume_info;

pub const TRIANGLE_MAGIC: u32 = 0x00FF_FFFE;
pub const QUAD_MAGIC: u32 = 0x00FF_FFFF;
pub const NEW_QUAD_MAGIC: u32 = 0x00FF_FFFD;

/// Raw contents of a surface file. Vertices are in tkreg space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceGeometry {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangles as zero-based vertex indices.
    pub faces: Vec<[i32; 3]>,
    /// Creation line of triangle files.
    pub create_stamp: Option<String>,
    /// Volume-geometry footer; empty when the file has none.
    pub volume_info: VolumeInfo,
}

/// Reads a surface file from disk.
pub fn read_geometry(path: impl AsRef<Path>) -> Result<SurfaceGeometry> {
    let path = path.as_ref();
    log::debug!("reading surface geometry from {}", path.display());
    let bytes = std::fs::read(path)?;
    parse_geometry(&bytes)
}

/// Parses surface file contents.
pub fn parse_geometry(bytes: &[u8]) -> Result<SurfaceGeometry> {
    let mut input = Cursor::new(bytes);
    let magic = input.read_u24::<BigEndian>().map_err(truncated)?;

    match magic {
        TRIANGLE_MAGIC => read_triangle_body(&mut input),
        QUAD_MAGIC | NEW_QUAD_MAGIC => read_quad_body(&mut input, magic == QUAD_MAGIC),
        other => Err(SurfaceError::InvalidMagic(other)),
    }
}

fn remaining(input: &Cursor<&[u8]>) -> u64 {
    (input.get_ref().len() as u64).saturating_sub(input.position())
}

/// Rejects counts whose payload cannot fit in the rest of the input.
pub(crate) fn check_counts(
    input: &Cursor<&[u8]>,
    vertices: i64,
    faces: i64,
    vertex_bytes: u64,
    face_bytes: u64,
) -> Result<(usize, usize)> {
    let invalid = || SurfaceError::InvalidCount { vertices, faces };
    let nv = u64::try_from(vertices).map_err(|_| invalid())?;
    let nf = u64::try_from(faces).map_err(|_| invalid())?;

    let needed = nv
        .checked_mul(vertex_bytes)
        .zip(nf.checked_mul(face_bytes))
        .and_then(|(a, b)| a.checked_add(b))
        .ok_or_else(invalid)?;
    if needed > remaining(input) {
        return Err(SurfaceError::Truncated);
    }

    Ok((
        usize::try_from(nv).map_err(|_| invalid())?,
        usize::try_from(nf).map_err(|_| invalid())?,
    ))
}

pub(crate) fn read_line(input: &mut Cursor<&[u8]>) -> Result<Option<String>> {
    let mut buf = Vec::new();
    input.read_until(b'\n', &mut buf)?;
    if buf.last() != Some(&b'\n') {
        return Ok(None);
    }
    buf.pop();
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

fn read_triangle_body(input: &mut Cursor<&[u8]>) -> Result<SurfaceGeometry> {
    let create_stamp = read_line(input)?.ok_or(SurfaceError::Truncated)?;
    read_line(input)?.ok_or(SurfaceError::Truncated)?;

    let nv = input.read_i32::<BigEndian>().map_err(truncated)?;
    let nf = input.read_i32::<BigEndian>().map_err(truncated)?;
    let (nv, nf) = check_counts(input, i64::from(nv), i64::from(nf), 12, 12)?;

    let mut coords = vec![0.0f32; nv * 3];
    input
        .read_f32_into::<BigEndian>(&mut coords)
        .map_err(truncated)?;
    let mut indices = vec![0i32; nf * 3];
    input
        .read_i32_into::<BigEndian>(&mut indices)
        .map_err(truncated)?;

    let volume_info = read_volume_info(input)?;

    Ok(SurfaceGeometry {
        vertices: coords.chunks_exact(3).map(Vec3::from_slice).collect(),
        faces: indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect(),
        create_stamp: Some(create_stamp),
        volume_info,
    })
}

fn read_quad_body(input: &mut Cursor<&[u8]>, fixed_point: bool) -> Result<SurfaceGeometry> {
    let nv = input.read_u24::<BigEndian>().map_err(truncated)?;
    let nq = input.read_u24::<BigEndian>().map_err(truncated)?;
    let coord_bytes = if fixed_point { 6 } else { 12 };
    let (nv, nq) = check_counts(input, i64::from(nv), i64::from(nq), coord_bytes, 12)?;

    let coords: Vec<f32> = if fixed_point {
        let mut raw = vec![0i16; nv * 3];
        input
            .read_i16_into::<BigEndian>(&mut raw)
            .map_err(truncated)?;
        raw.into_iter().map(|v| f32::from(v) / 100.0).collect()
    } else {
        let mut raw = vec![0.0f32; nv * 3];
        input
            .read_f32_into::<BigEndian>(&mut raw)
            .map_err(truncated)?;
        raw
    };

    let mut faces = Vec::with_capacity(nq * 2);
    for _ in 0..nq {
        let mut quad = [0i32; 4];
        for corner in &mut quad {
            // Three-byte values always fit in i32.
            *corner = input.read_i24::<BigEndian>().map_err(truncated)? & 0x00FF_FFFF;
        }
        faces.extend(split_quad(quad));
    }

    Ok(SurfaceGeometry {
        vertices: coords.chunks_exact(3).map(Vec3::from_slice).collect(),
        faces,
        create_stamp: None,
        volume_info: VolumeInfo::default(),
    })
}

/// Splits a quad into two triangles, choosing the diagonal by the parity of
/// its first vertex.
pub fn split_quad(quad: [i32; 4]) -> [[i32; 3]; 2] {
    let [a, b, c, d] = quad;
    if a % 2 == 0 {
        [[a, b, d], [c, d, b]]
    } else {
        [[a, b, c], [a, c, d]]
    }
}

/// Whether the bytes start with a known surface magic number.
pub fn has_surface_magic(bytes: &[u8]) -> bool {
    let mut input = Cursor::new(bytes);
    let mut magic = [0u8; 3];
    if input.read_exact(&mut magic).is_err() {
        return false;
    }
    let value = u32::from_be_bytes([0, magic[0], magic[1], magic[2]]);
    matches!(value, TRIANGLE_MAGIC | QUAD_MAGIC | NEW_QUAD_MAGIC)
}
