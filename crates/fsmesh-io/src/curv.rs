//! Reader for per-vertex morphometry files (`lh.curv`, `rh.sulc`, `lh.thickness`, ...).
//!
//! Two layouts exist, both big-endian:
//!
//! - new: magic `0xFFFFFF`, then `i32` vertex count, face count and values
//!   per vertex, then one `f32` per vertex
//! - old: three-byte vertex and face counts, then one `i16` per vertex in
//!   hundredths

use std::io::Cursor;
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{truncated, Result, SurfaceError};
use crate::surf::check_counts;

pub const NEW_CURV_MAGIC: u32 = 0x00FF_FFFF;

/// Reads per-vertex values from a morphometry file.
pub fn read_morph_data(path: impl AsRef<Path>) -> Result<Vec<f32>> {
    let path = path.as_ref();
    log::debug!("reading morphometry data from {}", path.display());
    let bytes = std::fs::read(path)?;
    parse_morph_data(&bytes)
}

/// Parses morphometry file contents.
pub fn parse_morph_data(bytes: &[u8]) -> Result<Vec<f32>> {
    let mut input = Cursor::new(bytes);
    let magic = input.read_u24::<BigEndian>().map_err(truncated)?;

    if magic != NEW_CURV_MAGIC {
        let nf = input.read_u24::<BigEndian>().map_err(truncated)?;
        let (nv, _) = check_counts(&input, i64::from(magic), i64::from(nf), 2, 0)?;
        let mut raw = vec![0i16; nv];
        input
            .read_i16_into::<BigEndian>(&mut raw)
            .map_err(truncated)?;
        return Ok(raw.into_iter().map(|v| f32::from(v) / 100.0).collect());
    }

    let nv = input.read_i32::<BigEndian>().map_err(truncated)?;
    let nf = input.read_i32::<BigEndian>().map_err(truncated)?;
    let per_vertex = input.read_i32::<BigEndian>().map_err(truncated)?;
    if per_vertex != 1 {
        return Err(SurfaceError::InvalidValuesPerVertex(per_vertex));
    }
    let (nv, _) = check_counts(&input, i64::from(nv), i64::from(nf), 4, 0)?;

    let mut values = vec![0.0f32; nv];
    input
        .read_f32_into::<BigEndian>(&mut values)
        .map_err(truncated)?;
    Ok(values)
}
