//! Volume-geometry footer of triangle surface files.
//!
//! The footer starts with a tag: either the single `i32` 20, or the three
//! `i32`s 2, 0, 20 written by newer tools. Eight `key = value` lines follow,
//! always in the order of [`FOOTER_KEYS`].

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use fsmesh_core::{VolumeInfo, FOOTER_KEYS};

use crate::error::{Result, SurfaceError};
use crate::surf::read_line;

const TAG_OLD_SURF_GEOM: i32 = 20;

/// Reads the footer at the current position.
///
/// Returns an empty [`VolumeInfo`] at end of input or when the tag is not
/// recognised.
pub(crate) fn read_volume_info(input: &mut Cursor<&[u8]>) -> Result<VolumeInfo> {
    let Ok(first) = input.read_i32::<BigEndian>() else {
        return Ok(VolumeInfo::default());
    };

    if first != TAG_OLD_SURF_GEOM {
        let rest = (
            input.read_i32::<BigEndian>(),
            input.read_i32::<BigEndian>(),
        );
        if !matches!((first, rest), (2, (Ok(0), Ok(TAG_OLD_SURF_GEOM)))) {
            log::warn!("unknown surface footer tag {first}, ignoring volume info");
            return Ok(VolumeInfo::default());
        }
    }

    let mut info = VolumeInfo::default();
    for key in FOOTER_KEYS {
        let line = read_line(input)?
            .ok_or_else(|| SurfaceError::InvalidFooter(format!("missing '{key}' line")))?;
        let value = split_pair(&line, key)?;

        match key {
            "valid" => info.valid = Some(value.to_string()),
            "filename" => info.filename = Some(value.to_string()),
            "volume" => info.volume = Some(parse_triple(value, key)?),
            "voxelsize" => info.voxelsize = Some(parse_triple(value, key)?),
            "xras" => info.xras = Some(parse_triple(value, key)?),
            "yras" => info.yras = Some(parse_triple(value, key)?),
            "zras" => info.zras = Some(parse_triple(value, key)?),
            _ => info.cras = Some(parse_triple(value, key)?),
        }
    }

    log::debug!("read surface footer: {info:?}");
    Ok(info)
}

/// Splits `key = value`, checking the key.
fn split_pair<'a>(line: &'a str, key: &str) -> Result<&'a str> {
    let mut parts = line.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(found), Some(value), None) if found.trim() == key => Ok(value.trim()),
        _ => Err(SurfaceError::InvalidFooter(format!(
            "expected '{key} = ...', found '{line}'"
        ))),
    }
}

fn parse_triple<T: std::str::FromStr + Copy>(value: &str, key: &str) -> Result<[T; 3]> {
    let invalid = || SurfaceError::InvalidFooter(format!("'{key}' needs three numbers, got '{value}'"));

    let parsed = value
        .split_whitespace()
        .map(|s| s.parse::<T>().map_err(|_| invalid()))
        .collect::<Result<Vec<T>>>()?;
    match parsed.as_slice() {
        &[a, b, c] => Ok([a, b, c]),
        _ => Err(invalid()),
    }
}
