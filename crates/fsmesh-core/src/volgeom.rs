//! Volume geometry and the affines derived from it.
//!
//! FreeSurfer surfaces store vertices in "tkreg" space, a frame centred on the
//! companion volume with a fixed axis convention. Mapping them to scanner (RAS)
//! space needs the volume's grid shape, voxel sizes, direction cosines and
//! centre, collected here as a [`VolGeom`].
//!
//! Both coordinate frames are reached from the same voxel-index space:
//!
//! ```text
//! tkreg  <--tkreg_affine--  index  --scanner_affine-->  scanner
//! ```
//!
//! so [`VolGeom::tkreg2scanner`] is `scanner_affine * tkreg_affine^-1`.

use std::collections::HashMap;

use glam::{DMat3, DMat4, DVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{FsMeshError, Result};
use crate::footer::VolumeInfo;

/// Axis convention of tkregister: index axes (i, j, k) map to (-x, -z, y).
const TKREG_COSINES: DMat3 = DMat3::from_cols(
    DVec3::new(-1.0, 0.0, 0.0),
    DVec3::new(0.0, 0.0, -1.0),
    DVec3::new(0.0, 1.0, 0.0),
);

/// The subset of an MGH volume header that describes its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MghHeader {
    /// Grid dimensions; the fourth entry is the frame count.
    pub dims: [i32; 4],
    /// Voxel spacing in millimetres.
    pub delta: [f64; 3],
    /// Direction cosines, one row per grid axis.
    pub mdc: [[f64; 3]; 3],
    /// Scanner coordinate of the volume centre.
    pub pxyz_c: [f64; 3],
}

/// Geometry of a voxel grid relative to scanner space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolGeom {
    /// Grid dimensions (I, J, K).
    pub shape: [i32; 3],
    /// Voxel spacing along each grid axis, in millimetres.
    pub zooms: DVec3,
    /// Direction cosines; column `c` is the scanner direction of grid axis `c`.
    pub cosines: DMat3,
    /// Scanner coordinate of the volume centre.
    pub c_ras: DVec3,
}

impl VolGeom {
    /// Creates a volume geometry from its parts.
    pub fn new(shape: [i32; 3], zooms: DVec3, cosines: DMat3, c_ras: DVec3) -> Self {
        Self {
            shape,
            zooms,
            cosines,
            c_ras,
        }
    }

    /// Builds the geometry described by an MGH volume header.
    pub fn from_mgh_header(header: &MghHeader) -> Self {
        let [i, j, k, _] = header.dims;
        Self {
            shape: [i, j, k],
            zooms: DVec3::from(header.delta),
            // Rows of `mdc` become columns: the transpose.
            cosines: DMat3::from_cols_array_2d(&header.mdc),
            c_ras: DVec3::from(header.pxyz_c),
        }
    }

    /// Builds the geometry stored in a surface file's footer.
    ///
    /// # Errors
    ///
    /// Returns [`FsMeshError::MissingKey`] if any of `volume`, `voxelsize`,
    /// `xras`, `yras`, `zras` or `cras` is absent.
    pub fn from_surf_footer(footer: &VolumeInfo) -> Result<Self> {
        let shape = required(footer.volume, "volume")?;
        let zooms = required(footer.voxelsize, "voxelsize")?;
        let xras = required(footer.xras, "xras")?;
        let yras = required(footer.yras, "yras")?;
        let zras = required(footer.zras, "zras")?;
        let cras = required(footer.cras, "cras")?;

        Ok(Self {
            shape,
            zooms: DVec3::from(zooms),
            cosines: DMat3::from_cols(DVec3::from(xras), DVec3::from(yras), DVec3::from(zras)),
            c_ras: DVec3::from(cras),
        })
    }

    /// Builds the geometry from flat GIFTI metadata (`VolGeomWidth`, `VolGeomX_R`, ...).
    ///
    /// The nine cosine entries are read with the R/A/S component as the outer
    /// loop and the X/Y/Z axis as the inner one, filling the matrix row-major.
    ///
    /// # Errors
    ///
    /// Returns [`FsMeshError::MissingKey`] for an absent key and
    /// [`FsMeshError::InvalidMetadataValue`] for a value that does not parse.
    pub fn from_gifti_metadata(meta: &HashMap<String, String>) -> Result<Self> {
        let shape = [
            meta_value::<i32>(meta, "VolGeomWidth")?,
            meta_value::<i32>(meta, "VolGeomHeight")?,
            meta_value::<i32>(meta, "VolGeomDepth")?,
        ];
        let zooms = DVec3::new(
            meta_value(meta, "VolGeomXsize")?,
            meta_value(meta, "VolGeomYsize")?,
            meta_value(meta, "VolGeomZsize")?,
        );

        let mut rows = [0.0; 9];
        let keys = "RAS"
            .chars()
            .flat_map(|row| "XYZ".chars().map(move |col| format!("VolGeom{col}_{row}")));
        for (slot, key) in rows.iter_mut().zip(keys) {
            *slot = meta_value(meta, &key)?;
        }

        let c_ras = DVec3::new(
            meta_value(meta, "VolGeomC_R")?,
            meta_value(meta, "VolGeomC_A")?,
            meta_value(meta, "VolGeomC_S")?,
        );

        Ok(Self {
            shape,
            zooms,
            cosines: DMat3::from_cols_array(&rows).transpose(),
            c_ras,
        })
    }

    /// Returns the shape as a floating point vector.
    pub fn shape_vec(&self) -> DVec3 {
        DVec3::new(
            f64::from(self.shape[0]),
            f64::from(self.shape[1]),
            f64::from(self.shape[2]),
        )
    }

    /// Affine from voxel indices to tkreg space.
    pub fn tkreg_affine(&self) -> DMat4 {
        let mat = scale_columns(TKREG_COSINES, self.zooms);
        from_matvec(mat, -(mat * self.shape_vec()) / 2.0)
    }

    /// Affine from voxel indices to scanner space.
    pub fn scanner_affine(&self) -> DMat4 {
        let mat = scale_columns(self.cosines, self.zooms);
        from_matvec(mat, self.c_ras - mat * self.shape_vec() / 2.0)
    }

    /// Affine from tkreg space to scanner space.
    ///
    /// # Errors
    ///
    /// Returns [`FsMeshError::SingularTransform`] if the tkreg affine cannot be
    /// inverted, which happens when a voxel size is zero.
    pub fn tkreg2scanner(&self) -> Result<DMat4> {
        let tkreg = self.tkreg_affine();
        if !tkreg.determinant().is_normal() {
            return Err(FsMeshError::SingularTransform);
        }
        Ok(self.scanner_affine() * tkreg.inverse())
    }
}

/// Assembles a homogeneous affine from a linear part and a translation.
pub fn from_matvec(mat: DMat3, vec: DVec3) -> DMat4 {
    DMat4::from_cols(
        mat.x_axis.extend(0.0),
        mat.y_axis.extend(0.0),
        mat.z_axis.extend(0.0),
        vec.extend(1.0),
    )
}

/// Applies an affine to every point, computing in double precision.
pub fn apply_affine(affine: &DMat4, points: &[Vec3]) -> Vec<Vec3> {
    points
        .iter()
        .map(|p| affine.transform_point3(p.as_dvec3()).as_vec3())
        .collect()
}

/// Scales column `c` of `mat` by `scale[c]`.
fn scale_columns(mat: DMat3, scale: DVec3) -> DMat3 {
    DMat3::from_cols(
        mat.x_axis * scale.x,
        mat.y_axis * scale.y,
        mat.z_axis * scale.z,
    )
}

fn required<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| FsMeshError::MissingKey(key.to_string()))
}

fn meta_value<T: std::str::FromStr>(meta: &HashMap<String, String>, key: &str) -> Result<T> {
    let raw = meta
        .get(key)
        .ok_or_else(|| FsMeshError::MissingKey(key.to_string()))?;
    raw.trim()
        .parse()
        .map_err(|_| FsMeshError::InvalidMetadataValue {
            key: key.to_string(),
            value: raw.clone(),
        })
}
