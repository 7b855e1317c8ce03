//! Gridded Population of the World (GPW v4) import and cropping.
//!
//! # Grid layout
//! - Native resolution is 30 arc-seconds: 120 cells per degree.
//! - The native file is 17400 rows x 43200 cols and covers 85°N to 60°S over
//!   the full longitude range; the 5° north of 85°N are absent.
//! - Global grid indices count columns eastward from 180°W and rows
//!   southward from 90°N.
//!
//! # Limitations
//! - Decoding the GeoTIFF is delegated to a [`RasterSource`].
//! - No resampling: the requested resolution must be the one the source
//!   delivers.
//! - Cropping is by bounding box only; no country-shape clipping.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::entity::tag::Tag;
use crate::hazard::centroids::{Centroids, LatLon};
use crate::io::{RasterBand, RasterSource, ensure_file};
use crate::risk_error::RiskError;

/// File name of the GPW v4 2015 population count raster.
pub const FILENAME_GPW: &str = "gpw_v4_population_count_rev10_2015_30_sec.tif";
/// Native resolution in arc-seconds.
pub const NATIVE_RESOLUTION: u32 = 30;
/// Native raster shape (rows, cols).
pub const NATIVE_SHAPE: (usize, usize) = (17400, 43200);
/// Degrees between the north pole and the first GPW row.
const NORTH_GAP_DEG: i64 = 5;
const DOWNLOAD_URL: &str = "http://sedac.ciesin.columbia.edu/data/collection/gpw-v4/sets/browse";

/// Bounding box in ESRI order: min lon, min lat, max lon, max lat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const GLOBAL: BoundingBox = BoundingBox {
        min_lon: -180.0,
        min_lat: -90.0,
        max_lon: 180.0,
        max_lat: 90.0,
    };

    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Rejects non-finite, inverted or out-of-range boxes.
    pub fn validate(&self) -> Result<(), RiskError> {
        let all = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(RiskError::InvalidBoundingBox(
                "coordinates must be finite".into(),
            ));
        }
        if self.max_lat < self.min_lat {
            return Err(RiskError::InvalidBoundingBox(
                "Maximum latitude cannot be smaller than minimum latitude.".into(),
            ));
        }
        if self.max_lon < self.min_lon {
            return Err(RiskError::InvalidBoundingBox(
                "Maximum longitude cannot be smaller than minimum longitude.".into(),
            ));
        }
        if self.min_lat < -90.0 {
            return Err(RiskError::InvalidBoundingBox(
                "Minimum latitude cannot be smaller than -90.".into(),
            ));
        }
        if self.min_lon < -180.0 {
            return Err(RiskError::InvalidBoundingBox(
                "Minimum longitude cannot be smaller than -180.".into(),
            ));
        }
        if self.max_lat > 90.0 {
            return Err(RiskError::InvalidBoundingBox(
                "Maximum latitude cannot be larger than 90.".into(),
            ));
        }
        if self.max_lon > 180.0 {
            return Err(RiskError::InvalidBoundingBox(
                "Maximum longitude cannot be larger than 180.".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::GLOBAL
    }
}

impl TryFrom<&[f64]> for BoundingBox {
    type Error = RiskError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match *values {
            [min_lon, min_lat, max_lon, max_lat] => {
                let bbox = BoundingBox::new(min_lon, min_lat, max_lon, max_lat);
                bbox.validate()?;
                Ok(bbox)
            }
            _ => Err(RiskError::InvalidBoundingBox(format!(
                "expected 4 values, got {}",
                values.len()
            ))),
        }
    }
}

/// Inclusive cell range of a bounding box in the global grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridIndices {
    pub col_min: i64,
    pub row_min: i64,
    pub col_max: i64,
    pub row_max: i64,
}

fn steps_per_degree(resolution: u32) -> Result<i64, RiskError> {
    if resolution == 0 || 3600 % resolution != 0 {
        return Err(RiskError::UnsupportedResolution(resolution));
    }
    Ok(i64::from(3600 / resolution))
}

/// Maps `bbox` to inclusive global-grid indices at `resolution` arc-seconds.
///
/// Edges falling exactly on the east or south border of the globe are
/// clamped to the last cell.
pub fn coords_in_global_grid(
    bbox: &BoundingBox,
    resolution: u32,
) -> Result<GridIndices, RiskError> {
    bbox.validate()?;
    let steps = steps_per_degree(resolution)?;
    let last_col = 360 * steps - 1;
    let last_row = 180 * steps - 1;
    let col = |lon: f64| (((lon + 180.0) * steps as f64).floor() as i64).clamp(0, last_col);
    let row = |lat: f64| (((90.0 - lat) * steps as f64).floor() as i64).clamp(0, last_row);
    Ok(GridIndices {
        col_min: col(bbox.min_lon),
        row_min: row(bbox.max_lat),
        col_max: col(bbox.max_lon),
        row_max: row(bbox.min_lat),
    })
}

/// Flat position of cell (`row`, `col`) when a grid with `rows` rows is
/// flattened column by column.
#[inline]
pub const fn column_major_index(row: usize, col: usize, rows: usize) -> usize {
    col * rows + row
}

/// Inverse of [`column_major_index`].
#[inline]
pub const fn column_major_cell(index: usize, rows: usize) -> (usize, usize) {
    (index % rows, index / rows)
}

/// Flattens `band` column by column (all rows of column 0 first).
pub fn flatten_column_major(band: &RasterBand) -> Vec<f32> {
    let rows = band.rows();
    let mut out = vec![0.0f32; band.len()];
    if rows == 0 {
        return out;
    }
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(rows).enumerate().for_each(|(col, column)| {
            for (row, slot) in column.iter_mut().enumerate() {
                *slot = band.get(row, col);
            }
        });
    }
    #[cfg(not(feature = "rayon"))]
    for row in 0..rows {
        for (col, &v) in band.row(row).iter().enumerate() {
            out[column_major_index(row, col, rows)] = v;
        }
    }
    out
}

/// Crops a GPW band to global-grid indices `idx`.
///
/// Rows are shifted by the missing northern 5°. Rows outside the band
/// coverage are zero-filled so the result always spans
/// `row_max - row_min + 1` rows; columns are clamped to the band.
pub fn crop_band(band: &RasterBand, idx: &GridIndices, resolution: u32) -> Result<RasterBand, RiskError> {
    let steps = steps_per_degree(resolution)?;
    let n_rows = band.rows() as i64;
    let n_cols = band.cols() as i64;
    let row_min = idx.row_min - NORTH_GAP_DEG * steps;
    let row_max = idx.row_max - NORTH_GAP_DEG * steps;
    let col_min = idx.col_min.clamp(0, n_cols);
    let col_end = (idx.col_max + 1).clamp(col_min, n_cols);
    let width = (col_end - col_min) as usize;
    let height = (row_max - row_min + 1).max(0) as usize;

    if row_max < 0 || row_min >= n_rows {
        return Ok(RasterBand::zeros(height, width));
    }
    let top = (-row_min).max(0) as usize;
    let bottom = (row_max - (n_rows - 1)).max(0) as usize;
    let start = row_min.max(0) as usize;
    let end = (row_max + 1).min(n_rows) as usize;
    Ok(band
        .window(start..end, col_min as usize..col_end as usize)
        .pad_rows(top, bottom))
}

/// Crops a GPW band to `bbox`.
pub fn crop_to_bbox(
    band: &RasterBand,
    bbox: &BoundingBox,
    resolution: u32,
) -> Result<RasterBand, RiskError> {
    let idx = coords_in_global_grid(bbox, resolution)?;
    crop_band(band, &idx, resolution)
}

/// Options for [`read_gpw`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpwReadOptions {
    /// Directory holding [`FILENAME_GPW`].
    pub gpw_path: PathBuf,
    /// Output resolution in arc-seconds.
    pub resolution: u32,
    /// Crop window; `None` keeps the whole globe.
    pub cut_bbox: Option<BoundingBox>,
}

impl Default for GpwReadOptions {
    fn default() -> Self {
        Self {
            gpw_path: PathBuf::from("."),
            resolution: NATIVE_RESOLUTION,
            cut_bbox: None,
        }
    }
}

/// Population values of a cropped window, flattened column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GpwTile {
    pub values: Vec<f32>,
    pub rows: usize,
    pub cols: usize,
    /// West edge of the first column and cell width, degrees.
    pub lon: (f64, f64),
    /// North edge of the first row and cell height, degrees.
    pub lat: (f64, f64),
}

impl GpwTile {
    /// Centre of flat cell `index`.
    pub fn cell_center(&self, index: usize) -> LatLon {
        let (row, col) = column_major_cell(index, self.rows);
        LatLon::new(
            self.lat.0 - (row as f64 + 0.5) * self.lat.1,
            self.lon.0 + (col as f64 + 0.5) * self.lon.1,
        )
    }

    /// One centroid per value, in the same order as `values`.
    pub fn to_centroids(&self) -> Centroids {
        let coord = (0..self.values.len()).map(|i| self.cell_center(i));
        let ids = (1..=self.values.len() as i64).collect();
        Centroids::from_points(coord, ids).with_tag(Tag::new(FILENAME_GPW, "GPW population"))
    }
}

fn expected_shape(resolution: u32) -> (usize, usize) {
    let zoom = |n: usize| n * NATIVE_RESOLUTION as usize / resolution as usize;
    (zoom(NATIVE_SHAPE.0), zoom(NATIVE_SHAPE.1))
}

/// Imports the GPW raster through `source` and crops it to the configured
/// bounding box.
pub fn read_gpw(options: &GpwReadOptions, source: &dyn RasterSource) -> Result<GpwTile, RiskError> {
    let fname = options.gpw_path.join(FILENAME_GPW);
    if let Err(err) = ensure_file(&fname) {
        log::error!(
            "The file {} could not be found. Please download the file first or choose a \
             different folder. The data can be downloaded from {DOWNLOAD_URL}",
            fname.display()
        );
        return Err(err);
    }
    let resolution = options.resolution;
    steps_per_degree(resolution)?;
    if source.native_resolution() != resolution {
        log::error!(
            "GPW source delivers {} arc-seconds, {resolution} requested",
            source.native_resolution()
        );
        return Err(RiskError::UnsupportedResolution(resolution));
    }

    log::debug!("Trying to import the file {}", fname.display());
    let mut band = source.read_band(&fname).inspect_err(|e| {
        log::error!("Importing the GPW population density file failed: {e}");
    })?;
    band.clamp_negative();
    let expected = expected_shape(resolution);
    if band.shape() != expected {
        log::warn!(
            "GPW data dimensions mismatch. Actual dimensions: {} x {}",
            band.rows(),
            band.cols()
        );
        log::warn!("Expected dimensions: {}x{}.", expected.0, expected.1);
    }

    let bbox = options.cut_bbox.unwrap_or(BoundingBox::GLOBAL);
    let idx = coords_in_global_grid(&bbox, resolution)?;
    let crop = crop_band(&band, &idx, resolution)?;
    let step = 1.0 / (3600 / resolution) as f64;
    Ok(GpwTile {
        values: flatten_column_major(&crop),
        rows: crop.rows(),
        cols: crop.cols(),
        lon: (-180.0 + idx.col_min as f64 * step, step),
        lat: (90.0 - idx.row_min as f64 * step, step),
    })
}
