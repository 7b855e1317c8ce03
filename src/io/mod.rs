//! I/O seams for tabular and raster inputs.
//!
//! climrisk does not decode spreadsheets, MATLAB files or GeoTIFFs itself.
//! Callers plug a file library in behind [`TableSource`] or [`RasterSource`];
//! the readers in [`crate::entity`] only map what those sources return onto
//! the entity model.

pub mod raster;
pub mod table;

pub use raster::RasterBand;
pub use table::{Cell, Table};

use crate::risk_error::RiskError;
use std::path::Path;

/// Provider of named tables (spreadsheet sheets, matrix-file structs).
pub trait TableSource {
    /// Read the table `name` from the file at `path`.
    ///
    /// Implementations return [`RiskError::MissingField`] when the file has
    /// no table of that name.
    fn read_table(&self, path: &Path, name: &str) -> Result<Table, RiskError>;
}

/// Provider of single-band rasters.
pub trait RasterSource {
    /// Resolution in arc-seconds at which [`RasterSource::read_band`]
    /// delivers cells.
    fn native_resolution(&self) -> u32 {
        30
    }

    /// Read the first band of the raster at `path`.
    fn read_band(&self, path: &Path) -> Result<RasterBand, RiskError>;
}

/// On-disk layout of a tabular input, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Legacy MATLAB `.mat` struct-of-arrays.
    Matrix,
    /// `.xlsx` / `.xls` workbook.
    Spreadsheet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, RiskError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "mat" => Ok(FileFormat::Matrix),
            "xlsx" | "xls" => Ok(FileFormat::Spreadsheet),
            _ => Err(RiskError::UnsupportedExtension(format!(".{ext}"))),
        }
    }
}

/// Fails with [`RiskError::FileNotFound`] unless `path` is an existing file.
pub fn ensure_file(path: &Path) -> Result<(), RiskError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(RiskError::FileNotFound(path.to_path_buf()))
    }
}
