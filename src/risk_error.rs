//! RiskError: Unified error type for climrisk public APIs
//!
//! Validators, readers and the population-grid importer all report failures
//! through this one enum so callers can match on the exact failure kind
//! (missing file vs. malformed content vs. broken invariant).

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for climrisk operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// Number of identifiers differs from number of coordinates.
    #[error("Invalid Centroids.coord row size: {ids} != {coords}")]
    CoordShapeMismatch { ids: usize, coords: usize },
    /// Region ids are populated but not one per coordinate.
    #[error("Invalid Centroids.region_id size: {coords} != {region_ids}")]
    RegionIdShapeMismatch { coords: usize, region_ids: usize },
    /// Two centroids share the same identifier.
    #[error("There are centroids with the same identifier: {0}")]
    DuplicateIdentifier(i64),

    /// Input file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// File extension is not handled by the reader.
    #[error("Input file extension not supported: {0}")]
    UnsupportedExtension(String),
    /// A configured column is missing from a table.
    #[error("Not existing variable: column `{0}`")]
    MissingColumn(String),
    /// A configured nested field (matrix layout) is missing.
    #[error("Not existing variable: field `{0}`")]
    MissingField(String),
    /// A value exists but cannot be interpreted.
    #[error("malformed content: {0}")]
    MalformedContent(String),

    /// Bounding box with wrong arity, inverted bounds or out of range.
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
    /// Requested grid resolution is not delivered by the raster source.
    #[error("unsupported resolution: {0} arc-seconds (resampling is not available)")]
    UnsupportedResolution(u32),
    /// Raster band whose shape does not match its data.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RiskError {
    fn from(err: std::io::Error) -> Self {
        RiskError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_messages_carry_sizes() {
        let err = RiskError::CoordShapeMismatch { ids: 3, coords: 2 };
        assert_eq!(err.to_string(), "Invalid Centroids.coord row size: 3 != 2");
        let err = RiskError::RegionIdShapeMismatch {
            coords: 3,
            region_ids: 2,
        };
        assert_eq!(err.to_string(), "Invalid Centroids.region_id size: 3 != 2");
        let err = RiskError::DuplicateIdentifier(2);
        assert!(
            err.to_string()
                .starts_with("There are centroids with the same identifier")
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: RiskError = io.into();
        assert!(matches!(err, RiskError::Io(msg) if msg.contains("denied")));
    }
}
