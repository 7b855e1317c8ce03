#![cfg_attr(docsrs, feature(doc_cfg))]
//! # climrisk
//!
//! climrisk provides the data structures climate-risk models are assembled
//! from: hazard centroids, risk-mitigation measures and gridded population
//! exposure.
//!
//! ## Features
//! - [`Centroids`] with set-union merge semantics: coordinate-identical points
//!   collapse, new points get freshly minted identifiers, and the merged
//!   position of every incoming point is reported back
//! - Invariant validation through [`Centroids::check`] and the
//!   [`InvariantCheck`] trait
//! - [`Measures`] read from spreadsheet or MATLAB layouts with explicit
//!   field-name configuration
//! - GPW population raster cropping with an explicit column-major index
//!
//! ## File formats
//! climrisk does not decode `.xlsx`, `.mat` or GeoTIFF files. Implement
//! [`io::TableSource`] / [`io::RasterSource`] on top of the file library of
//! your choice and pass it to the readers.
//!
//! ## Logging
//! Warnings (for example region ids dropped by a merge) go through the `log`
//! facade; install any logger to see them.
//!
//! ## Cargo features
//! - `check-invariants` / `strict-invariants`: validate centroids after every
//!   merge and panic on violations
//! - `rayon`: parallel column-major flattening of large grids

pub mod entity;
pub mod hazard;
pub mod io;
pub mod risk_error;

pub use entity::measures::{Measure, Measures};
pub use hazard::centroids::invariants::InvariantCheck;
pub use hazard::centroids::{Centroids, LatLon};
pub use risk_error::RiskError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::entity::exposures::gpw::{BoundingBox, GpwReadOptions, GpwTile, read_gpw};
    pub use crate::entity::measures::source::{MeasureReadOptions, read_measures};
    pub use crate::entity::measures::{Measure, Measures};
    pub use crate::entity::tag::Tag;
    pub use crate::hazard::centroids::append::RegionIdPolicy;
    pub use crate::hazard::centroids::invariants::InvariantCheck;
    pub use crate::hazard::centroids::{Centroids, LatLon};
    pub use crate::io::{Cell, RasterBand, RasterSource, Table, TableSource};
    pub use crate::risk_error::RiskError;
}
