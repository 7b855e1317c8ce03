//! Hazard centroids: the geographic points hazard and exposure data hang on.
//!
//! A [`Centroids`] is a column store of per-point arrays that are index
//! aligned with [`Centroids::coord`]:
//! - `id`: unique integer identifier per point,
//! - `region_id`: optional classification (all points or none),
//! - `tag`: provenance of the whole set.
//!
//! Shape and uniqueness invariants are *not* enforced on mutation; call
//! [`Centroids::check`] before and after assembling a set. The merge engine
//! lives in [`append`].

pub mod append;
pub mod invariants;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;

use crate::entity::tag::Tag;
use crate::risk_error::RiskError;

/// A point on the globe in geographic coordinates (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Set of centroids with index-aligned per-point attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroids {
    /// Provenance of the set.
    pub tag: Tag,
    /// One (lat, lon) per point.
    pub coord: Vec<LatLon>,
    /// Identifier per point; must be unique.
    pub id: Vec<i64>,
    /// Region per point, or empty when not assigned.
    pub region_id: Vec<i64>,
}

// `other` in `append` is shared read-only; merges into distinct bases may run
// on different threads.
assert_impl_all!(Centroids: Send, Sync);

impl Centroids {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from coordinates and identifiers, without region ids.
    pub fn from_points<I, P>(points: I, ids: Vec<i64>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<LatLon>,
    {
        Self {
            tag: Tag::default(),
            coord: points.into_iter().map(Into::into).collect(),
            id: ids,
            region_id: Vec::new(),
        }
    }

    /// Sets the region ids (builder style).
    pub fn with_region_id(mut self, region_id: Vec<i64>) -> Self {
        self.region_id = region_id;
        self
    }

    /// Sets the provenance tag (builder style).
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    /// Number of points.
    #[inline]
    pub fn size(&self) -> usize {
        self.coord.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coord.is_empty()
    }

    /// Returns `true` when every point carries a region id.
    ///
    /// A non-empty `region_id` of the wrong length does not count as
    /// populated; [`Centroids::check`] reports it.
    #[inline]
    pub fn has_region_id(&self) -> bool {
        !self.region_id.is_empty() && self.region_id.len() == self.coord.len()
    }

    /// Latitude column.
    pub fn lat(&self) -> Vec<f64> {
        self.coord.iter().map(|c| c.lat).collect()
    }

    /// Longitude column.
    pub fn lon(&self) -> Vec<f64> {
        self.coord.iter().map(|c| c.lon).collect()
    }

    /// Lowest index whose coordinate equals `point` exactly.
    pub fn position_of(&self, point: LatLon) -> Option<usize> {
        self.coord.iter().position(|c| *c == point)
    }

    /// Validates shape and identifier invariants.
    ///
    /// Checked in order: identifier count against coordinate count, region id
    /// count against coordinate count (only when region ids are set), then
    /// identifier uniqueness. The first violation is returned.
    pub fn check(&self) -> Result<(), RiskError> {
        let n = self.coord.len();
        if self.id.len() != n {
            return Err(RiskError::CoordShapeMismatch {
                ids: self.id.len(),
                coords: n,
            });
        }
        if !self.region_id.is_empty() && self.region_id.len() != n {
            return Err(RiskError::RegionIdShapeMismatch {
                coords: n,
                region_ids: self.region_id.len(),
            });
        }
        if let Some(dup) = self.id.iter().duplicates().next() {
            return Err(RiskError::DuplicateIdentifier(*dup));
        }
        Ok(())
    }
}
