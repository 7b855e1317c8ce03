//! Centroid merge engine.
//!
//! [`Centroids::append`] folds one centroid set into another, treating
//! coordinate-identical points as the same point:
//!
//! 1. empty base: the base becomes a copy of the incoming set;
//! 2. empty incoming: nothing changes;
//! 3. otherwise every incoming point is matched against the rows currently in
//!    the base (exact coordinate equality, lowest index wins). Unmatched
//!    points are appended with freshly minted identifiers starting at
//!    `max(base ids) + 1`; the incoming identifiers are discarded. Once the
//!    ids above the maximum run out at `i64::MAX`, minting continues with
//!    the smallest unused non-negative id.
//!
//! Region ids follow [`RegionIdPolicy`], decided once before any row moves.
//! The returned positions index the merged set, one per incoming point, so
//! callers can re-index data they keep in parallel with the incoming set.

use hashbrown::{HashMap, HashSet};

use super::invariants::InvariantCheck;
use super::{Centroids, LatLon};

/// Warning emitted when region ids are dropped by a merge.
pub const REGION_ID_DROPPED: &str = "Centroids.region_id is not going to be set.";

/// How region ids are carried through a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionIdPolicy {
    /// Both sides populated: keep base values, copy incoming values for new rows.
    Extend,
    /// Exactly one side populated: clear region ids on the merged set.
    Drop,
    /// Neither side populated.
    Absent,
}

impl RegionIdPolicy {
    pub fn decide(base: &Centroids, incoming: &Centroids) -> Self {
        match (base.has_region_id(), incoming.has_region_id()) {
            (true, true) => RegionIdPolicy::Extend,
            (false, false) => RegionIdPolicy::Absent,
            _ => RegionIdPolicy::Drop,
        }
    }
}

/// Exact-equality coordinate index, first inserted row wins.
///
/// `0.0` and `-0.0` share a key; NaN coordinates are never indexed, since
/// they never compare equal.
#[derive(Debug, Default)]
struct CoordLookup {
    rows: HashMap<(u64, u64), usize>,
}

impl CoordLookup {
    fn key(point: LatLon) -> Option<(u64, u64)> {
        if point.lat.is_nan() || point.lon.is_nan() {
            return None;
        }
        let bits = |v: f64| if v == 0.0 { 0u64 } else { v.to_bits() };
        Some((bits(point.lat), bits(point.lon)))
    }

    fn from_coords(coords: &[LatLon]) -> Self {
        let mut lookup = Self {
            rows: HashMap::with_capacity(coords.len()),
        };
        for (row, &point) in coords.iter().enumerate() {
            lookup.insert(point, row);
        }
        lookup
    }

    fn insert(&mut self, point: LatLon, row: usize) {
        if let Some(key) = Self::key(point) {
            self.rows.entry(key).or_insert(row);
        }
    }

    fn find(&self, point: LatLon) -> Option<usize> {
        Self::key(point).and_then(|key| self.rows.get(&key).copied())
    }
}

/// Source of fresh identifiers for appended rows.
///
/// Counts upward from `max + 1` while that does not overflow, then falls back
/// to the smallest non-negative id not yet in use.
#[derive(Debug)]
struct IdMinter {
    next: Option<i64>,
    used: Option<HashSet<i64>>,
    cursor: i64,
}

impl IdMinter {
    fn new(ids: &[i64]) -> Self {
        Self {
            next: ids.iter().copied().max().map_or(Some(0), |max| max.checked_add(1)),
            used: None,
            cursor: 0,
        }
    }

    /// Next free id; `ids` are the identifiers currently in the set.
    fn mint(&mut self, ids: &[i64]) -> i64 {
        if let Some(id) = self.next {
            self.next = id.checked_add(1);
            return id;
        }
        let used = self
            .used
            .get_or_insert_with(|| ids.iter().copied().collect());
        while used.contains(&self.cursor) {
            self.cursor += 1;
        }
        used.insert(self.cursor);
        self.cursor
    }
}

impl Centroids {
    /// Merges `other` into `self` and returns, for each point of `other`, its
    /// index in the merged set.
    ///
    /// Never fails: identifier collisions are resolved by minting new ids and
    /// region-id disagreements by dropping region ids with a warning. Run
    /// [`Centroids::check`] to validate inputs and output.
    pub fn append(&mut self, other: &Centroids) -> Vec<usize> {
        if self.is_empty() {
            *self = other.clone();
            return (0..other.size()).collect();
        }
        if other.is_empty() {
            return Vec::new();
        }

        let policy = RegionIdPolicy::decide(self, other);
        if policy == RegionIdPolicy::Drop {
            log::warn!("{REGION_ID_DROPPED}");
            self.region_id.clear();
        }

        let mut lookup = CoordLookup::from_coords(&self.coord);
        let mut minter = IdMinter::new(&self.id);
        let mut positions = Vec::with_capacity(other.size());

        for (k, &point) in other.coord.iter().enumerate() {
            if let Some(row) = lookup.find(point) {
                positions.push(row);
                continue;
            }
            let row = self.coord.len();
            self.coord.push(point);
            let id = minter.mint(&self.id);
            self.id.push(id);
            if policy == RegionIdPolicy::Extend {
                self.region_id.push(other.region_id[k]);
            }
            lookup.insert(point, row);
            positions.push(row);
        }

        self.tag.append(&other.tag);
        self.assert_invariants("Centroids::append");
        positions
    }
}
