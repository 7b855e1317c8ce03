//! Hazard-side data structures.

pub mod centroids;
