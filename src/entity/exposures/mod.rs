//! Exposure data sources.

pub mod gpw;
