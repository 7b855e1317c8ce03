//! Entity model: exposures, risk-mitigation measures and provenance tags.

pub mod exposures;
pub mod measures;
pub mod tag;
