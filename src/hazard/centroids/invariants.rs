//! Opt-in invariant assertions.
//!
//! Merges accept sets that break the shape or uniqueness rules, so nothing
//! here fires by default. Building with `check-invariants` (or
//! `strict-invariants`) turns [`InvariantCheck::assert_invariants`] into a
//! panic on the first violation.

use super::Centroids;
use crate::risk_error::RiskError;

/// Validation hook shared by structures with checkable invariants.
pub trait InvariantCheck {
    /// First violated invariant, if any.
    fn validate_invariants(&self) -> Result<(), RiskError>;

    /// Panics with `context` on a violation when invariant checking is
    /// compiled in; no-op otherwise.
    #[inline]
    fn assert_invariants(&self, context: &str) {
        #[cfg(any(feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] {context}: {e}");
        }
        #[cfg(not(any(feature = "strict-invariants", feature = "check-invariants")))]
        let _ = context;
    }
}

impl InvariantCheck for Centroids {
    fn validate_invariants(&self) -> Result<(), RiskError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duplicated_ids() -> Centroids {
        Centroids::from_points([(0.0, 0.0), (1.0, 1.0)], vec![4, 4])
    }

    #[test]
    fn validate_reports_violation() {
        assert_eq!(
            duplicated_ids().validate_invariants(),
            Err(RiskError::DuplicateIdentifier(4))
        );
    }

    #[cfg(not(any(feature = "strict-invariants", feature = "check-invariants")))]
    #[test]
    fn assert_is_silent_without_feature() {
        duplicated_ids().assert_invariants("duplicated ids");
    }

    #[cfg(any(feature = "strict-invariants", feature = "check-invariants"))]
    #[test]
    #[should_panic(expected = "[invariants] duplicated ids")]
    fn assert_panics_with_feature() {
        duplicated_ids().assert_invariants("duplicated ids");
    }
}
