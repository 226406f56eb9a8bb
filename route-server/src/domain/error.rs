//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from upstream/IO errors.

use super::InvalidCoordinate;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// The request selects no travel mode
    #[error("at least one travel mode must be enabled")]
    NoModesEnabled,

    /// A coordinate is outside WGS84 bounds
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    #[test]
    fn error_display() {
        let err = DomainError::NoModesEnabled;
        assert_eq!(err.to_string(), "at least one travel mode must be enabled");

        let err: DomainError = Coordinate::new(0.0, 200.0).unwrap_err().into();
        assert!(err.to_string().contains("longitude must be within"));
    }
}
