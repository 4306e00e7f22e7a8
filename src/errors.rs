use thiserror::Error;

/// Failures surfaced by the sizing core and its data collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    /// A sizing parameter is outside its valid domain.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The irradiance/climate provider failed or returned nothing usable.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl DesignError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        DesignError::InvalidInput(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        DesignError::DataUnavailable(msg.into())
    }
}

impl From<reqwest::Error> for DesignError {
    fn from(e: reqwest::Error) -> Self {
        DesignError::DataUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(e: serde_json::Error) -> Self {
        DesignError::DataUnavailable(e.to_string())
    }
}

/// Rejects NaN, infinities and values `<= 0`.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, DesignError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DesignError::invalid(format!("{name} must be a positive finite number, got {value}")))
    }
}

/// Accepts values in `(0, 1]`.
pub(crate) fn require_fraction(name: &str, value: f64) -> Result<f64, DesignError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(DesignError::invalid(format!("{name} must lie in (0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_guard() {
        assert_eq!(require_positive("x", 2.5), Ok(2.5));
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", -1.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_positive("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_fraction_guard() {
        assert_eq!(require_fraction("dod", 1.0), Ok(1.0));
        assert!(require_fraction("dod", 0.0).is_err());
        assert!(require_fraction("dod", 1.01).is_err());
    }

    #[test]
    fn test_error_display() {
        let e = DesignError::unavailable("NASA POWER returned 500");
        assert_eq!(e.to_string(), "Data unavailable: NASA POWER returned 500");
    }
}
