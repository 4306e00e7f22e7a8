//! ============================================================
//!  Battery thermal derate
//!
//!  Two policies are kept side by side and picked explicitly:
//!   * Banded     – cold < 20 °C → 0.85, 20…30 °C → 1.0,
//!                  hot > 30 °C → 0.90 (default for new designs)
//!   * Continuous – legacy penalty of ~2 % per °C above 25 °C:
//!                  k = 1 / (1 + 0.02 × (T − 25)), 1.0 at or below 25 °C
//!
//!  They disagree for overlapping temperatures (35 °C → 0.90 vs 0.833).
//! ============================================================
use crate::errors::DesignError;
use crate::models::design::{DerateProfile, ThermalDerateFactor, ThermalStatus};

const BAND_COLD_BELOW_C: f64 = 20.0;
const BAND_HOT_ABOVE_C: f64 = 30.0;
const BAND_COLD_FACTOR: f64 = 0.85;
const BAND_HOT_FACTOR: f64 = 0.90;

const REFERENCE_TEMP_C: f64 = 25.0;
const PENALTY_PER_DEG: f64 = 0.02;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThermalDerateModel {
    profile: DerateProfile,
}

impl ThermalDerateModel {
    pub fn new(profile: DerateProfile) -> Self {
        Self { profile }
    }

    /// Active policy
    pub fn profile(&self) -> DerateProfile {
        self.profile
    }

    pub fn derate(&self, ambient_temp_c: f64) -> Result<ThermalDerateFactor, DesignError> {
        if !ambient_temp_c.is_finite() {
            return Err(DesignError::invalid(format!("ambient temperature must be finite, got {ambient_temp_c}")));
        }

        let (factor, status) = match self.profile {
            DerateProfile::Banded => banded(ambient_temp_c),
            DerateProfile::Continuous => continuous(ambient_temp_c),
        };

        Ok(ThermalDerateFactor {
            factor,
            status,
            label: status.label().to_string(),
            profile: self.profile,
            ambient_temp_c,
        })
    }
}

fn banded(t: f64) -> (f64, ThermalStatus) {
    if t < BAND_COLD_BELOW_C {
        (BAND_COLD_FACTOR, ThermalStatus::Cold)
    } else if t > BAND_HOT_ABOVE_C {
        (BAND_HOT_FACTOR, ThermalStatus::Hot)
    } else {
        (1.0, ThermalStatus::Optimal)
    }
}

fn continuous(t: f64) -> (f64, ThermalStatus) {
    if t <= REFERENCE_TEMP_C {
        return (1.0, ThermalStatus::Optimal);
    }
    let delta = t - REFERENCE_TEMP_C;
    (1.0 / (1.0 + PENALTY_PER_DEG * delta), ThermalStatus::Hot)
}
