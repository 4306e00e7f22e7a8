use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// NASA POWER marks missing samples with this value.
pub const FILL_VALUE: f64 = -999.0;

pub const PARAM_IRRADIANCE: &str = "ALLSKY_SFC_SW_DWN";
pub const PARAM_TEMPERATURE: &str = "T2M";

// ─── NASA POWER wire types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PowerResponse {
    pub properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
pub struct PowerProperties {
    /// Parameter name → (time key → value). Daily keys are `YYYYMMDD`,
    /// hourly keys `YYYYMMDDHH`.
    pub parameter: BTreeMap<String, BTreeMap<String, f64>>,
}

// ─── Decoded climate data ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyClimate {
    pub date: NaiveDate,
    /// Daily insolation (kWh/m²/day), numerically equal to peak sun hours
    pub irradiance_kwh_m2: f64,
    /// Mean 2 m air temperature (°C)
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClimateSummary {
    pub latitude: f64,
    pub longitude: f64,
    pub days: Vec<DailyClimate>,
    /// Days dropped because either parameter carried the fill value
    pub missing_days: usize,
    pub mean_irradiance_kwh_m2: f64,
    pub mean_temperature_c: f64,
}

impl ClimateSummary {
    /// Returns `None` when no usable day is left.
    pub fn from_days(latitude: f64, longitude: f64, days: Vec<DailyClimate>, missing_days: usize) -> Option<Self> {
        if days.is_empty() {
            return None;
        }
        let n = days.len() as f64;
        let mean_irradiance_kwh_m2 = days.iter().map(|d| d.irradiance_kwh_m2).sum::<f64>() / n;
        let mean_temperature_c = days.iter().map(|d| d.temperature_c).sum::<f64>() / n;
        Some(Self { latitude, longitude, days, missing_days, mean_irradiance_kwh_m2, mean_temperature_c })
    }

    /// Peak sun hours of an average day
    pub fn peak_sun_hours(&self) -> f64 {
        self.mean_irradiance_kwh_m2
    }
}

/// One hour of satellite-derived horizontal irradiance (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct HourlyIrradiance {
    pub timestamp: DateTime<Utc>,
    /// Mean irradiance over the hour (W/m²)
    pub ghi_w_m2: f64,
}
