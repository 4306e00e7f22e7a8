use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::design::{BatteryChemistry, ChemistrySpec, DerateProfile, LoadItem};

// ─── REST API request types ───────────────────────────────────────────────────

/// Inputs for `POST /api/design`. Exactly one of `daily_energy_wh` and
/// `loads` must be given; unset tuning fields fall back to the configuration.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DesignRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub daily_energy_wh: Option<f64>,
    pub loads: Option<Vec<LoadItem>>,
    pub autonomy_days: f64,
    pub ambient_temp_c: f64,
    pub chemistry: BatteryChemistry,
    pub panel_watt: f64,
    pub system_voltage_v: Option<f64>,
    pub system_efficiency: Option<f64>,
    pub safety_margin: Option<f64>,
    pub derate_profile: Option<DerateProfile>,
    pub depth_of_discharge: Option<f64>,
    /// Representative day for the clear-sky curve
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DerateQuery {
    pub temperature_c: f64,
    pub profile: Option<DerateProfile>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClearSkyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClimateQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ─── REST API response types ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoadProfileResponse {
    pub items: Vec<LoadItem>,
    pub total_daily_energy_wh: f64,
    pub peak_power_w: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChemistryCatalog {
    pub default_system_voltage_v: f64,
    pub chemistries: Vec<ChemistrySpec>,
}
