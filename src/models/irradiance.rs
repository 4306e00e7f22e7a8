use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

/// Reference irradiance used for peak-sun-hour equivalence (W/m²)
pub const REFERENCE_IRRADIANCE_W_M2: f64 = 1000.0;

/// Global horizontal irradiance at the start of one hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct IrradiancePoint {
    pub timestamp: DateTime<FixedOffset>,
    pub ghi_w_m2: f64,
}

/// Hourly irradiance for one local calendar day, ordered by time.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IrradianceSeries {
    date: NaiveDate,
    points: Vec<IrradiancePoint>,
}

impl IrradianceSeries {
    /// Builds a series, clamping negative (night) readings to zero.
    pub fn new(date: NaiveDate, points: Vec<IrradiancePoint>) -> Self {
        let points = points
            .into_iter()
            .map(|p| IrradiancePoint { ghi_w_m2: p.ghi_w_m2.max(0.0), ..p })
            .collect();
        Self { date, points }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn points(&self) -> &[IrradiancePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Equivalent hours at 1000 W/m² delivering the same daily energy.
    pub fn peak_sun_hours(&self) -> f64 {
        self.points.iter().map(|p| p.ghi_w_m2).sum::<f64>() / REFERENCE_IRRADIANCE_W_M2
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearSkyResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub peak_sun_hours: f64,
    pub series: IrradianceSeries,
}
