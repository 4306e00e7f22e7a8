//! ============================================================
//!  Clear-sky irradiance provider
//!
//!  Algorithm pipeline (per UTC instant):
//!   1. Solar geometry  – declination, equation of time, true solar
//!                        time, hour angle, elevation angle
//!   2. Extraterrestrial irradiance – eccentricity-corrected solar constant
//!   3. Clear-sky model  – Bird & Hulstrom simplified:
//!                         DNI + diffuse → GHI on the horizontal plane
//!
//!  A daily series samples every hour from local midnight up to the next
//!  local midnight: 24 points, 23 or 25 across a DST change. Night hours
//!  are exactly zero.
//! ============================================================
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::f64::consts::PI;

use crate::errors::DesignError;
use crate::models::design::Location;
use crate::models::irradiance::{IrradiancePoint, IrradianceSeries};

// ─── Physical constants ──────────────────────────────────────
const SC: f64 = 1361.0; // Solar constant W/m²
const DEG: f64 = PI / 180.0;

/// Typical continental aerosol load
pub const DEFAULT_LINKE_TURBIDITY: f64 = 3.0;

/// Source of idealised (cloud-free) horizontal irradiance for one day.
pub trait ClearSkyIrradianceProvider: Send + Sync {
    fn clear_sky_series(&self, location: &Location, date: NaiveDate) -> Result<IrradianceSeries, DesignError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdClearSky {
    linke_turbidity: f64,
}

impl Default for BirdClearSky {
    fn default() -> Self {
        Self { linke_turbidity: DEFAULT_LINKE_TURBIDITY }
    }
}

/// Sun position and clear-sky irradiance at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearSkyEstimate {
    pub solar_elevation_deg: f64,
    pub ghi_w_m2: f64,
    pub dni_w_m2: f64,
}

impl BirdClearSky {
    pub fn new(linke_turbidity: f64) -> Result<Self, DesignError> {
        if !(linke_turbidity.is_finite() && linke_turbidity >= 1.0) {
            return Err(DesignError::invalid(format!("Linke turbidity must be >= 1, got {linke_turbidity}")));
        }
        Ok(Self { linke_turbidity })
    }

    /// * `lat_deg`  – geographic latitude  (−90 … +90)
    /// * `lon_deg`  – geographic longitude (−180 … +180)
    /// * `utc`      – instant to evaluate
    pub fn estimate(&self, lat_deg: f64, lon_deg: f64, utc: DateTime<Utc>) -> ClearSkyEstimate {
        // ── 1. Time decomposition ──────────────────────────────────
        let doy = utc.ordinal() as f64;
        let ut_h = utc.hour() as f64 + utc.minute() as f64 / 60.0 + utc.second() as f64 / 3600.0;

        // ── 2. Solar geometry (Spencer 1971) ───────────────────────
        let b = 2.0 * PI * (doy - 1.0) / 365.0;
        let decl = 0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2.0 * b).cos()
            + 0.000907 * (2.0 * b).sin()
            - 0.002697 * (3.0 * b).cos()
            + 0.00148 * (3.0 * b).sin();

        let eot_min = 229.18
            * (0.000075 + 0.001868 * b.cos() - 0.032077 * b.sin() - 0.014615 * (2.0 * b).cos()
                - 0.04089 * (2.0 * b).sin());

        // True solar time straight from UTC; no civil offset involved
        let solar_time_h = ut_h + lon_deg / 15.0 + eot_min / 60.0;
        let omega = 15.0 * (solar_time_h - 12.0) * DEG;

        let lat = lat_deg * DEG;
        let sin_alpha = (lat.sin() * decl.sin() + lat.cos() * decl.cos() * omega.cos()).clamp(-1.0, 1.0);
        let alpha_deg = sin_alpha.asin() / DEG;

        // ── 3. Extraterrestrial irradiance ─────────────────────────
        let e0 = SC
            * (1.00011 + 0.034221 * b.cos() + 0.00128 * b.sin() + 0.000719 * (2.0 * b).cos()
                + 0.000077 * (2.0 * b).sin());

        // ── 4. Clear-sky model (Bird & Hulstrom simplified) ────────
        let (ghi, dni) = if alpha_deg > 0.1 {
            // Air mass – Kasten & Young (1989)
            let am = (1.0 / (sin_alpha + 0.50572 * (alpha_deg + 6.07995_f64).powf(-1.6364))).max(1.0);

            // Rayleigh
            let tr = (-0.0903 * am.powf(0.84) * (1.0 + am - am.powf(1.01))).exp();
            // Ozone (standard column 0.3 atm-cm)
            let to = 1.0 - 0.0013 * am;
            // Aerosol
            let ta = (-0.09 * self.linke_turbidity.powf(0.978) * am.powf(0.9455)).exp();
            // Water vapour (precipitable water 1.5 cm)
            let tw = 1.0 - 0.0075 * am.powf(0.65);

            let total_t = tr * to * ta * tw;
            let dni = 0.9762 * e0 * total_t;
            let dhi = 0.79 * e0 * sin_alpha * (1.0 - total_t) * (0.5 * (1.0 - tr) + back_scatter(ta))
                / (1.0 - am + am.powf(1.02));
            ((dni * sin_alpha + dhi).max(0.0), dni)
        } else {
            (0.0, 0.0)
        };

        ClearSkyEstimate { solar_elevation_deg: alpha_deg, ghi_w_m2: ghi, dni_w_m2: dni }
    }
}

impl ClearSkyIrradianceProvider for BirdClearSky {
    fn clear_sky_series(&self, location: &Location, date: NaiveDate) -> Result<IrradianceSeries, DesignError> {
        let tz = location.timezone();
        let (start, end) = date
            .succ_opt()
            .and_then(|next| Some((first_local_instant(tz, date)?, first_local_instant(tz, next)?)))
            .ok_or_else(|| DesignError::unavailable(format!("no local hours resolved for {date} in {}", tz.name())))?;

        // Hourly steps in UTC: 23 points on a spring-forward day, 25 on fall-back
        let mut points = Vec::with_capacity(25);
        let mut instant = start;
        while instant < end {
            let est = self.estimate(location.latitude(), location.longitude(), instant);
            points.push(IrradiancePoint { timestamp: instant.with_timezone(&tz).fixed_offset(), ghi_w_m2: est.ghi_w_m2 });
            instant += TimeDelta::hours(1);
        }
        Ok(IrradianceSeries::new(date, points))
    }
}

/// Earliest top-of-hour on `date` that exists in `tz` (midnight unless a DST jump removes it).
fn first_local_instant(tz: Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    (0..24)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| tz.from_local_datetime(&date.and_time(time)).earliest())
        .map(|local| local.with_timezone(&Utc))
}

// ─── Helper: back-scatter term for Bird diffuse ──────────────
#[inline]
fn back_scatter(ta: f64) -> f64 {
    0.5 * (0.92 - ta.ln().abs() / 10.0).clamp(0.2, 0.5)
}
