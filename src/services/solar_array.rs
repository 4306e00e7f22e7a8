use crate::errors::{DesignError, require_fraction, require_positive};
use crate::models::design::{GenerationPoint, SolarArrayResult};
use crate::models::irradiance::{IrradianceSeries, REFERENCE_IRRADIANCE_W_M2};
use crate::services::battery::ceil_count;

/// Default surplus on the generation target so the array can refill the
/// bank the day after an outage.
pub const DEFAULT_SAFETY_MARGIN: f64 = 1.3;

/// Wiring, soiling and heat losses of a typical small installation.
pub const DEFAULT_SYSTEM_EFFICIENCY: f64 = 0.85;

/// Dimensions a PV array for a daily consumption target.
///
/// N_pv = ceil(E_daily × margin / (P_panel × HSP × η_sys))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarArraySizer {
    panel_watt: f64,
    system_efficiency: f64,
    safety_margin: f64,
}

impl SolarArraySizer {
    pub fn new(panel_watt: f64, system_efficiency: f64) -> Result<Self, DesignError> {
        require_positive("panel_watt", panel_watt)?;
        require_fraction("system_efficiency", system_efficiency)?;
        Ok(Self { panel_watt, system_efficiency, safety_margin: DEFAULT_SAFETY_MARGIN })
    }

    pub fn with_safety_margin(mut self, safety_margin: f64) -> Result<Self, DesignError> {
        self.safety_margin = require_positive("safety_margin", safety_margin)?;
        Ok(self)
    }

    /// Sizes from peak sun hours alone; the generation curve is left empty.
    pub fn size(&self, daily_consumption_wh: f64, peak_sun_hours: f64) -> Result<SolarArrayResult, DesignError> {
        require_positive("daily_consumption_wh", daily_consumption_wh)?;
        require_positive("peak_sun_hours", peak_sun_hours)?;

        let target_generation_wh = daily_consumption_wh * self.safety_margin;
        let per_panel_generation_wh = self.panel_watt * peak_sun_hours * self.system_efficiency;
        let panel_count = ceil_count(target_generation_wh / per_panel_generation_wh)?;
        let installed_peak_kw = panel_count as f64 * self.panel_watt / 1000.0;

        Ok(SolarArrayResult {
            panel_watt: self.panel_watt,
            peak_sun_hours,
            system_efficiency: self.system_efficiency,
            safety_margin: self.safety_margin,
            target_generation_wh,
            per_panel_generation_wh,
            panel_count,
            installed_peak_kw,
            expected_generation_kwh: panel_count as f64 * per_panel_generation_wh / 1000.0,
            generation_curve: Vec::new(),
        })
    }

    /// Derives HSP from an hourly irradiance day and attaches the matching
    /// generation curve for the sized array.
    pub fn size_for_day(
        &self,
        daily_consumption_wh: f64,
        irradiance: &IrradianceSeries,
    ) -> Result<SolarArrayResult, DesignError> {
        if irradiance.is_empty() {
            return Err(DesignError::unavailable(format!("no irradiance samples for {}", irradiance.date())));
        }
        let peak_sun_hours = irradiance.peak_sun_hours();
        if peak_sun_hours <= 0.0 {
            return Err(DesignError::invalid(format!(
                "irradiance for {} integrates to zero peak sun hours",
                irradiance.date()
            )));
        }

        let mut result = self.size(daily_consumption_wh, peak_sun_hours)?;
        result.generation_curve = generation_curve(irradiance, result.installed_peak_kw, self.system_efficiency);
        Ok(result)
    }
}

/// kW(t) = GHI(t) × P_peak × η / 1000, clamped at zero.
pub fn generation_curve(irradiance: &IrradianceSeries, installed_peak_kw: f64, system_efficiency: f64) -> Vec<GenerationPoint> {
    let scale = installed_peak_kw * system_efficiency / REFERENCE_IRRADIANCE_W_M2;
    irradiance
        .points()
        .iter()
        .map(|p| GenerationPoint { timestamp: p.timestamp, power_kw: (p.ghi_w_m2 * scale).max(0.0) })
        .collect()
}
