use chrono::NaiveDate;

use crate::config::SizingDefaults;
use crate::errors::DesignError;
use crate::models::api::DesignRequest;
use crate::models::design::{
    BatteryChemistry, ChemistrySpec, DerateProfile, DesignMetrics, EquipmentSummary, Location, SystemDesignReport,
};
use crate::models::irradiance::IrradianceSeries;
use crate::services::battery::BatteryBankSizer;
use crate::services::load_profile::CriticalLoadProfile;
use crate::services::solar_array::SolarArraySizer;
use crate::services::thermal::ThermalDerateModel;

/// Fully resolved sizing parameters; nothing is filled in implicitly here.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignInputs {
    pub daily_energy_wh: f64,
    pub autonomy_days: f64,
    pub ambient_temp_c: f64,
    pub chemistry: ChemistrySpec,
    pub panel_watt: f64,
    pub system_voltage_v: f64,
    pub system_efficiency: f64,
    pub safety_margin: f64,
    pub derate_profile: DerateProfile,
}

/// Runs both sizers over already-fetched irradiance and merges the results.
pub fn design_system(
    location: Location,
    inputs: &DesignInputs,
    irradiance: &IrradianceSeries,
) -> Result<SystemDesignReport, DesignError> {
    let thermal = ThermalDerateModel::new(inputs.derate_profile).derate(inputs.ambient_temp_c)?;

    let battery = BatteryBankSizer::new(inputs.system_voltage_v, inputs.chemistry.clone())?.size(
        inputs.daily_energy_wh,
        inputs.autonomy_days,
        thermal.factor,
    )?;

    let solar = SolarArraySizer::new(inputs.panel_watt, inputs.system_efficiency)?
        .with_safety_margin(inputs.safety_margin)?
        .size_for_day(inputs.daily_energy_wh, irradiance)?;

    let curve_generation_kwh: f64 = solar.generation_curve.iter().map(|p| p.power_kw).sum();
    let generation_surplus_wh = curve_generation_kwh * 1000.0 - inputs.daily_energy_wh;

    let metrics = DesignMetrics {
        daily_consumption_kwh: inputs.daily_energy_wh / 1000.0,
        average_consumption_kw: inputs.daily_energy_wh / 1000.0 / 24.0,
        reserve_energy_kwh: battery.reserve_energy_kwh,
        autonomy_days: inputs.autonomy_days,
        curve_generation_kwh,
        target_generation_kwh: solar.target_generation_wh / 1000.0,
        generation_surplus_wh,
        generation_covers_consumption: generation_surplus_wh >= 0.0,
        thermal_status: thermal.status,
        thermal_label: thermal.label.clone(),
    };

    let equipment = EquipmentSummary {
        panel_count: solar.panel_count,
        panel_watt: solar.panel_watt,
        suggested_strings: solar.panel_count.div_ceil(2),
        battery_module_count: battery.module_count,
        battery_module_label: battery.module_label.clone(),
        battery_module_capacity_ah: battery.module_capacity_ah,
        estimated_battery_weight_kg: battery.module_count as f64 * inputs.chemistry.module_weight_kg,
    };

    Ok(SystemDesignReport { location, thermal, battery, solar, metrics, equipment })
}

/// Request resolved against the configured defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDesign {
    pub location: Location,
    pub date: NaiveDate,
    pub inputs: DesignInputs,
}

pub fn resolve_request(req: &DesignRequest, defaults: &SizingDefaults) -> Result<ResolvedDesign, DesignError> {
    let timezone = req.timezone.as_deref().unwrap_or(&defaults.default_timezone);
    let location = Location::new(req.latitude, req.longitude, timezone)?;

    let daily_energy_wh = match (req.daily_energy_wh, &req.loads) {
        (Some(wh), None) => wh,
        (None, Some(loads)) => CriticalLoadProfile::try_from(loads.clone())?.total_daily_energy_wh(),
        (Some(_), Some(_)) => {
            return Err(DesignError::invalid("give either daily_energy_wh or loads, not both"));
        }
        (None, None) => return Err(DesignError::invalid("daily_energy_wh or loads is required")),
    };

    Ok(ResolvedDesign {
        location,
        date: req.date.unwrap_or(defaults.representative_date),
        inputs: DesignInputs {
            daily_energy_wh,
            autonomy_days: req.autonomy_days,
            ambient_temp_c: req.ambient_temp_c,
            chemistry: chemistry_spec(req.chemistry, req.depth_of_discharge, defaults)?,
            panel_watt: req.panel_watt,
            system_voltage_v: req.system_voltage_v.unwrap_or(defaults.system_voltage_v),
            system_efficiency: req.system_efficiency.unwrap_or(defaults.system_efficiency),
            safety_margin: req.safety_margin.unwrap_or(defaults.safety_margin),
            derate_profile: req.derate_profile.unwrap_or(defaults.derate_profile),
        },
    })
}

/// Catalog entry with the configured (or requested) depth of discharge.
pub fn chemistry_spec(
    chemistry: BatteryChemistry,
    dod_override: Option<f64>,
    defaults: &SizingDefaults,
) -> Result<ChemistrySpec, DesignError> {
    let spec = chemistry.spec();
    match (dod_override, chemistry) {
        (Some(dod), _) => spec.with_depth_of_discharge(dod),
        (None, BatteryChemistry::LithiumLfp) => spec.with_depth_of_discharge(defaults.lithium_depth_of_discharge),
        (None, BatteryChemistry::LeadAcid) => Ok(spec),
    }
}
