use crate::errors::{DesignError, require_fraction, require_positive};
use crate::models::design::{BatteryBankResult, ChemistrySpec};

/// Dimensions a battery bank for a given outage reserve.
///
/// Capacity (Ah) = E_daily × days / (V_sys × DoD × k_temp), then rounded up to
/// whole modules of `module_capacity_ah × DoD` usable Ah each.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryBankSizer {
    system_voltage_v: f64,
    chemistry: ChemistrySpec,
}

impl BatteryBankSizer {
    pub fn new(system_voltage_v: f64, chemistry: ChemistrySpec) -> Result<Self, DesignError> {
        require_positive("system_voltage_v", system_voltage_v)?;
        require_fraction("depth_of_discharge", chemistry.depth_of_discharge)?;
        require_positive("module_capacity_ah", chemistry.module_capacity_ah)?;
        Ok(Self { system_voltage_v, chemistry })
    }

    pub fn chemistry(&self) -> &ChemistrySpec {
        &self.chemistry
    }

    pub fn size(
        &self,
        daily_energy_wh: f64,
        autonomy_days: f64,
        derate_factor: f64,
    ) -> Result<BatteryBankResult, DesignError> {
        require_positive("daily_energy_wh", daily_energy_wh)?;
        require_positive("autonomy_days", autonomy_days)?;
        require_fraction("derate_factor", derate_factor)?;

        let dod = self.chemistry.depth_of_discharge;
        let required_energy_wh = daily_energy_wh * autonomy_days;
        let required_capacity_ah = required_energy_wh / (self.system_voltage_v * dod * derate_factor);

        let usable_per_module = self.chemistry.usable_module_capacity_ah();
        let module_count = ceil_count(required_capacity_ah / usable_per_module)?;

        let installed_capacity_ah = module_count as f64 * usable_per_module;
        let reserve_energy_kwh = installed_capacity_ah * self.system_voltage_v / 1000.0;

        Ok(BatteryBankResult {
            chemistry: self.chemistry.chemistry,
            module_label: self.chemistry.module_label.clone(),
            system_voltage_v: self.system_voltage_v,
            depth_of_discharge: dod,
            derate_factor,
            required_energy_wh,
            required_capacity_ah,
            module_capacity_ah: self.chemistry.module_capacity_ah,
            module_count,
            installed_capacity_ah,
            reserve_energy_kwh,
        })
    }
}

/// Whole units needed to cover `ratio`, never fewer than one.
pub(crate) fn ceil_count(ratio: f64) -> Result<u32, DesignError> {
    let units = ratio.ceil();
    if !units.is_finite() || units > u32::MAX as f64 {
        return Err(DesignError::invalid(format!("requirement of {ratio} units is out of range")));
    }
    Ok((units as u32).max(1))
}
