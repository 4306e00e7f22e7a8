use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use crate::errors::{DesignError, require_fraction, require_positive};

// ─── Site ────────────────────────────────────────────────────────────────────

/// Geographic site of the installation. Validated once, immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Location {
    /// Latitude in degrees (−90 … +90)
    latitude: f64,
    /// Longitude in degrees (−180 … +180)
    longitude: f64,
    /// IANA time zone, e.g. `America/Caracas`
    #[serde(serialize_with = "serialize_tz")]
    #[schema(value_type = String)]
    timezone: Tz,
}

fn serialize_tz<S: Serializer>(tz: &Tz, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(tz.name())
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, timezone: &str) -> Result<Self, DesignError> {
        validate_coordinates(latitude, longitude)?;
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| DesignError::invalid(format!("unknown time zone '{timezone}'")))?;
        Ok(Self { latitude, longitude, timezone })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), DesignError> {
    if !(latitude.is_finite() && (-90.0..=90.0).contains(&latitude)) {
        return Err(DesignError::invalid(format!("latitude {latitude} outside [-90, 90]")));
    }
    if !(longitude.is_finite() && (-180.0..=180.0).contains(&longitude)) {
        return Err(DesignError::invalid(format!("longitude {longitude} outside [-180, 180]")));
    }
    Ok(())
}

// ─── Critical loads ──────────────────────────────────────────────────────────

/// One appliance kept alive during an outage. Never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoadItem {
    pub name: String,
    /// Unit power (W)
    pub watts: f64,
    /// Number of identical units (≥ 1)
    pub quantity: u32,
    /// Daily usage (h, 0 … 24)
    pub hours_per_day: f64,
}

impl LoadItem {
    pub fn new(name: &str, watts: f64, quantity: u32, hours_per_day: f64) -> Result<Self, DesignError> {
        require_positive("watts", watts)?;
        if quantity < 1 {
            return Err(DesignError::invalid(format!("quantity of '{name}' must be at least 1")));
        }
        if !(hours_per_day.is_finite() && (0.0..=24.0).contains(&hours_per_day)) {
            return Err(DesignError::invalid(format!(
                "hours_per_day of '{name}' must lie in [0, 24], got {hours_per_day}"
            )));
        }
        Ok(Self { name: name.to_string(), watts, quantity, hours_per_day })
    }

    /// Daily energy (Wh) = power × quantity × hours
    pub fn daily_energy_wh(&self) -> f64 {
        self.watts * self.quantity as f64 * self.hours_per_day
    }

    /// Power drawn when every unit is on (W)
    pub fn connected_power_w(&self) -> f64 {
        self.watts * self.quantity as f64
    }
}

// ─── Battery chemistry ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatteryChemistry {
    LithiumLfp,
    LeadAcid,
}

/// Fixed constants of a commercial battery module.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChemistrySpec {
    pub chemistry: BatteryChemistry,
    pub module_label: String,
    /// Usable fraction of nominal capacity, (0, 1]
    pub depth_of_discharge: f64,
    /// Nominal module capacity (Ah)
    pub module_capacity_ah: f64,
    /// Nominal module voltage class (V)
    pub module_voltage_v: f64,
    /// Shipping weight per module (kg)
    pub module_weight_kg: f64,
}

impl BatteryChemistry {
    pub const ALL: [BatteryChemistry; 2] = [BatteryChemistry::LithiumLfp, BatteryChemistry::LeadAcid];

    /// Catalog defaults. LFP ships at 0.90 DoD; see `ChemistrySpec::with_depth_of_discharge`.
    pub fn spec(self) -> ChemistrySpec {
        match self {
            BatteryChemistry::LithiumLfp => ChemistrySpec {
                chemistry: self,
                module_label: "Lithium module 48V".to_string(),
                depth_of_discharge: 0.90,
                module_capacity_ah: 100.0,
                module_voltage_v: 48.0,
                module_weight_kg: 30.0,
            },
            BatteryChemistry::LeadAcid => ChemistrySpec {
                chemistry: self,
                module_label: "Lead-gel bank".to_string(),
                depth_of_discharge: 0.50,
                module_capacity_ah: 200.0,
                module_voltage_v: 12.0,
                module_weight_kg: 60.0,
            },
        }
    }
}

impl ChemistrySpec {
    pub fn with_depth_of_discharge(mut self, dod: f64) -> Result<Self, DesignError> {
        self.depth_of_discharge = require_fraction("depth_of_discharge", dod)?;
        Ok(self)
    }

    /// Usable Ah of a single module
    pub fn usable_module_capacity_ah(&self) -> f64 {
        self.module_capacity_ah * self.depth_of_discharge
    }
}

// ─── Thermal derate ──────────────────────────────────────────────────────────

/// Selectable temperature correction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DerateProfile {
    /// Cold < 20 °C → 0.85, 20–30 °C → 1.0, hot > 30 °C → 0.90
    #[default]
    Banded,
    /// Legacy: 1 / (1 + 0.02 × (T − 25)) above 25 °C, 1.0 otherwise
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThermalStatus {
    Optimal,
    Cold,
    Hot,
}

impl ThermalStatus {
    pub fn label(self) -> &'static str {
        match self {
            ThermalStatus::Optimal => "Optimal temperature",
            ThermalStatus::Cold => "Cold: reduced chemical performance",
            ThermalStatus::Hot => "Hot: derated to protect cycle life",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ThermalDerateFactor {
    /// Multiplier on usable capacity, (0, 1]
    pub factor: f64,
    pub status: ThermalStatus,
    pub label: String,
    pub profile: DerateProfile,
    pub ambient_temp_c: f64,
}

// ─── Sizing results ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BatteryBankResult {
    pub chemistry: BatteryChemistry,
    pub module_label: String,
    pub system_voltage_v: f64,
    pub depth_of_discharge: f64,
    pub derate_factor: f64,
    /// Energy that must be held in reserve (Wh)
    pub required_energy_wh: f64,
    /// Bank capacity before rounding to whole modules (Ah)
    pub required_capacity_ah: f64,
    pub module_capacity_ah: f64,
    /// Modules to install, always rounded up
    pub module_count: u32,
    /// Usable installed capacity (Ah) = modules × module Ah × DoD
    pub installed_capacity_ah: f64,
    /// Usable installed energy (kWh) = installed Ah × system V / 1000
    pub reserve_energy_kwh: f64,
}

/// One hour of the expected generation curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GenerationPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub power_kw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SolarArrayResult {
    pub panel_watt: f64,
    pub peak_sun_hours: f64,
    pub system_efficiency: f64,
    pub safety_margin: f64,
    /// Consumption × safety margin (Wh)
    pub target_generation_wh: f64,
    /// Panel W × HSP × efficiency (Wh)
    pub per_panel_generation_wh: f64,
    /// Panels to install, always rounded up
    pub panel_count: u32,
    pub installed_peak_kw: f64,
    /// Panels × per-panel generation (kWh/day)
    pub expected_generation_kwh: f64,
    /// Hourly kW for one representative day; empty when sized from HSP alone
    pub generation_curve: Vec<GenerationPoint>,
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Figures the dashboard shows next to the two sizing results.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DesignMetrics {
    pub daily_consumption_kwh: f64,
    /// Flat reference line for the balance chart (kW)
    pub average_consumption_kw: f64,
    pub reserve_energy_kwh: f64,
    pub autonomy_days: f64,
    /// Sum of the hourly curve (kWh)
    pub curve_generation_kwh: f64,
    /// Generation target including the safety margin (kWh)
    pub target_generation_kwh: f64,
    /// Curve generation − consumption (Wh), negative on a deficit
    pub generation_surplus_wh: f64,
    pub generation_covers_consumption: bool,
    pub thermal_status: ThermalStatus,
    pub thermal_label: String,
}

/// Estimated bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EquipmentSummary {
    pub panel_count: u32,
    pub panel_watt: f64,
    /// Strings of two panels, before charge-controller constraints
    pub suggested_strings: u32,
    pub battery_module_count: u32,
    pub battery_module_label: String,
    pub battery_module_capacity_ah: f64,
    pub estimated_battery_weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SystemDesignReport {
    pub location: Location,
    pub thermal: ThermalDerateFactor,
    pub battery: BatteryBankResult,
    pub solar: SolarArrayResult,
    pub metrics: DesignMetrics,
    pub equipment: EquipmentSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_location_parses_timezone() {
        let loc = Location::new(11.95, -66.67, "America/Caracas").unwrap();
        assert_eq!(loc.timezone(), chrono_tz::America::Caracas);
        let json = serde_json::to_value(loc).unwrap();
        assert_eq!(json["timezone"], "America/Caracas");
    }

    #[rstest]
    #[case(90.1, 0.0, "UTC")]
    #[case(-91.0, 0.0, "UTC")]
    #[case(0.0, 180.5, "UTC")]
    #[case(f64::NAN, 0.0, "UTC")]
    #[case(0.0, 0.0, "Mars/Olympus_Mons")]
    fn test_location_rejects_bad_input(#[case] lat: f64, #[case] lon: f64, #[case] tz: &str) {
        assert!(matches!(Location::new(lat, lon, tz), Err(DesignError::InvalidInput(_))));
    }

    #[test]
    fn test_load_item_energy() {
        let item = LoadItem::new("LED bulbs", 25.0, 6, 6.0).unwrap();
        assert_eq!(item.daily_energy_wh(), 900.0);
        assert_eq!(item.connected_power_w(), 150.0);
    }

    #[rstest]
    #[case(0.0, 1, 4.0)]
    #[case(-10.0, 1, 4.0)]
    #[case(100.0, 0, 4.0)]
    #[case(100.0, 1, 24.5)]
    #[case(100.0, 1, -0.5)]
    fn test_load_item_rejects(#[case] watts: f64, #[case] qty: u32, #[case] hours: f64) {
        assert!(LoadItem::new("fan", watts, qty, hours).is_err());
    }

    #[test]
    fn test_chemistry_catalog() {
        let lfp = BatteryChemistry::LithiumLfp.spec();
        assert_eq!(lfp.depth_of_discharge, 0.90);
        assert_eq!(lfp.usable_module_capacity_ah(), 90.0);
        let lead = BatteryChemistry::LeadAcid.spec();
        assert_eq!(lead.depth_of_discharge, 0.50);
        assert_eq!(lead.module_capacity_ah, 200.0);

        let lfp80 = lfp.with_depth_of_discharge(0.80).unwrap();
        assert_eq!(lfp80.depth_of_discharge, 0.80);
        assert!(BatteryChemistry::LithiumLfp.spec().with_depth_of_discharge(1.2).is_err());
    }

    #[test]
    fn test_chemistry_wire_names() {
        let v: BatteryChemistry = serde_json::from_str("\"LITHIUM_LFP\"").unwrap();
        assert_eq!(v, BatteryChemistry::LithiumLfp);
        let p: DerateProfile = serde_json::from_str("\"continuous\"").unwrap();
        assert_eq!(p, DerateProfile::Continuous);
        assert_eq!(DerateProfile::default(), DerateProfile::Banded);
    }
}
