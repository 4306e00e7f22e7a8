use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::errors::{DesignError, require_fraction, require_positive};

use crate::models::design::DerateProfile;
use crate::services::clear_sky::DEFAULT_LINKE_TURBIDITY;
use crate::services::solar_array::{DEFAULT_SAFETY_MARGIN, DEFAULT_SYSTEM_EFFICIENCY};

fn default_port() -> u16 { 8080 }
fn default_system_voltage() -> f64 { 48.0 }
fn default_system_efficiency() -> f64 { DEFAULT_SYSTEM_EFFICIENCY }
fn default_safety_margin() -> f64 { DEFAULT_SAFETY_MARGIN }
fn default_lithium_dod() -> f64 { 0.90 }
fn default_timezone() -> String { "America/Caracas".to_string() }
fn default_linke_turbidity() -> f64 { DEFAULT_LINKE_TURBIDITY }
fn default_power_base_url() -> String { "https://power.larc.nasa.gov/api/temporal".to_string() }
fn default_power_community() -> String { "RE".to_string() }
fn default_power_timeout() -> u64 { 30 }

/// Summer solstice: long day, used as the clear-sky reference
fn default_representative_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 21).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sizing: SizingDefaults,
    #[serde(default)]
    pub clear_sky: ClearSkyConfig,
    #[serde(default)]
    pub climate_api: ClimateApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Values used when a design request leaves a parameter unset.
#[derive(Debug, Deserialize, Clone)]
pub struct SizingDefaults {
    #[serde(default = "default_system_voltage")]
    pub system_voltage_v: f64,
    #[serde(default = "default_system_efficiency")]
    pub system_efficiency: f64,
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,
    #[serde(default)]
    pub derate_profile: DerateProfile,
    /// LFP vendors quote 0.80–0.90
    #[serde(default = "default_lithium_dod")]
    pub lithium_depth_of_discharge: f64,
    #[serde(default = "default_representative_date")]
    pub representative_date: NaiveDate,
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClearSkyConfig {
    #[serde(default = "default_linke_turbidity")]
    pub linke_turbidity: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClimateApiConfig {
    #[serde(default = "default_power_base_url")]
    pub base_url: String,
    #[serde(default = "default_power_community")]
    pub community: String,
    #[serde(default = "default_power_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

impl Default for SizingDefaults {
    fn default() -> Self {
        Self {
            system_voltage_v: default_system_voltage(),
            system_efficiency: default_system_efficiency(),
            safety_margin: default_safety_margin(),
            derate_profile: DerateProfile::default(),
            lithium_depth_of_discharge: default_lithium_dod(),
            representative_date: default_representative_date(),
            default_timezone: default_timezone(),
        }
    }
}

impl SizingDefaults {
    /// Rejects defaults that would make every design request fail.
    pub fn validate(&self) -> Result<(), DesignError> {
        require_positive("sizing.system_voltage_v", self.system_voltage_v)?;
        require_fraction("sizing.system_efficiency", self.system_efficiency)?;
        require_positive("sizing.safety_margin", self.safety_margin)?;
        require_fraction("sizing.lithium_depth_of_discharge", self.lithium_depth_of_discharge)?;
        self.default_timezone.parse::<Tz>().map_err(|_| {
            DesignError::invalid(format!("sizing.default_timezone: unknown time zone '{}'", self.default_timezone))
        })?;
        Ok(())
    }
}

impl Default for ClearSkyConfig {
    fn default() -> Self {
        Self { linke_turbidity: default_linke_turbidity() }
    }
}

impl Default for ClimateApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_power_base_url(),
            community: default_power_community(),
            timeout_secs: default_power_timeout(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
