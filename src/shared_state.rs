use std::sync::Arc;

use crate::config::Config;
use crate::errors::DesignError;
use crate::services::clear_sky::{BirdClearSky, ClearSkyIrradianceProvider};
use crate::services::nasa_power::NasaPowerClient;

/// Read-only state shared by every handler. Nothing here is mutated after
/// start-up, so requests never contend.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Clear-sky model backing the design and irradiance endpoints
    pub irradiance: Arc<dyn ClearSkyIrradianceProvider>,
    /// NASA POWER client for the climate endpoint
    pub climate: NasaPowerClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, DesignError> {
        config.sizing.validate()?;
        let irradiance = BirdClearSky::new(config.clear_sky.linke_turbidity)?;
        let climate = NasaPowerClient::new(&config.climate_api)?;
        Ok(Self::with_provider(config, Arc::new(irradiance), climate))
    }

    pub fn with_provider(
        config: Config,
        irradiance: Arc<dyn ClearSkyIrradianceProvider>,
        climate: NasaPowerClient,
    ) -> Self {
        Self { config: Arc::new(config), irradiance, climate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_starts() {
        assert!(AppState::new(Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_sizing_defaults_fail_at_startup() {
        let mut config = Config::default();
        config.sizing.system_voltage_v = 0.0;
        assert!(matches!(AppState::new(config), Err(DesignError::InvalidInput(_))));

        let mut config = Config::default();
        config.sizing.lithium_depth_of_discharge = 1.5;
        assert!(matches!(AppState::new(config), Err(DesignError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_turbidity_fails_at_startup() {
        let mut config = Config::default();
        config.clear_sky.linke_turbidity = 0.5;
        assert!(AppState::new(config).is_err());
    }
}
