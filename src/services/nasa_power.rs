use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::ClimateApiConfig;
use crate::errors::DesignError;
use crate::models::climate::{
    ClimateSummary, DailyClimate, FILL_VALUE, HourlyIrradiance, PARAM_IRRADIANCE, PARAM_TEMPERATURE, PowerResponse,
};
use crate::models::design::validate_coordinates;

/// NASA POWER point client (daily and hourly temporal APIs).
///
/// Every failure, including an empty result after dropping fill values,
/// surfaces as `DataUnavailable`.
#[derive(Debug, Clone)]
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    community: String,
}

impl NasaPowerClient {
    pub fn new(cfg: &ClimateApiConfig) -> Result<Self, DesignError> {
        let client = Client::builder().timeout(Duration::from_secs(cfg.timeout_secs)).build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            community: cfg.community.clone(),
        })
    }

    /// Daily insolation and 2 m temperature for `start..=end`.
    pub async fn fetch_daily_climate(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ClimateSummary, DesignError> {
        let params = format!("{PARAM_IRRADIANCE},{PARAM_TEMPERATURE}");
        let resp = self.fetch("daily", &params, lat, lon, start, end, &[]).await?;

        let mut parameter = resp.properties.parameter;
        let irradiance = take_parameter(&mut parameter, PARAM_IRRADIANCE)?;
        let temperature = take_parameter(&mut parameter, PARAM_TEMPERATURE)?;

        let mut days = Vec::with_capacity(irradiance.len());
        let mut missing_days = 0;
        for (key, irr) in irradiance {
            let date = NaiveDate::parse_from_str(&key, "%Y%m%d")
                .map_err(|_| DesignError::unavailable(format!("unexpected date key '{key}' in NASA POWER response")))?;
            match temperature.get(&key) {
                Some(&t) if irr != FILL_VALUE && t != FILL_VALUE => {
                    days.push(DailyClimate { date, irradiance_kwh_m2: irr, temperature_c: t });
                }
                _ => missing_days += 1,
            }
        }

        let summary = ClimateSummary::from_days(lat, lon, days, missing_days).ok_or_else(|| {
            DesignError::unavailable(format!("NASA POWER has no usable days for ({lat}, {lon}) {start}..{end}"))
        })?;

        info!(
            "Fetched {} climate days for ({}, {}): {:.2} kWh/m²/day, {:.1}°C ({} missing)",
            summary.days.len(),
            lat,
            lon,
            summary.mean_irradiance_kwh_m2,
            summary.mean_temperature_c,
            summary.missing_days
        );
        Ok(summary)
    }

    /// Hourly horizontal irradiance (UTC) for `start..=end`.
    pub async fn fetch_hourly_irradiance(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HourlyIrradiance>, DesignError> {
        let resp = self.fetch("hourly", PARAM_IRRADIANCE, lat, lon, start, end, &[("time-standard", "utc")]).await?;

        let mut parameter = resp.properties.parameter;
        let irradiance = take_parameter(&mut parameter, PARAM_IRRADIANCE)?;

        let mut hours = Vec::with_capacity(irradiance.len());
        for (key, ghi) in irradiance {
            if ghi == FILL_VALUE {
                continue;
            }
            let timestamp = parse_hour_key(&key)
                .ok_or_else(|| DesignError::unavailable(format!("unexpected hour key '{key}' in NASA POWER response")))?;
            hours.push(HourlyIrradiance { timestamp: timestamp.and_utc(), ghi_w_m2: ghi.max(0.0) });
        }

        if hours.is_empty() {
            return Err(DesignError::unavailable(format!(
                "NASA POWER has no usable hours for ({lat}, {lon}) {start}..{end}"
            )));
        }
        Ok(hours)
    }

    #[allow(clippy::too_many_arguments)]
    async fn fetch(
        &self,
        resolution: &str,
        parameters: &str,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
        extra: &[(&str, &str)],
    ) -> Result<PowerResponse, DesignError> {
        validate_coordinates(lat, lon)?;
        if start > end {
            return Err(DesignError::invalid(format!("start {start} is after end {end}")));
        }

        let url = format!("{}/{}/point", self.base_url, resolution);
        let mut query: Vec<(&str, String)> = vec![
            ("parameters", parameters.to_string()),
            ("community", self.community.clone()),
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("start", start.format("%Y%m%d").to_string()),
            ("end", end.format("%Y%m%d").to_string()),
            ("format", "JSON".to_string()),
        ];
        query.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));

        debug!("Requesting NASA POWER {} data for ({}, {}) {}..{}", resolution, lat, lon, start, end);

        let resp = self.client.get(&url).query(&query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("NASA POWER returned {} for ({}, {})", status, lat, lon);
            return Err(DesignError::unavailable(format!("NASA POWER returned {status}")));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn take_parameter(
    parameter: &mut BTreeMap<String, BTreeMap<String, f64>>,
    name: &str,
) -> Result<BTreeMap<String, f64>, DesignError> {
    parameter
        .remove(name)
        .ok_or_else(|| DesignError::unavailable(format!("NASA POWER response lacks {name}")))
}

/// `YYYYMMDDHH` → naive UTC hour
fn parse_hour_key(key: &str) -> Option<chrono::NaiveDateTime> {
    let date = NaiveDate::parse_from_str(key.get(..8)?, "%Y%m%d").ok()?;
    let hour: u32 = key.get(8..10)?.parse().ok()?;
    if key.len() != 10 {
        return None;
    }
    date.and_hms_opt(hour, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NasaPowerClient {
        let cfg = ClimateApiConfig { base_url: server.uri(), community: "RE".to_string(), timeout_secs: 5 };
        NasaPowerClient::new(&cfg).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_daily_climate_drops_fill_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily/point"))
            .and(query_param("parameters", "ALLSKY_SFC_SW_DWN,T2M"))
            .and(query_param("community", "RE"))
            .and(query_param("start", "20220101"))
            .and(query_param("end", "20220103"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "Feature",
                "properties": { "parameter": {
                    "ALLSKY_SFC_SW_DWN": { "20220101": 6.0, "20220102": -999.0, "20220103": 7.0 },
                    "T2M": { "20220101": 27.0, "20220102": 26.5, "20220103": 29.0 }
                }}
            })))
            .mount(&server)
            .await;

        let summary = client_for(&server)
            .fetch_daily_climate(11.95, -66.67, day(2022, 1, 1), day(2022, 1, 3))
            .await
            .unwrap();

        assert_eq!(summary.days.len(), 2);
        assert_eq!(summary.missing_days, 1);
        assert_eq!(summary.mean_irradiance_kwh_m2, 6.5);
        assert_eq!(summary.mean_temperature_c, 28.0);
        assert_eq!(summary.days[1].date, day(2022, 1, 3));
    }

    #[tokio::test]
    async fn test_error_status_is_data_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily/point"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_daily_climate(11.95, -66.67, day(2022, 1, 1), day(2022, 1, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, DesignError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_all_missing_is_data_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily/point"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "parameter": {
                    "ALLSKY_SFC_SW_DWN": { "20220101": -999.0 },
                    "T2M": { "20220101": -999.0 }
                }}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_daily_climate(11.95, -66.67, day(2022, 1, 1), day(2022, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DesignError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_data_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_daily_climate(11.95, -66.67, day(2022, 1, 1), day(2022, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DesignError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_hourly_irradiance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hourly/point"))
            .and(query_param("time-standard", "utc"))
            .and(query_param("parameters", "ALLSKY_SFC_SW_DWN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "parameter": {
                    "ALLSKY_SFC_SW_DWN": { "2022010115": 410.5, "2022010116": 655.0, "2022010117": -999.0 }
                }}
            })))
            .mount(&server)
            .await;

        let hours = client_for(&server)
            .fetch_hourly_irradiance(34.05, -118.25, day(2022, 1, 1), day(2022, 1, 1))
            .await
            .unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].timestamp, day(2022, 1, 1).and_hms_opt(15, 0, 0).unwrap().and_utc());
        assert_eq!(hours[1].ghi_w_m2, 655.0);
    }

    #[tokio::test]
    async fn test_rejects_bad_request_before_network() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client.fetch_daily_climate(95.0, 0.0, day(2022, 1, 1), day(2022, 1, 2)).await.unwrap_err();
        assert!(matches!(err, DesignError::InvalidInput(_)));
        let err = client.fetch_daily_climate(10.0, 0.0, day(2022, 1, 3), day(2022, 1, 2)).await.unwrap_err();
        assert!(matches!(err, DesignError::InvalidInput(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_parse_hour_key() {
        assert_eq!(parse_hour_key("2022010123"), day(2022, 1, 1).and_hms_opt(23, 0, 0));
        assert_eq!(parse_hour_key("20220101"), None);
        assert_eq!(parse_hour_key("2022010124"), None);
        assert_eq!(parse_hour_key("20220101230"), None);
    }
}
