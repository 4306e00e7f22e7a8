use axum::{Json, extract::State};
use tracing::info;

use crate::controllers::api_error::{ApiError, ApiJson, ApiQuery};
use crate::models::api::{
    ChemistryCatalog, ClearSkyQuery, ClimateQuery, DerateQuery, DesignRequest, LoadProfileResponse,
};
use crate::models::climate::{ClimateSummary, HourlyIrradiance};
use crate::models::design::{BatteryChemistry, LoadItem, Location, SystemDesignReport, ThermalDerateFactor};
use crate::models::irradiance::ClearSkyResponse;
use crate::services::design_service::{chemistry_spec, design_system, resolve_request};
use crate::services::load_profile::CriticalLoadProfile;
use crate::services::thermal::ThermalDerateModel;
use crate::shared_state::AppState;

/// POST /api/design
/// Size a complete off-grid system
///
/// Runs the battery and solar sizers for the site and returns both results
/// together with the display metrics and an estimated bill of materials.
#[utoipa::path(
    post,
    path = "/api/design",
    request_body = DesignRequest,
    responses(
        (status = 200, description = "System design", body = SystemDesignReport),
        (status = 400, description = "A parameter is outside its valid domain"),
        (status = 503, description = "Irradiance data unavailable")
    )
)]
pub async fn create_design(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DesignRequest>,
) -> Result<Json<SystemDesignReport>, ApiError> {
    let resolved = resolve_request(&req, &state.config.sizing)?;
    let irradiance = state.irradiance.clear_sky_series(&resolved.location, resolved.date)?;
    let report = design_system(resolved.location, &resolved.inputs, &irradiance)?;

    info!(
        "[DESIGN] ({:.2}, {:.2}) {:.0} Wh/day → {} battery modules, {} panels ({:.2} kWp)",
        req.latitude,
        req.longitude,
        resolved.inputs.daily_energy_wh,
        report.battery.module_count,
        report.solar.panel_count,
        report.solar.installed_peak_kw
    );
    Ok(Json(report))
}

/// POST /api/loads/profile
/// Aggregate a critical load list
///
/// Returns total daily energy and worst-case simultaneous power.
#[utoipa::path(
    post,
    path = "/api/loads/profile",
    request_body = Vec<LoadItem>,
    responses(
        (status = 200, description = "Aggregated profile", body = LoadProfileResponse),
        (status = 400, description = "Invalid load item")
    )
)]
pub async fn summarize_loads(
    ApiJson(items): ApiJson<Vec<LoadItem>>,
) -> Result<Json<LoadProfileResponse>, ApiError> {
    let profile = CriticalLoadProfile::try_from(items)?;
    Ok(Json(LoadProfileResponse {
        total_daily_energy_wh: profile.total_daily_energy_wh(),
        peak_power_w: profile.peak_power_w(),
        items: profile.items().to_vec(),
    }))
}

/// GET /api/chemistries
/// List battery chemistries
///
/// Module constants with the depth of discharge this deployment applies.
#[utoipa::path(
    get,
    path = "/api/chemistries",
    responses(
        (status = 200, description = "Chemistry catalog", body = ChemistryCatalog)
    )
)]
pub async fn list_chemistries(State(state): State<AppState>) -> Result<Json<ChemistryCatalog>, ApiError> {
    let sizing = &state.config.sizing;
    let chemistries = BatteryChemistry::ALL
        .into_iter()
        .map(|c| chemistry_spec(c, None, sizing))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ChemistryCatalog { default_system_voltage_v: sizing.system_voltage_v, chemistries }))
}

/// GET /api/thermal/derate
/// Thermal derate factor for an ambient temperature
#[utoipa::path(
    get,
    path = "/api/thermal/derate",
    params(DerateQuery),
    responses(
        (status = 200, description = "Derate factor and status", body = ThermalDerateFactor),
        (status = 400, description = "Invalid temperature")
    )
)]
pub async fn get_derate(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<DerateQuery>,
) -> Result<Json<ThermalDerateFactor>, ApiError> {
    let profile = q.profile.unwrap_or(state.config.sizing.derate_profile);
    Ok(Json(ThermalDerateModel::new(profile).derate(q.temperature_c)?))
}

/// GET /api/irradiance/clear-sky
/// Hourly clear-sky irradiance for one day
#[utoipa::path(
    get,
    path = "/api/irradiance/clear-sky",
    params(ClearSkyQuery),
    responses(
        (status = 200, description = "Hourly GHI and peak sun hours", body = ClearSkyResponse),
        (status = 400, description = "Invalid coordinates or time zone")
    )
)]
pub async fn get_clear_sky(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ClearSkyQuery>,
) -> Result<Json<ClearSkyResponse>, ApiError> {
    let sizing = &state.config.sizing;
    let timezone = q.timezone.unwrap_or_else(|| sizing.default_timezone.clone());
    let location = Location::new(q.latitude, q.longitude, &timezone)?;
    let series = state.irradiance.clear_sky_series(&location, q.date.unwrap_or(sizing.representative_date))?;

    Ok(Json(ClearSkyResponse {
        latitude: q.latitude,
        longitude: q.longitude,
        timezone,
        peak_sun_hours: series.peak_sun_hours(),
        series,
    }))
}

/// GET /api/climate/daily
/// Historical daily insolation and temperature
///
/// Proxies the NASA POWER daily point API. Upstream failures are reported as
/// 503, never replaced with defaults.
#[utoipa::path(
    get,
    path = "/api/climate/daily",
    params(ClimateQuery),
    responses(
        (status = 200, description = "Climate summary", body = ClimateSummary),
        (status = 400, description = "Invalid coordinates or range"),
        (status = 503, description = "NASA POWER unavailable")
    )
)]
pub async fn get_daily_climate(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ClimateQuery>,
) -> Result<Json<ClimateSummary>, ApiError> {
    let summary = state.climate.fetch_daily_climate(q.latitude, q.longitude, q.start, q.end).await?;
    Ok(Json(summary))
}

/// GET /api/climate/hourly
/// Historical hourly irradiance
///
/// Proxies the NASA POWER hourly point API; timestamps are UTC.
#[utoipa::path(
    get,
    path = "/api/climate/hourly",
    params(ClimateQuery),
    responses(
        (status = 200, description = "Hourly irradiance", body = Vec<HourlyIrradiance>),
        (status = 400, description = "Invalid coordinates or range"),
        (status = 503, description = "NASA POWER unavailable")
    )
)]
pub async fn get_hourly_climate(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ClimateQuery>,
) -> Result<Json<Vec<HourlyIrradiance>>, ApiError> {
    let hours = state.climate.fetch_hourly_irradiance(q.latitude, q.longitude, q.start, q.end).await?;
    Ok(Json(hours))
}
