use utoipa::OpenApi;
use crate::controllers::design_controller;
use crate::models::{api, climate, design, irradiance};

#[derive(OpenApi)]
#[openapi(
    paths(
        design_controller::create_design,
        design_controller::summarize_loads,
        design_controller::list_chemistries,
        design_controller::get_derate,
        design_controller::get_clear_sky,
        design_controller::get_daily_climate,
        design_controller::get_hourly_climate
    ),
    components(
        schemas(
            api::DesignRequest,
            api::LoadProfileResponse,
            api::ChemistryCatalog,
            design::SystemDesignReport,
            design::BatteryBankResult,
            design::SolarArrayResult,
            design::ThermalDerateFactor,
            design::LoadItem,
            climate::ClimateSummary,
            climate::HourlyIrradiance,
            irradiance::ClearSkyResponse
        )
    ),
    tags(
        (name = "microgrid-sizer", description = "Off-grid solar + battery sizing API")
    )
)]
pub struct ApiDoc;
