use axum::{
    Router,
    routing::{get, post},
};

use crate::controllers::design_controller::{
    create_design, get_clear_sky, get_daily_climate, get_derate, get_hourly_climate, list_chemistries,
    summarize_loads,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn design_routes(state: AppState) -> Router {
    Router::new()
        .route("/design",                post(create_design))
        .route("/loads/profile",         post(summarize_loads))
        .route("/chemistries",           get(list_chemistries))
        .route("/thermal/derate",        get(get_derate))
        .route("/irradiance/clear-sky",  get(get_clear_sky))
        .route("/climate/daily",         get(get_daily_climate))
        .route("/climate/hourly",        get(get_hourly_climate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(Config::default()).unwrap();
        Router::new().nest("/api", design_routes(state))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_design_endpoint() {
        let req = post_json(
            "/api/design",
            json!({
                "latitude": 11.95,
                "longitude": -66.67,
                "daily_energy_wh": 5000.0,
                "autonomy_days": 1.5,
                "ambient_temp_c": 35.0,
                "chemistry": "LITHIUM_LFP",
                "panel_watt": 450.0
            }),
        );
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["thermal"]["status"], "HOT");
        assert_eq!(body["thermal"]["factor"], 0.9);
        assert_eq!(body["location"]["timezone"], "America/Caracas");
        assert_eq!(body["solar"]["generation_curve"].as_array().unwrap().len(), 24);
        assert!(body["battery"]["module_count"].as_u64().unwrap() >= 2);
    }

    #[tokio::test]
    async fn test_design_rejects_bad_voltage() {
        let req = post_json(
            "/api/design",
            json!({
                "latitude": 11.95,
                "longitude": -66.67,
                "daily_energy_wh": 5000.0,
                "autonomy_days": 1.5,
                "ambient_temp_c": 25.0,
                "chemistry": "LEAD_ACID",
                "panel_watt": 450.0,
                "system_voltage_v": 0.0
            }),
        );
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_load_profile_endpoint() {
        let req = post_json(
            "/api/loads/profile",
            json!([
                { "name": "Fridge", "watts": 300.0, "quantity": 1, "hours_per_day": 24.0 },
                { "name": "LED bulbs", "watts": 25.0, "quantity": 6, "hours_per_day": 6.0 }
            ]),
        );
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["total_daily_energy_wh"], 8100.0);
        assert_eq!(body["peak_power_w"], 450.0);
    }

    #[tokio::test]
    async fn test_derate_endpoint_profiles() {
        let resp = app()
            .oneshot(Request::get("/api/thermal/derate?temperature_c=19.9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["factor"], 0.85);

        let resp = app()
            .oneshot(
                Request::get("/api/thermal/derate?temperature_c=75&profile=continuous")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["factor"], 0.5);
    }

    #[tokio::test]
    async fn test_chemistries_endpoint() {
        let resp = app()
            .oneshot(Request::get("/api/chemistries").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["default_system_voltage_v"], 48.0);
        assert_eq!(body["chemistries"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_sky_endpoint() {
        let resp = app()
            .oneshot(
                Request::get("/api/irradiance/clear-sky?latitude=11.95&longitude=-66.67&date=2024-06-21")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert!(body["peak_sun_hours"].as_f64().unwrap() > 5.0);
        assert_eq!(body["series"]["points"].as_array().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_clear_sky_rejects_unknown_timezone() {
        let resp = app()
            .oneshot(
                Request::get("/api/irradiance/clear-sky?latitude=11.95&longitude=-66.67&timezone=Nowhere/Atlantis")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_load_profile_rejects_negative_quantity() {
        let req = post_json(
            "/api/loads/profile",
            json!([{ "name": "Fan", "watts": 60.0, "quantity": -1, "hours_per_day": 8.0 }]),
        );
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "INVALID_INPUT");
        assert!(body["message"].as_str().unwrap().contains("quantity"));
    }

    #[tokio::test]
    async fn test_design_rejects_unknown_chemistry() {
        let req = post_json(
            "/api/design",
            json!({
                "latitude": 11.95,
                "longitude": -66.67,
                "daily_energy_wh": 5000.0,
                "autonomy_days": 1.5,
                "ambient_temp_c": 25.0,
                "chemistry": "NICKEL_IRON",
                "panel_watt": 450.0
            }),
        );
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_derate_rejects_non_numeric_temperature() {
        let resp = app()
            .oneshot(Request::get("/api/thermal/derate?temperature_c=warm").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_hourly_climate_endpoint() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hourly/point"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "parameter": {
                    "ALLSKY_SFC_SW_DWN": { "2022010115": 410.5, "2022010116": -999.0 }
                }}
            })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.climate_api.base_url = server.uri();
        let app = Router::new().nest("/api", design_routes(AppState::new(config).unwrap()));

        let resp = app
            .oneshot(
                Request::get("/api/climate/hourly?latitude=34.05&longitude=-118.25&start=2022-01-01&end=2022-01-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["ghi_w_m2"], 410.5);
    }

    #[tokio::test]
    async fn test_hourly_climate_rejects_reversed_range() {
        let resp = app()
            .oneshot(
                Request::get("/api/climate/hourly?latitude=34.05&longitude=-118.25&start=2022-01-03&end=2022-01-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "INVALID_INPUT");
    }
}
