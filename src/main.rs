use std::net::SocketAddr;
use std::path::Path;

use axum::{Router, response::Html, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use microgrid_sizer::api_docs::ApiDoc;
use microgrid_sizer::config::Config;
use microgrid_sizer::routes::design_routes::design_routes;
use microgrid_sizer::shared_state::AppState;

const CONFIG_PATH: &str = "config.json";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hyper=warn,reqwest=warn,tower_http=info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    // 1. Load configuration
    let config = if Path::new(CONFIG_PATH).exists() {
        match Config::load(CONFIG_PATH) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load {}: {}", CONFIG_PATH, e);
                return;
            }
        }
    } else {
        warn!("{} not found, using built-in defaults", CONFIG_PATH);
        Config::default()
    };
    info!(
        "Configuration loaded: {:.0} V system, {:?} derate profile, LFP DoD {:.2}",
        config.sizing.system_voltage_v, config.sizing.derate_profile, config.sizing.lithium_depth_of_discharge
    );

    // 2. Initialize shared state
    let server_port = config.server.port;
    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    // 3. Start Axum HTTP server
    let app = Router::new()
        .nest("/api", design_routes(state))
        .route("/scalar", get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        error!("HTTP server error: {}", e);
    }
}
