use crate::{
    all_precipitation, get_stations, index_handler, precipitation, routes, summary,
    summary_between, summary_from, tobs, AggregationEngine, DateDomain, ErrorBody,
    ObservationStore, PrecipitationReading, Rounding, SqliteStore, StationSummary,
    SummaryRecord,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Process-wide context, built once before the listener accepts requests
#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub domain: Arc<DateDomain>,
    pub engine: Arc<AggregationEngine>,
    pub rounding: Rounding,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::observations::observation_routes::get_stations,
        routes::observations::observation_routes::precipitation,
        routes::observations::observation_routes::all_precipitation,
        routes::observations::observation_routes::tobs,
        routes::summaries::summary_routes::summary,
        routes::summaries::summary_routes::summary_from,
        routes::summaries::summary_routes::summary_between,
    ),
    components(
        schemas(
                ErrorBody,
                StationSummary,
                PrecipitationReading,
                SummaryRecord,
        )
    ),
    tags(
        (name = "climate api", description = "a read-only api over historical Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    remote_url: String,
    database_path: String,
    rounding: Rounding,
) -> Result<AppState, anyhow::Error> {
    let store = Arc::new(
        SqliteStore::open(&database_path)
            .await
            .map_err(|e| anyhow!("error opening observations database: {}", e))?,
    );

    build_app_state_with_store(remote_url, store, rounding).await
}

/// Fails when the dataset is unreachable or empty, so nothing is served
/// without a date domain
pub async fn build_app_state_with_store(
    remote_url: String,
    store: Arc<dyn ObservationStore>,
    rounding: Rounding,
) -> Result<AppState, anyhow::Error> {
    let domain = Arc::new(
        DateDomain::initialize(store.as_ref())
            .await
            .map_err(|e| anyhow!("error building date domain: {}", e))?,
    );
    let engine = Arc::new(
        AggregationEngine::new(store, &domain)
            .map_err(|e| anyhow!("error setting up aggregation: {}", e))?,
    );

    Ok(AppState {
        remote_url,
        domain,
        engine,
        rounding,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/precipitation/all", get(all_precipitation))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/summary", get(summary))
        .route("/api/v1.0/{start}", get(summary_from))
        .route("/api/v1.0/{start}/{end}", get(summary_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
