//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::BillingService;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::modules::{
    health, lots, metrics as metrics_module, pricing, request_id, templates, AppState,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Pricing
        pricing::preview_fee,
        // Templates
        templates::list_templates,
        templates::get_template,
        templates::create_template,
        templates::update_template,
        templates::delete_template,
        templates::copy_template,
        // Lots
        lots::get_lot_pricing,
        lots::set_lot_pricing,
        lots::quote_stay,
    ),
    components(
        schemas(
            ApiResponse<EmptyData>,
            EmptyData,
            health::HealthResponse,
            pricing::PricingPreviewRequest,
            pricing::PricingPreviewResponse,
            pricing::TieredRuleDto,
            templates::TemplateResponse,
            templates::TemplateRuleDto,
            templates::PassRateDto,
            templates::CreateTemplateRequest,
            templates::UpdateTemplateRequest,
            templates::CopyTemplateRequest,
            lots::LotPricingRequest,
            lots::LotPricingResponse,
            lots::ConcessionDto,
            lots::QuoteRequest,
            lots::QuoteResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Pricing", description = "Fee preview for the pricing editor"),
        (name = "Templates", description = "Reusable pricing templates"),
        (name = "Lots", description = "Per-lot pricing and stay quotes"),
    ),
    info(
        title = "Parking Fees API",
        version = "1.0.0",
        description = "Fixed and tiered parking fee calculation with free periods and daily caps",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    billing: Arc<BillingService>,
    prometheus: PrometheusHandle,
    started_at: Instant,
) -> Router {
    let app_state = AppState::new(billing.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pricing_routes = Router::new()
        .route("/preview", post(pricing::preview_fee))
        .route(
            "/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/templates/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/templates/{id}/copy", post(templates::copy_template))
        .with_state(app_state.clone());

    let lot_routes = Router::new()
        .route(
            "/{lot_id}/pricing",
            get(lots::get_lot_pricing).put(lots::set_lot_pricing),
        )
        .route("/{lot_id}/quote", post(lots::quote_stay))
        .with_state(app_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            billing,
            started_at: Arc::new(started_at),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_module::prometheus_metrics))
        .with_state(metrics_module::MetricsState { handle: prometheus });

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + Prometheus
        .merge(health_routes)
        .merge(metrics_routes)
        // Pricing preview + templates
        .nest("/api/v1/pricing", pricing_routes)
        // Lots
        .nest("/api/v1/lots", lot_routes)
        // Middleware
        .layer(middleware::from_fn(metrics_module::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
