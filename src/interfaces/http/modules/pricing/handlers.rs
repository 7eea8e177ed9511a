//! Fee preview handler

use axum::{extract::State, Json};
use tracing::warn;

use super::dto::{PricingPreviewRequest, PricingPreviewResponse};
use crate::interfaces::http::common::{
    error_response, ApiError, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/pricing/preview",
    tag = "Pricing",
    request_body = PricingPreviewRequest,
    responses(
        (status = 200, description = "Computed fee", body = PricingPreviewResponse),
        (status = 400, description = "Invalid pricing configuration or input", body = ApiResponse<EmptyData>),
        (status = 404, description = "Template not found", body = ApiResponse<EmptyData>),
        (status = 422, description = "Field validation failed", body = ApiResponse<EmptyData>)
    )
)]
pub async fn preview_fee(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PricingPreviewRequest>,
) -> Result<Json<PricingPreviewResponse>, ApiError> {
    let duration_minutes = req.duration_minutes;
    let template_id = req.template_id;

    match state.billing.preview(req.into()).await {
        Ok(result) => {
            metrics::counter!("parking_fee_previews_total", "outcome" => "ok").increment(1);
            Ok(Json(result.into()))
        }
        Err(e) => {
            metrics::counter!("parking_fee_previews_total", "outcome" => "error").increment(1);
            warn!(duration_minutes, ?template_id, error = %e, "Fee preview failed");
            Err(error_response(&e))
        }
    }
}
