//! Lot pricing and stay quote handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::warn;

use super::dto::{LotPricingRequest, LotPricingResponse, QuoteRequest, QuoteResponse};
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    error_response, ApiError, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/lots/{lot_id}/pricing",
    tag = "Lots",
    params(("lot_id" = i32, Path, description = "Parking lot ID")),
    responses(
        (status = 200, description = "Lot pricing", body = ApiResponse<LotPricingResponse>),
        (status = 404, description = "Lot has no pricing", body = ApiResponse<EmptyData>)
    )
)]
pub async fn get_lot_pricing(
    State(state): State<AppState>,
    Path(lot_id): Path<i32>,
) -> Result<Json<ApiResponse<LotPricingResponse>>, ApiError> {
    match state.billing.get_lot_pricing(lot_id).await {
        Ok(pricing) => Ok(Json(ApiResponse::success(pricing.into()))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/lots/{lot_id}/pricing",
    tag = "Lots",
    params(("lot_id" = i32, Path, description = "Parking lot ID")),
    request_body = LotPricingRequest,
    responses(
        (status = 200, description = "Saved", body = ApiResponse<LotPricingResponse>),
        (status = 400, description = "Invalid pricing configuration", body = ApiResponse<EmptyData>),
        (status = 404, description = "Template not found", body = ApiResponse<EmptyData>)
    )
)]
pub async fn set_lot_pricing(
    State(state): State<AppState>,
    Path(lot_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<LotPricingRequest>,
) -> Result<Json<ApiResponse<LotPricingResponse>>, ApiError> {
    let pricing = req.into_lot_pricing(lot_id, Utc::now());
    match state.billing.set_lot_pricing(pricing).await {
        Ok(saved) => Ok(Json(ApiResponse::success(saved.into()))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/lots/{lot_id}/quote",
    tag = "Lots",
    params(("lot_id" = i32, Path, description = "Parking lot ID")),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Fee owed", body = ApiResponse<QuoteResponse>),
        (status = 400, description = "Invalid stay or pricing", body = ApiResponse<EmptyData>),
        (status = 404, description = "Lot has no pricing", body = ApiResponse<EmptyData>)
    )
)]
pub async fn quote_stay(
    State(state): State<AppState>,
    Path(lot_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<QuoteRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, ApiError> {
    let stay = req
        .to_stay()
        .map_err(|e| error_response(&DomainError::from(e)))?;
    let scope = req.vehicle_scope.unwrap_or_default();

    match state.billing.quote_stay(lot_id, &stay, Utc::now(), scope).await {
        Ok(quote) => Ok(Json(ApiResponse::success(QuoteResponse::new(lot_id, quote)))),
        Err(e) => {
            warn!(lot_id, error = %e, "Stay quote failed");
            Err(error_response(&e))
        }
    }
}
