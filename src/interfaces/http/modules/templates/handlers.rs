//! Pricing template REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    CopyTemplateRequest, CreateTemplateRequest, TemplateResponse, UpdateTemplateRequest,
};
use crate::interfaces::http::common::{
    error_response, ApiError, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/pricing/templates",
    tag = "Templates",
    responses(
        (status = 200, description = "Template list", body = ApiResponse<Vec<TemplateResponse>>)
    )
)]
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TemplateResponse>>>, ApiError> {
    let templates = state
        .billing
        .list_templates()
        .await
        .map_err(|e| error_response(&e))?;
    let responses: Vec<TemplateResponse> = templates.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(responses)))
}

#[utoipa::path(
    get,
    path = "/api/v1/pricing/templates/{id}",
    tag = "Templates",
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template details", body = ApiResponse<TemplateResponse>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>)
    )
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TemplateResponse>>, ApiError> {
    match state.billing.get_template(id).await {
        Ok(template) => Ok(Json(ApiResponse::success(template.into()))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/pricing/templates",
    tag = "Templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<TemplateResponse>),
        (status = 400, description = "Invalid data", body = ApiResponse<EmptyData>),
        (status = 409, description = "Name already taken", body = ApiResponse<EmptyData>)
    )
)]
pub async fn create_template(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TemplateResponse>>), ApiError> {
    let template = req.into_template(Utc::now());
    match state.billing.create_template(template).await {
        Ok(saved) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(saved.into())),
        )),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/pricing/templates/{id}",
    tag = "Templates",
    params(("id" = i32, Path, description = "Template ID")),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<TemplateResponse>),
        (status = 400, description = "Invalid data", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>),
        (status = 409, description = "Name already taken", body = ApiResponse<EmptyData>)
    )
)]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateTemplateRequest>,
) -> Result<Json<ApiResponse<TemplateResponse>>, ApiError> {
    let mut template = state
        .billing
        .get_template(id)
        .await
        .map_err(|e| error_response(&e))?;

    req.apply(&mut template, Utc::now());

    match state.billing.update_template(template).await {
        Ok(updated) => Ok(Json(ApiResponse::success(updated.into()))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/pricing/templates/{id}/copy",
    tag = "Templates",
    params(("id" = i32, Path, description = "Source template ID")),
    request_body = CopyTemplateRequest,
    responses(
        (status = 201, description = "Copied", body = ApiResponse<TemplateResponse>),
        (status = 404, description = "Source not found", body = ApiResponse<EmptyData>),
        (status = 409, description = "Name already taken", body = ApiResponse<EmptyData>)
    )
)]
pub async fn copy_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CopyTemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TemplateResponse>>), ApiError> {
    match state.billing.copy_template(id, req.name, Utc::now()).await {
        Ok(copy) => Ok((StatusCode::CREATED, Json(ApiResponse::success(copy.into())))),
        Err(e) => Err(error_response(&e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/pricing/templates/{id}",
    tag = "Templates",
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found", body = ApiResponse<EmptyData>),
        (status = 409, description = "Template is linked to a lot", body = ApiResponse<EmptyData>)
    )
)]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    match state.billing.delete_template(id).await {
        Ok(()) => Ok(Json(ApiResponse::success(EmptyData {}))),
        Err(e) => Err(error_response(&e)),
    }
}
