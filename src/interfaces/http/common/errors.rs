//! Mapping of domain errors to HTTP responses

use axum::{http::StatusCode, Json};

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler's `Result`.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) | DomainError::Pricing(_) => StatusCode::BAD_REQUEST,
    }
}

pub fn error_response(error: &DomainError) -> ApiError {
    (status_for(error), Json(ApiResponse::error(error.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricingError;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        assert_eq!(
            status_for(&DomainError::not_found("PricingTemplate", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&PricingError::invalid_input("negative").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&PricingError::configuration("gap").into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn error_body_carries_message() {
        let (_, Json(body)) = error_response(&DomainError::Validation("bad".into()));
        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some("Validation: bad"));
    }
}
