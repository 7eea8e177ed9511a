pub mod api_response;
pub mod errors;
pub mod validated_json;

pub use api_response::{ApiResponse, EmptyData};
pub use errors::{error_response, ApiError};
pub use validated_json::ValidatedJson;
