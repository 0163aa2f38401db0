use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use common_redis::CustomRedisError;

/// Wire shape for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body, err = {0}")]
    InvalidRequestBody(String),
    #[error("Invalid recipe id, err = {0}")]
    InvalidRecipeId(String),
    #[error("`tag` query parameter is required.")]
    MissingTagParameter,
    // An absent id path parameter is reported as a server fault, not a
    // client fault; see DESIGN.md before changing this to a 400.
    #[error("ID parameter not provided")]
    MissingIdParameter,
    #[error("Recipe not found")]
    RecipeNotFound,

    #[error("Database unavailable")]
    DatabaseUnavailable,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Cache error: {0}")]
    CacheError(#[from] CustomRedisError),
    #[error("Failed to parse data: {0}")]
    DataParsingError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequestBody(_)
            | ApiError::InvalidRecipeId(_)
            | ApiError::MissingTagParameter => StatusCode::BAD_REQUEST,

            ApiError::RecipeNotFound => StatusCode::NOT_FOUND,

            ApiError::MissingIdParameter
            | ApiError::DatabaseUnavailable
            | ApiError::DatabaseError(_)
            | ApiError::CacheError(_)
            | ApiError::DataParsingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            status_code: status.as_u16(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_faults_map_to_400() {
        assert_eq!(
            ApiError::InvalidRequestBody("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidRecipeId("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MissingTagParameter.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_id_parameter_is_reported_as_a_server_fault() {
        assert_eq!(
            ApiError::MissingIdParameter.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            ApiError::RecipeNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_upstream_failures_map_to_500() {
        assert_eq!(
            ApiError::CacheError(CustomRedisError::Timeout).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::DatabaseUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_uses_the_wire_field_names() {
        let value =
            serde_json::to_value(ErrorBody {
                status_code: 404,
                error: "Recipe not found".to_string(),
            })
            .unwrap();
        assert_eq!(value["statusCode"], 404);
        assert_eq!(value["error"], "Recipe not found");
    }
}
