use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use plateful_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "E_NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "E_BAD_REQUEST"),
            ApiError::ValidationError(_) => (StatusCode::BAD_REQUEST, "E_VALIDATION"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "E_UNAUTHORIZED"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "E_CONFLICT"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "E_UPSTREAM"),
            ApiError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "E_INTERNAL_SERVER_ERROR")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        let message = error.to_string();
        match error {
            _ if error.is_not_found() => ApiError::NotFound(message),
            CoreError::Invalid(_) | CoreError::AmbiguousIngredient { .. } => {
                ApiError::ValidationError(message)
            }
            CoreError::DishAlreadyOrdered
            | CoreError::StaleRevision { .. }
            | CoreError::IncompleteQuantityUpdate { .. } => ApiError::Conflict(message),
            CoreError::ExternalServiceError(_) | CoreError::ExternalWriteFailure(_) => {
                error!("Record store failure: {}", message);
                ApiError::BadGateway(message)
            }
            _ => ApiError::InternalServerError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let body = ApiErrorResponse {
            code: code.to_string(),
            message: self.to_string(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// JSON body extractor that runs `validator` rules before the handler sees the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| ApiError::ValidationError(errors.to_string()))?;
        Ok(ValidateJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let cases = [
            (CoreError::CustomerNotFound, StatusCode::NOT_FOUND),
            (
                CoreError::IngredientNotFound("kale".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                CoreError::AmbiguousIngredient {
                    name: "pepper".to_string(),
                    candidates: vec!["Red Pepper".to_string(), "Pepper Jack".to_string()],
                },
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::DishAlreadyOrdered, StatusCode::CONFLICT),
            (
                CoreError::IncompleteQuantityUpdate {
                    requested: 2,
                    created: 1,
                },
                StatusCode::CONFLICT,
            ),
            (
                CoreError::StaleRevision {
                    expected: 1,
                    actual: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                CoreError::ExternalWriteFailure("create Orders".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (core_error, status) in cases {
            assert_eq!(ApiError::from(core_error).parts().0, status);
        }
    }

    #[test]
    fn test_error_response_carries_message() {
        let response = ApiError::Conflict("dish already ordered".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
