use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use thiserror::Error;

use crate::application::http::server::api_entities::api_error::ApiError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token not found")]
    TokenNotFound,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::Unauthorized(self.to_string()).into_response()
    }
}

/// Customer token carried as `Authorization: Bearer <token>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerToken(pub String);

impl<S> FromRequestParts<S> for CustomerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token_from_bearer(parts).await?;
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(CustomerToken(token.to_string()))
    }
}

pub async fn extract_token_from_bearer(parts: &mut Parts) -> Result<String, AuthError> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AuthError::TokenNotFound)?;

    Ok(bearer.token().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};

    async fn token_from(header: Option<&str>) -> Result<CustomerToken, AuthError> {
        let mut builder = Request::builder().uri("/plan");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();

        CustomerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_bearer_token_is_extracted() {
        let token = token_from(Some("Bearer tok-1")).await.unwrap();
        assert_eq!(token, CustomerToken("tok-1".to_string()));
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let error = token_from(None).await.unwrap_err();

        assert_eq!(error, AuthError::TokenNotFound);
        assert_eq!(error.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_other_schemes_are_rejected() {
        let error = token_from(Some("Basic dXNlcjpwYXNz")).await.unwrap_err();
        assert_eq!(error, AuthError::TokenNotFound);
    }
}
