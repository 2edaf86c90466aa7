//! Request extractors with application-shaped rejections.
//!
//! Axum's stock `Json` and `Query` extractors reject malformed input with
//! 422/plain-text responses. Every error this API emits is a 400-category
//! JSON `{"error": ...}` body, so handlers use these thin wrappers, which
//! funnel deserialization rejections through [`AppError::InvalidRequest`].

use axum::extract::{
    FromRequest, FromRequestParts, Query, Request,
    rejection::{JsonRejection, QueryRejection},
};
use axum::http::request::Parts;

use crate::error::AppError;

/// `axum::Json` with rejections mapped to 400 `{"error": ...}`.
///
/// Extractor only; responses keep using `axum::Json`.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// `axum::extract::Query` with rejections mapped to 400 `{"error": ...}`.
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
        response::IntoResponse,
    };
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Credentials {
        email: String,
        password: String,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Filter {
        country_id: Option<i64>,
    }

    async fn response_error(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_body_field_is_a_400_json_error() {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"password":"secret"}"#))
            .unwrap();

        let rejection = AppJson::<Credentials>::from_request(request, &())
            .await
            .err()
            .expect("missing field must be rejected");

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_error(response).await;
        assert!(body["error"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_400_json_error() {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let rejection = AppJson::<Credentials>::from_request(request, &())
            .await
            .err()
            .expect("malformed body must be rejected");

        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unparseable_query_is_a_400_json_error() {
        let request = HttpRequest::builder()
            .uri("/api/viewers?country_id=not-a-number")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let rejection = AppQuery::<Filter>::from_request_parts(&mut parts, &())
            .await
            .err()
            .expect("bad query must be rejected");

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response_error(response).await.get("error").is_some());
    }
}
