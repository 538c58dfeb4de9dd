//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;

/// JSON extractor that automatically validates the payload.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| invalid_body(e.body_text()))?;

        value.validate().map_err(|e| {
            // First failing field is enough for the caller
            let message = e
                .field_errors()
                .into_iter()
                .min_by_key(|(field, _)| *field)
                .and_then(|(field, errors)| {
                    let error = errors.first()?;
                    Some(match &error.message {
                        Some(msg) => msg.to_string(),
                        None => format!("{field} is invalid"),
                    })
                })
                .unwrap_or_else(|| "validation failed".to_string());
            invalid_body(message)
        })?;

        Ok(ValidatedJson(value))
    }
}

pub(crate) fn invalid_body(reason: impl std::fmt::Display) -> AppError {
    AppError::bad_request(format!("Provided body is invalid: {reason}"))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 2, message = "name is too short"))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_payload() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"Ana"}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "Ana");
    }

    #[tokio::test]
    async fn rule_violation_is_bad_request_with_rule_message() {
        let Err(err) =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"A"}"#), &()).await
        else {
            panic!("expected rejection");
        };
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Provided body is invalid: name is too short");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let Err(err) = ValidatedJson::<Payload>::from_request(json_request("{"), &()).await else {
            panic!("expected rejection");
        };
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("Provided body is invalid: "));
    }
}
