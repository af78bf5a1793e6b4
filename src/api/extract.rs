//! Request extraction with boundary validation.
//!
//! Handlers take [`ValidatedJson<T>`] instead of [`axum::Json<T>`], so
//! business logic only ever sees typed requests that passed
//! [`Validate::validate`].

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::EnrollError;

/// Field-level checks run after a request body deserialized.
pub trait Validate {
    /// Checks field values.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollError::InvalidField`] naming the first bad field.
    fn validate(&self) -> Result<(), EnrollError>;
}

/// JSON body extractor that rejects malformed or invalid payloads with 400.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = EnrollError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| EnrollError::InvalidPayload(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Fails with [`EnrollError::InvalidField`] if `value` is blank.
///
/// # Errors
///
/// Returns [`EnrollError::InvalidField`] for empty or whitespace-only input.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<(), EnrollError> {
    if value.trim().is_empty() {
        return Err(EnrollError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        name: String,
    }

    impl Validate for Probe {
        fn validate(&self) -> Result<(), EnrollError> {
            require_non_blank("name", &self.name)
        }
    }

    fn request(body: &'static str) -> Request {
        let Ok(req) = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
        else {
            panic!("request build failed");
        };
        req
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let result = ValidatedJson::<Probe>::from_request(request(r#"{"name":"x"}"#), &()).await;
        let Ok(ValidatedJson(probe)) = result else {
            panic!("body should be accepted");
        };
        assert_eq!(probe.name, "x");
    }

    #[tokio::test]
    async fn mistyped_field_is_invalid_payload() {
        let result = ValidatedJson::<Probe>::from_request(request(r#"{"name":123}"#), &()).await;
        assert!(matches!(result, Err(EnrollError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn blank_field_is_invalid_field() {
        let result = ValidatedJson::<Probe>::from_request(request(r#"{"name":"  "}"#), &()).await;
        assert!(matches!(
            result,
            Err(EnrollError::InvalidField { field: "name", .. })
        ));
    }
}
