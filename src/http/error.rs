//! Service errors and request rejections rendered as error envelopes.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::config::Settings;
use crate::domain::ValidationError;
use crate::envelope::{self, ApiResponse};
use crate::service::ServiceError;

const INTERNAL_MESSAGE: &str = "Internal server error";

pub(crate) fn render(err: ServiceError, settings: &Settings) -> ApiResponse {
    if err.is_internal() {
        error!(error = %err, "request failed");
        let details = settings.debug.then(|| err.to_string());
        return envelope::error(
            err.error_code(),
            INTERNAL_MESSAGE,
            details.as_deref(),
            err.status_code(),
            Vec::new(),
        );
    }

    domain(err)
}

fn domain(err: ServiceError) -> ApiResponse {
    envelope::error(
        err.error_code(),
        &err.to_string(),
        None,
        err.status_code(),
        Vec::new(),
    )
}

/// 422 for a query, path or body that failed validation.
pub(crate) fn invalid(err: ValidationError) -> ApiResponse {
    domain(ServiceError::from(err))
}

/// 422 for a request the extractors could not decode.
pub(crate) fn rejected(field: &str, rejection: impl IntoResponse) -> ApiResponse {
    let details = match rejection.into_response().status() {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "expected a JSON body",
        _ => "could not be decoded",
    };
    invalid(ValidationError::new(field, details))
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value))
            {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}
