//! # vetter-axum — Axum integration for the `vetter` validation library
//!
//! Provides a middleware function that validates a request's body, query and
//! path parameters against a compiled `vetter` schema before the handler runs:
//!
//! | Item | Role |
//! |---|---|
//! | [`validate_request`] | middleware for `axum::middleware::from_fn_with_state` |
//! | [`Validated`] | extractor for the decoded parameters, after the middleware ran |
//! | [`ValidatedParams`] | the request extension behind [`Validated`], shared with `vetter-tower` |
//! | [`Rejection`] | the `400 Bad Request` response on failure |
//!
//! Apply it with `route_layer` so path parameters are already matched.
//!
//! # Quick example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{middleware, routing::post, Router};
//! use vetter_axum::{validate_request, Validated};
//!
//! let validator = vetter::Validator::new(
//!     vetter::schema()
//!         .field("id", vetter::uuid().required().in_params())
//!         .field("name", vetter::string().required().in_body()),
//! )
//! .unwrap();
//!
//! async fn handler(Validated(params): Validated) -> String {
//!     format!("name={}", params.body["name"])
//! }
//!
//! let app: Router = Router::new()
//!     .route("/users/{id}", post(handler))
//!     .route_layer(middleware::from_fn_with_state(
//!         Arc::new(validator),
//!         validate_request,
//!     ));
//! ```

use std::sync::Arc;

use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::StatusCode;
use vetter::{FailureBody, Outcome, RequestParts, Validator};
use vetter_http_common::{body_error_failure, path_params_to_map, request_parts};

pub use vetter_http_common::ValidatedParams;

// ============================= Rejection =====================================

/// Response returned when validation fails: `400` with the failure payload.
#[derive(Debug, Clone)]
pub struct Rejection {
    body: FailureBody,
}

impl Rejection {
    pub fn body(&self) -> &FailureBody {
        &self.body
    }
}

impl From<FailureBody> for Rejection {
    fn from(body: FailureBody) -> Self {
        Rejection { body }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, axum::Json(self.body)).into_response()
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} error(s)", self.body.message, self.body.errors.len())
    }
}

// ============================= Middleware ====================================

/// Validate the request, then run the rest of the stack or reject with `400`.
///
/// Path parameters come from the matched route; when none were matched the
/// params container is empty. On success the decoded [`RequestParts`] are
/// stored in the request extensions as [`ValidatedParams`] (see [`Validated`]).
pub async fn validate_request(
    State(validator): State<Arc<Validator>>,
    path: Result<RawPathParams, RawPathParamsRejection>,
    req: Request,
    next: Next,
) -> Response {
    let params = match &path {
        Ok(raw) => path_params_to_map(raw.iter()),
        Err(_) => Default::default(),
    };

    let (mut parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "failed to read request body");
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    let content_type = parts
        .headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let request = match request_parts(parts.uri.query(), content_type, &bytes, params) {
        Ok(request) => request,
        Err(err) => return Rejection::from(body_error_failure(&err)).into_response(),
    };

    match validator.check(&request) {
        Outcome::Continue => {
            parts.extensions.insert(ValidatedParams(request));
            next.run(Request::from_parts(parts, axum::body::Body::from(bytes)))
                .await
        }
        Outcome::Reject { body, .. } => Rejection::from(body).into_response(),
    }
}

// ============================= Validated =====================================

/// Extractor for the parameters decoded by [`validate_request`].
///
/// Fails with `500` when the middleware was not applied to the route.
pub struct Validated(pub RequestParts);

impl<S> FromRequestParts<S> for Validated
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ValidatedParams>()
            .map(|params| Validated(params.0.clone()))
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "vetter-axum: validate_request middleware is not applied to this route",
            ))
    }
}

/// Prelude — import everything you need.
pub mod prelude {
    pub use crate::{validate_request, Rejection, Validated, ValidatedParams};
    pub use vetter::prelude::*;
}
