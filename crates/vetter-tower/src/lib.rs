//! # vetter-tower — Tower middleware for `vetter` validation
//!
//! A universal [`tower_layer::Layer`] that validates the body, query and path
//! parameters of incoming HTTP requests against a compiled `vetter` schema.
//! Works with any Tower-compatible stack: Axum, Hyper, Tonic, Warp, etc.
//!
//! On **success** the decoded parameters are stored in
//! [`http::Request::extensions`] as [`ValidatedParams`] so downstream handlers can
//! read them without re-parsing. The original body bytes are forwarded as-is.
//!
//! On **failure** a `400 Bad Request` JSON response is returned immediately
//! and the inner service is never called:
//!
//! ```json
//! { "message": "Invalid Request", "errors": [{ "name": "a", "error": "a is a required field" }] }
//! ```
//!
//! Path parameters are read from a [`PathParams`] request extension, which
//! the router (or an outer layer) must insert. Without it the params
//! container is empty.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vetter_tower::ValidateRequestLayer;
//!
//! let validator = vetter::Validator::new(
//!     vetter::schema()
//!         .field("name", vetter::string().required())
//!         .field("page", vetter::integer()),
//! )
//! .expect("schema is valid");
//!
//! let layer = ValidateRequestLayer::new(validator);
//! // let svc = ServiceBuilder::new().layer(layer).service(handler);
//! ```

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use vetter::{FailureBody, Outcome, RequestParts, Validator};
use vetter_http_common::{body_error_failure, failure_bytes, request_parts};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// Request extensions
// ---------------------------------------------------------------------------

/// Path parameters of a request, as matched by the router.
///
/// Insert into the request extensions before the validation layer runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathParams(pub Map<String, Value>);

impl PathParams {
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        PathParams(vetter_http_common::path_params_to_map(pairs))
    }
}

pub use vetter_http_common::ValidatedParams;

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// A [`tower_layer::Layer`] that validates request parameters with `vetter`.
///
/// # Behaviour
///
/// 1. Reads the full request body and decodes it by `Content-Type`
///    (JSON or URL-encoded form; anything else is an empty container).
/// 2. Parses the query string and takes path parameters from [`PathParams`].
/// 3. **Valid** — inserts [`ValidatedParams`] into request extensions, re-attaches
///    the body bytes, and calls the inner service.
/// 4. **Invalid** — returns `400 Bad Request` with the failure payload.
///    A JSON body that does not parse is reported the same way, as
///    `body must be of type object`.
#[derive(Clone)]
pub struct ValidateRequestLayer {
    validator: Arc<Validator>,
}

impl ValidateRequestLayer {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }

    /// Share one validator between several layers.
    pub fn from_arc(validator: Arc<Validator>) -> Self {
        Self { validator }
    }
}

impl<S> tower_layer::Layer<S> for ValidateRequestLayer {
    type Service = ValidateRequestService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidateRequestService {
            inner,
            validator: Arc::clone(&self.validator),
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// The middleware [`Service`](tower_service::Service) created by
/// [`ValidateRequestLayer`].
#[derive(Clone)]
pub struct ValidateRequestService<S> {
    inner: S,
    validator: Arc<Validator>,
}

fn failure_response<ResBody>(body: &FailureBody) -> Response<ResBody>
where
    ResBody: From<Full<Bytes>>,
{
    let mut resp = Response::new(ResBody::from(Full::new(Bytes::from(failure_bytes(body)))));
    *resp.status_mut() = StatusCode::BAD_REQUEST;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

impl<S, ReqBody, ResBody> tower_service::Service<Request<ReqBody>> for ValidateRequestService<S>
where
    S: tower_service::Service<Request<Full<Bytes>>, Response = Response<ResBody>>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError>,
    ReqBody: Body + Send + 'static,
    ReqBody::Data: Send,
    ReqBody::Error: Into<BoxError>,
    ResBody: From<Full<Bytes>> + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let mut inner = self.inner.clone();
        // Swap so `self` is ready for next call (standard Tower pattern)
        std::mem::swap(&mut self.inner, &mut inner);
        let validator = Arc::clone(&self.validator);

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let bytes = body
                .collect()
                .await
                .map_err(|e| -> BoxError {
                    let err: BoxError = e.into();
                    tracing::debug!(error = %err, "failed to read request body");
                    err
                })?
                .to_bytes();

            let content_type = parts
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let path_params = parts
                .extensions
                .get::<PathParams>()
                .map(|p| p.0.clone())
                .unwrap_or_default();

            let params = match request_parts(parts.uri.query(), content_type, &bytes, path_params)
            {
                Ok(params) => params,
                Err(err) => return Ok(failure_response(&body_error_failure(&err))),
            };

            match validator.check(&params) {
                Outcome::Continue => {
                    let mut new_req = Request::from_parts(parts, Full::new(bytes));
                    new_req.extensions_mut().insert(ValidatedParams(params));
                    inner.call(new_req).await.map_err(Into::into)
                }
                Outcome::Reject { body, .. } => {
                    tracing::debug!(
                        method = %parts.method,
                        path = parts.uri.path(),
                        errors = body.errors.len(),
                        "rejecting invalid request"
                    );
                    Ok(failure_response(&body))
                }
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Helper: read validated parameters from request extensions
// ---------------------------------------------------------------------------

/// The parameters stored by [`ValidateRequestService`], if it ran.
pub fn validated_params<B>(req: &Request<B>) -> Option<&RequestParts> {
    req.extensions().get::<ValidatedParams>().map(|v| &v.0)
}

/// Prelude — import everything you need.
pub mod prelude {
    pub use crate::{
        validated_params, PathParams, ValidateRequestLayer, ValidateRequestService,
        ValidatedParams,
    };
}
