//! Framework-agnostic middleware step.
//!
//! Per request: validate, then either answer `400` with a [`FailureBody`] or
//! let the pipeline continue. Framework integrations (`vetter-tower`,
//! `vetter-axum`) are thin wrappers over [`Validator::check`].

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrors};
use crate::request::RequestParams;
use crate::validator::Validator;

/// Status code of every validation failure response.
pub const BAD_REQUEST: u16 = 400;

/// `message` of every validation failure response.
pub const INVALID_REQUEST: &str = "Invalid Request";

/// Failure payload: `{ "message": "Invalid Request", "errors": [{ "name", "error" }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    pub message: String,
    pub errors: Vec<ValidationError>,
}

impl FailureBody {
    pub fn new(errors: ValidationErrors) -> Self {
        Self {
            message: INVALID_REQUEST.to_string(),
            errors: errors.errors,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": self.message,
            "errors": self.errors,
        })
    }
}

impl From<ValidationErrors> for FailureBody {
    fn from(errors: ValidationErrors) -> Self {
        FailureBody::new(errors)
    }
}

/// Result of the middleware step for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Valid: hand the request to the next stage untouched.
    Continue,
    /// Invalid: respond with `status` and `body`, do not continue.
    Reject { status: u16, body: FailureBody },
}

impl Outcome {
    pub fn is_continue(&self) -> bool {
        matches!(self, Outcome::Continue)
    }
}

/// Sink for a failure response (status + payload).
///
/// Implemented for any `FnOnce(u16, FailureBody)`.
pub trait Responder {
    fn send(self, status: u16, body: FailureBody);
}

impl<F> Responder for F
where
    F: FnOnce(u16, FailureBody),
{
    fn send(self, status: u16, body: FailureBody) {
        self(status, body)
    }
}

impl Validator {
    /// Validate `req` and decide whether the pipeline continues.
    pub fn check<R: RequestParams + ?Sized>(&self, req: &R) -> Outcome {
        match self.validate(req) {
            Ok(()) => {
                tracing::trace!("request passed validation");
                Outcome::Continue
            }
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "request failed validation");
                Outcome::Reject {
                    status: BAD_REQUEST,
                    body: FailureBody::new(errors),
                }
            }
        }
    }

    /// Middleware-style entry point.
    ///
    /// On failure `res` receives `400` and the payload and `next` is never
    /// called; on success `next` is called with no arguments and `res` is
    /// left untouched. Returns what `next` returned, if it ran.
    ///
    /// ```
    /// use serde_json::json;
    /// use vetter::request::RequestParts;
    ///
    /// let validator = vetter::Validator::new(
    ///     vetter::schema().field("a", vetter::string().required()),
    /// )
    /// .unwrap();
    ///
    /// let mut sent = None;
    /// let respond = |status: u16, body: vetter::FailureBody| sent = Some((status, body));
    /// let ran = validator.handle(&RequestParts::new(), respond, || ());
    /// assert!(ran.is_none());
    /// let (status, body) = sent.unwrap();
    /// assert_eq!(status, 400);
    /// assert_eq!(body.errors[0].error, "a is a required field");
    /// ```
    pub fn handle<R, S, N, T>(&self, req: &R, res: S, next: N) -> Option<T>
    where
        R: RequestParams + ?Sized,
        S: Responder,
        N: FnOnce() -> T,
    {
        match self.check(req) {
            Outcome::Continue => Some(next()),
            Outcome::Reject { status, body } => {
                res.send(status, body);
                None
            }
        }
    }
}
