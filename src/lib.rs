//! # vetter — Declarative request-parameter validation
//!
//! `vetter` checks the body, query and path parameters of an incoming request
//! against a schema of expected fields (type, required-ness, source location,
//! nested object shape) and produces an ordered list of human-readable
//! errors, or lets the request through.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use vetter::request::RequestParts;
//!
//! let schema = vetter::schema()
//!     .field("name", vetter::string().required())
//!     .field(
//!         "address",
//!         vetter::object().required().properties(
//!             vetter::schema()
//!                 .field("streetNumber", vetter::number().required())
//!                 .field("city", vetter::string().required()),
//!         ),
//!     );
//!
//! // Compiled once, at setup time
//! let validator = vetter::Validator::new(schema).unwrap();
//!
//! let req = RequestParts::new().with_body(json!({
//!     "name": "Fancy Diner",
//!     "address": { "streetNumber": 10 }
//! }));
//! let errors = validator.validate(&req).unwrap_err();
//! assert_eq!(errors.errors[0].name, "address.city");
//! assert_eq!(errors.errors[0].error, "address.city is a required field");
//! ```
//!
//! ## Locations
//!
//! Without locations, fields are looked up in a merged view of body, query
//! and params (params win over query, query over body). With locations,
//! every top-level field must declare one and is read from that container
//! only.

pub mod checks;
pub mod compiler;
pub mod error;
pub mod location;
pub mod middleware;
pub mod request;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod validator;

// Re-export serde_json so integrations agree on the value type
#[doc(hidden)]
pub use serde_json;

pub use compiler::{compile, compile_value, CompiledSchema, Layout};
pub use error::{SchemaError, ValidationError, ValidationErrors};
pub use location::Location;
pub use middleware::{FailureBody, Outcome, Responder, BAD_REQUEST, INVALID_REQUEST};
pub use request::{RequestParams, RequestParts};
pub use schema::{FieldDefinition, Schema};
pub use types::FieldType;
pub use validator::Validator;

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Create an empty schema.
pub fn schema() -> Schema {
    Schema::new()
}

/// Whole number; numeric strings are accepted.
pub fn integer() -> FieldDefinition {
    FieldDefinition::new(FieldType::Integer)
}

/// Finite number; numeric strings are accepted.
pub fn number() -> FieldDefinition {
    FieldDefinition::new(FieldType::Number)
}

pub fn string() -> FieldDefinition {
    FieldDefinition::new(FieldType::String)
}

pub fn uuid() -> FieldDefinition {
    FieldDefinition::new(FieldType::Uuid)
}

/// Key/value mapping (or JSON text holding one). Add a nested schema with
/// [`FieldDefinition::properties`].
pub fn object() -> FieldDefinition {
    FieldDefinition::new(FieldType::Object)
}

pub fn array_of_strings() -> FieldDefinition {
    FieldDefinition::new(FieldType::ArrayOfStrings)
}

pub fn array_of_uuid() -> FieldDefinition {
    FieldDefinition::new(FieldType::ArrayOfUuid)
}

/// Date or date-time text.
pub fn iso_string() -> FieldDefinition {
    FieldDefinition::new(FieldType::IsoString)
}

pub fn boolean() -> FieldDefinition {
    FieldDefinition::new(FieldType::Boolean)
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Common imports for working with `vetter`.
pub mod prelude {
    pub use crate::compiler::{compile, CompiledSchema};
    pub use crate::error::{SchemaError, ValidationError, ValidationErrors};
    pub use crate::location::Location;
    pub use crate::middleware::{FailureBody, Outcome, Responder};
    pub use crate::request::{RequestParams, RequestParts};
    pub use crate::schema::{FieldDefinition, Schema};
    pub use crate::types::FieldType;
    pub use crate::validator::Validator;
}
