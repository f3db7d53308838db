use std::fmt;

use serde::{Deserialize, Serialize};

/// A single validation failure: the dotted key path and a human-readable message.
///
/// Serialized as `{ "name": "...", "error": "..." }`, which is the shape of
/// each entry in the failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Full key path, e.g. `address.streetName`.
    pub name: String,
    /// Message, e.g. `address.streetName is a required field`.
    pub error: String,
}

impl ValidationError {
    /// `<path> is a required field`
    pub fn required(path: &str) -> Self {
        Self {
            name: path.to_string(),
            error: format!("{} is a required field", path),
        }
    }

    /// `<path> must be of type <type>`
    pub fn wrong_type(path: &str, type_name: &str) -> Self {
        Self {
            name: path.to_string(),
            error: format!("{} must be of type {}", path, type_name),
        }
    }

    /// `<path> is not an allowed field`
    pub fn not_allowed(path: &str) -> Self {
        Self {
            name: path.to_string(),
            error: format!("{} is not an allowed field", path),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

/// Ordered collection of validation failures from one validation pass.
///
/// Errors are accumulated (not short-circuited), so all issues are reported at once.
/// An empty collection means the request is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create an empty error container.
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append another pass's errors after this one's, keeping order.
    pub fn merge(mut self, other: ValidationErrors) -> Self {
        self.errors.extend(other.errors);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Key paths of every error, in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.name.as_str()).collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Configuration error raised while building or compiling a schema.
///
/// These never occur per request: a schema that fails here must not be
/// mounted at all.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema must be a mapping of field names to field definitions")]
    NotAMapping,

    #[error("field definition for `{field}` must be a mapping")]
    InvalidFieldDefinition { field: String },

    #[error("field `{field}` does not declare a type")]
    MissingType { field: String },

    #[error("field `{field}` declares unknown type `{type_name}`")]
    UnknownType { field: String, type_name: String },

    #[error("field `{field}`: `{key}` must be {expected}")]
    InvalidAttribute {
        field: String,
        key: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` has no location, but other fields in the schema declare one")]
    MissingLocation { field: String },

    #[error("field `{field}` declares invalid location `{value}` (expected body, query, params or path)")]
    InvalidLocation { field: String, value: String },

    #[error("field `{field}` declares properties but is not of type object")]
    PropertiesOnNonObject { field: String },

    #[error("nested field `{field}` cannot declare a location")]
    NestedLocation { field: String },

    #[error("failed to parse schema: {0}")]
    Parse(String),

    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
}
