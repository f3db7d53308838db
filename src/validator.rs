//! The validation engine.
//!
//! Walks a schema and a value mapping in lock-step, producing an ordered list
//! of [`ValidationError`]s. Order of the list:
//!
//! 1. declared fields in schema order, each one depth-first (a nested
//!    object's errors appear right where that field sits);
//! 2. then, in strict mode, the extraneous keys of that level in the
//!    container's own order.
//!
//! So a parent level's extraneous-field errors always follow everything its
//! children reported.

use serde_json::{Map, Value};

use crate::checks;
use crate::compiler::{compile, CompiledSchema, Layout};
use crate::error::{SchemaError, ValidationError, ValidationErrors};
use crate::request::{merged_view, RequestParams};
use crate::resolver::resolve_field;
use crate::schema::{FieldDefinition, Schema};
use crate::types::FieldType;

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Validate one field's value against its definition.
///
/// `value` is `None` when the key is absent. A value failing its type check
/// yields exactly one error and is not descended into.
pub fn validate_property(
    path: &str,
    value: Option<&Value>,
    definition: &FieldDefinition,
    strict: bool,
) -> Vec<ValidationError> {
    let Some(value) = value else {
        if definition.required {
            return vec![ValidationError::required(path)];
        }
        return vec![];
    };

    if !definition.field_type.check(value) {
        return vec![ValidationError::wrong_type(
            path,
            definition.field_type.name(),
        )];
    }

    match (definition.field_type, &definition.properties) {
        (FieldType::Object, Some(properties)) => validate_object(properties, value, path, strict),
        _ => vec![],
    }
}

/// Validate a nested value against `schema`, prefixing paths with `prefix`.
///
/// `container` may be a mapping or JSON text holding one. Anything else
/// yields a single `<prefix> must be of type object` error.
pub fn validate_object(
    schema: &Schema,
    container: &Value,
    prefix: &str,
    strict: bool,
) -> Vec<ValidationError> {
    match checks::as_object(container) {
        Some(map) => validate_fields(schema, &map, prefix, strict),
        None => vec![ValidationError::wrong_type(
            prefix,
            FieldType::Object.name(),
        )],
    }
}

/// Validate a mapping against `schema` at one nesting level.
pub fn validate_fields(
    schema: &Schema,
    map: &Map<String, Value>,
    prefix: &str,
    strict: bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for field in schema.fields() {
        let path = join_path(prefix, &field.name);
        errors.extend(validate_property(
            &path,
            map.get(&field.name),
            &field.definition,
            strict,
        ));
    }
    if strict {
        errors.extend(extraneous(schema, map, prefix));
    }
    errors
}

fn extraneous<'a>(
    schema: &'a Schema,
    map: &'a Map<String, Value>,
    prefix: &'a str,
) -> impl Iterator<Item = ValidationError> + 'a {
    map.keys()
        .filter(move |key| !schema.contains(key))
        .map(move |key| ValidationError::not_allowed(&join_path(prefix, key)))
}

/// Top level: values come from the field resolver, extraneous keys from `scope`.
fn validate_top_level<R: RequestParams + ?Sized>(
    schema: &Schema,
    req: &R,
    merged: &Map<String, Value>,
    scope: &Map<String, Value>,
    strict: bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for field in schema.fields() {
        let value = resolve_field(&field.definition, &field.name, req, merged);
        errors.extend(validate_property(
            &field.name,
            value,
            &field.definition,
            strict,
        ));
    }
    if strict {
        errors.extend(extraneous(schema, scope, ""));
    }
    errors
}

/// A compiled schema plus validation options, ready to check requests.
///
/// Cheap to share: wrap it in an `Arc` to use it from many request handlers.
///
/// # Example
/// ```
/// use serde_json::json;
/// use vetter::request::RequestParts;
///
/// let validator = vetter::Validator::new(
///     vetter::schema().field("a", vetter::string().required()),
/// )
/// .unwrap()
/// .strict(true);
///
/// let req = RequestParts::new().with_body(json!({ "a": "x", "extra": "y" }));
/// let errors = validator.validate(&req).unwrap_err();
/// assert_eq!(errors.errors[0].error, "extra is not an allowed field");
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    compiled: CompiledSchema,
    strict: bool,
}

impl Validator {
    /// Compile `schema`. Fails on configuration errors.
    pub fn new(schema: Schema) -> Result<Self, SchemaError> {
        Ok(Self::from_compiled(compile(schema)?))
    }

    pub fn from_compiled(compiled: CompiledSchema) -> Self {
        Self {
            compiled,
            strict: false,
        }
    }

    /// Reject fields the schema does not declare.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn compiled(&self) -> &CompiledSchema {
        &self.compiled
    }

    /// Run one validation pass over a request.
    ///
    /// Pure: the request is only read, and identical input yields identical output.
    pub fn validate<R: RequestParams + ?Sized>(&self, req: &R) -> Result<(), ValidationErrors> {
        let errors = match self.compiled.layout() {
            Layout::Merged(schema) => {
                let merged = merged_view(req);
                validate_top_level(schema, req, &merged, &merged, self.strict)
            }
            Layout::Located(parts) => {
                let empty = Map::new();
                let mut errors = Vec::new();
                for (location, schema) in parts {
                    let scope = req.container(*location).unwrap_or(&empty);
                    errors.extend(validate_top_level(
                        schema,
                        req,
                        &empty,
                        scope,
                        self.strict,
                    ));
                }
                errors
            }
        };
        ValidationErrors::from(errors).into_result()
    }
}
