//! Setup-time schema checks.
//!
//! A schema is compiled once, when a validation rule is prepared. Compilation
//! rejects inconsistent location declarations and misplaced `properties`, and
//! splits a located schema into one sub-schema per request container so the
//! per-request path does no further bookkeeping.

use serde_json::Value;

use crate::error::SchemaError;
use crate::location::Location;
use crate::schema::Schema;
use crate::types::FieldType;

/// How top-level fields find their values.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// No field declares a location: every field is looked up in the merged
    /// body/query/params view.
    Merged(Schema),
    /// Every field declares a location. One sub-schema per container, in
    /// body, query, params order. A container no field targets gets an empty
    /// sub-schema, so in strict mode any key it carries is extraneous.
    Located(Vec<(Location, Schema)>),
}

/// A schema that passed compilation. Immutable and shareable across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    schema: Schema,
    layout: Layout,
}

impl CompiledSchema {
    /// The schema as authored.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn uses_location(&self) -> bool {
        matches!(self.layout, Layout::Located(_))
    }
}

/// Check a schema and prepare it for per-request validation.
///
/// ```
/// let mixed = vetter::schema()
///     .field("a", vetter::string().in_body())
///     .field("b", vetter::string());
/// assert!(vetter::compile(mixed).is_err());
/// ```
pub fn compile(schema: Schema) -> Result<CompiledSchema, SchemaError> {
    let uses_location = schema.uses_location();

    for field in schema.fields() {
        if uses_location && field.definition.location.is_none() {
            return Err(SchemaError::MissingLocation {
                field: field.name.clone(),
            });
        }
        check_properties(&field.name, field.definition.field_type, &field.definition.properties)?;
    }

    let layout = if uses_location {
        Layout::Located(
            Location::ALL
                .into_iter()
                .map(|loc| (loc, schema.located_at(loc)))
                .collect(),
        )
    } else {
        Layout::Merged(schema.clone())
    };

    tracing::debug!(
        fields = schema.len(),
        located = uses_location,
        "compiled request schema"
    );

    Ok(CompiledSchema { schema, layout })
}

/// Parse a schema from its data form and compile it.
pub fn compile_value(value: &Value) -> Result<CompiledSchema, SchemaError> {
    compile(Schema::from_value(value)?)
}

fn check_properties(
    path: &str,
    field_type: FieldType,
    properties: &Option<Schema>,
) -> Result<(), SchemaError> {
    let Some(nested) = properties else {
        return Ok(());
    };
    if field_type != FieldType::Object {
        return Err(SchemaError::PropertiesOnNonObject {
            field: path.to_string(),
        });
    }
    for field in nested.fields() {
        let nested_path = format!("{}.{}", path, field.name);
        if field.definition.location.is_some() {
            return Err(SchemaError::NestedLocation { field: nested_path });
        }
        check_properties(
            &nested_path,
            field.definition.field_type,
            &field.definition.properties,
        )?;
    }
    Ok(())
}
