use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::location::Location;
use crate::types::FieldType;

/// Metadata for one schema entry: its type, whether it is required, where it
/// is read from, and (for objects) the nested schema.
///
/// Built with the constructors at the crate root:
///
/// ```
/// use vetter::Location;
///
/// let id = vetter::uuid().required().location(Location::Params);
/// assert!(id.required);
/// assert_eq!(id.location, Some(Location::Params));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub field_type: FieldType,
    pub required: bool,
    pub properties: Option<Schema>,
    pub location: Option<Location>,
}

impl FieldDefinition {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            properties: None,
            location: None,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as optional (the default).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Read this field only from the given request container.
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn in_body(self) -> Self {
        self.location(Location::Body)
    }

    pub fn in_query(self) -> Self {
        self.location(Location::Query)
    }

    pub fn in_params(self) -> Self {
        self.location(Location::Params)
    }

    /// Nested schema for an object field. Only meaningful when the type is
    /// [`FieldType::Object`]; any other type is rejected at compile time.
    pub fn properties(mut self, schema: Schema) -> Self {
        self.properties = Some(schema);
        self
    }
}

/// A named field definition inside a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub definition: FieldDefinition,
}

/// Mapping from field name to [`FieldDefinition`].
///
/// Fields keep their definition order, which is the order errors are reported in.
///
/// # Example
/// ```
/// let schema = vetter::schema()
///     .field("name", vetter::string().required())
///     .field(
///         "address",
///         vetter::object().properties(
///             vetter::schema().field("city", vetter::string().required()),
///         ),
///     );
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: vec![] }
    }

    /// Add a field. Redefining an existing name replaces it in place.
    pub fn field(mut self, name: impl Into<String>, definition: FieldDefinition) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.definition = definition,
            None => self.fields.push(SchemaField { name, definition }),
        }
        self
    }

    pub fn fields(&self) -> std::slice::Iter<'_, SchemaField> {
        self.fields.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any top-level field declares a location.
    pub fn uses_location(&self) -> bool {
        self.fields.iter().any(|f| f.definition.location.is_some())
    }

    /// Sub-schema of the fields declaring `location`, in definition order.
    pub fn located_at(&self, location: Location) -> Schema {
        Schema {
            fields: self
                .fields
                .iter()
                .filter(|f| f.definition.location == Some(location))
                .cloned()
                .collect(),
        }
    }

    /// Build a schema from its data form.
    ///
    /// Each entry maps a field name to `{ "type": ..., "required": ...,
    /// "properties": {...}, "location": ... }`. `in` is accepted in place of
    /// `location`, and `path` in place of `params`.
    ///
    /// ```
    /// let schema = vetter::Schema::from_value(&serde_json::json!({
    ///     "id": { "type": "uuid", "required": true, "in": "path" }
    /// }))
    /// .unwrap();
    /// assert_eq!(schema.get("id").unwrap().location, Some(vetter::Location::Params));
    /// ```
    pub fn from_value(value: &Value) -> Result<Schema, SchemaError> {
        let map = value.as_object().ok_or(SchemaError::NotAMapping)?;
        parse_schema(map, "")
    }

    pub fn from_json_str(text: &str) -> Result<Schema, SchemaError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Schema::from_value(&value)
    }

    /// Requires the `yaml` feature.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> Result<Schema, SchemaError> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Schema::from_value(&value)
    }

    /// Load a schema file. `.yaml`/`.yml` files are read as YAML (with the
    /// `yaml` feature), anything else as JSON.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Schema, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            #[cfg(feature = "yaml")]
            Some("yaml") | Some("yml") => Schema::from_yaml_str(&text),
            #[cfg(not(feature = "yaml"))]
            Some("yaml") | Some("yml") => Err(SchemaError::Parse(
                "YAML schemas require the `yaml` feature".to_string(),
            )),
            _ => Schema::from_json_str(&text),
        }
    }
}

impl TryFrom<&Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Schema::from_value(value)
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn parse_schema(map: &Map<String, Value>, prefix: &str) -> Result<Schema, SchemaError> {
    let mut schema = Schema::new();
    for (name, raw) in map {
        let path = join_path(prefix, name);
        let definition = parse_definition(raw, &path)?;
        schema = schema.field(name.clone(), definition);
    }
    Ok(schema)
}

fn parse_definition(raw: &Value, path: &str) -> Result<FieldDefinition, SchemaError> {
    let def = raw
        .as_object()
        .ok_or_else(|| SchemaError::InvalidFieldDefinition {
            field: path.to_string(),
        })?;

    let type_name = match def.get("type") {
        None | Some(Value::Null) => {
            return Err(SchemaError::MissingType {
                field: path.to_string(),
            })
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(SchemaError::InvalidAttribute {
                field: path.to_string(),
                key: "type",
                expected: "a string",
            })
        }
    };
    let field_type: FieldType =
        type_name
            .parse()
            .map_err(|_| SchemaError::UnknownType {
                field: path.to_string(),
                type_name: type_name.clone(),
            })?;

    let required = match def.get("required") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(SchemaError::InvalidAttribute {
                field: path.to_string(),
                key: "required",
                expected: "a boolean",
            })
        }
    };

    let properties = match def.get("properties") {
        None | Some(Value::Null) => None,
        Some(Value::Object(props)) => Some(parse_schema(props, path)?),
        Some(_) => {
            return Err(SchemaError::InvalidAttribute {
                field: path.to_string(),
                key: "properties",
                expected: "a mapping",
            })
        }
    };

    let location = match def.get("location").or_else(|| def.get("in")) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.parse::<Location>().map_err(|value| {
            SchemaError::InvalidLocation {
                field: path.to_string(),
                value,
            }
        })?),
        Some(other) => {
            return Err(SchemaError::InvalidLocation {
                field: path.to_string(),
                value: other.to_string(),
            })
        }
    };

    Ok(FieldDefinition {
        field_type,
        required,
        properties,
        location,
    })
}
