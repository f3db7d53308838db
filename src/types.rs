use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::checks;

/// The closed set of field types a schema can declare.
///
/// Each kind carries its canonical name (used in error messages and schema
/// files) and its checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Number,
    String,
    Uuid,
    Object,
    ArrayOfStrings,
    ArrayOfUuid,
    IsoString,
    Boolean,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Integer,
        FieldType::Number,
        FieldType::String,
        FieldType::Uuid,
        FieldType::Object,
        FieldType::ArrayOfStrings,
        FieldType::ArrayOfUuid,
        FieldType::IsoString,
        FieldType::Boolean,
    ];

    /// Canonical name, as written in schemas and error messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Uuid => "uuid",
            FieldType::Object => "object",
            FieldType::ArrayOfStrings => "arrayOfStrings",
            FieldType::ArrayOfUuid => "arrayOfUUID",
            FieldType::IsoString => "ISOString",
            FieldType::Boolean => "boolean",
        }
    }

    fn checker(self) -> fn(&Value) -> bool {
        match self {
            FieldType::Integer => checks::is_integer,
            FieldType::Number => checks::is_number,
            FieldType::String => checks::is_string,
            FieldType::Uuid => checks::is_uuid,
            FieldType::Object => checks::is_object,
            FieldType::ArrayOfStrings => checks::is_array_of_strings,
            FieldType::ArrayOfUuid => checks::is_array_of_uuid,
            FieldType::IsoString => checks::is_iso_string,
            FieldType::Boolean => checks::is_boolean,
        }
    }

    /// Run this type's checker against a raw value.
    pub fn check(self, value: &Value) -> bool {
        (self.checker())(value)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognized type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type `{0}`")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}
