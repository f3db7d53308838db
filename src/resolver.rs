use serde_json::{Map, Value};

use crate::request::RequestParams;
use crate::schema::FieldDefinition;

/// Find the candidate value for a top-level field.
///
/// A field with a location is looked up in that container only; there is no
/// fallback to the others. A field without one is looked up in `merged`.
/// `None` means the key is absent, which is distinct from a present `null`,
/// `""`, `0` or `false`.
pub fn resolve_field<'a, R: RequestParams + ?Sized>(
    definition: &FieldDefinition,
    name: &str,
    req: &'a R,
    merged: &'a Map<String, Value>,
) -> Option<&'a Value> {
    match definition.location {
        Some(location) => req.container(location).and_then(|c| c.get(name)),
        None => merged.get(name),
    }
}
