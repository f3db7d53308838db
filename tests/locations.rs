use serde_json::json;
use vetter::prelude::*;

fn fruit_schema() -> Schema {
    vetter::schema()
        .field("banana", vetter::string().required().in_query())
        .field("strawberry", vetter::string().required().in_params())
        .field("mango", vetter::string().required().in_body())
}

#[test]
fn located_fields_found_in_their_containers() {
    let v = Validator::new(fruit_schema()).unwrap();
    let req = RequestParts::new()
        .with_query(json!({ "banana": "yellow" }))
        .with_params(json!({ "strawberry": "red" }))
        .with_body(json!({ "mango": "orange" }));
    assert!(v.validate(&req).is_ok());
}

#[test]
fn located_field_ignores_other_containers() {
    let v = Validator::new(fruit_schema()).unwrap();
    let req = RequestParts::new()
        .with_query(json!({ "banana": "yellow", "mango": "orange" }))
        .with_params(json!({ "strawberry": "red", "mango": "orange" }));
    let errors = v.validate(&req).unwrap_err();
    assert_eq!(errors.names(), vec!["mango"]);
    assert_eq!(errors.errors[0].error, "mango is a required field");
}

#[test]
fn errors_are_grouped_body_then_query_then_params() {
    let v = Validator::new(fruit_schema()).unwrap();
    let errors = v.validate(&RequestParts::new()).unwrap_err();
    assert_eq!(errors.names(), vec!["mango", "banana", "strawberry"]);
}

#[test]
fn strict_mode_is_scoped_per_container() {
    let schema = vetter::schema()
        .field("id", vetter::integer().required().in_params())
        .field("name", vetter::string().required().in_body());
    let v = Validator::new(schema).unwrap().strict(true);
    let req = RequestParts::new()
        .with_params(json!({ "id": "3" }))
        .with_body(json!({ "name": "x", "id": 4 }))
        .with_query(json!({ "page": "2" }));
    let errors = v.validate(&req).unwrap_err();
    assert_eq!(
        errors.iter().map(|e| e.error.as_str()).collect::<Vec<_>>(),
        vec![
            "id is not an allowed field",
            "page is not an allowed field",
        ]
    );
}

#[test]
fn located_nested_object_uses_plain_lookup_below_top_level() {
    let schema = vetter::schema().field(
        "address",
        vetter::object().required().in_body().properties(
            vetter::schema()
                .field("streetNumber", vetter::number().required())
                .field("apartmentNumber", vetter::number()),
        ),
    );
    let v = Validator::new(schema).unwrap();

    let ok = RequestParts::new().with_body(json!({ "address": { "streetNumber": "12" } }));
    assert!(v.validate(&ok).is_ok());

    // streetNumber in the query does not satisfy the nested field
    let bad = RequestParts::new()
        .with_body(json!({ "address": { "apartmentNumber": 4 } }))
        .with_query(json!({ "streetNumber": 12 }));
    let errors = v.validate(&bad).unwrap_err();
    assert_eq!(errors.names(), vec!["address.streetNumber"]);
}

#[test]
fn path_alias_in_schema_data() {
    let schema = Schema::from_value(&json!({
        "strawberry": { "type": "string", "required": true, "in": "path" }
    }))
    .unwrap();
    let v = Validator::new(schema).unwrap();
    let req = RequestParts::new().with_params(json!({ "strawberry": "red" }));
    assert!(v.validate(&req).is_ok());
}

struct BodyOnly {
    body: serde_json::Map<String, serde_json::Value>,
}

impl RequestParams for BodyOnly {
    fn body(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        Some(&self.body)
    }

    fn query(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        None
    }

    fn params(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        None
    }
}

#[test]
fn missing_containers_are_treated_as_empty() {
    let v = Validator::new(fruit_schema()).unwrap().strict(true);
    let mut body = serde_json::Map::new();
    body.insert("mango".into(), json!("orange"));
    let errors = v.validate(&BodyOnly { body }).unwrap_err();
    assert_eq!(errors.names(), vec!["banana", "strawberry"]);
}
