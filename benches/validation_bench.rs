use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use vetter::prelude::*;

fn menu() -> FieldDefinition {
    vetter::object().required().properties(
        vetter::schema()
            .field("appetizers", vetter::array_of_strings().required())
            .field("mains", vetter::array_of_strings().required())
            .field("desserts", vetter::array_of_strings().required()),
    )
}

fn restaurant() -> Schema {
    vetter::schema()
        .field(
            "address",
            vetter::object().required().properties(
                vetter::schema()
                    .field("streetNumber", vetter::number().required())
                    .field("streetName", vetter::string().required())
                    .field("city", vetter::string().required()),
            ),
        )
        .field("name", vetter::string().required())
        .field("id", vetter::uuid().required())
        .field(
            "menus",
            vetter::object().required().properties(
                vetter::schema()
                    .field("lunch", menu())
                    .field("dinner", menu()),
            ),
        )
}

fn bench_flat(c: &mut Criterion) {
    let v = Validator::new(
        vetter::schema()
            .field("name", vetter::string().required())
            .field("age", vetter::integer())
            .field("at", vetter::iso_string()),
    )
    .unwrap();
    let req = RequestParts::new()
        .with_body(json!({ "name": "Alex", "at": "2024-03-01T12:00:00Z" }))
        .with_query(json!({ "age": "30" }));
    c.bench_function("flat_3_fields_merged", |b| {
        b.iter(|| v.validate(black_box(&req)))
    });
}

fn bench_nested(c: &mut Criterion) {
    let v = Validator::new(restaurant()).unwrap().strict(true);
    let valid = RequestParts::new().with_body(json!({
        "name": "Fancy Diner",
        "id": "f952de91-d2f1-448a-ad99-abe46da99207",
        "address": { "streetNumber": 10, "streetName": "main st", "city": "ottawa" },
        "menus": {
            "lunch": { "appetizers": ["soup"], "mains": ["burger"], "desserts": ["cake"] },
            "dinner": { "appetizers": ["fries"], "mains": ["steak"], "desserts": ["pie"] }
        }
    }));
    c.bench_function("nested_strict_valid", |b| {
        b.iter(|| v.validate(black_box(&valid)))
    });

    let invalid = RequestParts::new().with_body(json!({
        "name": 1,
        "address": "{}",
        "menus": { "brunch": {} },
        "extra": true
    }));
    c.bench_function("nested_strict_invalid", |b| {
        b.iter(|| v.validate(black_box(&invalid)))
    });
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_restaurant", |b| {
        b.iter(|| vetter::compile(black_box(restaurant())))
    });
}

criterion_group!(benches, bench_flat, bench_nested, bench_compile);
criterion_main!(benches);
