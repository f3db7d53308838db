use serde_json::{Map, Value};

use crate::location::Location;

/// Read access to the three parameter containers of an incoming request.
///
/// Implemented by whatever the HTTP layer hands to the validator. A container
/// that is missing (or that the HTTP layer could not decode into a mapping)
/// is reported as `None` and treated as empty.
pub trait RequestParams {
    fn body(&self) -> Option<&Map<String, Value>>;
    fn query(&self) -> Option<&Map<String, Value>>;
    fn params(&self) -> Option<&Map<String, Value>>;

    /// The container for `location`.
    fn container(&self, location: Location) -> Option<&Map<String, Value>> {
        match location {
            Location::Body => self.body(),
            Location::Query => self.query(),
            Location::Params => self.params(),
        }
    }
}

/// Owned body/query/params containers.
///
/// # Example
/// ```
/// use serde_json::json;
/// use vetter::request::{RequestParams, RequestParts};
///
/// let req = RequestParts::new()
///     .with_body(json!({ "name": "Fancy Diner" }))
///     .with_params(json!({ "id": "7" }));
/// assert_eq!(req.body().unwrap()["name"], "Fancy Diner");
/// assert!(req.query().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    pub body: Map<String, Value>,
    pub query: Map<String, Value>,
    pub params: Map<String, Value>,
}

/// Keep mappings, replace anything else with an empty container.
fn into_container(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl RequestParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = into_container(body);
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = into_container(query);
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = into_container(params);
        self
    }
}

impl RequestParams for RequestParts {
    fn body(&self) -> Option<&Map<String, Value>> {
        Some(&self.body)
    }

    fn query(&self) -> Option<&Map<String, Value>> {
        Some(&self.query)
    }

    fn params(&self) -> Option<&Map<String, Value>> {
        Some(&self.params)
    }
}

impl<T: RequestParams + ?Sized> RequestParams for &T {
    fn body(&self) -> Option<&Map<String, Value>> {
        (**self).body()
    }

    fn query(&self) -> Option<&Map<String, Value>> {
        (**self).query()
    }

    fn params(&self) -> Option<&Map<String, Value>> {
        (**self).params()
    }
}

/// Overlay body, query and params into a fresh mapping.
///
/// Later containers win on key collision: params over query over body. The
/// overlay is shallow (a colliding key takes the later value whole) and the
/// request's own containers are never modified.
pub fn merged_view<R: RequestParams + ?Sized>(req: &R) -> Map<String, Value> {
    let mut merged = Map::new();
    for location in Location::ALL {
        if let Some(container) = req.container(location) {
            for (key, value) in container {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
