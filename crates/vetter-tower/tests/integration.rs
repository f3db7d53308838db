use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body::Frame;
use http_body_util::{BodyExt, Full};
use serde_json::json;
use tower::{ServiceBuilder, ServiceExt};
use vetter_tower::{validated_params, PathParams, ValidateRequestLayer, ValidatedParams};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// -- Schemas --

fn user_validator() -> vetter::Validator {
    vetter::Validator::new(
        vetter::schema()
            .field("name", vetter::string().required())
            .field("page", vetter::integer())
            .field("id", vetter::uuid()),
    )
    .unwrap()
}

fn located_validator() -> vetter::Validator {
    vetter::Validator::new(
        vetter::schema()
            .field("id", vetter::uuid().required().in_params())
            .field("name", vetter::string().required().in_body()),
    )
    .unwrap()
    .strict(true)
}

// -- Dummy inner service --

async fn echo_service(req: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, BoxError> {
    let params = validated_params(&req).cloned();
    let body_bytes = req.into_body().collect().await?.to_bytes();

    let resp_body = json!({
        "validated": params.is_some(),
        "body": String::from_utf8_lossy(&body_bytes).to_string(),
    });

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(serde_json::to_vec(&resp_body).unwrap())))
        .unwrap())
}

fn json_request(uri: &str, body: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// -- Tests --

#[tokio::test]
async fn valid_request_passes_through() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(echo_service);

    let resp = svc
        .oneshot(json_request("/users?page=2", r#"{"name": "Alice"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["validated"], true);
    assert_eq!(json["body"], r#"{"name": "Alice"}"#);
}

#[tokio::test]
async fn invalid_request_returns_400() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(echo_service);

    let resp = svc
        .oneshot(json_request("/users?page=two", r#"{"id": "nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    let json = body_json(resp).await;
    assert_eq!(
        json,
        json!({
            "message": "Invalid Request",
            "errors": [
                { "name": "name", "error": "name is a required field" },
                { "name": "page", "error": "page must be of type integer" },
                { "name": "id", "error": "id must be of type uuid" }
            ]
        })
    );
}

#[tokio::test]
async fn query_values_satisfy_merged_schema() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(echo_service);

    let req = Request::builder()
        .method("GET")
        .uri("/users?name=Bob&page=3")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let resp = svc.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(echo_service);

    let resp = svc
        .oneshot(json_request("/users", "not json at all"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "Invalid Request");
    assert_eq!(json["errors"][0]["name"], "body");
    assert_eq!(json["errors"][0]["error"], "body must be of type object");
}

#[tokio::test]
async fn form_body_is_decoded() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(echo_service);

    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from("name=Carol+Ann")))
        .unwrap();
    let resp = svc.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn path_params_from_extension() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(located_validator()))
        .service_fn(echo_service);

    let mut req = json_request("/users/x", r#"{"name": "Alice"}"#);
    req.extensions_mut().insert(PathParams::from_pairs([(
        "id",
        "f952de91-d2f1-448a-ad99-abe46da99207",
    )]));
    let resp = svc.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn located_field_not_found_elsewhere() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(located_validator()))
        .service_fn(echo_service);

    // id in the body does not count as a path parameter
    let req = json_request(
        "/users/x",
        r#"{"name": "Alice", "id": "f952de91-d2f1-448a-ad99-abe46da99207"}"#,
    );
    let resp = svc.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    let errors: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["error"].as_str().unwrap())
        .collect();
    assert_eq!(
        errors,
        vec!["id is not an allowed field", "id is a required field"]
    );
}

#[tokio::test]
async fn validated_params_are_stored() {
    async fn handler(req: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, BoxError> {
        let params = validated_params(&req).expect("layer applied");
        let name = params.body["name"].as_str().unwrap_or_default().to_string();
        Ok(Response::new(Full::new(Bytes::from(name))))
    }

    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(handler);

    let resp = svc
        .oneshot(json_request("/users", r#"{"name": "Dana"}"#))
        .await
        .unwrap();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Dana");
}

#[tokio::test]
async fn validated_params_absent_without_layer() {
    let req = json_request("/users", "{}");
    assert!(validated_params(&req).is_none());
}

#[tokio::test]
async fn layer_is_clone_and_shares_validator() {
    let shared = std::sync::Arc::new(user_validator());
    let layer = ValidateRequestLayer::from_arc(shared.clone());
    let _clone = layer.clone();
    assert_eq!(std::sync::Arc::strong_count(&shared), 3);
}

#[tokio::test]
async fn extension_type_is_validated_params() {
    async fn handler(req: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, BoxError> {
        let ValidatedParams(params) = req
            .extensions()
            .get::<ValidatedParams>()
            .cloned()
            .expect("layer applied");
        let page = params.query["page"].as_str().unwrap_or_default().to_string();
        Ok(Response::new(Full::new(Bytes::from(page))))
    }

    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(handler);

    let resp = svc
        .oneshot(json_request("/users?page=4", r#"{"name": "Eve"}"#))
        .await
        .unwrap();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"4");
}

struct BrokenBody;

impl http_body::Body for BrokenBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
        Poll::Ready(Some(Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ))))
    }
}

#[tokio::test]
async fn body_read_error_is_returned() {
    let svc = ServiceBuilder::new()
        .layer(ValidateRequestLayer::new(user_validator()))
        .service_fn(echo_service);

    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(BrokenBody)
        .unwrap();
    let err = svc.oneshot(req).await.unwrap_err();
    assert!(err.to_string().contains("connection reset"));
}
