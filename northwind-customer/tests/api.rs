use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use northwind::db::Handle;
use northwind_customer::{
    infra::SqliteCustomerRepository, service::CustomerServiceImpl,
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory sqlite");
    let repo = Arc::new(SqliteCustomerRepository);
    repo.init_schema(&mut Handle::Pool(pool.clone()))
        .await
        .expect("Failed to create schema");
    northwind_customer::router(Arc::new(CustomerServiceImpl::new(pool, repo)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn alfki() -> Value {
    json!({
        "id": "ALFKI",
        "companyName": "Alfreds Futterkiste",
        "contactName": "Maria Anders",
        "city": "Berlin",
        "country": "Germany"
    })
}

#[tokio::test]
async fn test_customer_lifecycle() {
    let app = app().await;

    let response = send(&app, "POST", "/customers", Some(alfki())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["id"], "ALFKI");
    assert_eq!(created["region"], Value::Null);

    let response = send(&app, "GET", "/customers/ALFKI", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = send(
        &app,
        "PUT",
        "/customers/ALFKI",
        Some(json!({ "id": "ZZZZZ", "companyName": "Alfreds GmbH" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], "ALFKI");
    assert_eq!(updated["companyName"], "Alfreds GmbH");

    let response = send(&app, "GET", "/customers/ZZZZZ", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", "/customers/ALFKI", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/customers/ALFKI", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_list_with_and_without_trailing_slash() {
    let app = app().await;
    send(&app, "POST", "/customers/", Some(alfki())).await;

    for uri in ["/customers", "/customers/"] {
        let response = send(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list = body_json(response).await;
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let app = app().await;
    send(&app, "POST", "/customers", Some(alfki())).await;

    let response = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "id": "ALFKI", "companyName": "Imposter" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "conflict");

    let stored =
        body_json(send(&app, "GET", "/customers/ALFKI", None).await).await;
    assert_eq!(stored["companyName"], "Alfreds Futterkiste");
}

#[tokio::test]
async fn test_validation_failures_are_bad_request() {
    let app = app().await;
    let cases = [
        json!({ "id": "ALFKIX", "companyName": "Too Long Id" }),
        json!({ "id": "ALFKI", "companyName": "   " }),
        json!({ "id": "ALFKI" }),
        json!({ "id": "ALFKI", "companyName": "x".repeat(41) }),
        json!({ "id": "ALFKI", "companyName": "ok", "city": "x".repeat(16) }),
    ];
    for payload in cases {
        let response =
            send(&app, "POST", "/customers", Some(payload.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body_json(response).await["error"]["code"], "bad_request");
    }

    let list = body_json(send(&app, "GET", "/customers", None).await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_path_id_too_long_is_bad_request() {
    let app = app().await;
    for method in ["GET", "DELETE"] {
        let response = send(&app, method, "/customers/ALFKIX", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    let response = send(
        &app,
        "PUT",
        "/customers/ALFKIX",
        Some(json!({ "companyName": "x" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let app = app().await;

    let response = send(&app, "DELETE", "/customers/NOPE", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        "PUT",
        "/customers/NOPE",
        Some(json!({ "companyName": "Ghost" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // PUT does not create
    let response = send(&app, "GET", "/customers/NOPE", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/customers")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "bad_request");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/customers")
                .body(Body::from(alfki().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "unsupported_media_type"
    );
}

#[tokio::test]
async fn test_root_redirects_to_docs() {
    let app = app().await;

    let response = send(&app, "GET", "/", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/docs");

    let response = send(&app, "GET", "/docs", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/openapi.json", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/customers/{id}"].is_object());
}

#[tokio::test]
async fn test_responses_carry_trace_id() {
    let app = app().await;

    let response = send(&app, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let trace_id = response.headers()["X-Trace-ID"].to_str().unwrap();
    assert_eq!(trace_id.len(), 32);
}

#[tokio::test]
async fn test_invalid_update_is_bad_request_and_keeps_record() {
    let app = app().await;
    send(&app, "POST", "/customers", Some(alfki())).await;

    let cases = [
        json!({ "companyName": "x".repeat(41) }),
        json!({ "companyName": "Alfreds GmbH", "fax": "9".repeat(25) }),
        json!({ "companyName": "" }),
    ];
    for payload in cases {
        let response =
            send(&app, "PUT", "/customers/ALFKI", Some(payload.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body_json(response).await["error"]["code"], "bad_request");
    }

    let stored =
        body_json(send(&app, "GET", "/customers/ALFKI", None).await).await;
    assert_eq!(stored["companyName"], "Alfreds Futterkiste");
    assert_eq!(stored["city"], "Berlin");
    assert_eq!(stored["fax"], Value::Null);
}

#[tokio::test]
async fn test_unknown_route_and_method_use_error_envelope() {
    let app = app().await;

    let response = send(&app, "GET", "/orders", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["traceId"].as_str().map(str::len), Some(32));

    let response = send(&app, "PATCH", "/customers/ALFKI", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "method_not_allowed"
    );
}
