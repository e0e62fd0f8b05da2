use axum::http::{StatusCode, header};

/// Rewrites axum's plain-text extractor rejections and its empty 404/405
/// replies into the JSON error envelope. Body deserialization failures (422)
/// are reported as 400.
pub async fn response_mapper_layer(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let response = next.run(request).await;
    let status = match response.status() {
        s if s == StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
        s if s == StatusCode::BAD_REQUEST
            || s == StatusCode::NOT_FOUND
            || s == StatusCode::METHOD_NOT_ALLOWED
            || s == StatusCode::UNSUPPORTED_MEDIA_TYPE =>
        {
            s
        }
        _ => return response,
    };

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let message = match String::from_utf8_lossy(&body).trim() {
        "" => status.canonical_reason().unwrap_or("error").to_lowercase(),
        text => text.to_string(),
    };
    tracing::debug!(%status, %message, "request rejected");

    crate::http::error_response(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ax_body::Body;
    use axum::{
        Json, Router, body as ax_body, http::Request, routing::get,
        routing::post,
    };
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body =
            ax_body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[derive(serde::Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
    }

    fn app() -> Router {
        Router::new()
            .route("/", post(|Json(_): Json<Payload>| async { "accepted" }))
            .route("/ok", get(|| async { (StatusCode::OK, "success") }))
            .route(
                "/conflict",
                get(|| async {
                    crate::Error::Conflict("already exists".into())
                }),
            )
            .layer(axum::middleware::from_fn(response_mapper_layer))
    }

    #[tokio::test]
    async fn test_wrong_method_is_405_envelope() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/ok")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "method_not_allowed");
        assert_eq!(body["error"]["message"], "method not allowed");
    }

    #[tokio::test]
    async fn test_unprocessable_body_becomes_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"other": 1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(body["error"]["message"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_415() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from(r#"{"name": "x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "unsupported_media_type");
    }

    #[tokio::test]
    async fn test_json_errors_pass_through() {
        let response = app()
            .oneshot(
                Request::builder().uri("/conflict").body(Body::empty()).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "already exists");
    }

    #[tokio::test]
    async fn test_response_mapper_passthrough() {
        let response = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );

        let body =
            ax_body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "success");
    }
}
