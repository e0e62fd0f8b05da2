use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use northwind::http::{
    error_response,
    middleware::{TraceLayer, response_mapper_layer},
};

use crate::{dto::CustomerDto, entity::CustomerId, service::CustomerService};

pub type SharedCustomerService = Arc<dyn CustomerService>;

const OPENAPI_JSON: &str = include_str!("../res/openapi.json");
const DOCS_HTML: &str = include_str!("../res/docs.html");

pub fn router(service: SharedCustomerService) -> Router {
    Router::new()
        .route("/customers", get(list).post(create))
        .route("/customers/", get(list).post(create))
        .route(
            "/customers/{id}",
            get(get_by_id).put(update_by_id).delete(delete_by_id),
        )
        .route("/", get(root))
        .route("/docs", get(|| async { Html(DOCS_HTML) }))
        .route("/openapi.json", get(openapi))
        .route("/health", get(|| async { "ok" }))
        .fallback(fallback)
        .with_state(service)
        .layer(axum::middleware::from_fn(response_mapper_layer))
        .layer(TraceLayer)
}

async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/docs")])
}

async fn fallback(uri: axum::http::Uri) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("no route for {uri}"))
}

async fn openapi() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], OPENAPI_JSON)
}

async fn list(
    State(service): State<SharedCustomerService>,
) -> northwind::Result<Json<Vec<CustomerDto>>> {
    Ok(Json(service.list().await?))
}

async fn get_by_id(
    State(service): State<SharedCustomerService>,
    Path(id): Path<String>,
) -> northwind::Result<Json<CustomerDto>> {
    let id = CustomerId::parse(id)?;
    service
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

async fn create(
    State(service): State<SharedCustomerService>,
    Json(customer): Json<CustomerDto>,
) -> northwind::Result<(StatusCode, Json<CustomerDto>)> {
    customer.validate()?;
    let created = service.create(customer).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_by_id(
    State(service): State<SharedCustomerService>,
    Path(id): Path<String>,
    Json(customer): Json<CustomerDto>,
) -> northwind::Result<Json<CustomerDto>> {
    let id = CustomerId::parse(id)?;
    let customer = customer.with_id(&id);
    customer.validate()?;
    service
        .update_by_id(&id, customer)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

async fn delete_by_id(
    State(service): State<SharedCustomerService>,
    Path(id): Path<String>,
) -> northwind::Result<StatusCode> {
    let id = CustomerId::parse(id)?;
    if service.delete_by_id(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

fn not_found(id: &CustomerId) -> northwind::Error {
    northwind::Error::NotFound(format!("customer {id} not found"))
}
