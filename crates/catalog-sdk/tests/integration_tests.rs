//! Integration tests for the Catalog SDK
//!
//! Each test starts an in-process axum server that stands in for the
//! catalog service and points a real `CatalogClient` at it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use catalog_domain::{ProductId, ProductRef};
use catalog_sdk::{CatalogClient, CatalogService, SdkError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Requests seen by the mock service
#[derive(Default)]
struct Seen {
    bodies: Vec<Value>,
    deleted: Vec<i64>,
}

type Shared = Arc<Mutex<Seen>>;

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn catalog_app(seen: Shared) -> Router {
    Router::new()
        .route(
            "/api/products",
            get(|| async {
                Json(json!([
                    {"id": 1, "name": "Lamp", "price": 12.5},
                    {"id": 2, "name": "Desk", "category": "furniture", "stock": 3}
                ]))
            })
            .post(|State(seen): State<Shared>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().bodies.push(body);
                (StatusCode::CREATED, Json(json!({"id": 3})))
            }),
        )
        .route(
            "/api/products/:id",
            delete(|State(seen): State<Shared>, Path(id): Path<i64>| async move {
                if id == 3 {
                    return StatusCode::NOT_FOUND;
                }
                seen.lock().unwrap().deleted.push(id);
                StatusCode::NO_CONTENT
            }),
        )
        .route(
            "/api/recommended-products",
            post(|State(seen): State<Shared>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().bodies.push(body.clone());
                if body["recommendedProduct"]["name"] == json!("explode") {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"error": "boom"})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({"recommendedProduct": {"id": 70, "name": "Widget"}})),
                )
            }),
        )
        .with_state(seen)
}

fn linked_request(name: &str) -> catalog_domain::LinkedRequest {
    ProductRef::from_value(json!({
        "sourceProductId": 1,
        "recommendedProduct": {"id": 7, "name": name, "price": 9.99}
    }))
    .unwrap()
    .linked_request()
    .unwrap()
}

#[tokio::test]
async fn test_list_products() {
    let base = spawn_server(catalog_app(Shared::default())).await;
    let client = CatalogClient::new(&base);

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, ProductId::new(1));
    assert_eq!(products[0].price, Some(12.5));
    assert_eq!(products[1].category.as_deref(), Some("furniture"));
    assert_eq!(products[1].extra.get("stock"), Some(&json!(3)));
}

#[tokio::test]
async fn test_list_products_with_mixed_field_types() {
    let app = Router::new().route(
        "/api/products",
        get(|| async {
            Json(json!([
                {"id": 1, "name": "Lamp", "price": 12.5},
                {"id": "2", "name": "Desk", "price": "9.99"},
                {"id": 3, "price": null}
            ]))
        }),
    );
    let base = spawn_server(app).await;
    let client = CatalogClient::new(&base);

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(products[1].id, ProductId::new(2));
    assert_eq!(products[1].price, Some(9.99));
    assert!(products[2].price.is_none());
}

#[tokio::test]
async fn test_create_product_sends_empty_object() {
    let seen = Shared::default();
    let base = spawn_server(catalog_app(seen.clone())).await;
    let client = CatalogClient::new(&base);

    client.create_product(&json!({})).await.unwrap();

    assert_eq!(seen.lock().unwrap().bodies, vec![json!({})]);
}

#[tokio::test]
async fn test_delete_product() {
    let seen = Shared::default();
    let base = spawn_server(catalog_app(seen.clone())).await;
    let client = CatalogClient::new(&base);

    client.delete_product(ProductId::new(2)).await.unwrap();

    assert_eq!(seen.lock().unwrap().deleted, vec![2]);
}

#[tokio::test]
async fn test_delete_missing_product_is_rejected_with_status() {
    let base = spawn_server(catalog_app(Shared::default())).await;
    let client = CatalogClient::new(&base);

    let err = client.delete_product(ProductId::new(3)).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.server_message().is_none());
}

#[tokio::test]
async fn test_save_recommendation_forwards_linked_body() {
    let seen = Shared::default();
    let base = spawn_server(catalog_app(seen.clone())).await;
    let client = CatalogClient::new(&base);

    let saved = client
        .save_recommendation(&linked_request("Widget"))
        .await
        .unwrap();

    assert_eq!(saved.product_id(), Some(ProductId::new(70)));

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.bodies[0],
        json!({
            "sourceProductId": 1,
            "recommendedProduct": {"id": 7, "name": "Widget", "price": 9.99}
        })
    );
}

#[tokio::test]
async fn test_save_recommendation_failure_carries_server_message() {
    let base = spawn_server(catalog_app(Shared::default())).await;
    let client = CatalogClient::new(&base);

    let err = client
        .save_recommendation(&linked_request("explode"))
        .await
        .unwrap_err();

    match err {
        SdkError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("boom"));
        }
        other => panic!("Unexpected error type: {:?}", other),
    }
}

#[tokio::test]
async fn test_rejection_without_json_body() {
    let app = Router::new().route(
        "/api/recommended-products",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = spawn_server(app).await;
    let client = CatalogClient::new(&base);

    let err = client
        .save_recommendation(&linked_request("Widget"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert!(err.server_message().is_none());
}

#[tokio::test]
async fn test_success_with_undecodable_body() {
    let app = Router::new().route(
        "/api/products",
        get(|| async { (StatusCode::OK, "not json") }),
    );
    let base = spawn_server(app).await;
    let client = CatalogClient::new(&base);

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, SdkError::Decode(_)));
}
