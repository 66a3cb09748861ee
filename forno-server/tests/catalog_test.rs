//! Product catalog and storefront layout

mod common;

use http::StatusCode;
use serde_json::json;

use common::spawn;

#[tokio::test]
async fn admin_manages_products() {
    let app = spawn().await;
    let admin = app.admin_token().await;

    let reply = app
        .post(
            "/api/admin/products",
            Some(&admin),
            json!({"name": "Pizza", "category": "Pizzas", "sizes": []}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.codigo(), "VALIDATION_FAILED");

    let id = app.product(&admin, "Pizza Quatro Queijos").await;
    let reply = app
        .call(
            "PUT",
            &format!("/api/admin/products/{id}"),
            Some(&admin),
            Some(json!({"description": "Muçarela, provolone, parmesão e gorgonzola"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["name"], "Pizza Quatro Queijos");
    assert_eq!(reply.json()["data"]["sizes"][1]["price"].as_f64(), Some(49.9));

    let public = app.get(&format!("/api/public/products/{id}"), None).await;
    assert_eq!(public.status, StatusCode::OK);
    let categories = app.get("/api/public/categories", None).await.json();
    assert_eq!(categories["data"], json!(["Pizzas"]));

    let reply = app
        .call("DELETE", &format!("/api/admin/products/{id}"), Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = app.get(&format!("/api/admin/products/{id}"), Some(&admin)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.codigo(), "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn category_filter() {
    let app = spawn().await;
    let admin = app.admin_token().await;
    app.product(&admin, "Pizza Napolitana").await;
    app.post(
        "/api/admin/products",
        Some(&admin),
        json!({"name": "Guaraná", "category": "Bebidas", "sizes": [{"size": "350ml", "price": 6.5}]}),
    )
    .await;

    let drinks = app.get("/api/public/products?category=Bebidas", None).await.json();
    let drinks = drinks["data"].as_array().unwrap();
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0]["name"], "Guaraná");
}

#[tokio::test]
async fn layout_update_and_clear() {
    let app = spawn().await;
    let admin = app.admin_token().await;

    let reply = app
        .call(
            "PUT",
            "/api/admin/layout",
            Some(&admin),
            Some(json!({
                "logoUrl": "https://cdn.example.com/logo.png",
                "slides": [{"imageUrl": "/img/promo.jpg", "title": "Terça em dobro"}],
                "instagram": "@forno.sp"
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());

    let layout = app.get("/api/public/layout", None).await.json();
    assert_eq!(layout["data"]["logoUrl"], "https://cdn.example.com/logo.png");
    assert_eq!(layout["data"]["instagram"], "forno.sp");
    assert_eq!(layout["data"]["slides"].as_array().unwrap().len(), 1);

    app.call("PUT", "/api/admin/layout", Some(&admin), Some(json!({"logoUrl": ""})))
        .await;
    let layout = app.get("/api/public/layout", None).await.json();
    assert!(layout["data"]["logoUrl"].is_null());
    assert_eq!(layout["data"]["instagram"], "forno.sp");

    let reply = app
        .call(
            "PUT",
            "/api/admin/layout",
            Some(&admin),
            Some(json!({"backgroundUrl": "javascript:alert(1)"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.codigo(), "INVALID_LAYOUT");
}
