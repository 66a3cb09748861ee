//! Order lifecycle through the customer and admin APIs

mod common;

use http::StatusCode;
use serde_json::json;

use common::{TestApp, cart, spawn};

struct Fixture {
    admin: String,
    customer: String,
    product: i64,
}

async fn fixture(app: &TestApp) -> Fixture {
    let admin = app.admin_token().await;
    app.set_closed(&admin, false, None).await;
    let product = app.product(&admin, "Pizza Calabresa").await;
    let (customer, _) = app.customer("carla@example.com").await;
    Fixture {
        admin,
        customer,
        product,
    }
}

async fn place_order(app: &TestApp, f: &Fixture) -> i64 {
    let reply = app
        .post("/api/customer/orders", Some(&f.customer), cart(f.product, Some("dinheiro")))
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    reply.json()["data"]["id"].as_i64().unwrap()
}

async fn set_status(app: &TestApp, admin: &str, id: i64, status: &str) -> common::Reply {
    app.call(
        "PATCH",
        &format!("/api/admin/orders/{id}/status"),
        Some(admin),
        Some(json!({"status": status})),
    )
    .await
}

#[tokio::test]
async fn order_is_priced_server_side() {
    let app = spawn().await;
    let f = fixture(&app).await;

    let mut body = cart(f.product, Some("cartao_entrega"));
    body["items"][0]["quantity"] = json!(2);
    body["items"][0]["unit_price"] = json!(0.01);
    let reply = app.post("/api/customer/orders", Some(&f.customer), body).await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());

    let order = &reply.json()["data"];
    assert_eq!(order["status"], "pendente");
    assert_eq!(order["payment_method"], "cartao_entrega");
    assert_eq!(order["subtotal"].as_f64(), Some(99.8));
    assert_eq!(order["delivery_fee"].as_f64(), Some(7.0));
    assert_eq!(order["total"].as_f64(), Some(106.8));
    assert_eq!(order["customer"]["address"], "Rua das Flores, 10");
    assert!(order["number"].as_str().unwrap().starts_with('#'));
}

#[tokio::test]
async fn pickup_has_no_fee_and_no_address() {
    let app = spawn().await;
    let f = fixture(&app).await;

    let mut body = cart(f.product, Some("dinheiro"));
    body["fulfillment"] = json!("retirada");
    let reply = app.post("/api/customer/orders", Some(&f.customer), body).await;
    let order = &reply.json()["data"];
    assert_eq!(order["delivery_fee"].as_f64(), Some(0.0));
    assert_eq!(order["total"].as_f64(), Some(49.9));
    assert!(order["customer"]["address"].is_null());
}

#[tokio::test]
async fn checkout_rejections() {
    let app = spawn().await;
    let f = fixture(&app).await;

    let reply = app
        .post("/api/customer/orders", Some(&f.customer), cart(f.product, Some("online")))
        .await;
    assert_eq!(reply.codigo(), "PAYMENT_INVALID_METHOD");

    let reply = app
        .post("/api/customer/orders", Some(&f.customer), cart(f.product, None))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.codigo(), "VALIDATION_FAILED");

    let reply = app
        .post(
            "/api/customer/orders",
            Some(&f.customer),
            json!({"items": [], "payment_method": "dinheiro"}),
        )
        .await;
    assert_eq!(reply.codigo(), "ORDER_EMPTY");

    let mut body = cart(f.product, Some("dinheiro"));
    body["items"][0]["size"] = json!("GG");
    let reply = app.post("/api/customer/orders", Some(&f.customer), body).await;
    assert_eq!(reply.codigo(), "PRODUCT_SIZE_NOT_FOUND");

    let mut body = cart(f.product, Some("dinheiro"));
    body["items"][0]["quantity"] = json!(0);
    let reply = app.post("/api/customer/orders", Some(&f.customer), body).await;
    assert_eq!(reply.codigo(), "INVALID_QUANTITY");

    let reply = app
        .post("/api/customer/orders", Some(&f.customer), cart(999_999, Some("dinheiro")))
        .await;
    assert_eq!(reply.codigo(), "PRODUCT_UNAVAILABLE");
}

#[tokio::test]
async fn inactive_product_cannot_be_ordered() {
    let app = spawn().await;
    let f = fixture(&app).await;

    let reply = app
        .call(
            "PATCH",
            &format!("/api/admin/products/{}/status", f.product),
            Some(&f.admin),
            Some(json!({"status": "inativo"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app
        .post("/api/customer/orders", Some(&f.customer), cart(f.product, Some("dinheiro")))
        .await;
    assert_eq!(reply.codigo(), "PRODUCT_UNAVAILABLE");

    let listed = app.get("/api/public/products", None).await.json();
    assert!(listed["data"].as_array().unwrap().is_empty());
    let reply = app
        .get(&format!("/api/public/products/{}", f.product), None)
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_moves_order_forward_only() {
    let app = spawn().await;
    let f = fixture(&app).await;
    let id = place_order(&app, &f).await;

    let reply = set_status(&app, &f.admin, id, "preparando").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["status"], "preparando");

    let reply = set_status(&app, &f.admin, id, "pendente").await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.codigo(), "INVALID_STATUS_TRANSITION");

    assert_eq!(set_status(&app, &f.admin, id, "a_caminho").await.status, StatusCode::OK);
    assert_eq!(set_status(&app, &f.admin, id, "entregue").await.status, StatusCode::OK);

    let reply = set_status(&app, &f.admin, id, "cancelado").await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let filtered = app
        .get("/api/admin/orders?status=entregue", Some(&f.admin))
        .await
        .json();
    assert_eq!(filtered["data"].as_array().unwrap().len(), 1);

    let reply = app.get("/api/admin/orders?status=perdido", Some(&f.admin)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_cancels_only_pending() {
    let app = spawn().await;
    let f = fixture(&app).await;

    let first = place_order(&app, &f).await;
    let reply = app
        .post(&format!("/api/customer/orders/{first}/cancel"), Some(&f.customer), json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["status"], "cancelado");

    let second = place_order(&app, &f).await;
    set_status(&app, &f.admin, second, "preparando").await;
    let reply = app
        .post(&format!("/api/customer/orders/{second}/cancel"), Some(&f.customer), json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.codigo(), "ORDER_NOT_CANCELLABLE");
}

#[tokio::test]
async fn orders_are_private_to_their_customer() {
    let app = spawn().await;
    let f = fixture(&app).await;
    let id = place_order(&app, &f).await;
    let (other, _) = app.customer("davi@example.com").await;

    let reply = app.get(&format!("/api/customer/orders/{id}"), Some(&other)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.codigo(), "ORDER_NOT_FOUND");

    let mine = app.get("/api/customer/orders", Some(&other)).await.json();
    assert!(mine["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn review_after_delivery_once() {
    let app = spawn().await;
    let f = fixture(&app).await;
    let id = place_order(&app, &f).await;
    let uri = format!("/api/customer/orders/{id}/review");

    let reply = app
        .post(&uri, Some(&f.customer), json!({"rating": 5, "comment": "Muito boa"}))
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.codigo(), "REVIEW_NOT_ALLOWED");

    set_status(&app, &f.admin, id, "entregue").await;

    let reply = app.post(&uri, Some(&f.customer), json!({"rating": 9})).await;
    assert_eq!(reply.codigo(), "INVALID_RATING");

    let reply = app
        .post(&uri, Some(&f.customer), json!({"rating": 4, "comment": "Muito boa"}))
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());

    let reply = app.post(&uri, Some(&f.customer), json!({"rating": 5})).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.codigo(), "REVIEW_ALREADY_EXISTS");

    let summary = app.get("/api/public/reviews", None).await.json();
    assert_eq!(summary["data"]["count"], 1);
    assert_eq!(summary["data"]["average"].as_f64(), Some(4.0));
    assert_eq!(summary["data"]["reviews"][0]["comment"], "Muito boa");
}

#[tokio::test]
async fn receipt_is_a_pdf() {
    let app = spawn().await;
    let f = fixture(&app).await;
    let id = place_order(&app, &f).await;

    for (uri, token) in [
        (format!("/api/customer/orders/{id}/receipt"), &f.customer),
        (format!("/api/admin/orders/{id}/receipt"), &f.admin),
    ] {
        let reply = app.get(&uri, Some(token)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.headers["content-type"], "application/pdf");
        assert!(reply.bytes.starts_with(b"%PDF"));
    }
}

#[tokio::test]
async fn notifications_poll_by_cursor() {
    let app = spawn().await;
    let f = fixture(&app).await;

    let first = app
        .get("/api/admin/orders/notifications", Some(&f.admin))
        .await
        .json();
    assert!(first["data"]["orders"].as_array().unwrap().is_empty());
    assert!(first["data"]["serverTime"].as_i64().unwrap() > 0);
    let cursor = first["data"]["cursor"].as_i64().unwrap();
    assert_eq!(cursor, 0);

    let id = place_order(&app, &f).await;
    let polled = app
        .get(&format!("/api/admin/orders/notifications?since={cursor}"), Some(&f.admin))
        .await
        .json();
    let orders = polled["data"]["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], id);
    assert_eq!(polled["data"]["cursor"], orders[0]["created_at"]);

    let cursor = polled["data"]["cursor"].as_i64().unwrap();
    let next = app
        .get(&format!("/api/admin/orders/notifications?since={cursor}"), Some(&f.admin))
        .await
        .json();
    assert!(next["data"]["orders"].as_array().unwrap().is_empty());
    assert_eq!(next["data"]["cursor"].as_i64(), Some(cursor));
}

#[tokio::test]
async fn notification_cursor_never_skips_back_to_back_orders() {
    let app = spawn().await;
    let f = fixture(&app).await;

    let a = place_order(&app, &f).await;
    let polled = app
        .get("/api/admin/orders/notifications?since=0", Some(&f.admin))
        .await
        .json();
    let cursor = polled["data"]["cursor"].as_i64().unwrap();

    // Orders placed within the same millisecond still sort strictly after
    let b = place_order(&app, &f).await;
    let c = place_order(&app, &f).await;
    let next = app
        .get(&format!("/api/admin/orders/notifications?since={cursor}"), Some(&f.admin))
        .await
        .json();
    let orders = next["data"]["orders"].as_array().unwrap();
    let ids: Vec<i64> = orders.iter().map(|o| o["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![b, c]);
    assert!(!ids.contains(&a));
    let stamps: Vec<i64> = orders.iter().map(|o| o["created_at"].as_i64().unwrap()).collect();
    assert!(cursor < stamps[0] && stamps[0] < stamps[1]);
}

#[tokio::test]
async fn dashboard_counts_revenue_without_cancelled() {
    let app = spawn().await;
    let f = fixture(&app).await;

    place_order(&app, &f).await;
    let cancelled = place_order(&app, &f).await;
    set_status(&app, &f.admin, cancelled, "cancelado").await;

    let stats = app.get("/api/admin/dashboard?days=7", Some(&f.admin)).await;
    assert_eq!(stats.status, StatusCode::OK);
    let data = &stats.json()["data"];
    assert_eq!(data["periodDays"], 7);
    assert_eq!(data["orderCount"], 2);
    assert_eq!(data["revenue"].as_f64(), Some(56.9));
    assert_eq!(data["byStatus"]["cancelado"], 1);
    assert_eq!(data["byStatus"]["pendente"], 1);
    assert_eq!(data["daily"].as_array().unwrap().len(), 1);
    assert_eq!(data["daily"][0]["orders"], 2);
}
