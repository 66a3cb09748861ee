//! Payment webhook: verification, idempotency and intent materialization

mod common;

use http::StatusCode;
use serde_json::Value;
use shared::payment::VerificationMode;

use common::{TestApp, cart, payload, spawn, spawn_with};

/// Open store, one product, one customer with a fresh intent
async fn intent_fixture(app: &TestApp) -> (String, String) {
    let admin = app.admin_token().await;
    app.set_closed(&admin, false, None).await;
    let product = app.product(&admin, "Pizza Portuguesa").await;
    let (customer, _) = app.customer("bruno@example.com").await;

    let reply = app
        .post("/api/customer/orders/intent", Some(&customer), cart(product, None))
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    let data = reply.json()["data"].clone();
    assert_eq!(data["state"], "aguardando");
    assert_eq!(data["amountCents"], 5690);
    (customer, data["id"].as_str().unwrap().to_string())
}

async fn intent(app: &TestApp, customer: &str, id: &str) -> Value {
    let reply = app
        .get(&format!("/api/customer/orders/intent/{id}"), Some(customer))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.json()["data"].clone()
}

#[tokio::test]
async fn missing_credentials_rejected() {
    let app = spawn().await;
    let reply = app
        .webhook(&payload("whatever", "approved", 100, "tx-0"), &[])
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.codigo(), "WEBHOOK_UNAUTHORIZED");
}

#[tokio::test]
async fn bad_signature_rejected() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    let reply = app
        .webhook(
            &payload(&id, "approved", 5690, "tx-forged"),
            &[("x-signature", "00".repeat(32))],
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(intent(&app, &customer, &id).await["state"], "aguardando");
}

#[tokio::test]
async fn token_ignored_in_hmac_mode() {
    let app = spawn().await;
    assert_eq!(app.webhook_mode(), VerificationMode::Hmac);
    let token = app.state.config.webhook_token.clone();
    let reply = app
        .webhook(
            &payload("x", "approved", 1, "tx-t"),
            &[("x-webhook-token", token)],
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn approved_payment_creates_order_once() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    let event = payload(&id, "approved", 5690, "tx-100");
    let reply = app.signed_webhook(&event).await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    let ack = reply.json()["data"].clone();
    assert_eq!(ack["state"], "pago");
    assert_eq!(ack["duplicate"], false);
    let order_id = ack["orderId"].as_i64().unwrap();

    let view = intent(&app, &customer, &id).await;
    assert_eq!(view["state"], "pago");
    assert_eq!(view["orderId"], order_id);

    let order = app
        .get(&format!("/api/customer/orders/{order_id}"), Some(&customer))
        .await
        .json();
    assert_eq!(order["data"]["payment_method"], "online");
    assert_eq!(order["data"]["payment_txid"], "tx-100");
    assert_eq!(order["data"]["status"], "pendente");
    assert_eq!(order["data"]["total"].as_f64(), Some(56.9));

    // Processor retries the same delivery
    let replay = app.signed_webhook(&event).await;
    assert_eq!(replay.status, StatusCode::OK);
    assert_eq!(replay.json()["data"]["duplicate"], true);

    let orders = app.get("/api/customer/orders", Some(&customer)).await.json();
    assert_eq!(orders["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn second_approval_with_new_txid_keeps_single_order() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    let first = app
        .signed_webhook(&payload(&id, "approved", 5690, "tx-a"))
        .await
        .json();
    let second = app
        .signed_webhook(&payload(&id, "approved", 5690, "tx-b"))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json()["data"]["orderId"], first["data"]["orderId"]);

    let orders = app.get("/api/customer/orders", Some(&customer)).await.json();
    assert_eq!(orders["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn amount_mismatch_rejected_and_retryable() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    let reply = app
        .signed_webhook(&payload(&id, "approved", 100, "tx-short"))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.codigo(), "PAYMENT_AMOUNT_MISMATCH");
    assert_eq!(intent(&app, &customer, &id).await["state"], "aguardando");

    // Rolled back, so the same txid can be delivered again with the right amount
    let reply = app
        .signed_webhook(&payload(&id, "approved", 5690, "tx-short"))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["duplicate"], false);
}

#[tokio::test]
async fn unknown_intent_not_found() {
    let app = spawn().await;
    let reply = app
        .signed_webhook(&payload("no-such-intent", "approved", 5690, "tx-404"))
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.codigo(), "INTENT_NOT_FOUND");
}

#[tokio::test]
async fn expired_intent_conflicts() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    sqlx::query("UPDATE order_intents SET expires_at = 0 WHERE id = ?")
        .bind(&id)
        .execute(&app.state.pool)
        .await
        .unwrap();
    assert_eq!(intent(&app, &customer, &id).await["state"], "expirado");

    let reply = app
        .signed_webhook(&payload(&id, "approved", 5690, "tx-late"))
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.codigo(), "INTENT_EXPIRED");
}

#[tokio::test]
async fn failed_payment_marks_intent() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    let reply = app
        .signed_webhook(&payload(&id, "declined", 5690, "tx-fail"))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["state"], "falhou");
    assert_eq!(intent(&app, &customer, &id).await["state"], "falhou");

    let reply = app
        .signed_webhook(&payload(&id, "approved", 5690, "tx-after-fail"))
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.codigo(), "INTENT_ALREADY_SETTLED");
}

#[tokio::test]
async fn pending_status_is_acknowledged() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    let reply = app
        .signed_webhook(&payload(&id, "pending", 5690, "tx-wait"))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(intent(&app, &customer, &id).await["state"], "aguardando");
}

#[tokio::test]
async fn pending_then_approved_under_same_txid_settles() {
    let app = spawn().await;
    let (customer, id) = intent_fixture(&app).await;

    let reply = app
        .signed_webhook(&payload(&id, "pending", 5690, "tx-lifecycle"))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["duplicate"], false);

    let reply = app
        .signed_webhook(&payload(&id, "approved", 5690, "tx-lifecycle"))
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    let ack = reply.json()["data"].clone();
    assert_eq!(ack["duplicate"], false);
    assert_eq!(ack["state"], "pago");
    assert!(ack["orderId"].is_i64());
    assert_eq!(intent(&app, &customer, &id).await["state"], "pago");

    // The settling delivery is the one that consumes the txid
    let reply = app
        .signed_webhook(&payload(&id, "approved", 5690, "tx-lifecycle"))
        .await;
    assert_eq!(reply.json()["data"]["duplicate"], true);
    assert_eq!(reply.json()["data"]["orderId"], ack["orderId"]);
}

#[tokio::test]
async fn token_mode_accepts_shared_token() {
    let app = spawn_with(|config| config.webhook_mode = VerificationMode::Token).await;
    let (customer, id) = intent_fixture(&app).await;
    let token = app.state.config.webhook_token.clone();

    let reply = app
        .webhook(&payload(&id, "approved", 5690, "tx-tok"), &[("x-webhook-token", "wrong".into())])
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app
        .webhook(&payload(&id, "approved", 5690, "tx-tok"), &[("x-webhook-token", token)])
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    assert_eq!(intent(&app, &customer, &id).await["state"], "pago");
}

#[tokio::test]
async fn stale_signature_rejected() {
    let app = spawn().await;
    let (_, id) = intent_fixture(&app).await;

    let mut event = payload(&id, "approved", 5690, "tx-old");
    event.ts -= 3600;
    let reply = app.signed_webhook(&event).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}
