//! Shared harness for the HTTP integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use axum::Router;
use axum::body::Body;
use forno_server::{AppState, Config, build_app};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::payment::{VerificationMode, WebhookPayload, sign};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@forno.test";
pub const ADMIN_PASSWORD: &str = "admin-secret";

static NEXT_IP: AtomicU32 = AtomicU32::new(1);

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub bytes: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    pub fn codigo(&self) -> String {
        self.json()["codigo"].as_str().unwrap_or_default().to_string()
    }
}

pub async fn spawn() -> TestApp {
    spawn_with(|_| {}).await
}

pub async fn spawn_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("forno.db");
    let mut config = Config::development(db_path.to_string_lossy().to_string());
    config.admin_email = Some(ADMIN_EMAIL.into());
    config.admin_password = Some(ADMIN_PASSWORD.into());
    tweak(&mut config);

    let state = AppState::new(&config).await.unwrap();
    TestApp {
        app: build_app(state.clone()),
        state,
        _dir: dir,
    }
}

impl TestApp {
    /// Each call comes from a fresh client IP unless `x-forwarded-for` is set
    pub async fn send(&self, request: Request<Body>) -> Reply {
        let mut request = request;
        if !request.headers().contains_key("x-forwarded-for") {
            let n = NEXT_IP.fetch_add(1, Ordering::Relaxed);
            let ip = format!("10.{}.{}.{}", (n >> 16) & 0xff, (n >> 8) & 0xff, n & 0xff);
            request
                .headers_mut()
                .insert("x-forwarded-for", ip.parse().unwrap());
        }
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        Reply {
            status,
            headers,
            bytes,
        }
    }

    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        self.call("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.call("POST", uri, token, Some(body)).await
    }

    pub async fn admin_token(&self) -> String {
        let reply = self
            .post(
                "/api/admin/auth/login",
                None,
                json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "admin login: {:?}", reply.json());
        reply.json()["data"]["token"].as_str().unwrap().to_string()
    }

    /// Register a customer with a delivery address; returns (token, user id)
    pub async fn customer(&self, email: &str) -> (String, i64) {
        let reply = self
            .post(
                "/api/customer/auth/register",
                None,
                json!({
                    "name": "Ana Souza",
                    "email": email,
                    "password": "pizza123",
                    "phone": "11 99999-0000",
                    "address": "Rua das Flores, 10"
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "register: {:?}", reply.json());
        let data = &reply.json()["data"];
        (
            data["token"].as_str().unwrap().to_string(),
            data["user"]["id"].as_i64().unwrap(),
        )
    }

    /// Active product with sizes M (39.90) and G (49.90)
    pub async fn product(&self, admin: &str, name: &str) -> i64 {
        let reply = self
            .post(
                "/api/admin/products",
                Some(admin),
                json!({
                    "name": name,
                    "category": "Pizzas",
                    "sizes": [{"size": "M", "price": 39.90}, {"size": "G", "price": 49.90}]
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "product: {:?}", reply.json());
        reply.json()["data"]["id"].as_i64().unwrap()
    }

    /// Force the store open or closed regardless of the clock
    pub async fn set_closed(&self, admin: &str, closed: bool, reason: Option<&str>) -> Reply {
        self.post(
            "/api/admin/store-status/toggle",
            Some(admin),
            json!({"closed": closed, "reason": reason}),
        )
        .await
    }

    pub async fn webhook(&self, payload: &WebhookPayload, headers: &[(&str, String)]) -> Reply {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payment")
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        let body = serde_json::to_vec(payload).unwrap();
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn signed_webhook(&self, payload: &WebhookPayload) -> Reply {
        let signature = sign(&self.state.config.webhook_secret, payload).unwrap();
        self.webhook(payload, &[("x-signature", signature)]).await
    }

    pub fn webhook_mode(&self) -> VerificationMode {
        self.state.config.webhook_mode
    }
}

/// One G pizza for delivery: 49.90 + 7.00 fee = 5690 cents
pub fn cart(product_id: i64, payment_method: Option<&str>) -> Value {
    json!({
        "items": [{"product_id": product_id, "size": "G", "quantity": 1}],
        "fulfillment": "entrega",
        "payment_method": payment_method,
    })
}

pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn payload(intent_id: &str, status: &str, amount: i64, txid: &str) -> WebhookPayload {
    WebhookPayload {
        order: intent_id.to_string(),
        status: status.to_string(),
        amount,
        txid: txid.to_string(),
        ts: now_secs(),
    }
}
