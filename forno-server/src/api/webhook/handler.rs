//! Payment Webhook Handler
//!
//! Credentials are checked before the body is trusted. In `either` mode a
//! present signature is authoritative: a bad signature is not retried as a
//! token.

use axum::{body::Bytes, extract::State};
use http::HeaderMap;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::payment::{
    SIGNATURE_HEADER, SignatureError, TOKEN_HEADER, VerificationMode, WebhookPayload,
    verify_signature, verify_token,
};
use shared::util::now_millis;

use crate::config::Config;
use crate::security_log;
use crate::services::payment::{self, WebhookAck};
use crate::state::AppState;

enum Credential<'a> {
    Signature(&'a str),
    Token(&'a str),
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Pick the credential the configured mode accepts
fn credential(mode: VerificationMode, headers: &HeaderMap) -> Result<Credential<'_>, SignatureError> {
    if mode.accepts_hmac()
        && let Some(sig) = header(headers, SIGNATURE_HEADER)
    {
        return Ok(Credential::Signature(sig));
    }
    if mode.accepts_token()
        && let Some(token) = header(headers, TOKEN_HEADER)
    {
        return Ok(Credential::Token(token));
    }
    Err(SignatureError::Missing)
}

fn verify(
    config: &Config,
    credential: &Credential<'_>,
    payload: &WebhookPayload,
) -> Result<(), SignatureError> {
    match credential {
        Credential::Signature(sig) => verify_signature(
            &config.webhook_secret,
            payload,
            sig,
            now_millis() / 1000,
            config.webhook_tolerance_secs,
        ),
        Credential::Token(token) => verify_token(&config.webhook_token, token),
    }
}

fn reject(err: &SignatureError, txid: Option<&str>) -> AppError {
    security_log!(
        WARN,
        "webhook_rejected",
        error = %err,
        txid = txid.unwrap_or("")
    );
    AppError::with_message(ErrorCode::WebhookUnauthorized, err.to_string())
}

/// POST /api/webhooks/payment
pub async fn payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<ApiResponse<WebhookAck>> {
    let credential =
        credential(state.config.webhook_mode, &headers).map_err(|e| reject(&e, None))?;

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::invalid_request(format!("Payload inválido: {e}")))?;

    verify(&state.config, &credential, &payload)
        .map_err(|e| reject(&e, Some(&payload.txid)))?;

    let ack = payment::process(&state.pool, &payload, now_millis()).await?;
    Ok(ApiResponse::success(ack))
}
