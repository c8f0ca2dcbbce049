use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use lagobot_core::DialogueEngine;
use lagobot_whatsapp::{
    extract_text_messages, verify_subscription, ReplyTransport, VerifyError, VerifyParams,
    WebhookPayload,
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DialogueEngine>,
    pub transport: Arc<dyn ReplyTransport>,
    pub verify_token: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    match verify_subscription(&params, &state.verify_token) {
        Ok(challenge) => {
            info!("webhook subscription verified");
            (StatusCode::OK, challenge).into_response()
        }
        Err(VerifyError::MissingParams) => {
            (StatusCode::BAD_REQUEST, "missing parameters").into_response()
        }
        Err(VerifyError::TokenMismatch) => {
            warn!("webhook verification rejected");
            (StatusCode::FORBIDDEN, "verification token mismatch").into_response()
        }
    }
}

/// The provider retries on non-2xx, so this handler always acknowledges;
/// delivery problems are logged, never surfaced back to the webhook.
async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> impl IntoResponse {
    for message in extract_text_messages(&payload) {
        info!(from = %message.from, "inbound message");
        let reply = state.engine.handle_message(&message.from, &message.text).await;
        if let Err(error) = state.transport.send_text(&message.from, &reply).await {
            warn!(to = %message.from, %error, "reply delivery failed");
        }
    }

    (StatusCode::OK, "EVENT_RECEIVED")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::util::ServiceExt;

    use lagobot_core::config::StoreConfig;
    use lagobot_core::ProductRecord;
    use lagobot_inventory::InventoryService;
    use lagobot_whatsapp::NoopTransport;

    use super::*;

    fn test_state() -> AppState {
        let inventory = InventoryService::from_records(vec![ProductRecord {
            reference: "REF-300".to_string(),
            name: "Refrigerador Haceb 300L".to_string(),
            stock: Some(2),
            ..Default::default()
        }]);
        let engine = Arc::new(DialogueEngine::new(
            Arc::new(inventory),
            None,
            StoreConfig { name: "LAGOBO".to_string(), contact_phone: "3209891720".to_string() },
            Duration::from_secs(5),
        ));
        AppState { engine, transport: Arc::new(NoopTransport), verify_token: "secreto".to_string() }
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn verification_echoes_the_challenge() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::get("/webhook?hub.mode=subscribe&hub.verify_token=secreto&hub.challenge=42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "42");
    }

    #[tokio::test]
    async fn verification_rejects_a_wrong_token() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::get("/webhook?hub.mode=subscribe&hub.verify_token=otro&hub.challenge=42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn inbound_text_messages_are_acknowledged() {
        let app = router(test_state());
        let payload = serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "5551",
                            "type": "text",
                            "text": { "body": "nevera" }
                        }]
                    }
                }]
            }]
        });

        let response = app
            .oneshot(
                Request::post("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "EVENT_RECEIVED");
    }

    #[tokio::test]
    async fn health_endpoint_answers() {
        let app = router(test_state());

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
