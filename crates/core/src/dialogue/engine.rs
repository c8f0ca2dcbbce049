use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::StoreConfig;
use crate::dialogue::replies;
use crate::domain::order::{NewOrder, TOTAL_PENDING};
use crate::domain::session::SessionState;
use crate::llm::LlmClient;
use crate::search::detect_product_query;
use crate::session::SessionStore;

/// Orchestrates one inbound message into one outbound reply.
///
/// Branches are evaluated in strict priority order; the first applicable
/// branch wins:
///
/// 1. checkout-details capture (only while awaiting them)
/// 2. purchase-intent keywords ("comprar", "quiero llevar")
/// 3. product-intent detection + catalog search
/// 4. generative fallback
/// 5. fixed greeting
///
/// Checkout capture pre-empts everything while data is pending, and the
/// purchase keywords pre-empt search so "comprar nevera" starts checkout
/// instead of searching. Every path returns a reply string; no error
/// escapes this type.
pub struct DialogueEngine {
    sessions: SessionStore,
    catalog: Arc<dyn Catalog>,
    llm: Option<Arc<dyn LlmClient>>,
    store: StoreConfig,
    llm_timeout: Duration,
}

impl DialogueEngine {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        llm: Option<Arc<dyn LlmClient>>,
        store: StoreConfig,
        llm_timeout: Duration,
    ) -> Self {
        Self { sessions: SessionStore::new(), catalog, llm, store, llm_timeout }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn handle_message(&self, user_id: &str, text: &str) -> String {
        let handle = self.sessions.get_or_create(user_id);

        // Checkout capture. The session is reset before the order write so
        // the lock is not held across the network call; the raw message is
        // the combined name+address payload, whatever it says.
        let checkout_product = {
            let mut session = handle.lock().await;
            if session.state == SessionState::AwaitingCheckoutDetails {
                Some(session.take_checkout_context())
            } else {
                None
            }
        };
        if let Some(pending_product) = checkout_product {
            return self.capture_checkout(user_id, text, pending_product).await;
        }

        let message = text.to_lowercase().trim().to_string();

        if message.contains("comprar") || message.contains("quiero llevar") {
            handle.lock().await.state = SessionState::AwaitingCheckoutDetails;
            debug!(user_id, "purchase intent detected, awaiting checkout details");
            return replies::checkout_prompt();
        }

        if let Some(query) = detect_product_query(&message) {
            // Commercial analytics, best-effort. A failed append must never
            // suppress the reply.
            if !self.catalog.record_interest(user_id, text).await {
                debug!(user_id, "interest event was not recorded");
            }

            let results = self.catalog.search(&query).await;
            if !results.is_empty() {
                handle.lock().await.pending_product = Some(query.clone());
                debug!(user_id, query = %query, matches = results.len(), "catalog search hit");
                return replies::search_results(&results, &self.store);
            }
            // No match for a specific query: let the generative fallback
            // answer conversationally instead of a dead "no results".
            debug!(user_id, query = %query, "catalog search empty, falling through");
        }

        self.generative_fallback(user_id, text).await
    }

    async fn capture_checkout(
        &self,
        user_id: &str,
        text: &str,
        pending_product: Option<String>,
    ) -> String {
        let payload = text.trim().to_string();
        let order = NewOrder {
            customer_name: payload.clone(),
            phone: user_id.to_string(),
            address: payload,
            product: pending_product.unwrap_or_else(|| replies::DEFAULT_PRODUCT.to_string()),
            total: TOTAL_PENDING.to_string(),
        };

        if self.catalog.create_order(order).await {
            replies::order_confirmed(&self.store)
        } else {
            warn!(user_id, "order could not be recorded");
            replies::order_failed(&self.store)
        }
    }

    async fn generative_fallback(&self, user_id: &str, text: &str) -> String {
        let Some(llm) = &self.llm else {
            return replies::welcome(&self.store);
        };

        let instruction = replies::persona_instruction(&self.store);
        match tokio::time::timeout(self.llm_timeout, llm.complete(&instruction, text)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(error)) => {
                warn!(user_id, %error, "generative fallback failed");
                replies::generic_help(&self.store)
            }
            Err(_) => {
                warn!(user_id, timeout_secs = self.llm_timeout.as_secs(), "generative fallback timed out");
                replies::generic_help(&self.store)
            }
        }
    }
}
