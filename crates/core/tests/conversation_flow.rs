//! End-to-end conversation scenarios against the dialogue engine with an
//! in-memory catalog: search, checkout, and greeting behavior across turns.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use lagobot_core::config::StoreConfig;
use lagobot_core::domain::session::SessionState;
use lagobot_core::{
    search_records, Catalog, DialogueEngine, LlmClient, NewOrder, ProductRecord,
    ORDER_STATUS_PENDING, TOTAL_PENDING,
};

#[derive(Default)]
struct MemoryCatalog {
    records: Vec<ProductRecord>,
    interests: Mutex<Vec<(String, String)>>,
    orders: Mutex<Vec<NewOrder>>,
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn search(&self, query: &str) -> Vec<ProductRecord> {
        search_records(&self.records, query).into_iter().cloned().collect()
    }

    async fn record_interest(&self, user_id: &str, raw_text: &str) -> bool {
        self.interests
            .lock()
            .expect("interests lock")
            .push((user_id.to_string(), raw_text.to_string()));
        true
    }

    async fn create_order(&self, order: NewOrder) -> bool {
        self.orders.lock().expect("orders lock").push(order);
        true
    }
}

struct EchoLlm;

#[async_trait]
impl LlmClient for EchoLlm {
    async fn complete(&self, _system_instruction: &str, user_text: &str) -> Result<String> {
        Ok(format!("[generado] {user_text}"))
    }
}

fn store() -> StoreConfig {
    StoreConfig { name: "LAGOBO".to_string(), contact_phone: "3209891720".to_string() }
}

fn appliance_catalog() -> Arc<MemoryCatalog> {
    Arc::new(MemoryCatalog {
        records: vec![
            ProductRecord {
                reference: "REF-300".to_string(),
                name: "Refrigerador Haceb 300L".to_string(),
                stock: Some(2),
                ..Default::default()
            },
            ProductRecord {
                reference: "TV-55S".to_string(),
                name: "TV Samsung 55 pulgadas".to_string(),
                stock: Some(1),
                ..Default::default()
            },
        ],
        ..Default::default()
    })
}

fn engine(catalog: Arc<MemoryCatalog>, with_llm: bool) -> DialogueEngine {
    DialogueEngine::new(
        catalog,
        with_llm.then(|| Arc::new(EchoLlm) as Arc<dyn LlmClient>),
        store(),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn full_purchase_journey_from_search_to_order() {
    let catalog = appliance_catalog();
    let engine = engine(Arc::clone(&catalog), false);

    // Scenario A: a fridge search replies with a matching result and logs
    // exactly one interest event.
    let reply = engine.handle_message("5551", "nevera").await;
    assert!(reply.contains("Refrigerador Haceb 300L"));
    assert_eq!(catalog.interests.lock().expect("interests").len(), 1);
    assert_eq!(catalog.interests.lock().expect("interests")[0].1, "nevera");

    // Scenario B: "comprar" flips the session into the checkout flow.
    let reply = engine.handle_message("5551", "comprar").await;
    assert!(reply.contains("Nombre Completo"));
    {
        let session = engine.sessions().get_or_create("5551");
        assert_eq!(session.lock().await.state, SessionState::AwaitingCheckoutDetails);
    }

    // Scenario C: the next message is captured as the order payload.
    let reply = engine.handle_message("5551", "Juan Perez, Calle 10 #5").await;
    assert!(reply.contains("Pedido registrado"));

    let orders = catalog.orders.lock().expect("orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].product, "nevera");
    assert_eq!(orders[0].phone, "5551");
    assert_eq!(orders[0].customer_name, "Juan Perez, Calle 10 #5");
    assert_eq!(orders[0].address, "Juan Perez, Calle 10 #5");
    assert_eq!(orders[0].total, TOTAL_PENDING);

    // The sink is responsible for the status column; the placeholder
    // constants are part of the contract.
    assert_eq!(ORDER_STATUS_PENDING, "Pendiente de Pago");

    let session = engine.sessions().get_or_create("5551");
    assert_eq!(session.lock().await.state, SessionState::Normal);
    assert!(session.lock().await.pending_product.is_none());
}

#[tokio::test]
async fn greeting_does_not_trigger_a_product_search() {
    // Scenario D: "hola" is short but excluded by the small-talk rule.
    let catalog = appliance_catalog();
    let engine = engine(Arc::clone(&catalog), false);

    let reply = engine.handle_message("9000", "hola").await;

    assert!(reply.contains("bienvenido"));
    assert!(catalog.interests.lock().expect("interests").is_empty());
}

#[tokio::test]
async fn greeting_prefers_the_llm_when_configured() {
    let catalog = appliance_catalog();
    let engine = engine(Arc::clone(&catalog), true);

    let reply = engine.handle_message("9000", "hola").await;

    assert_eq!(reply, "[generado] hola");
}

#[tokio::test]
async fn checkout_without_prior_search_records_a_generic_product() {
    let catalog = appliance_catalog();
    let engine = engine(Arc::clone(&catalog), false);

    engine.handle_message("7777", "comprar").await;
    engine.handle_message("7777", "Maria Lopez, Carrera 7 #45").await;

    let orders = catalog.orders.lock().expect("orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].product, "Varios productos");
}

#[tokio::test]
async fn sessions_are_isolated_between_users() {
    let catalog = appliance_catalog();
    let engine = engine(Arc::clone(&catalog), false);

    engine.handle_message("1111", "comprar").await;
    let reply = engine.handle_message("2222", "televisor").await;

    // The second user is not dragged into the first user's checkout.
    assert!(reply.contains("TV Samsung"));
    let session = engine.sessions().get_or_create("2222");
    assert_eq!(session.lock().await.state, SessionState::Normal);
}
