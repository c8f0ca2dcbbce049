pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod domain;
pub mod llm;
pub mod search;
pub mod session;

pub use catalog::Catalog;
pub use config::{AppConfig, ConfigError, LoadOptions};
pub use dialogue::DialogueEngine;
pub use domain::order::{InterestEvent, NewOrder, ORDER_STATUS_PENDING, TOTAL_PENDING};
pub use domain::product::ProductRecord;
pub use domain::session::{Session, SessionState};
pub use llm::LlmClient;
pub use search::{detect_product_query, normalize_query, search_records};
pub use session::SessionStore;
