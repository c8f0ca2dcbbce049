use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use crate::domain::session::Session;

/// In-memory session repository keyed by user identifier.
///
/// Each user id maps to exactly one session. Distinct keys never contend;
/// messages for the same key are serialized by the per-session mutex. The
/// dialogue engine holds that mutex only while reading or mutating session
/// fields, never across a network call.
///
/// Sessions have no expiry and are lost on restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `user_id`, creating a fresh `Normal` session
    /// on first contact.
    pub fn get_or_create(&self, user_id: &str) -> Arc<Mutex<Session>> {
        if let Some(session) = self.inner.read().expect("session map poisoned").get(user_id) {
            return Arc::clone(session);
        }

        let mut map = self.inner.write().expect("session map poisoned");
        Arc::clone(map.entry(user_id.to_string()).or_default())
    }
}
