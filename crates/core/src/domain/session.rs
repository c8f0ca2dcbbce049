use serde::{Deserialize, Serialize};

/// Where a conversation currently sits in the purchase flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Normal,
    AwaitingCheckoutDetails,
}

/// Per-user conversational state. Created lazily on the first message from
/// a user identifier and kept in memory for the process lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub state: SessionState,
    /// Last product context the user expressed interest in. Set when a
    /// catalog search returns results, cleared when the checkout flow
    /// leaves `AwaitingCheckoutDetails`.
    pub pending_product: Option<String>,
}

impl Session {
    /// Leaves the checkout-details state, yielding the product context the
    /// order should reference.
    pub fn take_checkout_context(&mut self) -> Option<String> {
        self.state = SessionState::Normal;
        self.pending_product.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_normal_with_no_pending_product() {
        let session = Session::default();
        assert_eq!(session.state, SessionState::Normal);
        assert!(session.pending_product.is_none());
    }

    #[test]
    fn take_checkout_context_resets_state_and_clears_product() {
        let mut session = Session {
            state: SessionState::AwaitingCheckoutDetails,
            pending_product: Some("nevera".to_string()),
        };

        let context = session.take_checkout_context();

        assert_eq!(context.as_deref(), Some("nevera"));
        assert_eq!(session.state, SessionState::Normal);
        assert!(session.pending_product.is_none());
    }
}
