//! WhatsApp Cloud API channel adapter.
//!
//! - **Events** (`events`) - webhook payload types and text-message
//!   extraction; media, locations, and statuses are ignored here.
//! - **Verification** (`verify`) - the `hub.*` subscription handshake.
//! - **Outbound** (`outbound`) - `ReplyTransport` trait, the Graph API
//!   sender, and a no-op transport for tests and the simulator.

pub mod events;
pub mod outbound;
pub mod verify;

pub use events::{extract_text_messages, InboundMessage, WebhookPayload};
pub use outbound::{CloudApiClient, NoopTransport, ReplyTransport, SendError};
pub use verify::{verify_subscription, VerifyError, VerifyParams};
