//! Generative fallback capability.
//!
//! Implements the core `LlmClient` trait against the Gemini REST API.
//! All failures (transport, auth, quota, malformed responses) surface as
//! errors here; the dialogue engine maps them to a fixed reply.

pub mod gemini;

pub use gemini::GeminiClient;
