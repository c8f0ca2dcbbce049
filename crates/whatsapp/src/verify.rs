//! Webhook subscription handshake: the provider sends `hub.mode`,
//! `hub.verify_token`, and `hub.challenge`; a matching token echoes the
//! challenge back.

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("verification request is missing required parameters")]
    MissingParams,
    #[error("verification token did not match")]
    TokenMismatch,
}

/// Returns the challenge to echo back, or why the request was rejected.
pub fn verify_subscription(
    params: &VerifyParams,
    expected_token: &str,
) -> Result<String, VerifyError> {
    let (Some(mode), Some(token), Some(challenge)) =
        (&params.mode, &params.verify_token, &params.challenge)
    else {
        return Err(VerifyError::MissingParams);
    };

    if mode != "subscribe" || token != expected_token {
        return Err(VerifyError::TokenMismatch);
    }

    Ok(challenge.clone())
}
