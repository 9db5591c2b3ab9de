//! Language-model oracle boundary
//!
//! The oracle is opaque: it takes a model id and a prompt and returns text.
//! A connector binds a fresh oracle handle to one credential, which is how
//! the rotating client switches keys.

pub mod gemini;
pub mod rotating;

pub use gemini::{GeminiClient, GeminiConnector};
pub use rotating::RotatingClient;

use crate::Result;
use async_trait::async_trait;
use std::fmt;

/// Literal reply the model uses to signal failure
pub const ERROR_SENTINEL: &str = "Error";

/// One API key. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Last four characters, for logs. Keys of four characters or fewer are fully hidden.
    pub fn masked(&self) -> String {
        let len = self.0.chars().count();
        if len <= 4 {
            return "****".to_string();
        }
        let tail: String = self.0.chars().skip(len - 4).collect();
        format!("***{}", tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResponse {
    pub text: String,
}

impl OracleResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// True when the model answered with the bare error sentinel
    pub fn is_error_sentinel(&self) -> bool {
        self.text.trim() == ERROR_SENTINEL
    }
}

/// A handle bound to one credential
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<OracleResponse>;
}

/// Builds oracle handles for a given credential
pub trait OracleConnector: Send + Sync {
    fn connect(&self, credential: &Credential) -> Box<dyn Oracle>;
}
