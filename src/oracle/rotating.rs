//! Credential-rotating oracle client
//!
//! Retries a failed call on the next credential, cycling through the list.
//! The cursor is kept between calls: a key that failed stays skipped until
//! rotation comes back around to it.

use super::{Credential, Oracle, OracleConnector, OracleResponse};
use crate::error::AssistantError;
use crate::Result;
use tracing::{error, info, warn};

pub struct RotatingClient {
    connector: Box<dyn OracleConnector>,
    credentials: Vec<Credential>,
    cursor: usize,
    active: Box<dyn Oracle>,
    max_retries: usize,
}

impl RotatingClient {
    /// Bind to the first credential. The retry bound defaults to the number of credentials.
    pub fn new(connector: Box<dyn OracleConnector>, credentials: Vec<Credential>) -> Result<Self> {
        let first = credentials.first().ok_or_else(|| {
            AssistantError::Config("at least one API credential is required".to_string())
        })?;

        let active = connector.connect(first);
        let max_retries = credentials.len();

        info!(credentials = credentials.len(), "Oracle client ready");

        Ok(Self {
            connector,
            credentials,
            cursor: 0,
            active,
            max_retries,
        })
    }

    /// Override the retry bound. Values below one are raised to one.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Index of the credential the next attempt will use
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub async fn call(&mut self, model: &str, prompt: &str) -> Result<OracleResponse> {
        self.call_with_retries(model, prompt, self.max_retries).await
    }

    /// Call the oracle, rotating on failure until `max_retries` attempts are spent.
    /// Both a failed call and an `"Error"` reply count as failures.
    pub async fn call_with_retries(
        &mut self,
        model: &str,
        prompt: &str,
        max_retries: usize,
    ) -> Result<OracleResponse> {
        let max_retries = max_retries.max(1);
        let mut attempts = 0;

        loop {
            let failure = match self.active.generate(model, prompt).await {
                Ok(response) if response.is_error_sentinel() => {
                    AssistantError::OracleCall("model replied with the error sentinel".to_string())
                }
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            attempts += 1;

            if attempts >= max_retries {
                error!(attempts, error = %failure, "All oracle attempts failed");
                return Err(AssistantError::OracleExhausted {
                    attempts,
                    last_error: failure.to_string(),
                });
            }

            self.rotate();
            warn!(
                attempt = attempts,
                error = %failure,
                cursor = self.cursor + 1,
                key = %self.credentials[self.cursor].masked(),
                "Oracle call failed, switching credential"
            );
        }
    }

    /// Advance the cursor (wrapping) and rebind the active handle
    fn rotate(&mut self) {
        self.cursor = (self.cursor + 1) % self.credentials.len();
        self.active = self.connector.connect(&self.credentials[self.cursor]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::testing::ScriptedConnector;
    use tokio_test::{assert_err, assert_ok};

    const MODEL: &str = "test-model";

    fn client(connector: &ScriptedConnector, keys: &[&str]) -> RotatingClient {
        RotatingClient::new(
            Box::new(connector.clone()),
            keys.iter().map(|k| Credential::new(*k)).collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_success_on_first_credential() {
        let connector = ScriptedConnector::new();
        connector.reply("{}");
        let mut client = client(&connector, &["k1", "k2"]);

        let response = assert_ok!(client.call(MODEL, "prompt").await);
        assert_eq!(response.text, "{}");
        assert_eq!(connector.credentials_used(), vec!["k1"]);
        assert_eq!(client.cursor(), 0);
    }

    #[tokio::test]
    async fn test_all_failing_exhausts_after_n_attempts() {
        let connector = ScriptedConnector::new();
        for key in ["k1", "k2", "k3"] {
            connector.always_fail(key);
        }
        let mut client = client(&connector, &["k1", "k2", "k3"]);

        let err = assert_err!(client.call(MODEL, "prompt").await);
        match err {
            AssistantError::OracleExhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(connector.credentials_used(), vec!["k1", "k2", "k3"]);
    }

    #[tokio::test]
    async fn test_rotates_then_stops_on_success() {
        let connector = ScriptedConnector::new();
        connector.fail("quota").reply("ok-text").reply("unused");
        let mut client = client(&connector, &["k1", "k2", "k3"]);

        let response = assert_ok!(client.call(MODEL, "prompt").await);
        assert_eq!(response.text, "ok-text");
        assert_eq!(connector.credentials_used(), vec!["k1", "k2"]);
        assert_eq!(client.cursor(), 1);
    }

    #[tokio::test]
    async fn test_error_sentinel_triggers_rotation() {
        let connector = ScriptedConnector::new();
        connector.reply("Error").reply("{\"doanh_thu\": 1}");
        let mut client = client(&connector, &["k1", "k2"]);

        let response = assert_ok!(client.call(MODEL, "prompt").await);
        assert_eq!(response.text, "{\"doanh_thu\": 1}");
        assert_eq!(connector.credentials_used(), vec!["k1", "k2"]);
    }

    #[tokio::test]
    async fn test_cursor_persists_across_calls() {
        let connector = ScriptedConnector::new();
        connector.fail("boom").reply("first").reply("second");
        let mut client = client(&connector, &["k1", "k2", "k3"]);

        assert_ok!(client.call(MODEL, "a").await);
        assert_ok!(client.call(MODEL, "b").await);

        // second call starts on k2, not back on k1
        assert_eq!(connector.credentials_used(), vec!["k1", "k2", "k2"]);
    }

    #[tokio::test]
    async fn test_cursor_wraps_around() {
        let connector = ScriptedConnector::new();
        connector.always_fail("k2");
        connector.reply("from-k1").reply("from-k1-again");
        let mut client = client(&connector, &["k1", "k2"]);

        assert_ok!(client.call(MODEL, "a").await);
        assert_eq!(client.cursor(), 0);

        client.rotate();
        assert_eq!(client.cursor(), 1);

        let response = assert_ok!(client.call(MODEL, "b").await);
        assert_eq!(response.text, "from-k1-again");
        assert_eq!(client.cursor(), 0);
        assert_eq!(connector.credentials_used(), vec!["k1", "k2", "k1"]);
    }

    #[tokio::test]
    async fn test_explicit_retry_bound() {
        let connector = ScriptedConnector::new();
        connector.always_fail("k1").always_fail("k2");
        let mut client = client(&connector, &["k1", "k2"]).with_max_retries(5);
        assert_eq!(client.max_retries(), 5);

        let err = assert_err!(client.call(MODEL, "prompt").await);
        assert!(matches!(err, AssistantError::OracleExhausted { attempts: 5, .. }));
        assert_eq!(
            connector.credentials_used(),
            vec!["k1", "k2", "k1", "k2", "k1"]
        );
    }

    #[tokio::test]
    async fn test_single_credential_exhausts_after_one_attempt() {
        let connector = ScriptedConnector::new();
        connector.fail("down");
        let mut client = client(&connector, &["only"]);

        let err = assert_err!(client.call(MODEL, "prompt").await);
        assert!(matches!(err, AssistantError::OracleExhausted { attempts: 1, .. }));
        assert_eq!(client.cursor(), 0);
    }

    #[test]
    fn test_requires_a_credential() {
        let result = RotatingClient::new(Box::new(ScriptedConnector::new()), vec![]);
        assert!(matches!(result, Err(AssistantError::Config(_))));
    }
}
