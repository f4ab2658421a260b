//! Anti-forgery token store
//!
//! Tokens are issued when a generator page is rendered and checked when the
//! browser posts to the generate endpoint. The store is process-local and
//! bounded; expired tokens are dropped whenever a new one is issued.

use crate::core::config::CsrfConfig;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

struct IssuedToken {
    expires_at: DateTime<Utc>,
    serial: u64,
}

#[derive(Default)]
struct TokenTable {
    entries: HashMap<String, IssuedToken>,
    next_serial: u64,
}

pub struct CsrfStore {
    tokens: Mutex<TokenTable>,
    ttl: Duration,
    max_tokens: usize,
    regenerate: bool,
}

impl CsrfStore {
    pub fn new(config: &CsrfConfig) -> Self {
        Self {
            tokens: Mutex::new(TokenTable::default()),
            ttl: Duration::try_seconds(config.expire_secs).unwrap_or(Duration::MAX),
            max_tokens: config.max_tokens,
            regenerate: config.regenerate,
        }
    }

    /// Issue a fresh token valid for the configured lifetime
    pub async fn issue(&self) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();

        let mut table = self.tokens.lock().await;
        table.entries.retain(|_, issued| issued.expires_at > now);

        if table.entries.len() >= self.max_tokens {
            if let Some(oldest) = table
                .entries
                .iter()
                .min_by_key(|(_, issued)| issued.serial)
                .map(|(t, _)| t.clone())
            {
                table.entries.remove(&oldest);
                debug!("CSRF store full, evicted oldest token");
            }
        }

        let serial = table.next_serial;
        table.next_serial += 1;
        // Saturate instead of overflowing chrono's range
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        table.entries.insert(token.clone(), IssuedToken { expires_at, serial });
        token
    }

    /// Check a submitted token
    ///
    /// Returns `true` when the token was issued here and has not expired.
    /// Accepted tokens are consumed when regeneration is on.
    pub async fn verify(&self, token: &str) -> bool {
        let now = Utc::now();
        let mut table = self.tokens.lock().await;

        match table.entries.get(token) {
            Some(issued) if issued.expires_at > now => {
                if self.regenerate {
                    table.entries.remove(token);
                }
                true
            }
            Some(_) => {
                table.entries.remove(token);
                false
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.tokens.lock().await.entries.len()
    }
}
