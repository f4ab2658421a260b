//! Request-time lookup of the upstream API key

/// Source of the provider API key
///
/// The key is looked up on every request so that rotating it in the
/// environment needs no restart.
pub trait SecretSource: Send + Sync {
    /// Current API key, or `None` when it is unset or blank
    fn api_key(&self) -> Option<String>;

    /// Name shown in logs and the startup banner
    fn describe(&self) -> String;
}

/// Reads the key from a named environment variable
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl SecretSource for EnvSecret {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn describe(&self) -> String {
        format!("env:{}", self.var)
    }
}

/// Fixed key, used by tests
#[cfg(test)]
pub struct StaticSecret(pub Option<String>);

#[cfg(test)]
impl SecretSource for StaticSecret {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_secret_missing() {
        let secret = EnvSecret::new("WOKMASGO_TEST_KEY_THAT_IS_NEVER_SET");
        assert_eq!(secret.api_key(), None);
        assert_eq!(secret.describe(), "env:WOKMASGO_TEST_KEY_THAT_IS_NEVER_SET");
    }

    #[test]
    fn test_env_secret_read_at_call_time() {
        let var = "WOKMASGO_TEST_KEY_ROTATION";
        let secret = EnvSecret::new(var);
        // SAFETY: this variable is private to this test.
        unsafe { std::env::set_var(var, "  ") };
        assert_eq!(secret.api_key(), None);
        unsafe { std::env::set_var(var, "sk-or-first") };
        assert_eq!(secret.api_key().as_deref(), Some("sk-or-first"));
        unsafe { std::env::set_var(var, "sk-or-second") };
        assert_eq!(secret.api_key().as_deref(), Some("sk-or-second"));
        unsafe { std::env::remove_var(var) };
    }
}
