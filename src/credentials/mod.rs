pub mod prompt;

use std::fmt;

/// Environment variable holding the Supabase API key
pub const ENV_SUPABASE_KEY: &str = "CARBON_TALLY_SUPABASE_KEY";

/// Environment variable holding the admin secret. Admin access is disabled when unset.
pub const ENV_ADMIN_SECRET: &str = "CARBON_TALLY_ADMIN_SECRET";

pub use prompt::{prompt_for_admin_secret, prompt_for_api_key, supabase_key};

/// Read a non-empty, trimmed value from an environment variable
pub fn get_from_env(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CredentialError {
    /// No admin secret is configured, so admin access is off
    AdminDisabled,
    Rejected,
    PromptFailed(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::AdminDisabled => write!(
                f,
                "Admin access is disabled. Set {} to enable it.",
                ENV_ADMIN_SECRET
            ),
            CredentialError::Rejected => write!(f, "Admin secret rejected"),
            CredentialError::PromptFailed(msg) => write!(f, "Failed to read secret: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Where the expected admin secret comes from
pub trait SecretSource {
    fn admin_secret(&self) -> Option<String>;
}

/// Reads the admin secret from `CARBON_TALLY_ADMIN_SECRET`
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn admin_secret(&self) -> Option<String> {
        get_from_env(ENV_ADMIN_SECRET)
    }
}

/// Checks a presented secret before the all-records view is shown
pub struct AdminGate {
    expected: Option<String>,
}

impl AdminGate {
    pub fn from_source(source: &dyn SecretSource) -> Self {
        Self {
            expected: source.admin_secret(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.expected.is_some()
    }

    pub fn verify(&self, attempt: &str) -> Result<(), CredentialError> {
        let expected = self.expected.as_deref().ok_or(CredentialError::AdminDisabled)?;
        if constant_time_eq(expected.as_bytes(), attempt.trim().as_bytes()) {
            Ok(())
        } else {
            Err(CredentialError::Rejected)
        }
    }
}

/// Compare without exiting early on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
