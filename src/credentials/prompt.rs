use anyhow::{Context, Result};

use super::{get_from_env, CredentialError, ENV_SUPABASE_KEY};

/// Prompts for the Supabase API key without echoing it
pub fn prompt_for_api_key() -> Result<String> {
    eprintln!("Supabase API key required ({} is not set).", ENV_SUPABASE_KEY);
    eprintln!("Find it under Project Settings -> API in the Supabase dashboard.");

    let key = rpassword::prompt_password("Enter API key: ")
        .context("Failed to read API key from terminal")?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Ok(key.to_string())
}

/// API key from the environment, falling back to a hidden prompt
pub fn supabase_key(verbose: bool) -> Result<String> {
    match get_from_env(ENV_SUPABASE_KEY) {
        Some(key) => {
            if verbose {
                eprintln!("API key read from {}", ENV_SUPABASE_KEY);
            }
            Ok(key)
        }
        None => prompt_for_api_key(),
    }
}

/// Prompts for the admin secret without echoing it
pub fn prompt_for_admin_secret() -> Result<String, CredentialError> {
    rpassword::prompt_password("Admin secret: ")
        .map_err(|e| CredentialError::PromptFailed(e.to_string()))
}
