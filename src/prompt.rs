use anyhow::{Context, Result, bail};

/// Ask for a base32 secret without echoing it to the terminal.
pub fn prompt_secret(prompt: &str) -> Result<String> {
    let secret = rpassword::prompt_password(prompt).context("cannot read secret from terminal")?;
    let secret = secret.trim().to_string();
    if secret.is_empty() {
        bail!("secret cannot be empty");
    }
    Ok(secret)
}
