use anyhow::{Context, Result};

use crate::utils::hidden_command;

/// Hands the URL to the default browser without going through `cmd`, whose
/// parser would split lookup text on `&`.
pub fn open_url(url: &str) -> Result<()> {
    hidden_command("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .spawn()
        .context("failed to launch default browser")?;
    Ok(())
}
