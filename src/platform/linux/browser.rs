use anyhow::{Context, Result};

use crate::utils::hidden_command;

pub fn open_url(url: &str) -> Result<()> {
    hidden_command("xdg-open")
        .arg(url)
        .spawn()
        .context("failed to launch xdg-open")?;
    Ok(())
}
