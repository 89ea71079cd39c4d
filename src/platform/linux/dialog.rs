//! Native dialogs through `zenity`

use anyhow::{Context, Result};

use crate::model::FeedbackSeverity;
use crate::utils::hidden_command;

/// zenity exits 1 on Cancel or when the window is closed.
fn run_zenity(args: &[&str]) -> Result<Option<String>> {
    let output = hidden_command("zenity")
        .args(args)
        .output()
        .context("failed to run zenity")?;
    match output.status.code() {
        Some(0) => Ok(Some(
            String::from_utf8_lossy(&output.stdout)
                .trim_end_matches(['\r', '\n'])
                .to_string(),
        )),
        Some(1) => Ok(None),
        _ => anyhow::bail!(
            "zenity failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ),
    }
}

pub fn ask_text(title: &str, prompt: &str, initial: &str) -> Result<Option<String>> {
    run_zenity(&[
        "--entry",
        "--title",
        title,
        "--text",
        prompt,
        "--entry-text",
        initial,
    ])
}

pub fn choose(title: &str, prompt: &str, options: &[&str]) -> Result<Option<String>> {
    let mut args = vec![
        "--list",
        "--title",
        title,
        "--text",
        prompt,
        "--column",
        "Open",
        "--height",
        "420",
    ];
    args.extend_from_slice(options);
    Ok(run_zenity(&args)?.filter(|choice| !choice.is_empty()))
}

pub fn confirm(title: &str, question: &str) -> Result<bool> {
    Ok(run_zenity(&["--question", "--title", title, "--text", question])?.is_some())
}

pub fn show_message(severity: FeedbackSeverity, title: &str, message: &str) -> Result<()> {
    let kind = match severity {
        FeedbackSeverity::Info => "--info",
        FeedbackSeverity::Warning => "--warning",
        FeedbackSeverity::Error => "--error",
    };
    run_zenity(&[kind, "--title", title, "--text", message, "--no-markup"])?;
    Ok(())
}
