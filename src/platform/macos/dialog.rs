//! Native dialogs through `osascript`

use anyhow::{Context, Result};

use crate::model::FeedbackSeverity;
use crate::utils::{applescript_quote, hidden_command};

/// Runs an AppleScript and returns trimmed stdout, or `None` when the user
/// pressed Cancel (osascript exits non-zero with error -128).
fn run_script(script: &str) -> Result<Option<String>> {
    let output = hidden_command("osascript")
        .args(["-e", script])
        .output()
        .context("failed to run osascript")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("-128") {
            return Ok(None);
        }
        anyhow::bail!("osascript failed: {}", stderr.trim());
    }
    Ok(Some(
        String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\r', '\n'])
            .to_string(),
    ))
}

pub fn ask_text(title: &str, prompt: &str, initial: &str) -> Result<Option<String>> {
    let script = format!(
        "text returned of (display dialog {} with title {} default answer {})",
        applescript_quote(prompt),
        applescript_quote(title),
        applescript_quote(initial)
    );
    run_script(&script)
}

pub fn choose(title: &str, prompt: &str, options: &[&str]) -> Result<Option<String>> {
    let items = options
        .iter()
        .map(|o| applescript_quote(o))
        .collect::<Vec<_>>()
        .join(", ");
    let script = format!(
        "choose from list {{{}}} with title {} with prompt {}",
        items,
        applescript_quote(title),
        applescript_quote(prompt)
    );
    // `choose from list` answers "false" instead of raising on Cancel
    Ok(run_script(&script)?.filter(|choice| choice != "false"))
}

pub fn confirm(title: &str, question: &str) -> Result<bool> {
    let script = format!(
        "button returned of (display dialog {} with title {} buttons {{\"No\", \"Yes\"}} default button \"Yes\")",
        applescript_quote(question),
        applescript_quote(title)
    );
    Ok(run_script(&script)?.is_some_and(|button| button == "Yes"))
}

pub fn show_message(severity: FeedbackSeverity, title: &str, message: &str) -> Result<()> {
    let icon = match severity {
        FeedbackSeverity::Info => "note",
        FeedbackSeverity::Warning => "caution",
        FeedbackSeverity::Error => "stop",
    };
    let script = format!(
        "display dialog {} with title {} buttons {{\"OK\"}} default button \"OK\" with icon {}",
        applescript_quote(message),
        applescript_quote(title),
        icon
    );
    run_script(&script)?;
    Ok(())
}
