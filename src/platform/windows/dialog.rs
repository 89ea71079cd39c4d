//! Native dialogs using PowerShell and WinForms

use anyhow::{Context, Result};

use crate::model::FeedbackSeverity;
use crate::utils::{hidden_command, powershell_quote};

const PRELUDE: &str = r#"
$ErrorActionPreference = 'Stop'
[Console]::OutputEncoding = [System.Text.Encoding]::UTF8
Add-Type -AssemblyName System.Windows.Forms
Add-Type -AssemblyName System.Drawing
[System.Windows.Forms.Application]::EnableVisualStyles()
"#;

/// Exit code the scripts use for Cancel. A terminating error under
/// `$ErrorActionPreference = 'Stop'` exits with 1, so Cancel must differ.
const CANCELLED: i32 = 2;

fn run_script(body: &str) -> Result<Option<String>> {
    let script = format!("{}{}", PRELUDE, body);
    let output = hidden_command("powershell")
        .args(["-NoProfile", "-NonInteractive", "-STA", "-Command", &script])
        .output()
        .context("failed to run powershell")?;
    match output.status.code() {
        Some(0) => Ok(Some(String::from_utf8_lossy(&output.stdout).to_string())),
        Some(CANCELLED) => Ok(None),
        _ => anyhow::bail!(
            "powershell dialog failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ),
    }
}

fn dialog_form(title: &str, height: u32) -> String {
    format!(
        r#"
$form = New-Object System.Windows.Forms.Form
$form.Text = {title}
$form.ClientSize = New-Object System.Drawing.Size(360, {height})
$form.StartPosition = 'CenterScreen'
$form.FormBorderStyle = 'FixedDialog'
$form.MaximizeBox = $false
$form.MinimizeBox = $false
$form.TopMost = $true
$ok = New-Object System.Windows.Forms.Button
$ok.Text = 'OK'
$ok.DialogResult = 'OK'
$ok.Location = New-Object System.Drawing.Point(190, ({height} - 35))
$cancel = New-Object System.Windows.Forms.Button
$cancel.Text = 'Cancel'
$cancel.DialogResult = 'Cancel'
$cancel.Location = New-Object System.Drawing.Point(275, ({height} - 35))
$form.AcceptButton = $ok
$form.CancelButton = $cancel
$label = New-Object System.Windows.Forms.Label
$label.AutoSize = $true
$label.Location = New-Object System.Drawing.Point(10, 10)
$form.Controls.AddRange(@($ok, $cancel, $label))
"#,
        title = powershell_quote(title),
        height = height
    )
}

pub fn ask_text(title: &str, prompt: &str, initial: &str) -> Result<Option<String>> {
    run_script(&ask_text_script(title, prompt, initial))
}

fn ask_text_script(title: &str, prompt: &str, initial: &str) -> String {
    format!(
        r#"{form}
$label.Text = {prompt}
$box = New-Object System.Windows.Forms.TextBox
$box.Text = {initial}
$box.Location = New-Object System.Drawing.Point(10, 35)
$box.Width = 340
$form.Controls.Add($box)
$form.Add_Shown({{ $box.Select(); $form.Activate() }})
if ($form.ShowDialog() -eq 'OK') {{ [Console]::Out.Write($box.Text); exit 0 }} else {{ exit {cancelled} }}
"#,
        form = dialog_form(title, 110),
        prompt = powershell_quote(prompt),
        initial = powershell_quote(initial),
        cancelled = CANCELLED
    )
}

pub fn choose(title: &str, prompt: &str, options: &[&str]) -> Result<Option<String>> {
    run_script(&choose_script(title, prompt, options))
}

fn choose_script(title: &str, prompt: &str, options: &[&str]) -> String {
    let items = options
        .iter()
        .map(|o| powershell_quote(o))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"{form}
$label.Text = {prompt}
$list = New-Object System.Windows.Forms.ListBox
$list.Location = New-Object System.Drawing.Point(10, 35)
$list.Size = New-Object System.Drawing.Size(340, 200)
[void]$list.Items.AddRange(@({items}))
$list.SelectedIndex = 0
$list.Add_DoubleClick({{ $form.DialogResult = 'OK'; $form.Close() }})
$form.Controls.Add($list)
$form.Add_Shown({{ $list.Select(); $form.Activate() }})
if ($form.ShowDialog() -eq 'OK' -and $list.SelectedItem) {{ [Console]::Out.Write($list.SelectedItem); exit 0 }} else {{ exit {cancelled} }}
"#,
        form = dialog_form(title, 280),
        prompt = powershell_quote(prompt),
        items = items,
        cancelled = CANCELLED
    )
}

pub fn confirm(title: &str, question: &str) -> Result<bool> {
    let body = format!(
        "$r = [System.Windows.Forms.MessageBox]::Show({}, {}, 'YesNo', 'Question')\n[Console]::Out.Write($r)\n",
        powershell_quote(question),
        powershell_quote(title)
    );
    Ok(run_script(&body)?.is_some_and(|answer| answer.trim() == "Yes"))
}

pub fn show_message(severity: FeedbackSeverity, title: &str, message: &str) -> Result<()> {
    let icon = match severity {
        FeedbackSeverity::Info => "Information",
        FeedbackSeverity::Warning => "Warning",
        FeedbackSeverity::Error => "Error",
    };
    let body = format!(
        "[void][System.Windows.Forms.MessageBox]::Show({}, {}, 'OK', '{}')\n",
        powershell_quote(message),
        powershell_quote(title),
        icon
    );
    run_script(&body)?;
    Ok(())
}
