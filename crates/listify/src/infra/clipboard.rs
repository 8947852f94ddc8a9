//! Clipboard integration utilities.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// Cross-platform clipboard helper with fallbacks for headless environments.
pub struct Clipboard {
    primary: Option<arboard::Clipboard>,
}

impl Clipboard {
    /// Attempt to initialize the system clipboard. When unavailable we fall back to shell-based
    /// clipboard utilities.
    pub fn new() -> Self {
        let primary = arboard::Clipboard::new().ok();
        if primary.is_none() {
            tracing::debug!("system clipboard unavailable, using command fallbacks");
        }
        Self { primary }
    }

    /// Write rendered output to the clipboard, trying shell commands when the system
    /// clipboard rejects it.
    pub fn copy(&mut self, text: &str) -> Result<()> {
        if let Some(primary) = self.primary.as_mut() {
            match primary.set_text(text.to_owned()) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    tracing::debug!(error = %err, "clipboard write failed, trying fallbacks")
                }
            }
        }

        self.primary = None;
        first_working_command(COPY_COMMANDS, "write to", |command| {
            try_command_copy(command, text)
        })
    }

    /// Read the clipboard's text contents, used as the selection when no file is given.
    pub fn paste(&mut self) -> Result<String> {
        if let Some(primary) = self.primary.as_mut() {
            match primary.get_text() {
                Ok(text) => return Ok(text),
                Err(err) => {
                    tracing::debug!(error = %err, "clipboard read failed, trying fallbacks")
                }
            }
        }

        self.primary = None;
        first_working_command(PASTE_COMMANDS, "read from", try_command_paste)
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `attempt` against each command in turn until one succeeds.
fn first_working_command<T>(
    commands: &[&[&str]],
    action: &str,
    mut attempt: impl FnMut(&[&str]) -> Result<T>,
) -> Result<T> {
    for &command in commands {
        match attempt(command) {
            Ok(value) => return Ok(value),
            Err(err) => tracing::debug!(error = %err, ?command, "clipboard command failed"),
        }
    }

    Err(anyhow!("failed to {action} clipboard using available backends"))
}

fn try_command_copy(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("clipboard command missing program")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn clipboard command: {program}"))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .context("failed to write clipboard contents")?;
    }

    let status = child
        .wait()
        .with_context(|| format!("clipboard command did not exit cleanly: {program}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("clipboard command exited with status {status}"))
    }
}

fn try_command_paste(command: &[&str]) -> Result<String> {
    let (program, args) = command
        .split_first()
        .context("clipboard command missing program")?;

    let output = Command::new(program)
        .args(args)
        .stderr(Stdio::null())
        .output()
        .with_context(|| format!("failed to run clipboard command: {program}"))?;

    if !output.status.success() {
        return Err(anyhow!(
            "clipboard command exited with status {}",
            output.status
        ));
    }
    String::from_utf8(output.stdout).context("clipboard contents are not valid UTF-8")
}

#[cfg(target_os = "macos")]
const COPY_COMMANDS: &[&[&str]] = &[&["pbcopy"]];
#[cfg(target_os = "macos")]
const PASTE_COMMANDS: &[&[&str]] = &[&["pbpaste"]];

#[cfg(all(unix, not(target_os = "macos")))]
const COPY_COMMANDS: &[&[&str]] = &[&["xclip", "-selection", "clipboard"], &["wl-copy"]];
#[cfg(all(unix, not(target_os = "macos")))]
const PASTE_COMMANDS: &[&[&str]] = &[
    &["xclip", "-selection", "clipboard", "-o"],
    &["wl-paste", "--no-newline"],
];

#[cfg(target_os = "windows")]
const COPY_COMMANDS: &[&[&str]] =
    &[&["powershell.exe", "-NoProfile", "-Command", "Set-Clipboard"]];
#[cfg(target_os = "windows")]
const PASTE_COMMANDS: &[&[&str]] =
    &[&["powershell.exe", "-NoProfile", "-Command", "Get-Clipboard"]];

#[cfg(not(any(unix, target_os = "windows")))]
const COPY_COMMANDS: &[&[&str]] = &[];
#[cfg(not(any(unix, target_os = "windows")))]
const PASTE_COMMANDS: &[&[&str]] = &[];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_working_command_skips_failures() {
        let commands: &[&[&str]] = &[&["broken"], &["works", "--flag"], &["unused"]];
        let mut tried = Vec::new();
        let result = first_working_command(
            commands,
            "read from",
            |command| {
                tried.push(command[0].to_owned());
                match command[0] {
                    "works" => Ok(command.len()),
                    other => Err(anyhow!("{other} unavailable")),
                }
            },
        );

        assert_eq!(result.unwrap(), 2);
        assert_eq!(tried, ["broken", "works"]);
    }

    #[test]
    fn first_working_command_reports_exhausted_backends() {
        let err = first_working_command(&[&["missing"]], "write to", |_| {
            Err::<(), _>(anyhow!("not installed"))
        })
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to write to clipboard using available backends"
        );
    }
}
