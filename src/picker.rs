use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Outcome of an interactive pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The line the user chose
    Picked(String),
    /// The user cancelled the picker (not an error)
    Cancelled,
}

/// Interactive picker over a list of candidate lines
pub trait Picker {
    fn pick(&self, candidates: &[String], prompt: &str) -> Result<Selection>;
}

/// Picker backed by fzf, attached to the controlling terminal
pub struct FzfPicker {
    ansi: bool,
}

impl FzfPicker {
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }
}

impl Picker for FzfPicker {
    fn pick(&self, candidates: &[String], prompt: &str) -> Result<Selection> {
        let mut args = vec!["--reverse", "--no-sort", "--prompt", prompt];
        if self.ansi {
            args.insert(0, "--ansi");
        }

        // fzf draws its UI on /dev/tty, so piping stdin/stdout is safe
        let mut child = match Command::new("fzf")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!("fzf command not found")
            }
            Err(e) => return Err(e).context("Failed to execute fzf"),
        };

        // Feed candidates from a separate thread to avoid blocking on the
        // pipe buffer while fzf is interactive.
        let mut stdin = child.stdin.take().context("Failed to open fzf stdin")?;
        let input = candidates.join("\n");
        let writer = std::thread::spawn(move || {
            let _ = stdin.write_all(input.as_bytes());
        });

        let output = child
            .wait_with_output()
            .context("Failed to wait for fzf")?;
        let _ = writer.join();

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(selection_from_output(output.status.success(), &stdout))
    }
}

/// Maps fzf's exit status and stdout to a selection.
/// Non-zero exit or empty output means the user cancelled.
pub fn selection_from_output(success: bool, stdout: &str) -> Selection {
    let line = stdout.trim();
    if !success || line.is_empty() {
        Selection::Cancelled
    } else {
        Selection::Picked(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selection_from_output_picked() {
        assert_eq!(
            selection_from_output(true, "/home/b\n"),
            Selection::Picked("/home/b".to_string())
        );
    }

    #[test]
    fn test_selection_from_output_cancelled_on_failure() {
        assert_eq!(selection_from_output(false, "/home/b\n"), Selection::Cancelled);
    }

    #[test]
    fn test_selection_from_output_cancelled_on_empty() {
        assert_eq!(selection_from_output(true, "\n"), Selection::Cancelled);
        assert_eq!(selection_from_output(true, ""), Selection::Cancelled);
    }
}
