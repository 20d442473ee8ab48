use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Validate a kitty window id before splicing it into a match expression.
/// kitty window ids are plain integers.
fn validate_window_id(window_id: &str) -> Result<()> {
    if window_id.is_empty() || !window_id.bytes().all(|b| b.is_ascii_digit()) {
        bail!("Invalid kitty window id: {}", window_id);
    }
    Ok(())
}

/// Terminal-multiplexer control interface
pub trait Multiplexer {
    /// Switch to the session described by the file, creating it if needed
    fn goto_session(&self, session_file: &Path) -> Result<()>;

    /// Close the given window
    fn close_window(&self, window_id: &str) -> Result<()>;
}

/// Client for the kitty remote-control interface
pub struct KittyClient;

impl KittyClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KittyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplexer for KittyClient {
    fn goto_session(&self, session_file: &Path) -> Result<()> {
        let status = match Command::new("kitten")
            .args(["@", "action", "goto_session"])
            .arg(session_file)
            .status()
        {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!("kitten command not found")
            }
            Err(e) => return Err(e).context("Failed to execute kitten goto_session"),
        };

        if !status.success() {
            bail!(
                "kitten goto_session failed for {:?} (exit code {})",
                session_file,
                status.code().unwrap_or(-1)
            );
        }

        Ok(())
    }

    fn close_window(&self, window_id: &str) -> Result<()> {
        validate_window_id(window_id)?;
        let output = Command::new("kitty")
            .args(["@", "close-window", "--match"])
            .arg(format!("id:{}", window_id))
            .output()
            .context("Failed to execute kitty close-window")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("kitty close-window failed for id {}: {}", window_id, stderr);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_window_id_valid() {
        assert!(validate_window_id("1").is_ok());
        assert!(validate_window_id("42").is_ok());
        assert!(validate_window_id("007").is_ok());
    }

    #[test]
    fn test_validate_window_id_invalid() {
        assert!(validate_window_id("").is_err());
        assert!(validate_window_id("-1").is_err());
        assert!(validate_window_id("1 2").is_err());
        assert!(validate_window_id("id:1").is_err());
        assert!(validate_window_id("1; rm -rf /").is_err());
    }
}
