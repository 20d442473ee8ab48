use anyhow::{bail, Context, Result};
use std::process::Command;

/// Source of candidate directories for the picker
pub trait DirectorySource {
    /// Returns candidate directories, most relevant first
    fn query(&self) -> Result<Vec<String>>;
}

/// Directory source backed by the zoxide database
pub struct ZoxideSource;

impl ZoxideSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ZoxideSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectorySource for ZoxideSource {
    fn query(&self) -> Result<Vec<String>> {
        let output = match Command::new("zoxide").args(["query", "-l"]).output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!("zoxide command not found")
            }
            Err(e) => return Err(e).context("Failed to execute zoxide query"),
        };

        if !output.status.success() {
            bail!(
                "zoxide query failed (exit code {})",
                output.status.code().unwrap_or(-1)
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_paths(&stdout))
    }
}

/// Parses newline-separated paths, dropping empty lines
pub fn parse_paths(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
