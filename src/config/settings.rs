use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_EDITOR: &str = "nvim";
const DEFAULT_PROMPT: &str = "session > ";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "kitty-zoxide-sessions",
    version,
    about = "Launch a kitty session from zoxide entries",
    after_help = "For more information about kitty sessions visit: \
                  https://sw.kovidgoyal.net/kitty/sessions/"
)]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Edit the session file instead of launching it
    #[arg(short, long, conflicts_with_all = ["delete", "delete_all"])]
    pub edit: bool,

    /// Delete a session file
    #[arg(short = 'D', long, conflicts_with = "delete_all")]
    pub delete: bool,

    /// Delete all session files
    #[arg(long)]
    pub delete_all: bool,

    /// Enable ANSI formatting in fzf
    #[arg(long)]
    pub ansi: bool,

    /// Close the launcher window after switching to the session
    #[arg(short = 'c', long)]
    pub auto_close: bool,

    /// Path to a custom kitty session template
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Optional settings from the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSettings {
    /// Path to a custom kitty session template
    pub template: Option<PathBuf>,

    /// Editor command used when $EDITOR is unset
    pub editor: Option<String>,

    /// fzf prompt for the launch picker
    pub prompt: Option<String>,
}

impl FileSettings {
    /// Load settings from the first existing config file, or use defaults
    pub fn load() -> Result<Self> {
        let default_paths = [
            dirs::config_dir().map(|p| p.join("kitty-zoxide-sessions/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/kitty-zoxide-sessions/config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                return toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", path));
            }
        }

        Ok(Self::default())
    }
}

/// Resolved runtime settings, immutable for the duration of the run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding session files and the log file
    pub session_dir: PathBuf,

    /// Template override (CLI takes precedence over the config file)
    pub template: Option<PathBuf>,

    /// Editor command for --edit
    pub editor: String,

    /// fzf prompt for the launch picker
    pub prompt: String,

    /// Window that launched this tool, for --auto-close
    pub launcher_window_id: Option<String>,

    pub ansi: bool,
    pub debug: bool,
    pub auto_close: bool,
}

impl Settings {
    /// Resolve settings from CLI flags, the config file and the environment
    pub fn resolve(cli: &Config, file: &FileSettings) -> Self {
        let editor = std::env::var("EDITOR")
            .ok()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| file.editor.clone())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        Self {
            session_dir: session_dir(),
            template: cli.template.clone().or_else(|| file.template.clone()),
            editor,
            prompt: file
                .prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            launcher_window_id: std::env::var("KITTY_WINDOW_ID")
                .ok()
                .filter(|id| !id.is_empty()),
            ansi: cli.ansi,
            debug: cli.debug,
            auto_close: cli.auto_close,
        }
    }
}

/// Session directory, honoring $XDG_DATA_HOME (default ~/.local/share)
pub fn session_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local/share")
        });
    base.join("kitty-sessions")
}
