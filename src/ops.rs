use anyhow::{bail, Result};
use std::io::BufRead;
use tracing::{debug, warn};

use crate::config::{Config, Settings};
use crate::editor;
use crate::kitty::Multiplexer;
use crate::picker::{Picker, Selection};
use crate::session::SessionStore;
use crate::sources::DirectorySource;

const DELETE_PROMPT: &str = "delete session > ";

/// The single action performed by one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pick a directory and switch to its session (default)
    Launch,
    /// Pick a directory and open its session file in the editor
    Edit,
    /// Pick an existing session file and delete it
    Delete,
    /// Delete every session file after confirmation
    DeleteAll,
}

impl Action {
    pub fn from_flags(cli: &Config) -> Self {
        if cli.delete_all {
            Self::DeleteAll
        } else if cli.delete {
            Self::Delete
        } else if cli.edit {
            Self::Edit
        } else {
            Self::Launch
        }
    }
}

/// The launcher pipeline, wired to its external collaborators
pub struct App<'a> {
    settings: &'a Settings,
    source: &'a dyn DirectorySource,
    picker: &'a dyn Picker,
    multiplexer: &'a dyn Multiplexer,
}

impl<'a> App<'a> {
    pub fn new(
        settings: &'a Settings,
        source: &'a dyn DirectorySource,
        picker: &'a dyn Picker,
        multiplexer: &'a dyn Multiplexer,
    ) -> Self {
        Self {
            settings,
            source,
            picker,
            multiplexer,
        }
    }

    /// Runs one action to completion and returns the process exit code
    pub fn run(&self, action: Action) -> Result<u8> {
        match action {
            Action::Launch => self.launch_or_edit(false),
            Action::Edit => self.launch_or_edit(true),
            Action::Delete => self.delete(),
            Action::DeleteAll => self.delete_all(&mut std::io::stdin().lock()),
        }
    }

    fn store(&self) -> SessionStore {
        SessionStore::new(
            self.settings.session_dir.clone(),
            self.settings.template.clone(),
        )
    }

    /// Fetch candidates, let the user pick one. `Ok(None)` means the user
    /// cancelled, which is a clean outcome, not an error.
    fn select_directory(&self) -> Result<Option<String>> {
        let candidates = self.source.query()?;
        if candidates.is_empty() {
            bail!("zoxide returned no directories");
        }

        match self.picker.pick(&candidates, &self.settings.prompt)? {
            Selection::Picked(dir) => Ok(Some(dir)),
            Selection::Cancelled => {
                debug!("No selection made");
                Ok(None)
            }
        }
    }

    fn launch_or_edit(&self, editing: bool) -> Result<u8> {
        let Some(selected_dir) = self.select_directory()? else {
            return Ok(0);
        };

        let session_file = self.store().ensure(&selected_dir)?;
        debug!("Opening {:?} editing={}", session_file, editing);

        if editing {
            let code = editor::launch(&self.settings.editor, &session_file)?;
            return Ok(code.clamp(0, 255) as u8);
        }

        self.multiplexer.goto_session(&session_file)?;

        if self.settings.auto_close {
            match &self.settings.launcher_window_id {
                Some(window_id) => {
                    // The goto already succeeded, a stuck launcher window is
                    // only a cosmetic problem
                    if let Err(e) = self.multiplexer.close_window(window_id) {
                        warn!("Failed to close launcher window {}: {:#}", window_id, e);
                    }
                }
                None => warn!("--auto-close requested but KITTY_WINDOW_ID is not set"),
            }
        }

        Ok(0)
    }

    fn delete(&self) -> Result<u8> {
        let store = self.store();
        let names = session_names(&store)?;
        if names.is_empty() {
            bail!("no session files to delete");
        }

        match self.picker.pick(&names, DELETE_PROMPT)? {
            Selection::Picked(name) => {
                store.delete(&name)?;
                println!("Deleted session: {}", name);
                Ok(0)
            }
            Selection::Cancelled => Ok(0),
        }
    }

    pub(crate) fn delete_all(&self, input: &mut dyn BufRead) -> Result<u8> {
        let store = self.store();
        let files = store.list()?;
        if files.is_empty() {
            bail!("no session files to delete");
        }

        println!("This will delete all kitty session files.");
        if !confirm_delete_all(input) {
            eprintln!("Delete all cancelled");
            return Ok(1);
        }

        let mut failed = false;
        for file in &files {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!(
                    "kitty-zoxide-sessions: failed to delete session file {:?} ({})",
                    file, e
                );
                failed = true;
            }
        }

        if failed {
            return Ok(1);
        }
        println!("Deleted all session files");
        Ok(0)
    }
}

/// Session names (file stems) for the delete picker
fn session_names(store: &SessionStore) -> Result<Vec<String>> {
    Ok(store
        .list()?
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect())
}

/// Reads one line and accepts only a literal `yes`
fn confirm_delete_all(input: &mut dyn BufRead) -> bool {
    print!("Type 'yes' to continue: ");
    use std::io::Write;
    let _ = std::io::stdout().flush();

    let mut response = String::new();
    if input.read_line(&mut response).is_err() {
        return false;
    }
    response.trim().eq_ignore_ascii_case("yes")
}
