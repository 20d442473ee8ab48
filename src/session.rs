use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension of rendered session files
pub const SESSION_EXT: &str = "kitty-session";

/// Template bundled into the binary, used when no override is readable
const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.kitty-session");

const PATH_TOKEN: &str = "@@session-path@@";
const NAME_TOKEN: &str = "@@session@@";

/// Derives a collision-free session name from an absolute directory path.
///
/// The leading separator is stripped, literal `-` is escaped as `--`, and
/// every `/` becomes `-`. The mapping is injective over absolute paths, so
/// distinct directories never share a session file.
pub fn sanitize_name(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed.replace('-', "--").replace('/', "-")
}

/// Manages the flat directory of rendered session files
pub struct SessionStore {
    dir: PathBuf,
    template_override: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(dir: PathBuf, template_override: Option<PathBuf>) -> Self {
        Self {
            dir,
            template_override,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the session file for a sanitized session name
    pub fn session_file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SESSION_EXT))
    }

    /// Ensures a session file exists for the selected directory.
    ///
    /// Creates the file from the template on first selection; an existing
    /// file is returned untouched, so re-invocation is idempotent.
    pub fn ensure(&self, selected_dir: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create session directory: {:?}", self.dir))?;

        let name = sanitize_name(selected_dir);
        let session_file = self.session_file(&name);
        if session_file.exists() {
            debug!("Reusing session file: {:?}", session_file);
            return Ok(session_file);
        }

        let data = self.render(selected_dir, &name);

        // Write-then-rename keeps a concurrent reader from seeing a partial file
        let tmp = self.dir.join(format!(".{}.{}.tmp", name, SESSION_EXT));
        fs::write(&tmp, &data)
            .with_context(|| format!("Failed to write session file: {:?}", session_file))?;
        fs::rename(&tmp, &session_file)
            .with_context(|| format!("Failed to write session file: {:?}", session_file))?;

        debug!("Created session file: {:?}", session_file);
        Ok(session_file)
    }

    /// Renders the template for a directory, substituting placeholder tokens
    fn render(&self, selected_dir: &str, name: &str) -> String {
        self.template_text()
            .replace(PATH_TOKEN, selected_dir)
            .replace(NAME_TOKEN, name)
    }

    /// Template text: the override if readable, otherwise the bundled default
    fn template_text(&self) -> String {
        if let Some(path) = &self.template_override {
            match fs::read_to_string(path) {
                Ok(text) => return text,
                Err(e) => {
                    warn!("Failed to read template file {:?} ({}), using default", path, e);
                }
            }
        }
        DEFAULT_TEMPLATE.to_string()
    }

    /// Lists existing session files, sorted by path
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read session directory: {:?}", self.dir))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == SESSION_EXT))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Deletes the session file with the given sanitized name
    pub fn delete(&self, name: &str) -> Result<()> {
        let session_file = self.session_file(name);
        fs::remove_file(&session_file)
            .with_context(|| format!("Failed to delete session file: {:?}", session_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().to_path_buf(), None)
    }

    #[test]
    fn test_sanitize_name_strips_separators() {
        assert_eq!(sanitize_name("/home/b"), "home-b");
        assert_eq!(sanitize_name("/home/user/projects"), "home-user-projects");
        assert!(!sanitize_name("/a/very/deep/path").contains('/'));
    }

    #[test]
    fn test_sanitize_name_is_collision_free() {
        // Dashes in components must not collide with separator replacement
        assert_eq!(sanitize_name("/a-b/c"), "a--b-c");
        assert_eq!(sanitize_name("/a/b-c"), "a-b--c");
        assert_ne!(sanitize_name("/a-b/c"), sanitize_name("/a/b-c"));
        assert_ne!(sanitize_name("/home/a-b"), sanitize_name("/home/a/b"));
    }

    #[test]
    fn test_ensure_creates_file_from_default_template() {
        let dir = TempDir::new().unwrap();
        let file = store(&dir).ensure("/home/b").unwrap();

        assert_eq!(file, dir.path().join("home-b.kitty-session"));
        let content = fs::read_to_string(&file).unwrap();
        assert!(content.contains("/home/b"));
        assert!(content.contains("home-b"));
        assert!(!content.contains("@@"));
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let file = store.ensure("/home/b").unwrap();
        fs::write(&file, "edited by hand\n").unwrap();

        let again = store.ensure("/home/b").unwrap();
        assert_eq!(again, file);
        assert_eq!(fs::read_to_string(&file).unwrap(), "edited by hand\n");
    }

    #[test]
    fn test_ensure_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        store(&dir).ensure("/home/b").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["home-b.kitty-session"]);
    }

    #[test]
    fn test_ensure_uses_template_override() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("custom.template");
        fs::write(&template, "cd @@session-path@@\ntitle @@session@@\n").unwrap();

        let store = SessionStore::new(dir.path().join("sessions"), Some(template));
        let file = store.ensure("/home/b").unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "cd /home/b\ntitle home-b\n"
        );
    }

    #[test]
    fn test_unreadable_override_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(
            dir.path().to_path_buf(),
            Some(PathBuf::from("/nonexistent/template")),
        );
        let file = store.ensure("/home/b").unwrap();

        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content, DEFAULT_TEMPLATE.replace("@@session-path@@", "/home/b").replace("@@session@@", "home-b"));
    }

    #[test]
    fn test_list_only_session_files_sorted() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure("/home/b").unwrap();
        store.ensure("/home/a").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let files = store.list().unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("home-a.kitty-session"),
                dir.path().join("home-b.kitty-session"),
            ]
        );
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("missing"), None);
        assert_eq!(store.list().unwrap(), Vec::<PathBuf>::new());
    }

    #[test]
    fn test_delete_removes_session_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let file = store.ensure("/home/b").unwrap();

        store.delete("home-b").unwrap();
        assert!(!file.exists());

        assert!(store.delete("home-b").is_err());
    }
}
