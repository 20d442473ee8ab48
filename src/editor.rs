use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Opens the session file in the editor as a foreground process and returns
/// the editor's exit code. The editor string may carry arguments
/// (e.g. `EDITOR="code --wait"`), split with shell word rules.
pub fn launch(editor: &str, session_file: &Path) -> Result<i32> {
    let parts = shell_words::split(editor)
        .with_context(|| format!("Failed to parse editor command: {:?}", editor))?;
    let Some((program, args)) = parts.split_first() else {
        bail!("Editor command is empty");
    };

    let status = match Command::new(program).args(args).arg(session_file).status() {
        Ok(status) => status,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!("editor '{}' not found", program)
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to execute editor: {}", program)),
    };

    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_launch_returns_editor_exit_code() {
        // `true` ignores its file argument and exits 0
        let code = launch("true", Path::new("/dev/null")).unwrap();
        assert_eq!(code, 0);

        let code = launch("false", Path::new("/dev/null")).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_launch_splits_editor_arguments() {
        // `sh -c 'exit 3' <file>` binds the file to $0 and exits 3
        let code = launch("sh -c 'exit 3'", Path::new("/dev/null")).unwrap();
        assert_eq!(code, 3);
    }

    #[test]
    fn test_launch_missing_editor_is_an_error() {
        let err = launch("definitely-not-an-editor-xyz", Path::new("/dev/null")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_launch_empty_editor_is_an_error() {
        assert!(launch("", Path::new("/dev/null")).is_err());
    }
}
