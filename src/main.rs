use anyhow::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kitty_zoxide_sessions::config::{Config, FileSettings, Settings};
use kitty_zoxide_sessions::kitty::KittyClient;
use kitty_zoxide_sessions::ops::{Action, App};
use kitty_zoxide_sessions::picker::FzfPicker;
use kitty_zoxide_sessions::sources::ZoxideSource;

const LOG_FILE: &str = "kitty-zoxide-sessions.log";

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Config::parse_args();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("kitty-zoxide-sessions: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Config) -> Result<u8> {
    // Load settings
    let file_settings = FileSettings::load()?;
    let settings = Settings::resolve(cli, &file_settings);

    // Setup logging
    setup_logging(&settings.session_dir, settings.debug);

    // Run the pipeline
    let source = ZoxideSource::new();
    let picker = FzfPicker::new(settings.ansi);
    let multiplexer = KittyClient::new();

    let app = App::new(&settings, &source, &picker, &multiplexer);
    app.run(Action::from_flags(cli))
}

/// Logs to an append-only file in the session directory. With --debug the
/// filter is `debug`, otherwise only errors reach the file. Failure to open
/// the log file disables logging but never the run itself.
fn setup_logging(session_dir: &Path, debug: bool) {
    let filter = if debug {
        EnvFilter::new("kitty_zoxide_sessions=debug")
    } else {
        EnvFilter::new("kitty_zoxide_sessions=error")
    };

    if std::fs::create_dir_all(session_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(session_dir.join(LOG_FILE))
    else {
        return;
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();
}
