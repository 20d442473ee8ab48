mod settings;

pub use settings::{Config, FileSettings, Settings};
