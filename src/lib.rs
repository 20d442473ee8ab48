pub mod config;
pub mod editor;
pub mod kitty;
pub mod ops;
pub mod picker;
pub mod session;
pub mod sources;
