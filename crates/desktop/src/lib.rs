//! `equiptrack-desktop`
//!
//! Console front end for the inventory store:
//! - configuration from the environment
//! - SQLite-backed persistence
//! - a line-oriented presenter and command shell

pub mod app;
pub mod config;
pub mod console;
pub mod shell;

pub use app::{App, bootstrap};
pub use config::DesktopConfig;
pub use console::ConsolePresenter;
