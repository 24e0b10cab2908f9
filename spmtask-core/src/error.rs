//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

use crate::package::ParseError;
use crate::process::ProcessError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Invalid describe output: {0}")]
    Parse(#[from] ParseError),

    #[error("Watcher error for {path}: {message}")]
    Watcher { path: PathBuf, message: String },

    #[error("Language server error: {0}")]
    Server(String),

    #[error("Session already stopped")]
    SessionStopped,
}

pub type Result<T> = std::result::Result<T, Error>;
