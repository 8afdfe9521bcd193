use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Error decoding data: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Error reading config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Input Error: {source}")]
    Input {
        #[from]
        source: inquire::error::InquireError,
    },

    #[error("Invalid date, expected DD.MM.YYYY: {source}")]
    Date {
        #[from]
        source: chrono::ParseError,
    },

    #[error("Error rendering summary: {source}")]
    Render {
        #[from]
        source: askama::Error,
    },

    #[error("{template}: {source}")]
    Document {
        template: String,
        source: DocumentError,
    },

    #[error(
        "Contract counter is locked by another run, \
         remove {} if none is active",
        .path.display()
    )]
    CounterLocked { path: PathBuf },
}
