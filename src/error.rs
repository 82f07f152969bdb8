use std::path::PathBuf;
use thiserror::Error;

/// Failures of the command line tools. Parsing itself cannot fail; these
/// cover getting the text in and the report out.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not read from stdin: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("No input data received")]
    NoInput,
    #[error("Bad argument: {0}")]
    Argument(String),
    #[error("Could not write JSON: {0}")]
    Json(#[from] serde_json::Error),
}
