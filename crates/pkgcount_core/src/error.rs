use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid count range: {0}")]
    InvalidRange(String),

    #[error("bad regular expression ['{pattern}']: {source}")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("failed to read '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("walking directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("no go.mod file found in {} or any parent directory", .0.display())]
    ModuleNotFound(PathBuf),

    #[error("go.mod at {} has no module directive", .0.display())]
    MissingModuleDirective(PathBuf),

    #[error("counting imports failed: {0}")]
    Aggregation(#[source] Box<Error>),

    #[error("run cancelled before all files were scanned")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
