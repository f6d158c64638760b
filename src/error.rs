use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid timer settings (work: {work:?}, break: {brk:?}): expected positive whole minutes")]
    InvalidConfiguration { work: String, brk: String },

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Config Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
