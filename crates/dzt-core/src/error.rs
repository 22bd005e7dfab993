use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config.cpp not found in mod path: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("invalid vehicle spec: {}", .0.join(" "))]
    MalformedSpec(Vec<String>),
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
