use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed request file '{path}': {detail}")]
    RequestFile { path: String, detail: String },

    #[error("The controller closed the connection before answering")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
