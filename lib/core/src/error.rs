use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Data corrupt: {0}")]
    DataCorrupt(String),

    #[error("Title not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Position {position} out of range for catalog of {len} items")]
    OutOfRange { position: usize, len: usize },
}

impl Error {
    /// Startup failures: without both artifacts there is nothing to serve.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::DataUnavailable(_) | Error::DataCorrupt(_))
    }
}
