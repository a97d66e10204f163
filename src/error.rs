use std::fmt;

use crate::RpcError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Simple wrapper over all I/O related errors
    IoError(std::io::Error),
    /// The server answered a `runCmds` request with a JSON-RPC error
    RpcError(RpcError),
    /// The HTTP layer returned a non-success status
    HttpError(u16, String),
    /// The response body could not be decoded as JSON
    JsonError(serde_json::Error),
    /// The response decoded fine but did not have the expected shape
    InvalidResponse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(_) => write!(f, "IO operation failed"),
            Error::RpcError(err) => {
                write!(f, "command API returned an error: {}", err.message)?;
                if let Some(detail) = err.last_detail() {
                    write!(f, ": {}", detail)?;
                }
                Ok(())
            }
            Error::HttpError(status, reason) => {
                write!(f, "command API returned HTTP {} {}", status, reason)
            }
            Error::JsonError(_) => write!(f, "failed to decode server response"),
            Error::InvalidResponse(what) => write!(f, "unexpected server response: {}", what),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    pub fn eof(err: &str) -> Self {
        Self::IoError(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}

impl From<RpcError> for Error {
    fn from(err: RpcError) -> Self {
        Error::RpcError(err)
    }
}
