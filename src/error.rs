use std::io;
use std::time::Duration;
use thiserror::Error;

/// A ClientHello could not be laid out within the fixed record size.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("cipher suite list is empty")]
    EmptyCipherList,

    #[error("{count} cipher suites do not fit in the record (max {max})")]
    CipherListTooLarge { count: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("no address found for {0}")]
    NoAddress(String),

    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    #[error("connect timeout after {0:?}")]
    ConnectTimeout(Duration),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    #[error("write timeout after {0:?}")]
    WriteTimeout(Duration),

    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("read timeout after {0:?}")]
    ReadTimeout(Duration),

    #[error("connection closed without a response")]
    Closed,
}

impl ConnectionError {
    pub fn stage(&self) -> &'static str {
        match self {
            ConnectionError::Resolve { .. } | ConnectionError::NoAddress(_) => "resolve",
            ConnectionError::Connect(_) | ConnectionError::ConnectTimeout(_) => "connect",
            ConnectionError::Write(_) | ConnectionError::WriteTimeout(_) => "write",
            ConnectionError::Read(_) | ConnectionError::ReadTimeout(_) | ConnectionError::Closed => {
                "read"
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("concurrency must be greater than zero")]
    ZeroConcurrency,

    #[error("rate must be greater than zero")]
    ZeroRate,

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Failures that stop a whole run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}
