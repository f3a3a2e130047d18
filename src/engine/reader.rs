use crate::error::ConnectionError;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStopReason {
    ConnectionClosed,
    Received,
    SizeLimit,
}

#[derive(Debug, Clone)]
pub struct ReadResult {
    pub bytes: Vec<u8>,
    pub reason: ReadStopReason,
}

/// Records split across segments are not reassembled.
pub struct ResponseReader {
    max_bytes: usize,
    read_timeout: Duration,
}

impl ResponseReader {
    pub fn new(max_bytes: usize, read_timeout: Duration) -> Self {
        Self {
            max_bytes: max_bytes.max(1),
            read_timeout,
        }
    }

    pub async fn read<T: AsyncReadExt + Unpin>(
        &self,
        stream: &mut T,
    ) -> Result<ReadResult, ConnectionError> {
        let mut buf = vec![0u8; self.max_bytes];
        let n = match timeout(self.read_timeout, stream.read(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(err)) => return Err(ConnectionError::Read(err)),
            Err(_) => return Err(ConnectionError::ReadTimeout(self.read_timeout)),
        };
        buf.truncate(n);
        let reason = if n == 0 {
            ReadStopReason::ConnectionClosed
        } else if n >= self.max_bytes {
            ReadStopReason::SizeLimit
        } else {
            ReadStopReason::Received
        };
        Ok(ReadResult { bytes: buf, reason })
    }
}
