use super::reader::ResponseReader;
use crate::error::ConnectionError;
use crate::model::{Config, Target};
use crate::tls::{classify, ProbeResult};
use crate::util::{hex, now_millis};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Transport problems are folded into [`ProbeResult::ConnectionError`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &Target, record: &[u8]) -> ProbeResult;
}

#[async_trait]
impl<P: Prober + ?Sized> Prober for &P {
    async fn probe(&self, target: &Target, record: &[u8]) -> ProbeResult {
        (**self).probe(target, record).await
    }
}

/// A fresh TCP connection per probe, dropped on every exit path.
pub struct TcpProber {
    connect_timeout: Duration,
    write_timeout: Duration,
    reader: ResponseReader,
}

impl TcpProber {
    pub fn new(cfg: &Config) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout,
            write_timeout: cfg.read_timeout,
            reader: ResponseReader::new(cfg.max_bytes, cfg.read_timeout),
        }
    }

    async fn exchange(&self, target: &Target, record: &[u8]) -> Result<Vec<u8>, ConnectionError> {
        let mut stream = match timeout(self.connect_timeout, TcpStream::connect(target.resolved)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(ConnectionError::Connect(err)),
            Err(_) => return Err(ConnectionError::ConnectTimeout(self.connect_timeout)),
        };

        match timeout(self.write_timeout, stream.write_all(record)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(ConnectionError::Write(err)),
            Err(_) => return Err(ConnectionError::WriteTimeout(self.write_timeout)),
        }

        let result = self.reader.read(&mut stream).await?;
        debug!(
            target = %target.resolved,
            bytes = result.bytes.len(),
            reason = ?result.reason,
            head = %hex::preview(&result.bytes, 8),
            "read response"
        );
        Ok(result.bytes)
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: &Target, record: &[u8]) -> ProbeResult {
        let start = now_millis();
        let result = match self.exchange(target, record).await {
            Ok(bytes) => classify(&bytes),
            Err(err) => {
                debug!(target = %target.resolved, stage = err.stage(), error = %err, "probe failed");
                ProbeResult::ConnectionError(err)
            }
        };
        debug!(target = %target.resolved, ms = now_millis() - start, result = %result, "probe finished");
        result
    }
}
