use crate::error::UsageError;
use crate::model::{
    Acceptance, Config, OutputConfig, OutputFormat, ScanKind, TargetSpec, DEFAULT_MAX_BYTES,
};
use clap::{ArgAction, Parser};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about = "Probe which TLS versions and cipher suites a server accepts", long_about = None)]
pub struct Cli {
    /// Host to probe
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Port to probe
    #[arg(value_name = "PORT")]
    pub port: u16,

    /// Which tables to enumerate
    #[arg(long = "scan", value_enum, default_value_t = ScanKind::All)]
    pub scan: ScanKind,

    /// Connect timeout in milliseconds
    #[arg(long = "connect-timeout", default_value_t = 5000)]
    pub connect_timeout_ms: u64,

    /// Read timeout in milliseconds
    #[arg(long = "read-timeout", default_value_t = 3000)]
    pub read_timeout_ms: u64,

    /// Max bytes to read from each response
    #[arg(long = "max-bytes", default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: usize,

    /// Probes in flight at once
    #[arg(long = "concurrency", default_value_t = 1)]
    pub concurrency: usize,

    /// New connections per second (token bucket fill rate)
    #[arg(long = "rate", value_name = "PER_SEC")]
    pub rate: Option<u32>,

    /// Only accept a ServerHello that echoes the probed version or an offered suite
    #[arg(long = "strict", action = ArgAction::SetTrue)]
    pub strict: bool,

    /// Output format
    #[arg(long = "output", value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

impl Cli {
    pub fn into_config(self) -> Result<Config, UsageError> {
        if self.concurrency == 0 {
            return Err(UsageError::ZeroConcurrency);
        }
        if self.rate == Some(0) {
            return Err(UsageError::ZeroRate);
        }
        if self.connect_timeout_ms == 0 {
            return Err(UsageError::ZeroValue("connect-timeout"));
        }
        if self.read_timeout_ms == 0 {
            return Err(UsageError::ZeroValue("read-timeout"));
        }
        if self.max_bytes == 0 {
            return Err(UsageError::ZeroValue("max-bytes"));
        }

        Ok(Config {
            target: TargetSpec {
                host: self.host,
                port: self.port,
            },
            scan: self.scan,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            max_bytes: self.max_bytes,
            concurrency: self.concurrency,
            rate: self.rate,
            acceptance: if self.strict {
                Acceptance::Strict
            } else {
                Acceptance::Permissive
            },
            output: OutputConfig {
                format: self.output,
            },
        })
    }
}
