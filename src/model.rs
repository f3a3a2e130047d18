use crate::registry::{CipherSuite, ProtocolVersion};
use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_BYTES: usize = 4096;

#[derive(Debug, Clone)]
pub struct TargetSpec {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Target {
    pub original: TargetSpec,
    pub resolved: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target: TargetSpec,
    pub scan: ScanKind,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_bytes: usize,
    pub concurrency: usize,
    pub rate: Option<u32>,
    pub acceptance: Acceptance,
    pub output: OutputConfig,
}

impl Config {
    /// Sequential, permissive scan of both tables with default timeouts.
    pub fn for_target(host: impl Into<String>, port: u16) -> Self {
        Self {
            target: TargetSpec {
                host: host.into(),
                port,
            },
            scan: ScanKind::All,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_bytes: DEFAULT_MAX_BYTES,
            concurrency: 1,
            rate: None,
            acceptance: Acceptance::Permissive,
            output: OutputConfig {
                format: OutputFormat::Pretty,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ScanKind {
    Versions,
    Ciphers,
    All,
}

impl ScanKind {
    pub fn includes_versions(self) -> bool {
        matches!(self, ScanKind::Versions | ScanKind::All)
    }

    pub fn includes_ciphers(self) -> bool {
        matches!(self, ScanKind::Ciphers | ScanKind::All)
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanKind::Versions => write!(f, "versions"),
            ScanKind::Ciphers => write!(f, "ciphers"),
            ScanKind::All => write!(f, "all"),
        }
    }
}

/// How much of a handshake response counts as acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Permissive,
    Strict,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Jsonl,
    Pretty,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jsonl => write!(f, "jsonl"),
            OutputFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Version,
    Cipher,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub host: String,
    pub port: u16,
    pub scan: Section,
    pub code: String,
    pub name: String,
}

impl Finding {
    pub fn version(target: &TargetSpec, version: &ProtocolVersion) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            scan: Section::Version,
            code: format!("0x{:04X}", version.code),
            name: version.label.to_string(),
        }
    }

    pub fn cipher(target: &TargetSpec, suite: &CipherSuite) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            scan: Section::Cipher,
            code: format!("0x{:04X}", suite.code),
            name: suite.name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub versions: Vec<ProtocolVersion>,
    pub ciphers: Vec<CipherSuite>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_serializes_as_flat_record() {
        let spec = TargetSpec {
            host: "example".into(),
            port: 443,
        };
        let finding = Finding::version(&spec, &ProtocolVersion::new(0x0303, "Tls12"));
        let json = serde_json::to_string(&finding).unwrap();
        assert_eq!(
            json,
            r#"{"host":"example","port":443,"scan":"version","code":"0x0303","name":"Tls12"}"#
        );
    }

    #[test]
    fn scan_kind_selects_sections() {
        assert!(ScanKind::All.includes_versions() && ScanKind::All.includes_ciphers());
        assert!(!ScanKind::Versions.includes_ciphers());
        assert!(!ScanKind::Ciphers.includes_versions());
    }
}
