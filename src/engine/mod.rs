pub mod prober;
pub mod rate;
pub mod reader;

use crate::error::{EncodingError, ScanError};
use crate::model::{Acceptance, Config, Finding, ScanReport, Section, Target};
use crate::output::OutputSink;
use crate::registry::{CipherSuite, ProtocolVersion, Registry, TLS12};
use crate::tls::{encode, ProbeResult};
use futures::stream::{self, StreamExt};
use prober::Prober;
use rate::RateLimiter;
use std::fmt;
use std::io::Write;
use std::pin::pin;
use tracing::{debug, info, instrument, warn};

/// GREASE, the TLS 1.3 suites, then ECDHE and plain RSA fallbacks.
pub const VERSION_PROBE_SUITES: &[u16] = &[
    0x6a6a, 0x1301, 0x1302, 0x1303, 0xc02b, 0xc02f, 0xc02c, 0xc030, 0xcca9, 0xcca8, 0xc013,
    0xc014, 0x009c, 0x009d, 0x002f, 0x0035, 0x000a,
];

pub const CIPHER_SCAN_VERSION: u16 = TLS12;

pub struct Engine<'r, P> {
    cfg: Config,
    registry: Registry<'r>,
    prober: P,
    limiter: Option<RateLimiter>,
}

impl<'r, P: Prober> Engine<'r, P> {
    pub fn new(cfg: Config, registry: Registry<'r>, prober: P) -> Self {
        Self {
            limiter: cfg.rate.map(RateLimiter::new),
            cfg,
            registry,
            prober,
        }
    }

    /// Encodes one ClientHello and probes with it. Nothing is sent when the
    /// record cannot be encoded.
    pub async fn check(
        &self,
        target: &Target,
        version: u16,
        suites: &[u16],
    ) -> Result<ProbeResult, EncodingError> {
        let record = encode(version, suites)?;
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }
        Ok(self.prober.probe(target, &record).await)
    }

    pub async fn scan_versions(&self, target: &Target) -> Result<Vec<ProtocolVersion>, EncodingError> {
        let candidates = self
            .registry
            .versions
            .iter()
            .map(|v| (*v, v.code, VERSION_PROBE_SUITES.to_vec()));
        self.accepted(target, Section::Version, candidates).await
    }

    pub async fn scan_ciphers(&self, target: &Target) -> Result<Vec<CipherSuite>, EncodingError> {
        let candidates = self
            .registry
            .ciphers
            .iter()
            .map(|c| (*c, CIPHER_SCAN_VERSION, vec![c.code]));
        self.accepted(target, Section::Cipher, candidates).await
    }

    /// A target that does not resolve is reported like one that refuses every
    /// connection: banner and empty sections.
    #[instrument(skip_all, fields(host = %self.cfg.target.host, port = self.cfg.target.port))]
    pub async fn run<W: Write>(&self, sink: &mut OutputSink<W>) -> Result<ScanReport, ScanError> {
        let spec = &self.cfg.target;
        let target = match crate::input::resolve(spec).await {
            Ok(target) => {
                info!(addr = %target.resolved, scan = %self.cfg.scan, "starting scan");
                Some(target)
            }
            Err(err) => {
                warn!(error = %err, "target unreachable, nothing will be accepted");
                None
            }
        };
        sink.banner(spec)?;

        let mut report = ScanReport::default();
        if self.cfg.scan.includes_versions() {
            sink.section(Section::Version)?;
            if let Some(target) = &target {
                report.versions = self.scan_versions(target).await?;
            }
            for version in &report.versions {
                sink.finding(&Finding::version(spec, version))?;
            }
        }
        if self.cfg.scan.includes_ciphers() {
            sink.section(Section::Cipher)?;
            if let Some(target) = &target {
                report.ciphers = self.scan_ciphers(target).await?;
            }
            for suite in &report.ciphers {
                sink.finding(&Finding::cipher(spec, suite))?;
            }
        }
        sink.flush()?;

        info!(
            versions = report.versions.len(),
            ciphers = report.ciphers.len(),
            "scan complete"
        );
        Ok(report)
    }

    async fn accepted<T, I>(
        &self,
        target: &Target,
        section: Section,
        candidates: I,
    ) -> Result<Vec<T>, EncodingError>
    where
        T: fmt::Display,
        I: IntoIterator<Item = (T, u16, Vec<u16>)>,
    {
        // `buffered` yields in input order
        let mut probes = pin!(stream::iter(candidates)
            .map(|(item, version, suites)| async move {
                let result = self.check(target, version, &suites).await?;
                let accepted = self.accepts(&result, section, version, &suites);
                debug!(%item, accepted, result = %result, "probed");
                Ok::<_, EncodingError>(accepted.then_some(item))
            })
            .buffered(self.cfg.concurrency.max(1)));

        let mut accepted = Vec::new();
        while let Some(outcome) = probes.next().await {
            if let Some(item) = outcome? {
                accepted.push(item);
            }
        }
        Ok(accepted)
    }

    fn accepts(&self, result: &ProbeResult, section: Section, version: u16, suites: &[u16]) -> bool {
        match self.cfg.acceptance {
            Acceptance::Permissive => result.is_handshake(),
            Acceptance::Strict => match result {
                ProbeResult::Handshake(Some(hello)) => match section {
                    Section::Version => hello.negotiated_version() == version,
                    Section::Cipher => suites.contains(&hello.cipher_suite),
                },
                _ => false,
            },
        }
    }
}
