use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tls_check::engine::prober::Prober;
use tls_check::engine::Engine;
use tls_check::error::{ConnectionError, EncodingError};
use tls_check::model::{Acceptance, Config, OutputConfig, OutputFormat, ScanKind, Target, TargetSpec};
use tls_check::output::OutputSink;
use tls_check::registry::{CipherSuite, ProtocolVersion, Registry, TLS12};
use tls_check::tls::{ProbeResult, ServerHello};

const CIPHER_LIST_OFFSET: usize = 76;
const CLIENT_VERSION_OFFSET: usize = 9;

fn offered_suites(record: &[u8]) -> Vec<u16> {
    let len = u16::from_be_bytes([record[CIPHER_LIST_OFFSET], record[CIPHER_LIST_OFFSET + 1]]) as usize;
    record[CIPHER_LIST_OFFSET + 2..CIPHER_LIST_OFFSET + 2 + len]
        .chunks(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect()
}

fn client_version(record: &[u8]) -> u16 {
    u16::from_be_bytes([record[CLIENT_VERSION_OFFSET], record[CLIENT_VERSION_OFFSET + 1]])
}

fn handshake() -> ProbeResult {
    ProbeResult::Handshake(None)
}

fn alert() -> ProbeResult {
    ProbeResult::Alert(None)
}

fn local_target() -> Target {
    Target {
        original: TargetSpec {
            host: "127.0.0.1".into(),
            port: 443,
        },
        resolved: ([127, 0, 0, 1], 443).into(),
    }
}

/// Answers with a handshake only for TLS 1.2 probes or offers containing
/// one specific suite, and counts every call.
struct StubServer {
    version: u16,
    suite: u16,
    calls: AtomicUsize,
}

impl StubServer {
    fn new(version: u16, suite: u16) -> Self {
        Self {
            version,
            suite,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for StubServer {
    async fn probe(&self, _target: &Target, record: &[u8]) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let suites = offered_suites(record);
        let is_cipher_probe = suites.len() == 1;
        let accepted = if is_cipher_probe {
            suites[0] == self.suite
        } else {
            client_version(record) == self.version
        };
        if accepted {
            handshake()
        } else {
            alert()
        }
    }
}

#[tokio::test]
async fn cipher_scan_reports_only_accepted_suite() {
    static CIPHERS: [CipherSuite; 1] = [CipherSuite::new(0x002f, "TLS_RSA_WITH_AES_128_CBC_SHA")];
    let registry = Registry::new(&[], &CIPHERS);
    let stub = StubServer::new(TLS12, 0x002f);
    let engine = Engine::new(Config::for_target("127.0.0.1", 443), registry, &stub);

    let accepted = engine.scan_ciphers(&local_target()).await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].name, "TLS_RSA_WITH_AES_128_CBC_SHA");
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn version_scan_reports_only_accepted_version() {
    static VERSIONS: [ProtocolVersion; 2] =
        [ProtocolVersion::new(0x0300, "Ssl30"), ProtocolVersion::new(0x0303, "Tls12")];
    let registry = Registry::new(&VERSIONS, &[]);
    let stub = StubServer::new(0x0303, 0x002f);
    let engine = Engine::new(Config::for_target("127.0.0.1", 443), registry, &stub);

    let accepted = engine.scan_versions(&local_target()).await.unwrap();
    let labels: Vec<&str> = accepted.iter().map(|v| v.label).collect();
    assert_eq!(labels, ["Tls12"]);
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn oversized_offer_never_reaches_the_network() {
    let stub = StubServer::new(TLS12, 0x002f);
    let engine = Engine::new(Config::for_target("127.0.0.1", 443), Registry::builtin(), &stub);
    let suites: Vec<u16> = (1..=130).collect();

    let err = engine.check(&local_target(), TLS12, &suites).await.unwrap_err();
    assert_eq!(err, EncodingError::CipherListTooLarge { count: 130, max: 129 });

    let err = engine.check(&local_target(), TLS12, &[]).await.unwrap_err();
    assert_eq!(err, EncodingError::EmptyCipherList);
    assert_eq!(stub.calls(), 0);
}

/// Accepts every probe but answers later entries first.
struct ReversedLatency;

#[async_trait]
impl Prober for ReversedLatency {
    async fn probe(&self, _target: &Target, record: &[u8]) -> ProbeResult {
        let code = offered_suites(record)[0];
        tokio::time::sleep(Duration::from_millis(40u64.saturating_sub(code as u64 * 10))).await;
        handshake()
    }
}

#[tokio::test]
async fn concurrent_scan_keeps_registry_order() {
    static CIPHERS: [CipherSuite; 4] = [
        CipherSuite::new(0x0001, "TLS_RSA_WITH_NULL_MD5"),
        CipherSuite::new(0x0002, "TLS_RSA_WITH_NULL_SHA"),
        CipherSuite::new(0x0003, "TLS_RSA_EXPORT_WITH_RC4_40_MD5"),
        CipherSuite::new(0x0004, "TLS_RSA_WITH_RC4_128_MD5"),
    ];
    let mut cfg = Config::for_target("127.0.0.1", 443);
    cfg.concurrency = 4;
    let engine = Engine::new(cfg, Registry::new(&[], &CIPHERS), ReversedLatency);

    let accepted = engine.scan_ciphers(&local_target()).await.unwrap();
    let codes: Vec<u16> = accepted.iter().map(|c| c.code).collect();
    assert_eq!(codes, [0x0001, 0x0002, 0x0003, 0x0004]);
}

/// Always negotiates TLS 1.2 with AES128-SHA, whatever was offered.
struct FixedChoice;

#[async_trait]
impl Prober for FixedChoice {
    async fn probe(&self, _target: &Target, _record: &[u8]) -> ProbeResult {
        ProbeResult::Handshake(Some(ServerHello {
            record_version: 0x0303,
            legacy_version: 0x0303,
            cipher_suite: 0x002f,
            selected_version: None,
        }))
    }
}

#[tokio::test]
async fn strict_mode_checks_the_server_choice() {
    static VERSIONS: [ProtocolVersion; 2] =
        [ProtocolVersion::new(0x0302, "Tls11"), ProtocolVersion::new(0x0303, "Tls12")];
    static CIPHERS: [CipherSuite; 2] = [
        CipherSuite::new(0x002f, "TLS_RSA_WITH_AES_128_CBC_SHA"),
        CipherSuite::new(0x0035, "TLS_RSA_WITH_AES_256_CBC_SHA"),
    ];
    let registry = Registry::new(&VERSIONS, &CIPHERS);

    let permissive = Engine::new(Config::for_target("127.0.0.1", 443), registry, FixedChoice);
    assert_eq!(permissive.scan_versions(&local_target()).await.unwrap().len(), 2);
    assert_eq!(permissive.scan_ciphers(&local_target()).await.unwrap().len(), 2);

    let mut cfg = Config::for_target("127.0.0.1", 443);
    cfg.acceptance = Acceptance::Strict;
    let strict = Engine::new(cfg, registry, FixedChoice);
    let versions = strict.scan_versions(&local_target()).await.unwrap();
    assert_eq!(versions, [VERSIONS[1]]);
    let ciphers = strict.scan_ciphers(&local_target()).await.unwrap();
    assert_eq!(ciphers, [CIPHERS[0]]);
}

#[tokio::test]
async fn run_writes_jsonl_findings() {
    static VERSIONS: [ProtocolVersion; 2] =
        [ProtocolVersion::new(0x0301, "Tls10"), ProtocolVersion::new(0x0303, "Tls12")];
    static CIPHERS: [CipherSuite; 2] = [
        CipherSuite::new(0x000a, "TLS_RSA_WITH_3DES_EDE_CBC_SHA"),
        CipherSuite::new(0x002f, "TLS_RSA_WITH_AES_128_CBC_SHA"),
    ];
    let mut cfg = Config::for_target("127.0.0.1", 8443);
    cfg.output.format = OutputFormat::Jsonl;
    let stub = StubServer::new(TLS12, 0x002f);
    let engine = Engine::new(cfg, Registry::new(&VERSIONS, &CIPHERS), &stub);

    let mut sink = OutputSink::new(
        OutputConfig {
            format: OutputFormat::Jsonl,
        },
        Vec::new(),
    );
    let report = engine.run(&mut sink).await.unwrap();
    assert_eq!(report.versions, [VERSIONS[1]]);
    assert_eq!(report.ciphers, [CIPHERS[1]]);

    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["scan"], "version");
    assert_eq!(lines[0]["name"], "Tls12");
    assert_eq!(lines[1]["scan"], "cipher");
    assert_eq!(lines[1]["code"], "0x002F");
    assert_eq!(lines[1]["port"], 8443);
}

#[tokio::test]
async fn versions_only_scan_skips_cipher_probes() {
    static VERSIONS: [ProtocolVersion; 1] = [ProtocolVersion::new(0x0303, "Tls12")];
    static CIPHERS: [CipherSuite; 1] = [CipherSuite::new(0x002f, "TLS_RSA_WITH_AES_128_CBC_SHA")];
    let mut cfg = Config::for_target("127.0.0.1", 443);
    cfg.scan = ScanKind::Versions;
    let stub = StubServer::new(TLS12, 0x002f);
    let engine = Engine::new(cfg, Registry::new(&VERSIONS, &CIPHERS), &stub);

    let mut sink = OutputSink::new(
        OutputConfig {
            format: OutputFormat::Pretty,
        },
        Vec::new(),
    );
    let report = engine.run(&mut sink).await.unwrap();
    assert_eq!(report.versions.len(), 1);
    assert!(report.ciphers.is_empty());
    assert_eq!(stub.calls(), 1);

    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert!(text.contains("Supported versions of SSL/TLS:\nTls12\n"));
    assert!(!text.contains("Supported cipher suites:"));
}

/// Refuses the connection for 3DES and accepts every other suite.
struct RefusesLegacy;

#[async_trait]
impl Prober for RefusesLegacy {
    async fn probe(&self, _target: &Target, record: &[u8]) -> ProbeResult {
        if offered_suites(record)[0] == 0x000a {
            ProbeResult::ConnectionError(ConnectionError::Connect(io::Error::from(
                io::ErrorKind::ConnectionRefused,
            )))
        } else {
            handshake()
        }
    }
}

#[tokio::test]
async fn refused_candidate_does_not_stop_the_scan() {
    static CIPHERS: [CipherSuite; 2] = [
        CipherSuite::new(0x000a, "TLS_RSA_WITH_3DES_EDE_CBC_SHA"),
        CipherSuite::new(0x002f, "TLS_RSA_WITH_AES_128_CBC_SHA"),
    ];
    let engine = Engine::new(
        Config::for_target("127.0.0.1", 443),
        Registry::new(&[], &CIPHERS),
        RefusesLegacy,
    );

    let accepted = engine.scan_ciphers(&local_target()).await.unwrap();
    assert_eq!(accepted, [CIPHERS[1]]);
}

#[tokio::test]
async fn unresolvable_host_reports_empty_sections() {
    static VERSIONS: [ProtocolVersion; 1] = [ProtocolVersion::new(0x0303, "Tls12")];
    static CIPHERS: [CipherSuite; 1] = [CipherSuite::new(0x002f, "TLS_RSA_WITH_AES_128_CBC_SHA")];
    let stub = StubServer::new(TLS12, 0x002f);
    let engine = Engine::new(
        Config::for_target("no-such-host.invalid", 443),
        Registry::new(&VERSIONS, &CIPHERS),
        &stub,
    );

    let mut sink = OutputSink::new(
        OutputConfig {
            format: OutputFormat::Pretty,
        },
        Vec::new(),
    );
    let report = engine.run(&mut sink).await.unwrap();
    assert!(report.versions.is_empty());
    assert!(report.ciphers.is_empty());
    assert_eq!(stub.calls(), 0);

    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(
        text,
        "Testing TLS configuration of no-such-host.invalid:443...\n\
         \n\
         Supported versions of SSL/TLS:\n\
         \n\
         Supported cipher suites:\n"
    );
}
