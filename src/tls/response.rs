use super::{
    CONTENT_TYPE_ALERT, CONTENT_TYPE_HANDSHAKE, EXTENSION_SUPPORTED_VERSIONS,
    HANDSHAKE_TYPE_SERVER_HELLO, RECORD_HEADER_LEN,
};
use crate::error::ConnectionError;
use std::fmt;

#[derive(Debug)]
pub enum ProbeResult {
    Handshake(Option<ServerHello>),
    Alert(Option<Alert>),
    Unrecognized(u8),
    ConnectionError(ConnectionError),
}

impl ProbeResult {
    pub fn is_handshake(&self) -> bool {
        matches!(self, ProbeResult::Handshake(_))
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Handshake(Some(hello)) => write!(f, "handshake ({hello})"),
            ProbeResult::Handshake(None) => write!(f, "handshake"),
            ProbeResult::Alert(Some(alert)) => write!(f, "alert ({alert})"),
            ProbeResult::Alert(None) => write!(f, "alert"),
            ProbeResult::Unrecognized(byte) => write!(f, "unrecognized record type 0x{byte:02x}"),
            ProbeResult::ConnectionError(err) => write!(f, "{err}"),
        }
    }
}

/// Only the record type decides the variant.
pub fn classify(bytes: &[u8]) -> ProbeResult {
    match bytes.first() {
        None => ProbeResult::ConnectionError(ConnectionError::Closed),
        Some(&CONTENT_TYPE_HANDSHAKE) => ProbeResult::Handshake(ServerHello::parse(bytes)),
        Some(&CONTENT_TYPE_ALERT) => ProbeResult::Alert(Alert::parse(bytes)),
        Some(&other) => ProbeResult::Unrecognized(other),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: u8,
    pub description: u8,
}

impl Alert {
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if *bytes.first()? != CONTENT_TYPE_ALERT {
            return None;
        }
        let level = *bytes.get(RECORD_HEADER_LEN)?;
        let description = *bytes.get(RECORD_HEADER_LEN + 1)?;
        Some(Self { level, description })
    }

    pub fn is_fatal(&self) -> bool {
        self.level == 2
    }

    pub fn description_name(&self) -> Option<&'static str> {
        alert_description_name(self.description)
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            1 => "warning",
            2 => "fatal",
            _ => "unknown",
        };
        match self.description_name() {
            Some(name) => write!(f, "{level} {name}"),
            None => write!(f, "{level} {}", self.description),
        }
    }
}

pub fn alert_description_name(code: u8) -> Option<&'static str> {
    let name = match code {
        0 => "close_notify",
        10 => "unexpected_message",
        20 => "bad_record_mac",
        21 => "decryption_failed",
        22 => "record_overflow",
        30 => "decompression_failure",
        40 => "handshake_failure",
        41 => "no_certificate",
        42 => "bad_certificate",
        43 => "unsupported_certificate",
        44 => "certificate_revoked",
        45 => "certificate_expired",
        46 => "certificate_unknown",
        47 => "illegal_parameter",
        48 => "unknown_ca",
        49 => "access_denied",
        50 => "decode_error",
        51 => "decrypt_error",
        60 => "export_restriction",
        70 => "protocol_version",
        71 => "insufficient_security",
        80 => "internal_error",
        86 => "inappropriate_fallback",
        90 => "user_canceled",
        100 => "no_renegotiation",
        109 => "missing_extension",
        110 => "unsupported_extension",
        111 => "certificate_unobtainable",
        112 => "unrecognized_name",
        113 => "bad_certificate_status_response",
        114 => "bad_certificate_hash_value",
        115 => "unknown_psk_identity",
        116 => "certificate_required",
        120 => "no_application_protocol",
        _ => return None,
    };
    Some(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerHello {
    pub record_version: u16,
    pub legacy_version: u16,
    pub cipher_suite: u16,
    /// `supported_versions` echo; present on TLS 1.3 servers.
    pub selected_version: Option<u16>,
}

impl ServerHello {
    /// A truncated extensions block keeps the fields read so far.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut rec = Cursor::new(bytes);
        if rec.u8()? != CONTENT_TYPE_HANDSHAKE {
            return None;
        }
        let record_version = rec.u16()?;
        let _record_len = rec.u16()?;

        if rec.u8()? != HANDSHAKE_TYPE_SERVER_HELLO {
            return None;
        }
        let _handshake_len = rec.u24()?;
        let legacy_version = rec.u16()?;
        rec.skip(32)?;
        let session_id_len = rec.u8()? as usize;
        rec.skip(session_id_len)?;
        let cipher_suite = rec.u16()?;
        let _compression = rec.u8()?;

        let mut hello = Self {
            record_version,
            legacy_version,
            cipher_suite,
            selected_version: None,
        };

        let Some(ext_len) = rec.u16() else {
            return Some(hello);
        };
        let mut exts = Cursor::new(rec.take(ext_len as usize).unwrap_or(rec.rest()));
        while let (Some(kind), Some(len)) = (exts.u16(), exts.u16()) {
            let Some(body) = exts.take(len as usize) else {
                break;
            };
            if kind == EXTENSION_SUPPORTED_VERSIONS && body.len() == 2 {
                hello.selected_version = Some(u16::from_be_bytes([body[0], body[1]]));
            }
        }

        Some(hello)
    }

    pub fn negotiated_version(&self) -> u16 {
        self.selected_version.unwrap_or(self.legacy_version)
    }
}

impl fmt::Display for ServerHello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.negotiated_version();
        match crate::registry::version_label(version) {
            Some(label) => write!(f, "{label}")?,
            None => write!(f, "0x{version:04x}")?,
        }
        match crate::registry::cipher_name(self.cipher_suite) {
            Some(name) => write!(f, ", {name}"),
            None => write!(f, ", 0x{:04x}", self.cipher_suite),
        }
    }
}

struct Cursor<'a> {
    buf: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.buf.len() < n {
            return None;
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Some(head)
    }

    fn rest(&self) -> &'a [u8] {
        self.buf
    }

    fn skip(&mut self, n: usize) -> Option<()> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    fn u24(&mut self) -> Option<u32> {
        self.take(3)
            .map(|b| (b[0] as u32) << 16 | (b[1] as u32) << 8 | b[2] as u32)
    }
}
