mod ciphers;
mod versions;

pub use ciphers::CIPHER_SUITES;
pub use versions::{PROTOCOL_VERSIONS, SSL30, TLS10, TLS11, TLS12, TLS13};

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtocolVersion {
    pub code: u16,
    pub label: &'static str,
}

impl ProtocolVersion {
    pub const fn new(code: u16, label: &'static str) -> Self {
        Self { code, label }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CipherSuite {
    pub code: u16,
    pub name: &'static str,
}

impl CipherSuite {
    pub const fn new(code: u16, name: &'static str) -> Self {
        Self { code, name }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Ordered, read-only view over the two tables a scan iterates.
#[derive(Debug, Clone, Copy)]
pub struct Registry<'a> {
    pub versions: &'a [ProtocolVersion],
    pub ciphers: &'a [CipherSuite],
}

impl Registry<'static> {
    pub fn builtin() -> Self {
        Self {
            versions: PROTOCOL_VERSIONS,
            ciphers: CIPHER_SUITES,
        }
    }
}

impl<'a> Registry<'a> {
    pub fn new(versions: &'a [ProtocolVersion], ciphers: &'a [CipherSuite]) -> Self {
        Self { versions, ciphers }
    }

    pub fn version(&self, code: u16) -> Option<&'a ProtocolVersion> {
        self.versions.iter().find(|v| v.code == code)
    }

    pub fn cipher(&self, code: u16) -> Option<&'a CipherSuite> {
        self.ciphers.iter().find(|c| c.code == code)
    }
}

pub fn version_label(code: u16) -> Option<&'static str> {
    Registry::builtin().version(code).map(|v| v.label)
}

pub fn cipher_name(code: u16) -> Option<&'static str> {
    Registry::builtin().cipher(code).map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tables_have_unique_codes() {
        let versions: HashSet<u16> = PROTOCOL_VERSIONS.iter().map(|v| v.code).collect();
        assert_eq!(versions.len(), PROTOCOL_VERSIONS.len());

        let ciphers: HashSet<u16> = CIPHER_SUITES.iter().map(|c| c.code).collect();
        assert_eq!(ciphers.len(), CIPHER_SUITES.len());
    }

    #[test]
    fn tables_are_in_code_order() {
        assert!(PROTOCOL_VERSIONS.windows(2).all(|w| w[0].code < w[1].code));
        assert!(CIPHER_SUITES.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn builtin_covers_expected_entries() {
        assert_eq!(PROTOCOL_VERSIONS.len(), 5);
        assert_eq!(CIPHER_SUITES.len(), 344);
        assert_eq!(version_label(TLS12), Some("Tls12"));
        assert_eq!(cipher_name(0x002F), Some("TLS_RSA_WITH_AES_128_CBC_SHA"));
        assert_eq!(cipher_name(0x1301), Some("TLS_AES_128_GCM_SHA256"));
        assert_eq!(cipher_name(0x001C), None);
    }
}
