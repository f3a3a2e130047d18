//! The fixed extension set every probe carries, modelled on a stock browser
//! hello, plus the padding extension that normalises the record size.

use super::EXTENSION_PADDING;
use bytes::BufMut;

const GREASE_LEADING: &[u8] = b"\x7a\x7a\x00\x00";
const EXTENDED_MASTER_SECRET: &[u8] = b"\x00\x17\x00\x00";
const RENEGOTIATION_INFO: &[u8] = b"\xff\x01\x00\x01\x00";
// GREASE, x25519, secp256r1, secp384r1
const SUPPORTED_GROUPS: &[u8] = b"\x00\x0a\x00\x0a\x00\x08\x0a\x0a\x00\x1d\x00\x17\x00\x18";
const EC_POINT_FORMATS: &[u8] = b"\x00\x0b\x00\x02\x01\x00";
const SESSION_TICKET: &[u8] = b"\x00\x23\x00\x00";
const ALPN: &[u8] = b"\x00\x10\x00\x0e\x00\x0c\x02h2\x08http/1.1";
// OCSP, empty responder and extension lists
const STATUS_REQUEST: &[u8] = b"\x00\x05\x00\x05\x01\x00\x00\x00\x00";
const SIGNATURE_ALGORITHMS: &[u8] = b"\x00\x0d\x00\x14\x00\x12\
    \x04\x03\x08\x04\x04\x01\x05\x03\x08\x05\x05\x01\x08\x06\x06\x01\x02\x01";
const SIGNED_CERTIFICATE_TIMESTAMP: &[u8] = b"\x00\x12\x00\x00";
// A GREASE share followed by a static x25519 public key. The handshake
// never gets far enough for the key to matter.
const KEY_SHARE: &[u8] = b"\x00\x33\x00\x2b\x00\x29\x0a\x0a\x00\x01\x00\x00\x1d\x00\x20\
    \xee\x20\xb0\xcb\x4e\xc7\x42\x01\xdc\x61\xef\x3f\xab\x24\x76\x66\
    \x3f\xc3\xeb\x85\xbe\xed\x75\xf0\xab\x90\x35\x76\x9d\x2d\x7f\x1b";
const PSK_KEY_EXCHANGE_MODES: &[u8] = b"\x00\x2d\x00\x02\x01\x01";
// GREASE, TLS 1.3 down to TLS 1.0
const SUPPORTED_VERSIONS: &[u8] = b"\x00\x2b\x00\x0b\x0a\x0a\x0a\x03\x04\x03\x03\x03\x02\x03\x01";
// brotli
const COMPRESS_CERTIFICATE: &[u8] = b"\x00\x1b\x00\x03\x02\x00\x02";
const GREASE_TRAILING: &[u8] = b"\xea\xea\x00\x01\x00";

pub const FIXED_EXTENSIONS: &[&[u8]] = &[
    GREASE_LEADING,
    EXTENDED_MASTER_SECRET,
    RENEGOTIATION_INFO,
    SUPPORTED_GROUPS,
    EC_POINT_FORMATS,
    SESSION_TICKET,
    ALPN,
    STATUS_REQUEST,
    SIGNATURE_ALGORITHMS,
    SIGNED_CERTIFICATE_TIMESTAMP,
    KEY_SHARE,
    PSK_KEY_EXCHANGE_MODES,
    SUPPORTED_VERSIONS,
    COMPRESS_CERTIFICATE,
    GREASE_TRAILING,
];

const fn total_len(parts: &[&[u8]]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < parts.len() {
        total += parts[i].len();
        i += 1;
    }
    total
}

pub const FIXED_EXTENSIONS_LEN: usize = total_len(FIXED_EXTENSIONS);

pub const PADDING_HEADER_LEN: usize = 4;

const _: () = assert!(FIXED_EXTENSIONS_LEN == 172);

pub fn put_fixed_extensions<B: BufMut>(buf: &mut B) {
    for ext in FIXED_EXTENSIONS {
        buf.put_slice(ext);
    }
}

pub fn put_padding<B: BufMut>(buf: &mut B, len: usize) {
    buf.put_u16(EXTENSION_PADDING);
    buf.put_u16(len as u16);
    buf.put_bytes(0, len);
}
