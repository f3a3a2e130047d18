pub mod client_hello;
pub mod extensions;
pub mod response;

pub use client_hello::{encode, encode_with, HelloRandom, CLIENT_HELLO_RECORD_LEN, MAX_CIPHER_SUITES};
pub use response::{classify, Alert, ProbeResult, ServerHello};

pub const CONTENT_TYPE_ALERT: u8 = 0x15;
pub const CONTENT_TYPE_HANDSHAKE: u8 = 0x16;

pub const HANDSHAKE_TYPE_CLIENT_HELLO: u8 = 0x01;
pub const HANDSHAKE_TYPE_SERVER_HELLO: u8 = 0x02;

pub const RECORD_HEADER_LEN: usize = 5;
pub const HANDSHAKE_HEADER_LEN: usize = 4;

pub const EXTENSION_SUPPORTED_VERSIONS: u16 = 0x002b;
pub const EXTENSION_PADDING: u16 = 0x0015;
