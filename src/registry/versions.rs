use super::ProtocolVersion;

pub const SSL30: u16 = 0x0300;
pub const TLS10: u16 = 0x0301;
pub const TLS11: u16 = 0x0302;
pub const TLS12: u16 = 0x0303;
pub const TLS13: u16 = 0x0304;

pub static PROTOCOL_VERSIONS: &[ProtocolVersion] = &[
    ProtocolVersion::new(SSL30, "Ssl30"),
    ProtocolVersion::new(TLS10, "Tls10"),
    ProtocolVersion::new(TLS11, "Tls11"),
    ProtocolVersion::new(TLS12, "Tls12"),
    ProtocolVersion::new(TLS13, "Tls13"),
];
