pub fn preview(bytes: &[u8], limit: usize) -> String {
    let shown = &bytes[..bytes.len().min(limit)];
    let mut out = to_hex(shown);
    if bytes.len() > limit {
        out.push_str("..");
    }
    out
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
pub(crate) fn from_hex(hex: &str) -> Result<Vec<u8>, String> {
    let cleaned: Vec<u8> = hex.bytes().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        return Err("hex string has an odd length".into());
    }
    cleaned
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).map_err(|_| "non-ascii hex".to_string())?;
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex pair: {pair}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hex() {
        assert_eq!(to_hex(&[0x16, 0x03, 0x03]), "160303");
    }

    #[test]
    fn preview_truncates() {
        assert_eq!(preview(&[0x15, 0x03, 0x03, 0x00], 2), "1503..");
        assert_eq!(preview(&[0x15], 4), "15");
    }

    #[test]
    fn parses_hex_with_whitespace() {
        assert_eq!(from_hex("de ad\nbe ef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }
}
