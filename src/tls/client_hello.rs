use super::extensions::{
    put_fixed_extensions, put_padding, FIXED_EXTENSIONS_LEN, PADDING_HEADER_LEN,
};
use super::{
    CONTENT_TYPE_HANDSHAKE, HANDSHAKE_HEADER_LEN, HANDSHAKE_TYPE_CLIENT_HELLO, RECORD_HEADER_LEN,
};
use crate::error::EncodingError;
use bytes::BufMut;
use rand::rngs::OsRng;
use rand::RngCore;

/// Every probe is exactly this many bytes on the wire, whatever the cipher
/// list length.
pub const CLIENT_HELLO_RECORD_LEN: usize = 517;

pub const SESSION_ID_LEN: usize = 32;
const RANDOM_TAIL_LEN: usize = 28;

/// Everything ahead of the fixed extensions except the cipher codes.
pub const FIXED_PREFIX_LEN: usize =
    RECORD_HEADER_LEN + HANDSHAKE_HEADER_LEN + 2 + 32 + 1 + SESSION_ID_LEN + 2 + 2 + 2;

const CIPHER_BUDGET: usize =
    CLIENT_HELLO_RECORD_LEN - FIXED_PREFIX_LEN - FIXED_EXTENSIONS_LEN - PADDING_HEADER_LEN;

pub const MAX_CIPHER_SUITES: usize = CIPHER_BUDGET / 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloRandom {
    pub gmt_unix_time: u32,
    pub random: [u8; RANDOM_TAIL_LEN],
    pub session_id: [u8; SESSION_ID_LEN],
}

impl HelloRandom {
    pub fn generate() -> Self {
        let mut random = [0u8; RANDOM_TAIL_LEN];
        let mut session_id = [0u8; SESSION_ID_LEN];
        OsRng.fill_bytes(&mut random);
        OsRng.fill_bytes(&mut session_id);
        Self {
            gmt_unix_time: crate::util::unix_time(),
            random,
            session_id,
        }
    }
}

/// Zero-length padding is valid; a negative length is not.
pub fn padding_len(cipher_count: usize) -> Result<usize, EncodingError> {
    if cipher_count == 0 {
        return Err(EncodingError::EmptyCipherList);
    }
    cipher_count
        .checked_mul(2)
        .and_then(|needed| CIPHER_BUDGET.checked_sub(needed))
        .ok_or(EncodingError::CipherListTooLarge {
            count: cipher_count,
            max: MAX_CIPHER_SUITES,
        })
}

pub fn encode(version: u16, cipher_suites: &[u16]) -> Result<Vec<u8>, EncodingError> {
    encode_with(version, cipher_suites, &HelloRandom::generate())
}

pub fn encode_with(
    version: u16,
    cipher_suites: &[u16],
    random: &HelloRandom,
) -> Result<Vec<u8>, EncodingError> {
    let padding = padding_len(cipher_suites.len())?;

    let suites_len = cipher_suites.len() * 2;
    let extensions_len = FIXED_EXTENSIONS_LEN + PADDING_HEADER_LEN + padding;
    let record_len = CLIENT_HELLO_RECORD_LEN - RECORD_HEADER_LEN;
    let handshake_len = record_len - HANDSHAKE_HEADER_LEN;

    let mut buf = Vec::with_capacity(CLIENT_HELLO_RECORD_LEN);

    buf.put_u8(CONTENT_TYPE_HANDSHAKE);
    buf.put_u16(version);
    buf.put_u16(record_len as u16);

    buf.put_u8(HANDSHAKE_TYPE_CLIENT_HELLO);
    buf.put_uint(handshake_len as u64, 3);

    buf.put_u16(version);
    buf.put_u32(random.gmt_unix_time);
    buf.put_slice(&random.random);

    buf.put_u8(SESSION_ID_LEN as u8);
    buf.put_slice(&random.session_id);

    buf.put_u16(suites_len as u16);
    for suite in cipher_suites {
        buf.put_u16(*suite);
    }

    // one method: null
    buf.put_u8(1);
    buf.put_u8(0);

    buf.put_u16(extensions_len as u16);
    put_fixed_extensions(&mut buf);
    put_padding(&mut buf, padding);

    debug_assert_eq!(buf.len(), CLIENT_HELLO_RECORD_LEN);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn be16(buf: &[u8], at: usize) -> usize {
        u16::from_be_bytes([buf[at], buf[at + 1]]) as usize
    }

    fn be24(buf: &[u8], at: usize) -> usize {
        (buf[at] as usize) << 16 | (buf[at + 1] as usize) << 8 | buf[at + 2] as usize
    }

    fn fixed_random() -> HelloRandom {
        HelloRandom {
            gmt_unix_time: 0x5f00_0001,
            random: [0xab; RANDOM_TAIL_LEN],
            session_id: [0xcd; SESSION_ID_LEN],
        }
    }

    fn suites(count: usize) -> Vec<u16> {
        (0..count as u16).map(|i| 0xc000 + i).collect()
    }

    #[test]
    fn budget_allows_129_suites() {
        assert_eq!(FIXED_PREFIX_LEN, 82);
        assert_eq!(MAX_CIPHER_SUITES, 129);
        assert_eq!(padding_len(1), Ok(257));
        assert_eq!(padding_len(129), Ok(1));
    }

    #[test]
    fn length_fields_agree_for_every_list_size() {
        for count in 1..=MAX_CIPHER_SUITES {
            let list = suites(count);
            let rec = encode(0x0303, &list).unwrap();
            assert_eq!(rec.len(), CLIENT_HELLO_RECORD_LEN, "count {count}");

            assert_eq!(be16(&rec, 3), rec.len() - RECORD_HEADER_LEN);
            assert_eq!(be24(&rec, 6), rec.len() - RECORD_HEADER_LEN - HANDSHAKE_HEADER_LEN);

            let suites_at = 76;
            assert_eq!(be16(&rec, suites_at), count * 2);
            let compression_at = suites_at + 2 + count * 2;
            assert_eq!(&rec[compression_at..compression_at + 2], &[0x01, 0x00]);

            let ext_len_at = compression_at + 2;
            assert_eq!(be16(&rec, ext_len_at), rec.len() - ext_len_at - 2);

            let padding_at = ext_len_at + 2 + FIXED_EXTENSIONS_LEN;
            assert_eq!(&rec[padding_at..padding_at + 2], &[0x00, 0x15]);
            assert_eq!(be16(&rec, padding_at + 2), rec.len() - padding_at - 4);
            assert!(rec[padding_at + 4..].iter().all(|b| *b == 0));
        }
    }

    #[test]
    fn header_bytes_are_exact() {
        let rec = encode_with(0x0301, &[0x002f, 0x0035], &fixed_random()).unwrap();
        assert_eq!(&rec[..11], &[0x16, 0x03, 0x01, 0x02, 0x00, 0x01, 0x00, 0x01, 0xfc, 0x03, 0x01]);
        assert_eq!(&rec[11..15], &[0x5f, 0x00, 0x00, 0x01]);
        assert_eq!(rec[43], 0x20);
        assert_eq!(&rec[76..82], &[0x00, 0x04, 0x00, 0x2f, 0x00, 0x35]);
    }

    #[test]
    fn same_inputs_differ_only_in_random_fields() {
        let list = suites(16);
        let a = encode(0x0303, &list).unwrap();
        let b = encode(0x0303, &list).unwrap();
        let random_tail = 15..43;
        let session_id = 44..76;
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            if random_tail.contains(&i) || session_id.contains(&i) || (11..15).contains(&i) {
                continue;
            }
            assert_eq!(x, y, "byte {i} differs");
        }
        assert_ne!(a[random_tail.clone()], b[random_tail]);
        assert_ne!(a[session_id.clone()], b[session_id]);
    }

    #[test]
    fn deterministic_given_random() {
        let r = fixed_random();
        assert_eq!(
            encode_with(0x0304, &[0x1301], &r).unwrap(),
            encode_with(0x0304, &[0x1301], &r).unwrap()
        );
    }

    #[test]
    fn rejects_lists_that_overflow_the_record() {
        assert_eq!(
            encode(0x0303, &suites(MAX_CIPHER_SUITES + 1)),
            Err(EncodingError::CipherListTooLarge { count: 130, max: 129 })
        );
        assert_eq!(encode(0x0303, &[]), Err(EncodingError::EmptyCipherList));
    }
}
