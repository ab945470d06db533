// Fixed-width 8-byte integer fields for the patch header and control
// records. Little-endian throughout; `seek` is two's complement.

/// Encoded width of every header/control field.
pub const FIELD_LEN: usize = 8;

#[inline]
pub fn encode_u64(value: u64) -> [u8; FIELD_LEN] {
    value.to_le_bytes()
}

#[inline]
pub fn encode_i64(value: i64) -> [u8; FIELD_LEN] {
    value.to_le_bytes()
}

/// Decode an unsigned field. `bytes` must hold at least 8 bytes.
#[inline]
pub fn decode_u64(bytes: &[u8]) -> u64 {
    let mut field = [0u8; FIELD_LEN];
    field.copy_from_slice(&bytes[..FIELD_LEN]);
    u64::from_le_bytes(field)
}

/// Decode a signed field. `bytes` must hold at least 8 bytes.
#[inline]
pub fn decode_i64(bytes: &[u8]) -> i64 {
    let mut field = [0u8; FIELD_LEN];
    field.copy_from_slice(&bytes[..FIELD_LEN]);
    i64::from_le_bytes(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_u64() {
        for v in [0, 1, 255, 256, u32::MAX as u64, u64::MAX] {
            assert_eq!(decode_u64(&encode_u64(v)), v);
        }
    }

    #[test]
    fn roundtrip_i64() {
        for v in [0, 1, -1, 24, -24, i64::MIN, i64::MAX] {
            assert_eq!(decode_i64(&encode_i64(v)), v);
        }
    }

    #[test]
    fn encoding_is_little_endian() {
        assert_eq!(encode_u64(0x0102_0304), [4, 3, 2, 1, 0, 0, 0, 0]);
        assert_eq!(encode_i64(-1), [0xFF; 8]);
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let mut buf = encode_u64(42).to_vec();
        buf.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(decode_u64(&buf), 42);
    }
}
