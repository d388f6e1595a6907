use snafu::{ensure, OptionExt};

use crate::util::{ConfigSnafu, Error, PaddingSnafu};

/// PKCS#7: append `n` bytes of value `n` up to the next block boundary.
/// Already-aligned input gains a whole block of padding, so `n` is always in
/// `1..=block_size` and stripping is unambiguous.
pub fn pad_pkcs_7(buf: &[u8], block_size: usize) -> Result<Vec<u8>, Error> {
    ensure!(
        block_size > 0 && block_size <= 255,
        ConfigSnafu {
            reason: format!("block size {block_size} does not fit in a padding byte"),
        }
    );
    let padding_len = block_size - buf.len() % block_size;
    Ok([buf, &vec![padding_len as u8; padding_len]].concat())
}

/// Validates and removes PKCS#7 padding. The last byte names the pad length;
/// it must be non-zero, no longer than the input, and every padding byte must
/// carry that value.
pub fn strip_pkcs_7(buf: &[u8]) -> Result<Vec<u8>, Error> {
    let &final_byte = buf.last().context(PaddingSnafu)?;
    let padding_len = final_byte as usize;
    ensure!(padding_len > 0 && padding_len <= buf.len(), PaddingSnafu);
    ensure!(
        buf[buf.len() - padding_len..].iter().all(|&b| b == final_byte),
        PaddingSnafu
    );
    Ok(buf[..buf.len() - padding_len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_pkcs_7() {
        let result = pad_pkcs_7(b"YELLOW SUBMARINE", 20).unwrap();
        assert_eq!(b"YELLOW SUBMARINE\x04\x04\x04\x04".to_vec(), result);

        // aligned input gains a full block of padding
        let result = pad_pkcs_7(b"YELLOW SUBMARINE", 16).unwrap();
        assert_eq!([b"YELLOW SUBMARINE".to_vec(), vec![16u8; 16]].concat(), result);
    }

    #[test]
    fn test_pad_pkcs_7_length_properties() {
        for len in 0..64 {
            let buf = vec![b'x'; len];
            let padded = pad_pkcs_7(&buf, 16).unwrap();
            let added = padded.len() - len;
            assert!((1..=16).contains(&added));
            assert_eq!(0, padded.len() % 16);
        }
    }

    #[test]
    fn test_pad_pkcs_7_oversized_block() {
        assert!(matches!(pad_pkcs_7(b"abc", 256), Err(Error::Config { .. })));
        assert!(matches!(pad_pkcs_7(b"abc", 0), Err(Error::Config { .. })));
    }

    #[test]
    fn test_strip_pkcs_7() {
        let result = strip_pkcs_7(b"ICE ICE BABY\x04\x04\x04\x04").unwrap();
        assert_eq!(b"ICE ICE BABY".to_vec(), result);

        let full_pad = [b"YELLOW SUBMARINE".to_vec(), vec![16u8; 16]].concat();
        assert_eq!(b"YELLOW SUBMARINE".to_vec(), strip_pkcs_7(&full_pad).unwrap());
    }

    #[test]
    fn test_strip_pkcs_7_rejects_bad_padding() {
        // wrong pad values
        assert!(matches!(
            strip_pkcs_7(b"ICE ICE BABY\x05\x05\x05\x05"),
            Err(Error::Padding)
        ));
        assert!(matches!(
            strip_pkcs_7(b"ICE ICE BABY\x01\x02\x03\x04"),
            Err(Error::Padding)
        ));
        // zero length byte
        assert!(matches!(strip_pkcs_7(b"ICE ICE BABY\x00"), Err(Error::Padding)));
        // length byte longer than the input
        assert!(matches!(strip_pkcs_7(b"\x09"), Err(Error::Padding)));
        // nothing to read
        assert!(matches!(strip_pkcs_7(b""), Err(Error::Padding)));
    }

    #[test]
    fn test_pad_strip_round_trip() {
        for block_size in [1usize, 2, 15, 16, 255] {
            for len in 0..40 {
                let buf: Vec<u8> = (0..len as u8).collect();
                let padded = pad_pkcs_7(&buf, block_size).unwrap();
                assert_eq!(buf, strip_pkcs_7(&padded).unwrap());
            }
        }
    }
}
