use snafu::ensure;

use crate::crypto::aes::{decrypt_block, encrypt_block, BLOCK_SIZE};
use crate::crypto::padding::{pad_pkcs_7, strip_pkcs_7};
use crate::util::{Error, FormatSnafu};

pub mod byte_by_byte;
pub mod cut_and_paste;

/// Pads the plaintext and encrypts every block independently under the same
/// key. Identical plaintext blocks yield identical ciphertext blocks; that
/// leak is what the attacks in the submodules exploit.
pub fn ecb_encrypt(buf: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    let padded = pad_pkcs_7(buf, BLOCK_SIZE)?;
    let mut out = Vec::with_capacity(padded.len());
    for block in padded.chunks(BLOCK_SIZE) {
        out.extend(encrypt_block(block, key)?);
    }
    Ok(out)
}

pub fn ecb_decrypt(buf: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    ensure!(
        buf.len() % BLOCK_SIZE == 0,
        FormatSnafu {
            reason: format!(
                "ciphertext length {} is not a multiple of the {BLOCK_SIZE}-byte block",
                buf.len()
            ),
        }
    );
    let mut padded = Vec::with_capacity(buf.len());
    for block in buf.chunks(BLOCK_SIZE) {
        padded.extend(decrypt_block(block, key)?);
    }
    strip_pkcs_7(&padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::common::generate_random_bytes;

    #[test]
    fn test_ecb_round_trip() {
        let key: [u8; 16] = generate_random_bytes();
        for len in [0usize, 1, 15, 16, 17, 52, 64] {
            let plaintext: Vec<u8> = (0..len as u8).collect();
            let ciphertext = ecb_encrypt(&plaintext, &key).unwrap();
            assert_eq!(0, ciphertext.len() % BLOCK_SIZE);
            assert!(ciphertext.len() > plaintext.len());
            assert_eq!(plaintext, ecb_decrypt(&ciphertext, &key).unwrap());
        }
    }

    #[test]
    fn test_ecb_identical_blocks_repeat() {
        let key: [u8; 16] = generate_random_bytes();
        let plaintext = vec![b'A'; 3 * BLOCK_SIZE];
        let ciphertext = ecb_encrypt(&plaintext, &key).unwrap();
        assert_eq!(ciphertext[..BLOCK_SIZE], ciphertext[BLOCK_SIZE..2 * BLOCK_SIZE]);
    }

    #[test]
    fn test_ecb_decrypt_rejects_partial_blocks() {
        let key: [u8; 16] = generate_random_bytes();
        assert!(matches!(
            ecb_decrypt(&vec![0u8; 21], &key),
            Err(Error::Format { .. })
        ));
    }
}
