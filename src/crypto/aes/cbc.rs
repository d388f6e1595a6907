use snafu::ensure;

use crate::crypto::aes::{decrypt_block, encrypt_block, BLOCK_SIZE};
use crate::crypto::padding::{pad_pkcs_7, strip_pkcs_7};
use crate::crypto::xor::fixed_xor;
use crate::util::{ConfigSnafu, Error, FormatSnafu};

/// Pads the plaintext, then XORs each block with the previous ciphertext
/// block (the IV for the first) before encrypting it.
pub fn cbc_encrypt(buf: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, Error> {
    ensure_matching_lengths(key, iv)?;
    let padded = pad_pkcs_7(buf, BLOCK_SIZE)?;
    let mut out = Vec::with_capacity(padded.len());
    let mut chain = iv.to_vec();
    for block in padded.chunks(BLOCK_SIZE) {
        let encrypted = encrypt_block(&fixed_xor(block, &chain), key)?;
        out.extend_from_slice(&encrypted);
        chain = encrypted;
    }
    Ok(out)
}

/// Decrypts each block and XORs it with the previous *ciphertext* block (the
/// IV for the first), then strips the padding.
pub fn cbc_decrypt(buf: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, Error> {
    ensure_matching_lengths(key, iv)?;
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
    let mut chain: &[u8] = iv;
    for block in buf.chunks(BLOCK_SIZE) {
        padded.extend(fixed_xor(&decrypt_block(block, key)?, chain));
        chain = block;
    }
    strip_pkcs_7(&padded)
}

fn ensure_matching_lengths(key: &[u8], iv: &[u8]) -> Result<(), Error> {
    ensure!(
        key.len() == iv.len(),
        ConfigSnafu {
            reason: format!(
                "key length {} does not match iv length {}",
                key.len(),
                iv.len()
            ),
        }
    );
    ensure!(
        iv.len() == BLOCK_SIZE,
        ConfigSnafu {
            reason: format!("iv length {} is not the {BLOCK_SIZE}-byte block width", iv.len()),
        }
    );
    Ok(())
}
