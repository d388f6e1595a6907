use openssl::symm::{Cipher, Crypter, Mode};
use snafu::{ensure, ResultExt};

use crate::crypto::common::may_be_ecb;
use crate::crypto::oracle::Oracle;
use crate::util::{CipherSnafu, Error, OracleSnafu};

pub mod cbc;
pub mod ecb;

/// Block width of the underlying keyed permutation.
pub const BLOCK_SIZE: usize = 16;

// Probe growth bound before declaring an oracle ill-behaved.
const PROBE_LIMIT: usize = 4096;

/// One raw application of the keyed permutation over whole blocks. No
/// padding is added or removed; `buf` must be a multiple of [`BLOCK_SIZE`].
pub fn encrypt_block(buf: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    raw_block_transform(buf, key, Mode::Encrypt)
}

/// Inverse of [`encrypt_block`], same whole-block contract.
pub fn decrypt_block(buf: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    raw_block_transform(buf, key, Mode::Decrypt)
}

fn raw_block_transform(buf: &[u8], key: &[u8], mode: Mode) -> Result<Vec<u8>, Error> {
    let mut crypter =
        Crypter::new(Cipher::aes_128_ecb(), mode, key, None).context(CipherSnafu)?;
    crypter.pad(false);
    let mut out = vec![0u8; buf.len() + BLOCK_SIZE];
    let mut written = crypter.update(buf, &mut out).context(CipherSnafu)?;
    written += crypter.finalize(&mut out[written..]).context(CipherSnafu)?;
    out.truncate(written);
    Ok(out)
}

/// Behavioral probe of a padding ECB-style oracle: discovers its block size
/// and the length of the fixed suffix it appends to attacker input.
///
/// With an empty input the output holds only the suffix plus padding, length
/// `L0`. Growing the input one filler byte at a time, the output length first
/// jumps (by one whole block) at the probe length `i` where filler plus
/// suffix exactly fill the old length, so the suffix is `L0 - i` bytes.
pub fn detect_block_and_suffix_size(oracle: &dyn Oracle) -> Result<(usize, usize), Error> {
    let base_len = oracle.encrypt(&[]).len();
    let mut probe = Vec::new();
    loop {
        probe.push(b'A');
        let len = oracle.encrypt(&probe).len();
        if len > base_len {
            return Ok((len - base_len, base_len - probe.len()));
        }
        ensure!(
            probe.len() < PROBE_LIMIT,
            OracleSnafu {
                reason: "output length never grew while probing; oracle is not ECB-paddable",
            }
        );
    }
}

/// Distinguishes an ECB oracle from a CBC one: four blocks of a constant
/// byte survive any prefix/suffix the oracle adds and still yield two
/// identical aligned plaintext blocks, which only ECB preserves into the
/// ciphertext. Returns true for ECB.
pub fn detect_ecb_or_cbc(oracle: &dyn Oracle) -> Result<bool, Error> {
    let (block_size, _) = detect_block_and_suffix_size(oracle)?;
    let probe = vec![b'A'; 4 * block_size];
    Ok(may_be_ecb(&oracle.encrypt(&probe), block_size))
}
