use std::collections::HashMap;

use crate::crypto::aes::detect_block_and_suffix_size;
use crate::crypto::oracle::Oracle;
use crate::util::{Error, RecoverySnafu};

/// Recovers the hidden fixed suffix an ECB oracle appends to attacker input,
/// one byte per round.
///
/// Each round aligns the next unknown byte as the last byte of a block whose
/// other 15 bytes are fully known: `block_size - 1 - (known mod block_size)`
/// filler bytes push the suffix so exactly one fresh byte falls into the
/// target block. Querying the oracle with filler + known + candidate for all
/// 256 candidates builds a dictionary of target-block ciphertexts; the query
/// with filler alone produces the real target block, and the dictionary
/// entry it matches names the plaintext byte. A lookup miss means the
/// oracle's key is not fixed between calls, which the attack cannot survive.
pub fn recover_fixed_suffix(oracle: &dyn Oracle) -> Result<Vec<u8>, Error> {
    let (block_size, suffix_size) = detect_block_and_suffix_size(oracle)?;

    let mut known: Vec<u8> = Vec::with_capacity(suffix_size);
    while known.len() < suffix_size {
        let filler = vec![b'A'; block_size - 1 - known.len() % block_size];
        let offset = (filler.len() + known.len()) / block_size * block_size;

        let lookup: HashMap<Vec<u8>, u8> = (0..=u8::MAX)
            .map(|candidate| {
                let payload = [filler.as_slice(), known.as_slice(), &[candidate]].concat();
                let encrypted = oracle.encrypt(&payload);
                (encrypted[offset..offset + block_size].to_vec(), candidate)
            })
            .collect();

        let real_block = oracle.encrypt(&filler)[offset..offset + block_size].to_vec();
        match lookup.get(&real_block) {
            Some(&byte) => known.push(byte),
            None => return RecoverySnafu { recovered: known.len() }.fail(),
        }
    }
    Ok(known)
}
