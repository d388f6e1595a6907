use rand::Rng;

use crate::crypto::aes::cbc::cbc_encrypt;
use crate::crypto::aes::ecb::ecb_encrypt;
use crate::crypto::aes::BLOCK_SIZE;
use crate::crypto::common::generate_random_bytes;

/// An attacker-queryable encryption endpoint: fixed hidden key, possibly
/// fixed hidden affixes, observable only through input/output behavior.
/// Every `Fn(&[u8]) -> Vec<u8>` qualifies, so oracles compose as plain
/// closures.
pub trait Oracle: Fn(&[u8]) -> Vec<u8> {
    fn encrypt(&self, buf: &[u8]) -> Vec<u8> {
        self(buf)
    }
}
impl<T: Fn(&[u8]) -> Vec<u8>> Oracle for T {}

/// The no-op oracle; the seed every combinator chain grows from.
pub fn identity_oracle() -> Box<dyn Oracle> {
    Box::new(move |buf: &[u8]| buf.to_vec())
}

/// Flips a fair coin at construction and permanently commits to one of the
/// two oracles. The bool records which, for checking a distinguisher.
pub fn choose_random<'a>(f: impl Oracle + 'a, g: impl Oracle + 'a) -> (bool, impl Oracle + 'a) {
    let choose_f: bool = rand::thread_rng().gen();
    (choose_f, move |buf: &[u8]| {
        if choose_f {
            f.encrypt(buf)
        } else {
            g.encrypt(buf)
        }
    })
}

impl dyn Oracle {
    /// Prepends a fixed byte string to every query.
    pub fn with_fixed_prefix(self: Box<dyn Oracle>, prefix: &[u8]) -> Box<dyn Oracle> {
        let owned_prefix = prefix.to_owned();
        Box::new(move |buf: &[u8]| {
            let joined = [owned_prefix.as_slice(), buf].concat();
            self.encrypt(&joined)
        })
    }

    /// Appends a fixed byte string to every query; the hidden suffix the
    /// byte-at-a-time attack recovers.
    pub fn with_fixed_suffix(self: Box<dyn Oracle>, suffix: &[u8]) -> Box<dyn Oracle> {
        let owned_suffix = suffix.to_owned();
        Box::new(move |buf: &[u8]| {
            let joined = [buf, owned_suffix.as_slice()].concat();
            self.encrypt(&joined)
        })
    }

    /// Prefix of random bytes with a length drawn once from `MIN..=MAX`;
    /// fixed for the oracle's lifetime.
    pub fn with_random_prefix<const MIN: usize, const MAX: usize>(
        self: Box<dyn Oracle>,
    ) -> Box<dyn Oracle> {
        let padding: [u8; MAX] = generate_random_bytes();
        let pad_len = rand::thread_rng().gen_range(MIN..=MAX);
        self.with_fixed_prefix(&padding[..pad_len])
    }

    pub fn with_random_suffix<const MIN: usize, const MAX: usize>(
        self: Box<dyn Oracle>,
    ) -> Box<dyn Oracle> {
        let padding: [u8; MAX] = generate_random_bytes();
        let pad_len = rand::thread_rng().gen_range(MIN..=MAX);
        self.with_fixed_suffix(&padding[..pad_len])
    }

    /// ECB-encrypts the assembled plaintext under a key generated once at
    /// construction and held immutably by the closure.
    pub fn under_ecb_fixed_key(self: Box<dyn Oracle>) -> Box<dyn Oracle> {
        let key: [u8; BLOCK_SIZE] = generate_random_bytes();
        Box::new(move |buf: &[u8]| {
            let plaintext = self.encrypt(buf);
            ecb_encrypt(&plaintext, &key).unwrap()
        })
    }

    /// CBC counterpart of [`Self::under_ecb_fixed_key`]; the distractor an
    /// ECB detector must tell apart.
    pub fn under_cbc_fixed_key(self: Box<dyn Oracle>) -> Box<dyn Oracle> {
        let key: [u8; BLOCK_SIZE] = generate_random_bytes();
        let iv: [u8; BLOCK_SIZE] = generate_random_bytes();
        Box::new(move |buf: &[u8]| {
            let plaintext = self.encrypt(buf);
            cbc_encrypt(&plaintext, &key, &iv).unwrap()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affix_combinators_compose() {
        let oracle = identity_oracle()
            .with_fixed_prefix(b"left")
            .with_fixed_suffix(b"right");
        assert_eq!(b"leftmiddleright".to_vec(), oracle.encrypt(b"middle"));
    }

    #[test]
    fn test_fixed_key_oracle_is_deterministic() {
        let oracle = identity_oracle().under_ecb_fixed_key();
        assert_eq!(oracle.encrypt(b"same input"), oracle.encrypt(b"same input"));
        assert_ne!(oracle.encrypt(b"same input"), oracle.encrypt(b"other input"));
    }
}
