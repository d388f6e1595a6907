use std::collections::HashMap;

use snafu::{OptionExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Invalid caller-supplied parameters (oversized block size, mismatched
    /// key/IV lengths).
    #[snafu(display("invalid parameter: {reason}"))]
    Config { reason: String },

    /// Structurally malformed input, e.g. ciphertext whose length is not a
    /// multiple of the block width, or a record missing a field.
    #[snafu(display("malformed input: {reason}"))]
    Format { reason: String },

    /// Invalid or missing PKCS#7 padding.
    #[snafu(display("invalid PKCS#7 padding"))]
    Padding,

    /// The oracle under attack does not behave as the attack assumes.
    #[snafu(display("oracle violated attack assumptions: {reason}"))]
    Oracle { reason: String },

    /// A byte-at-a-time dictionary lookup missed, implying the oracle's key
    /// is not fixed across calls.
    #[snafu(display("ciphertext dictionary miss after recovering {recovered} bytes"))]
    Recovery { recovered: usize },

    /// The underlying block-cipher primitive failed.
    #[snafu(display("block cipher failure: {source}"))]
    Cipher { source: openssl::error::ErrorStack },
}

pub fn round_up_to_nearest_multiple(n: usize, m: usize) -> usize {
    m * ((n + (m - 1)) / m)
}

#[test]
fn test_round_up_to_nearest_multiple() {
    assert_eq!(16, round_up_to_nearest_multiple(1, 16));
    assert_eq!(16, round_up_to_nearest_multiple(16, 16));
    assert_eq!(32, round_up_to_nearest_multiple(17, 16));
}

// The `key=val&key=val` record codec. Escaping of the delimiters is the
// encoder's caller's problem; see Profile::from_email.
pub fn key_equals_val_parse(buf: &[u8]) -> Result<HashMap<Vec<u8>, Vec<u8>>, Error> {
    buf.split(|&b| b == b'&')
        .map(|pair| {
            let eq = pair
                .iter()
                .position(|&b| b == b'=')
                .context(FormatSnafu { reason: "pair without '='" })?;
            Ok((pair[..eq].to_vec(), pair[eq + 1..].to_vec()))
        })
        .collect()
}

pub fn key_equals_val_encode(pairs: &[(&[u8], &[u8])]) -> Vec<u8> {
    pairs
        .iter()
        .map(|&(k, v)| [k, b"=", v].concat())
        .collect::<Vec<_>>()
        .join(&b'&')
}

#[test]
fn test_key_equals_val_parse() {
    let parsed = key_equals_val_parse(b"foo=bar&baz=qux&zap=zazzle").unwrap();
    assert_eq!(Some(&b"bar".to_vec()), parsed.get(b"foo".as_slice()));
    assert_eq!(Some(&b"qux".to_vec()), parsed.get(b"baz".as_slice()));
    assert_eq!(Some(&b"zazzle".to_vec()), parsed.get(b"zap".as_slice()));

    assert!(matches!(
        key_equals_val_parse(b"foo=bar&nodelimiter"),
        Err(Error::Format { .. })
    ));
}

#[test]
fn test_key_equals_val_encode() {
    let encoded = key_equals_val_encode(&[
        (b"email".as_slice(), b"foo@bar.com".as_slice()),
        (b"uid", b"10"),
        (b"role", b"user"),
    ]);
    assert_eq!(b"email=foo@bar.com&uid=10&role=user".to_vec(), encoded);
}
