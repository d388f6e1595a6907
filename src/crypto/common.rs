use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use rand::RngCore;

use crate::stats;

// Relative frequencies (x10^4) of characters in English text, bucketed into
// space, the 26 letters, and everything else.
static ENGLISH_EXPECTED_FREQUENCIES: [(char, u32); 28] = [
    (' ', 1217), // whitespace
    ('a', 0609),
    ('b', 0105),
    ('c', 0284),
    ('d', 0292),
    ('e', 1136),
    ('f', 0179),
    ('g', 0138),
    ('h', 0341),
    ('i', 0544),
    ('j', 0024),
    ('k', 0041),
    ('l', 0292),
    ('m', 0276),
    ('n', 0544),
    ('o', 0600),
    ('p', 0195),
    ('q', 0024),
    ('r', 0495),
    ('s', 0568),
    ('t', 0803),
    ('u', 0243),
    ('v', 0097),
    ('w', 0138),
    ('x', 0024),
    ('y', 0130),
    ('z', 0003),
    ('*', 0657), // everything else
];

lazy_static! {
    static ref ENGLISH_DISTRIBUTION: HashMap<char, f64> = {
        let total: f64 = ENGLISH_EXPECTED_FREQUENCIES
            .iter()
            .map(|&(_, n)| n as f64)
            .sum();
        ENGLISH_EXPECTED_FREQUENCIES
            .iter()
            .map(|&(c, n)| (c, (n as f64) / total))
            .collect()
    };
}

/// Rates a byte sequence for plausibility as English plaintext; lower is
/// better. Any byte outside printable ASCII (0x20-0x7E) or TAB/LF/CR is a
/// hard rejection scored `+infinity`. Otherwise this is the chi-squared
/// distance between the observed character distribution and
/// `ENGLISH_DISTRIBUTION`, treated as a test for homogeneity. Since we only
/// ever compare scores against each other, we never apply the CDF.
pub fn english_score(arr: &[u8]) -> f64 {
    let printable = |x: u8| (0x20..=0x7e).contains(&x) || x == b'\t' || x == b'\n' || x == b'\r';
    if arr.iter().any(|&x| !printable(x)) {
        return f64::INFINITY;
    }

    let mut counts: HashMap<char, f64> = HashMap::new();
    arr.iter()
        .map(|&x| x as char)
        .map(|x| {
            if x.is_ascii_alphabetic() {
                x.to_ascii_lowercase()
            } else if x == ' ' || x == '\t' {
                ' '
            } else {
                '*'
            }
        })
        .for_each(|bucket| *counts.entry(bucket).or_insert(0f64) += 1f64);

    let n = arr.len() as f64;
    let observed = counts.into_iter().map(|(c, count)| (c, count / n)).collect();
    stats::chi_sq(&observed, &*ENGLISH_DISTRIBUTION)
}

#[test]
fn test_english_score() {
    let str_with_exact_frequencies: Vec<u8> = ENGLISH_EXPECTED_FREQUENCIES
        .iter()
        .map(|&(c, f)| vec![c as u8; f as usize])
        .fold(Vec::new(), |mut acc, mut elt| {
            acc.append(&mut elt);
            acc
        });
    assert_eq!(0f64, english_score(&str_with_exact_frequencies));
    assert_eq!(f64::INFINITY, english_score(b"\0\0\0"));
    assert!(english_score(b"the quick brown fox") < english_score(b"@#$%^!@#$%^&*(){}[]"));
}

pub fn hamming_distance(buf1: &[u8], buf2: &[u8]) -> u32 {
    assert_eq!(buf1.len(), buf2.len());
    buf1.iter()
        .zip(buf2.iter())
        .map(|(x, y)| x ^ y)
        .map(|z| z.count_ones())
        .sum()
}

#[test]
fn test_hamming_distance() {
    let dist = hamming_distance(b"this is a test", b"wokka wokka!!!");
    assert_eq!(dist, 37);
    assert_eq!(
        37f64 / 14f64,
        normalised_hamming_distance(b"this is a test", b"wokka wokka!!!")
    );
}

pub fn normalised_hamming_distance(buf1: &[u8], buf2: &[u8]) -> f64 {
    (hamming_distance(buf1, buf2) as f64) / (buf1.len() as f64)
}

/// First block of `size` bytes that occurs more than once, with the index of
/// its second occurrence.
pub fn repeating_block(arr: &[u8], size: usize) -> Option<(usize, Vec<u8>)> {
    let mut blocks: HashSet<&[u8]> = HashSet::new();
    for (idx, block) in arr.chunks(size).enumerate() {
        if blocks.contains(block) {
            return Some((idx, block.to_vec()));
        }
        blocks.insert(block);
    }
    None
}

#[test]
fn test_repeating_block() {
    let arr = b"aaabbbcccaaa";
    assert_eq!(Some((3, b"aaa".to_vec())), repeating_block(arr, 3));
    assert_eq!(None, repeating_block(arr, 4));
}

/// Heuristic ECB flag: a ciphertext with two identical aligned blocks was
/// almost certainly not produced by a chaining mode. Non-block-multiple
/// input is never flagged.
pub fn may_be_ecb(arr: &[u8], block_size: usize) -> bool {
    arr.len() % block_size == 0 && repeating_block(arr, block_size).is_some()
}

#[test]
fn test_may_be_ecb() {
    let duplicated = [vec![7u8; 16], vec![1u8; 16], vec![7u8; 16]].concat();
    assert!(may_be_ecb(&duplicated, 16));

    // identical blocks, but the length gives it away as a stream
    assert!(!may_be_ecb(&duplicated[..40], 16));

    let distinct: Vec<u8> = (0..48).collect();
    assert!(!may_be_ecb(&distinct, 16));
}

pub fn generate_random_bytes<const N: usize>() -> [u8; N] {
    let mut data = [0u8; N];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut data = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut data);
    data
}
