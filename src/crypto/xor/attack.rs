use itertools::Itertools;

use crate::crypto::common::{english_score, hamming_distance};
use crate::crypto::xor::byte_xor;

/// Outcome of a single-byte XOR brute force.
#[derive(Debug)]
pub struct SingleByteCrack {
    pub key: u8,
    pub score: f64,
    pub plaintext: Vec<u8>,
}

/// Tries all 256 keys and keeps the candidate whose decryption scores most
/// English-like. Ties go to the lowest key value, since `min_by` keeps the
/// first of equal minima.
pub fn crack_single_byte_xor(buf: &[u8]) -> SingleByteCrack {
    (0..=u8::MAX)
        .map(|key| {
            let plaintext = byte_xor(buf, key);
            let score = english_score(&plaintext);
            SingleByteCrack { key, score, plaintext }
        })
        .min_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
        .unwrap()
}

/// Cracks every candidate line independently and returns the single
/// decryption with the globally lowest score. Used when the encrypted line
/// is hidden among distractors.
pub fn find_best_among(candidates: &[Vec<u8>]) -> Option<SingleByteCrack> {
    candidates
        .iter()
        .map(|line| crack_single_byte_xor(line))
        .min_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
}

/// Estimates the key length of a repeating-key XOR ciphertext. At the true
/// key size, same-offset ciphertext bytes are plaintext XOR plaintext, whose
/// bit-distance is statistically lower than at any other alignment. For each
/// candidate size we sum Hamming distances over consecutive non-overlapping
/// chunk pairs, normalized by pair count and size; the scan stops once the
/// ciphertext is too short for two chunks. Returns 0 if no size qualified.
pub fn estimate_key_size(buf: &[u8], min_size: usize, max_size: usize) -> usize {
    let mut best_size = 0;
    let mut best_dist = f64::INFINITY;
    for size in min_size.max(1)..=max_size {
        if buf.len() < 2 * size {
            break;
        }
        let mut pairs = 0u32;
        let mut dist = 0u32;
        for (chunk1, chunk2) in buf.chunks_exact(size).tuples() {
            dist += hamming_distance(chunk1, chunk2);
            pairs += 1;
        }
        let normalised = (dist as f64) / (pairs as f64) / (size as f64);
        if normalised < best_dist {
            best_dist = normalised;
            best_size = size;
        }
    }
    best_size
}

/// Outcome of a repeating-key XOR break.
#[derive(Debug)]
pub struct RepeatingKeyCrack {
    pub key: Vec<u8>,
    pub plaintext: Vec<u8>,
}

/// Breaks repeating-key XOR: estimate the key size, split the ciphertext
/// into one column per key position, crack each column as single-byte XOR,
/// then interleave the decrypted columns back into original byte order.
/// Returns empty key and plaintext when no key size qualified.
pub fn break_repeating_key_xor(
    buf: &[u8],
    min_key_size: usize,
    max_key_size: usize,
) -> RepeatingKeyCrack {
    let key_size = estimate_key_size(buf, min_key_size, max_key_size);
    if key_size == 0 {
        return RepeatingKeyCrack { key: Vec::new(), plaintext: Vec::new() };
    }

    let mut columns: Vec<Vec<u8>> = vec![Vec::new(); key_size];
    for (i, &b) in buf.iter().enumerate() {
        columns[i % key_size].push(b);
    }
    let cracks: Vec<SingleByteCrack> = columns
        .iter()
        .map(|column| crack_single_byte_xor(column))
        .collect();

    RepeatingKeyCrack {
        key: cracks.iter().map(|c| c.key).collect(),
        plaintext: (0..buf.len())
            .map(|i| cracks[i % key_size].plaintext[i / key_size])
            .collect(),
    }
}

// Long enough that the normalized-distance minimum lands on the true key
// size; short excerpts let a multiple of it win on noise.
#[cfg(test)]
pub(crate) const VANILLA_ICE_LYRIC: &[u8] = b"Burning 'em, if you ain't quick and nimble\n\
I go crazy when I hear a cymbal\n\
And a high hat with a souped up tempo\n\
I'm on a roll, it's time to go solo\n\
Rollin' in my five point oh\n\
With my rag-top down so my hair can blow\n\
The girlies on standby waving just to say hi\n\
Did you stop? No, I just drove by\n\
Kept on pursuing to the next stop\n\
I busted a left and I'm heading to the next block\n\
That block was dead, yo so I continued to A1A Beachfront Avenue\n\
Girls were hot wearing less than bikinis\n\
Rock man lovers driving Lamborghini\n\
Jealous 'cause I'm out getting mine\n\
Shay with a gauge and Vanilla with a nine\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::xor::repeating_key_xor;

    #[test]
    fn test_crack_single_byte_xor() {
        let case: [u8; 34] =
            hex!("1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736");
        let cracked = crack_single_byte_xor(&case);
        assert_eq!(b"Cooking MC's like a pound of bacon".to_vec(), cracked.plaintext);
        assert_eq!(b'X', cracked.key);
        assert!(cracked.score.is_finite());
    }

    #[test]
    fn test_crack_single_byte_xor_garbage_scores_infinite() {
        // 0x00 and 0x80 cannot both land in the printable range under one key
        let cracked = crack_single_byte_xor(&[0x00, 0x80, 0x00, 0x80]);
        assert_eq!(f64::INFINITY, cracked.score);
        // tie on +infinity everywhere resolves to the first key
        assert_eq!(0, cracked.key);
    }

    #[test]
    fn test_find_best_among_empty() {
        assert!(find_best_among(&[]).is_none());
    }

    #[test]
    fn test_estimate_key_size_known_key_length() {
        let ciphertext = repeating_key_xor(VANILLA_ICE_LYRIC, b"ICE");
        assert_eq!(3, estimate_key_size(&ciphertext, 2, 20));
    }

    #[test]
    fn test_estimate_key_size_short_ciphertext() {
        // too short for even two chunks of the minimum size
        assert_eq!(0, estimate_key_size(b"abc", 2, 40));
        assert_eq!(0, estimate_key_size(b"", 2, 40));
    }

    #[test]
    fn test_estimate_key_size_scan_stops_at_length_guard() {
        // 10 bytes supports sizes 2..=5 only; whatever wins must be in range
        let best = estimate_key_size(&hex!("0b3637272a2b2e63622c"), 2, 40);
        assert!((2..=5).contains(&best));
    }

    #[test]
    fn test_break_repeating_key_xor() {
        let ciphertext = repeating_key_xor(VANILLA_ICE_LYRIC, b"ICE");
        let cracked = break_repeating_key_xor(&ciphertext, 2, 20);
        assert_eq!(b"ICE".to_vec(), cracked.key);
        assert_eq!(VANILLA_ICE_LYRIC.to_vec(), cracked.plaintext);
    }

    #[test]
    fn test_break_repeating_key_xor_ragged_columns() {
        // length not a multiple of the key size; reassembly must not drop the tail
        let plaintext = &VANILLA_ICE_LYRIC[..599];
        let ciphertext = repeating_key_xor(plaintext, b"ICE");
        let cracked = break_repeating_key_xor(&ciphertext, 2, 20);
        assert_eq!(plaintext.len(), cracked.plaintext.len());
        assert_eq!(plaintext.to_vec(), cracked.plaintext);
    }

    #[test]
    fn test_break_repeating_key_xor_too_short() {
        let cracked = break_repeating_key_xor(b"ab", 2, 40);
        assert!(cracked.key.is_empty());
        assert!(cracked.plaintext.is_empty());
    }
}
