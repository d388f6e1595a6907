use snafu::OptionExt;

use crate::crypto::aes::detect_block_and_suffix_size;
use crate::crypto::common::repeating_block;
use crate::crypto::oracle::Oracle;
use crate::crypto::padding::pad_pkcs_7;
use crate::util::{self, Error, FormatSnafu, OracleSnafu};

/// A serialized user record of the shape `email=..&uid=..&role=..`.
#[derive(Debug, PartialEq)]
pub struct Profile {
    pub email: Vec<u8>,
    pub uid: Vec<u8>,
    pub role: Vec<u8>,
}

impl Profile {
    /// Builds the record a profile server would hand out for an email
    /// address. Delimiter bytes in the attacker-supplied address are dropped
    /// before encoding, so the attacker cannot inject fields directly.
    pub fn from_email(buf: &[u8]) -> Profile {
        Profile {
            email: buf
                .iter()
                .copied()
                .filter(|&x| !(x == b'=' || x == b'&'))
                .collect(),
            uid: b"10".to_vec(),
            role: b"user".to_vec(),
        }
    }

    pub fn from_encoded(buf: &[u8]) -> Result<Profile, Error> {
        let mut fields = util::key_equals_val_parse(buf)?;
        let mut take = |name: &[u8]| {
            fields.remove(name).context(FormatSnafu {
                reason: format!("missing field {}", String::from_utf8_lossy(name)),
            })
        };
        Ok(Profile {
            email: take(b"email")?,
            uid: take(b"uid")?,
            role: take(b"role")?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        util::key_equals_val_encode(&[
            (b"email".as_slice(), self.email.as_slice()),
            (b"uid", &self.uid),
            (b"role", &self.role),
        ])
    }
}

/// ECB cut-and-paste: forges a ciphertext that decrypts to a record with
/// `role=admin`, without the key, against an oracle that encodes
/// `email=<input>&uid=10&role=user` and ECB-encrypts it under a fixed key.
///
/// Two chosen queries do all the work. The first buries an aligned block
/// reading `admin` plus valid padding inside the email field; submitting it
/// twice marks its ciphertext as the repeated block. The second sizes the
/// email so the record's fixed fields end exactly on a block boundary,
/// leaving `user` (plus padding) alone in the final block. Swapping that
/// final block for the captured `admin` block yields the forgery; ECB
/// encrypts both positions independently, so the splice goes unnoticed.
pub fn forge_admin_profile(oracle: &dyn Oracle) -> Result<Vec<u8>, Error> {
    let (block_size, _) = detect_block_and_suffix_size(oracle)?;
    let left_padding_len = block_size - b"email=".len();

    let admin_block = pad_pkcs_7(b"admin", block_size)?;
    let payload = [
        vec![b'A'; left_padding_len],
        admin_block.clone(),
        admin_block,
    ]
    .concat();
    let encrypted = oracle.encrypt(&payload);
    let (_, admin_ciphertext) = repeating_block(&encrypted, block_size).context(OracleSnafu {
        reason: "no repeated ciphertext block; oracle does not look like ECB",
    })?;

    let desired_email = b"attacker@evil.com";
    let encoded_fixed_len = b"email=&uid=10&role=".len();
    let email_len =
        util::round_up_to_nearest_multiple(encoded_fixed_len + desired_email.len(), block_size)
            - encoded_fixed_len;
    let payload_2 = [
        desired_email.to_vec(),
        vec![b'A'; email_len - desired_email.len()],
    ]
    .concat();
    let encrypted_2 = oracle.encrypt(&payload_2);

    Ok([
        &encrypted_2[..encrypted_2.len() - admin_ciphertext.len()],
        admin_ciphertext.as_slice(),
    ]
    .concat())
}
