//! bcrypt radix-64: base64 over `./A-Za-z0-9`, unpadded.

use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::crypto::{HASH_LEN, SALT_LEN};
use crate::error::{HashError, HashResult};

/// Encoded length of the 16-byte salt.
pub const SALT_CHARS: usize = 22;
/// Encoded length of the 23-byte hash.
pub const HASH_CHARS: usize = 31;

// crypt_blowfish ignores the unused low bits of the final character, so
// decoding does too.
const BCRYPT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

pub fn encode(bytes: &[u8]) -> String {
    BCRYPT.encode(bytes)
}

pub fn decode_salt(text: &str) -> HashResult<[u8; SALT_LEN]> {
    decode_exact::<SALT_LEN>(text, SALT_CHARS)
}

pub fn decode_hash(text: &str) -> HashResult<[u8; HASH_LEN]> {
    decode_exact::<HASH_LEN>(text, HASH_CHARS)
}

fn decode_exact<const N: usize>(text: &str, chars: usize) -> HashResult<[u8; N]> {
    if text.len() != chars {
        return Err(HashError::MalformedDigest);
    }
    let bytes = BCRYPT
        .decode(text)
        .map_err(|_| HashError::MalformedDigest)?;
    bytes.try_into().map_err(|_| HashError::MalformedDigest)
}
