//! Encoded digest format.
//!
//! ```text
//! $<version>$<cost, 2 digits>$<salt, 22 chars><hash, 31 chars>
//! ```
//!
//! The encoded digest is self-describing: version, cost and salt are all
//! recovered from the string alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::crypto::{Cost, HASH_LEN, SALT_LEN};
use crate::error::{HashError, HashResult};

pub mod radix64;

use radix64::{HASH_CHARS, SALT_CHARS};

/// Total length of an encoded digest.
pub const ENCODED_LEN: usize = 7 + SALT_CHARS + HASH_CHARS;

/// bcrypt version tags this crate hashes and verifies.
///
/// All three compute the same function; they differ only in the tag
/// written to the digest. `2x` (crypt_blowfish's sign-extension bug) is
/// deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Version {
    #[serde(rename = "2a")]
    TwoA,
    #[default]
    #[serde(rename = "2b")]
    TwoB,
    #[serde(rename = "2y")]
    TwoY,
}

impl Version {
    pub fn tag(&self) -> &'static str {
        match self {
            Version::TwoA => "2a",
            Version::TwoB => "2b",
            Version::TwoY => "2y",
        }
    }

    /// Resolve a version tag.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDigest` if `tag` is not shaped like a version and
    /// `UnsupportedVersion` if it is shaped like one but unknown.
    pub fn from_tag(tag: &str) -> HashResult<Self> {
        if tag.is_empty() || tag.len() > 2 || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(HashError::MalformedDigest);
        }
        match tag {
            "2a" => Ok(Version::TwoA),
            "2b" => Ok(Version::TwoB),
            "2y" => Ok(Version::TwoY),
            other => Err(HashError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Version {
    type Err = HashError;

    fn from_str(s: &str) -> HashResult<Self> {
        Self::from_tag(s)
    }
}

/// A parsed encoded digest. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDigest {
    version: Version,
    cost: Cost,
    salt: [u8; SALT_LEN],
    hash: [u8; HASH_LEN],
}

impl EncodedDigest {
    pub(crate) fn new(
        version: Version,
        cost: Cost,
        salt: [u8; SALT_LEN],
        hash: [u8; HASH_LEN],
    ) -> Self {
        Self {
            version,
            cost,
            salt,
            hash,
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn hash(&self) -> &[u8; HASH_LEN] {
        &self.hash
    }

    /// Salt in radix-64, as it appears in the encoded digest.
    pub fn encoded_salt(&self) -> String {
        radix64::encode(&self.salt)
    }

    /// Parses an encoded digest.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The string is not `$tag$cost$body`
    /// - The version tag is unknown
    /// - The cost is not two digits in range
    /// - The body is not 22 + 31 radix-64 characters
    pub fn parse(encoded: &str) -> HashResult<Self> {
        let rest = encoded
            .strip_prefix('$')
            .ok_or(HashError::MalformedDigest)?;

        let mut fields = rest.splitn(3, '$');
        let (Some(tag), Some(cost), Some(body)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(HashError::MalformedDigest);
        };

        let version = Version::from_tag(tag)?;
        let cost = parse_cost(cost)?;

        if !body.is_ascii() || body.len() != SALT_CHARS + HASH_CHARS {
            return Err(HashError::MalformedDigest);
        }
        let (salt, hash) = body.split_at(SALT_CHARS);

        Ok(Self {
            version,
            cost,
            salt: radix64::decode_salt(salt)?,
            hash: radix64::decode_hash(hash)?,
        })
    }
}

fn parse_cost(text: &str) -> HashResult<Cost> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HashError::MalformedDigest);
    }
    let value: u32 = text.parse().map_err(|_| HashError::MalformedDigest)?;
    Cost::new(value).map_err(|_| HashError::MalformedDigest)
}

impl fmt::Display for EncodedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${}${}{}",
            self.version,
            self.cost,
            radix64::encode(&self.salt),
            radix64::encode(&self.hash)
        )
    }
}

impl FromStr for EncodedDigest {
    type Err = HashError;

    fn from_str(s: &str) -> HashResult<Self> {
        Self::parse(s)
    }
}
