//! Cryptographic core of the hasher.
//!
//! Provides the cost factor, the secure random capability and the bcrypt
//! expensive key setup.

pub mod cost;
pub mod eks;
pub mod random;

pub use cost::Cost;
pub use eks::bcrypt_raw;
pub use random::{FixedEntropy, OsRandom, RandomSource};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the stored hash (23 of the 24 ciphertext bytes).
pub const HASH_LEN: usize = 23;
/// Bytes of key material bcrypt reads, NUL terminator included.
pub const MAX_CREDENTIAL_LEN: usize = 72;
/// Lowest accepted cost factor.
pub const MIN_COST: u32 = 4;
/// Highest accepted cost factor.
pub const MAX_COST: u32 = 31;
/// Cost used when the caller does not pick one.
pub const DEFAULT_COST: u32 = 10;
