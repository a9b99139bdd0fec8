//! Error types for hashing and verification.
//!
//! Messages never carry credential material.

use thiserror::Error;

use crate::crypto::{MAX_COST, MAX_CREDENTIAL_LEN, MIN_COST};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    /// Cost factor outside the supported range.
    #[error("cost factor {0} is outside [{}, {}]", MIN_COST, MAX_COST)]
    InvalidCostFactor(u32),

    /// The secure random source could not supply a salt.
    #[error("secure random source unavailable")]
    RandomSourceUnavailable,

    /// The encoded digest is not a `$version$cost$salthash` tuple.
    #[error("malformed encoded digest")]
    MalformedDigest,

    /// The version tag parsed but is not one this crate computes.
    #[error("unsupported digest version: {0}")]
    UnsupportedVersion(String),

    /// Strict truncation policy refused a credential longer than 72 bytes.
    #[error(
        "credential is {0} bytes, longer than the {} bytes bcrypt reads",
        MAX_CREDENTIAL_LEN
    )]
    CredentialTooLong(usize),
}

pub type HashResult<T> = Result<T, HashError>;
