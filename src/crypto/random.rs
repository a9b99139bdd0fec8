//! Secure random capability used to draw salts.
//!
//! The hasher never reaches for a process-wide generator directly; it is
//! handed a [`RandomSource`] so tests can substitute fixed entropy.

use getrandom::fill;

use super::SALT_LEN;
use crate::error::{HashError, HashResult};

/// A source of cryptographically secure random bytes.
///
/// Implementations must be safe to share across threads.
pub trait RandomSource: Send + Sync {
    /// Fill `buf` completely or fail; a partial fill is never reported as success.
    fn fill(&self, buf: &mut [u8]) -> HashResult<()>;

    /// Draw a fresh salt.
    fn salt(&self) -> HashResult<[u8; SALT_LEN]> {
        let mut salt = [0u8; SALT_LEN];
        self.fill(&mut salt)?;
        Ok(salt)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn fill(&self, buf: &mut [u8]) -> HashResult<()> {
        (**self).fill(buf)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn fill(&self, buf: &mut [u8]) -> HashResult<()> {
        (**self).fill(buf)
    }
}

/// The operating system generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> HashResult<()> {
        fill(buf).map_err(|e| {
            log::error!("OS random generator unavailable: {e}");
            HashError::RandomSourceUnavailable
        })
    }
}

/// Deterministic source that repeats a fixed byte pattern.
///
/// Only meant for tests and known-answer checks. An empty pattern behaves
/// like an exhausted generator and fails every draw.
#[derive(Debug, Clone, Default)]
pub struct FixedEntropy {
    pattern: Vec<u8>,
}

impl FixedEntropy {
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// A source that always fails.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl RandomSource for FixedEntropy {
    fn fill(&self, buf: &mut [u8]) -> HashResult<()> {
        if self.pattern.is_empty() {
            return Err(HashError::RandomSourceUnavailable);
        }
        for (dst, src) in buf.iter_mut().zip(self.pattern.iter().cycle()) {
            *dst = *src;
        }
        Ok(())
    }
}
