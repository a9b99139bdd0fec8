//! Hasher configuration.

use serde::{Deserialize, Serialize};

use crate::crypto::Cost;
use crate::error::HashResult;
use crate::format::Version;

/// Tunables of a [`Hasher`](crate::Hasher).
///
/// Deserializable so callers can embed it in their own configuration files;
/// missing fields fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    default_cost: u32,
    version: Version,
    reject_truncation: bool,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            // 2^10 key setup rounds
            default_cost: Cost::default().get(),
            version: Version::TwoB,
            reject_truncation: false,
        }
    }
}

impl HasherConfig {
    pub fn new(default_cost: u32, version: Version, reject_truncation: bool) -> HashResult<Self> {
        let config = Self {
            default_cost,
            version,
            reject_truncation,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn default_cost(&self) -> u32 {
        self.default_cost
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn reject_truncation(&self) -> bool {
        self.reject_truncation
    }

    pub fn with_default_cost(mut self, cost: u32) -> HashResult<Self> {
        self.default_cost = cost;
        self.validate()?;
        Ok(self)
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_reject_truncation(mut self, reject: bool) -> Self {
        self.reject_truncation = reject;
        self
    }

    pub fn validate(&self) -> HashResult<()> {
        Cost::new(self.default_cost)?;
        Ok(())
    }
}
