use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_COST, MAX_COST, MIN_COST};
use crate::error::{HashError, HashResult};

/// Validated bcrypt work factor; the key setup runs `2^cost` rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Cost(u32);

impl Default for Cost {
    fn default() -> Self {
        Self(DEFAULT_COST)
    }
}

impl Cost {
    pub fn new(cost: u32) -> HashResult<Self> {
        let cost = Self(cost);
        cost.validate()?;
        Ok(cost)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Number of expensive key setup rounds.
    pub fn rounds(&self) -> u64 {
        1u64 << self.0
    }

    pub fn validate(&self) -> HashResult<()> {
        if !(MIN_COST..=MAX_COST).contains(&self.0) {
            return Err(HashError::InvalidCostFactor(self.0));
        }
        Ok(())
    }
}

impl TryFrom<u32> for Cost {
    type Error = HashError;

    fn try_from(value: u32) -> HashResult<Self> {
        Self::new(value)
    }
}

impl From<Cost> for u32 {
    fn from(cost: Cost) -> Self {
        cost.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}
