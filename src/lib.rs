mod config;
mod crypto;
mod error;
mod format;

pub use crate::config::HasherConfig;
pub use crate::crypto::{
    Cost, DEFAULT_COST, FixedEntropy, HASH_LEN, MAX_COST, MAX_CREDENTIAL_LEN, MIN_COST, OsRandom,
    RandomSource, SALT_LEN,
};
pub use crate::error::{HashError, HashResult};
pub use crate::format::{ENCODED_LEN, EncodedDigest, Version};

use log::{debug, warn};
use subtle::ConstantTimeEq;

/// Salted, versioned bcrypt hasher.
///
/// Holds no mutable state: one instance can be shared across threads and
/// used concurrently. The random source is injected so tests can fix the
/// salt draw.
#[derive(Debug, Clone)]
pub struct Hasher<R: RandomSource = OsRandom> {
    rng: R,
    config: HasherConfig,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            rng: OsRandom,
            config: HasherConfig::default(),
        }
    }

    pub fn with_config(config: HasherConfig) -> HashResult<Self> {
        Self::with_random(OsRandom, config)
    }
}

impl<R: RandomSource> Hasher<R> {
    pub fn with_random(rng: R, config: HasherConfig) -> HashResult<Self> {
        config.validate()?;
        Ok(Self { rng, config })
    }

    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Hash `credential` under a fresh salt.
    ///
    /// Only the first 72 bytes of the credential affect the digest unless
    /// the configuration rejects longer input.
    ///
    /// # Errors
    ///
    /// - `InvalidCostFactor` if `cost` is outside `[4, 31]`
    /// - `CredentialTooLong` under the strict truncation policy
    /// - `RandomSourceUnavailable` if no salt could be drawn
    pub fn hash(&self, credential: impl AsRef<[u8]>, cost: u32) -> HashResult<EncodedDigest> {
        let credential = credential.as_ref();
        let cost = Cost::new(cost)?;
        self.check_length(credential)?;

        let salt = self.rng.salt()?;
        Ok(self.compute(credential, cost, salt))
    }

    /// [`hash`](Self::hash) with the configured default cost.
    pub fn hash_default(&self, credential: impl AsRef<[u8]>) -> HashResult<EncodedDigest> {
        self.hash(credential, self.config.default_cost())
    }

    /// Deterministic hash under a caller-supplied salt.
    ///
    /// Meant for known-answer checks and migrations; regular callers should
    /// use [`hash`](Self::hash) so salts are never reused.
    pub fn hash_with_salt(
        &self,
        credential: impl AsRef<[u8]>,
        cost: u32,
        salt: [u8; SALT_LEN],
    ) -> HashResult<EncodedDigest> {
        let credential = credential.as_ref();
        let cost = Cost::new(cost)?;
        self.check_length(credential)?;
        Ok(self.compute(credential, cost, salt))
    }

    /// Check `credential` against a stored encoded digest.
    ///
    /// A wrong credential is `Ok(false)`. A digest that does not parse is an
    /// error, never `false`.
    pub fn verify(&self, credential: impl AsRef<[u8]>, encoded: &str) -> HashResult<bool> {
        let digest = EncodedDigest::parse(encoded)?;
        Ok(self.verify_digest(credential, &digest))
    }

    pub fn verify_digest(&self, credential: impl AsRef<[u8]>, digest: &EncodedDigest) -> bool {
        debug!(
            "verifying against ${}${} digest",
            digest.version(),
            digest.cost()
        );
        let computed = crypto::bcrypt_raw(digest.cost(), digest.salt(), credential.as_ref());
        computed[..].ct_eq(&digest.hash()[..]).into()
    }

    /// Whether a stored digest is weaker than what this hasher would produce
    /// now: a lower cost or a different version tag.
    pub fn needs_rehash(&self, encoded: &str) -> HashResult<bool> {
        let digest = EncodedDigest::parse(encoded)?;
        Ok(digest.cost().get() < self.config.default_cost()
            || digest.version() != self.config.version())
    }

    fn check_length(&self, credential: &[u8]) -> HashResult<()> {
        if crypto::eks::truncates(credential) {
            if self.config.reject_truncation() {
                return Err(HashError::CredentialTooLong(credential.len()));
            }
            warn!(
                "credential longer than {MAX_CREDENTIAL_LEN} bytes; trailing bytes are ignored"
            );
        }
        Ok(())
    }

    fn compute(&self, credential: &[u8], cost: Cost, salt: [u8; SALT_LEN]) -> EncodedDigest {
        let version = self.config.version();
        debug!("hashing credential as ${version}${cost}");
        let hash = crypto::bcrypt_raw(cost, &salt, credential);
        EncodedDigest::new(version, cost, salt, hash)
    }
}

/// Hash with the OS random source and default configuration.
pub fn hash(credential: impl AsRef<[u8]>, cost: u32) -> HashResult<EncodedDigest> {
    Hasher::new().hash(credential, cost)
}

/// Verify with the default configuration.
pub fn verify(credential: impl AsRef<[u8]>, encoded: &str) -> HashResult<bool> {
    Hasher::new().verify(credential, encoded)
}

/// Cost factor embedded in an encoded digest.
pub fn cost_of(encoded: &str) -> HashResult<Cost> {
    Ok(EncodedDigest::parse(encoded)?.cost())
}

/// Returns `true` when bytes of `credential` beyond the 72nd would be ignored.
pub fn truncates(credential: impl AsRef<[u8]>) -> bool {
    crypto::eks::truncates(credential.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(byte: u8) -> Hasher<FixedEntropy> {
        Hasher::with_random(FixedEntropy::new([byte]), HasherConfig::default()).unwrap()
    }

    #[test]
    fn hash_verify_roundtrip() {
        let hasher = Hasher::new();
        for cost in [4, 5, 6] {
            let digest = hasher.hash("pwd", cost).unwrap();
            assert!(hasher.verify("pwd", &digest.to_string()).unwrap());
        }
    }

    #[test]
    fn wrong_credential_is_false_not_error() {
        let digest = hash("first", 4).unwrap().to_string();
        assert_eq!(verify("second", &digest), Ok(false));
        assert_eq!(verify("", &digest), Ok(false));
    }

    #[test]
    fn salts_are_fresh_per_call() {
        let a = hash("same", 4).unwrap();
        let b = hash("same", 4).unwrap();
        assert_ne!(a.to_string(), b.to_string());
        assert_ne!(a.salt(), b.salt());
        assert!(verify("same", &a.to_string()).unwrap());
        assert!(verify("same", &b.to_string()).unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        assert_eq!(
            verify("pwd", "not-a-digest"),
            Err(HashError::MalformedDigest)
        );
    }

    #[test]
    fn cost_bounds() {
        let hasher = fixed(1);
        assert_eq!(hasher.hash("pwd", 3), Err(HashError::InvalidCostFactor(3)));
        assert_eq!(
            hasher.hash("pwd", 32),
            Err(HashError::InvalidCostFactor(32))
        );
        assert!(hasher.hash("pwd", 4).is_ok());
    }

    #[test]
    #[ignore = "2^31 key setup rounds take hours"]
    fn max_cost_succeeds() {
        let digest = fixed(1).hash("pwd", 31).unwrap();
        assert!(digest.to_string().starts_with("$2b$31$"));
    }

    #[test]
    fn cost_is_checked_before_drawing_entropy() {
        let hasher = Hasher::with_random(FixedEntropy::unavailable(), HasherConfig::default())
            .unwrap();
        assert_eq!(hasher.hash("pwd", 2), Err(HashError::InvalidCostFactor(2)));
        assert_eq!(
            hasher.hash("pwd", 4),
            Err(HashError::RandomSourceUnavailable)
        );
    }

    #[test]
    fn fixed_entropy_is_deterministic() {
        let digest = fixed(42).hash("correct horse battery staple", 4).unwrap();
        assert_eq!(
            digest.to_string(),
            "$2b$04$IgmoIgmoIgmoIgmoIgmoIecTcDuSUIYZJ5OSwfI/QmLK5qQyorRri"
        );
    }

    #[test]
    fn correct_horse_at_default_cost() {
        let hasher = Hasher::new();
        let digest = hasher
            .hash_default("correct horse battery staple")
            .unwrap()
            .to_string();

        assert!(digest.starts_with("$2b$10$"));
        assert_eq!(digest.len(), ENCODED_LEN);
        assert!(hasher.verify("correct horse battery staple", &digest).unwrap());
        assert!(!hasher.verify("wrong password", &digest).unwrap());
    }

    #[test]
    fn hash_with_salt_matches_fixed_vector() {
        let digest = Hasher::new()
            .hash_with_salt("pwd", 4, *b"abcdefghijklmnop")
            .unwrap();
        assert_eq!(
            digest.to_string(),
            "$2b$04$WUHhXETkX0fnYkrqZU3ta.yH4QW8Zo4vYkY0mO2BL9lypK8P5/fxm"
        );
    }

    #[test]
    fn configured_version_is_written() {
        let config = HasherConfig::default().with_version(Version::TwoY);
        let hasher = Hasher::with_random(FixedEntropy::new(*b"abcdefghijklmnop"), config).unwrap();
        let digest = hasher.hash("hunter2", 5).unwrap().to_string();
        assert_eq!(
            digest,
            "$2y$05$WUHhXETkX0fnYkrqZU3ta.eemkuQemn7SY87OGuTL3Q9E2fmmrey6"
        );
    }

    #[test]
    fn long_credentials_truncate_silently_by_default() {
        let long = [b'x'; 80];
        let mut other = long;
        other[79] = b'y';

        assert!(truncates(long));
        let digest = fixed(3).hash(long, 4).unwrap().to_string();
        assert!(verify(other, &digest).unwrap());
    }

    #[test]
    fn strict_policy_rejects_long_credentials() {
        let config = HasherConfig::default().with_reject_truncation(true);
        let hasher = Hasher::with_random(FixedEntropy::new([3u8]), config).unwrap();

        assert_eq!(
            hasher.hash([b'x'; 73], 4),
            Err(HashError::CredentialTooLong(73))
        );
        assert!(hasher.hash([b'x'; 72], 4).is_ok());

        // verify is not subject to the hash-time policy
        let digest = fixed(3).hash([b'x'; 80], 4).unwrap().to_string();
        assert!(hasher.verify([b'x'; 80], &digest).unwrap());
    }

    #[test]
    fn needs_rehash_on_weaker_digest() {
        let hasher = Hasher::with_config(HasherConfig::default().with_default_cost(6).unwrap())
            .unwrap();
        let weak = hash("pw", 4).unwrap().to_string();
        let current = hasher.hash_default("pw").unwrap().to_string();
        let stronger = hasher.hash("pw", 7).unwrap().to_string();
        let other_tag = weak.replacen("$2b$04$", "$2a$06$", 1);

        assert!(hasher.needs_rehash(&weak).unwrap());
        assert!(!hasher.needs_rehash(&current).unwrap());
        assert!(!hasher.needs_rehash(&stronger).unwrap());
        assert!(hasher.needs_rehash(&other_tag).unwrap());
        assert_eq!(
            hasher.needs_rehash("garbage"),
            Err(HashError::MalformedDigest)
        );
    }

    #[test]
    fn cost_of_reads_embedded_cost() {
        let digest = hash("pw", 5).unwrap().to_string();
        assert_eq!(cost_of(&digest).unwrap().get(), 5);
        assert_eq!(cost_of("$2b$xx$"), Err(HashError::MalformedDigest));
    }

    #[test]
    fn invalid_config_is_refused() {
        let config: HasherConfig = serde_json::from_str(r#"{"default_cost": 2}"#).unwrap();
        assert_eq!(
            Hasher::with_config(config).unwrap_err(),
            HashError::InvalidCostFactor(2)
        );
    }

    #[test]
    fn shared_hasher_across_threads() {
        let hasher = Hasher::new();
        let digests: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let hasher = &hasher;
                    scope.spawn(move || hasher.hash(format!("pw-{i}"), 4).unwrap().to_string())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, digest) in digests.iter().enumerate() {
            assert!(hasher.verify(format!("pw-{i}"), digest).unwrap());
            assert!(!hasher.verify(format!("pw-{}", i + 1), digest).unwrap());
        }
    }
}
