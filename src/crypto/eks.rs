//! bcrypt expensive key setup.
//!
//! The Blowfish primitive (state init, key expansion, block encryption)
//! comes from the `blowfish` crate; the cost schedule and output
//! derivation live here.

use blowfish::Blowfish;
use log::trace;
use zeroize::{Zeroize, Zeroizing};

use super::{Cost, HASH_LEN, MAX_CREDENTIAL_LEN, SALT_LEN};

/// "OrpheanBeholderScryDoubt" as big-endian words.
const MAGIC_TEXT: [u32; 6] = [
    0x4f72_7068,
    0x6561_6e42,
    0x6568_6f6c,
    0x6465_7253,
    0x6372_7944,
    0x6f75_6274,
];

/// Key material bcrypt actually consumes: the credential plus a NUL
/// terminator, cut to 72 bytes.
pub fn key_material(credential: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(Vec::with_capacity(credential.len() + 1));
    key.extend_from_slice(credential);
    key.push(0);
    key.truncate(MAX_CREDENTIAL_LEN);
    key
}

/// Returns `true` when bytes of `credential` would be ignored.
pub fn truncates(credential: &[u8]) -> bool {
    credential.len() > MAX_CREDENTIAL_LEN
}

fn setup(cost: Cost, salt: &[u8; SALT_LEN], key: &[u8]) -> Blowfish {
    let mut state: Blowfish = Blowfish::bc_init_state();
    state.salted_expand_key(salt, key);
    for _ in 0..cost.rounds() {
        state.bc_expand_key(key);
        state.bc_expand_key(salt);
    }
    state
}

/// Compute the raw 23-byte bcrypt hash.
///
/// Runs to completion once started; there is no partial result.
pub fn bcrypt_raw(cost: Cost, salt: &[u8; SALT_LEN], credential: &[u8]) -> [u8; HASH_LEN] {
    let key = key_material(credential);
    let started = std::time::Instant::now();

    let state = setup(cost, salt, &key);

    let mut ctext = MAGIC_TEXT;
    for pair in ctext.chunks_exact_mut(2) {
        let mut lr = [pair[0], pair[1]];
        for _ in 0..64 {
            lr = state.bc_encrypt(lr);
        }
        pair.copy_from_slice(&lr);
    }

    let mut full = [0u8; HASH_LEN + 1];
    for (chunk, word) in full.chunks_exact_mut(4).zip(ctext.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    ctext.zeroize();

    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(&full[..HASH_LEN]);
    full.zeroize();

    trace!(
        "bcrypt cost {} finished in {:?}",
        cost.get(),
        started.elapsed()
    );
    out
}
