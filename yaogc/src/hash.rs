//! Tweakable correlation-robust hashing based on [`blake3::Hasher`].
//!
//! Every garbled row is masked with the output of one of these functions. The tweak binds the
//! row to the position of its gate in the circuit, so that equal keys on different gates never
//! produce equal masks.
use blake3::OutputReader;

use crate::types::WireKey;

/// Distinguishes the hashes of the different garbling schemes.
#[derive(Clone, Copy)]
#[repr(u8)]
pub(crate) enum Domain {
    HalfGatesGarbler = 1,
    HalfGatesEvaluator = 2,
    RowReduction = 3,
}

/// `H(key, tweak)`, used by half-gates.
pub(crate) fn hash_key(domain: Domain, key: WireKey, tweak: u64) -> WireKey {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[domain as u8]);
    hasher.update(&key.0.to_le_bytes());
    hasher.update(&tweak.to_le_bytes());
    WireKey(blake3_to_u128(hasher.finalize_xof()))
}

/// `H(lhs, rhs, tweak)`, used by garbled row reduction.
pub(crate) fn hash_keys(domain: Domain, lhs: WireKey, rhs: WireKey, tweak: u64) -> WireKey {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[domain as u8]);
    hasher.update(&lhs.0.to_le_bytes());
    hasher.update(&rhs.0.to_le_bytes());
    hasher.update(&tweak.to_le_bytes());
    WireKey(blake3_to_u128(hasher.finalize_xof()))
}

#[inline]
fn blake3_to_u128(mut output_reader: OutputReader) -> u128 {
    let mut result = [0u8; 16];
    output_reader.fill(&mut result);
    u128::from_le_bytes(result)
}

#[test]
fn tweaks_and_domains_separate() {
    let key = WireKey(rand::random());
    let h0 = hash_key(Domain::HalfGatesGarbler, key, 0);
    assert_ne!(h0, hash_key(Domain::HalfGatesGarbler, key, 1));
    assert_ne!(h0, hash_key(Domain::HalfGatesEvaluator, key, 0));
    assert_eq!(h0, hash_key(Domain::HalfGatesGarbler, key, 0));

    let other = WireKey(rand::random());
    assert_ne!(
        hash_keys(Domain::RowReduction, key, other, 7),
        hash_keys(Domain::RowReduction, other, key, 7)
    );
}

#[test]
fn randomized_hashing() {
    let r: u128 = rand::random();
    let mut input = vec![Domain::RowReduction as u8];
    input.extend_from_slice(&r.to_le_bytes());
    input.extend_from_slice(&r.to_le_bytes());
    input.extend_from_slice(&9u64.to_le_bytes());
    let ref_0 = blake3::hash(&input);
    assert_eq!(
        &ref_0.as_bytes()[..16],
        hash_keys(Domain::RowReduction, WireKey(r), WireKey(r), 9)
            .0
            .to_le_bytes()
    );
}
