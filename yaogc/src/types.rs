//! Wire keys and the free-XOR offset.

use std::ops::BitXor;

use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};

use crate::Error;

/// The number of bytes in each wire key.
pub const KEY_SIZE: usize = std::mem::size_of::<KeyBits>();

pub(crate) type KeyBits = u128;

/// One of the two keys of a wire.
///
/// The least significant bit is the key's signal (point-and-permute) bit.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireKey(pub(crate) KeyBits);

/// The global free-XOR offset `R` of a single garbling.
///
/// Its least significant bit is always set, so that `key0` and `key1 = key0 ^ R` of the same
/// wire carry opposite signal bits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Delta(pub(crate) KeyBits);

/// Both keys of a wire; `key0` encodes `false`, `key1` encodes `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePair {
    /// The key encoding `false`.
    pub key0: WireKey,
    /// The key encoding `true`.
    pub key1: WireKey,
}

impl WireKey {
    pub(crate) fn gen_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(rng.gen::<KeyBits>())
    }

    /// The point-and-permute bit of this key.
    #[inline]
    pub fn signal_bit(&self) -> bool {
        self.0 & 1 == 1
    }

    /// Little-endian byte encoding.
    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.0.to_le_bytes()
    }

    /// Parses a key from exactly [`KEY_SIZE`] little-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidArgument("a wire key must be 16 bytes long"))?;
        Ok(Self(KeyBits::from_le_bytes(bytes)))
    }

    #[inline]
    pub(crate) fn delta_xor(&self, delta: &Delta) -> WireKey {
        WireKey(self.0 ^ delta.0)
    }

    /// Shifts the key by `delta` iff `bit` is set.
    #[inline]
    pub(crate) fn select(&self, bit: bool, delta: &Delta) -> WireKey {
        WireKey(self.0 ^ (delta.0 & bit_mask(bit)))
    }

    /// Returns the key if `bit` is set and the zero key otherwise.
    #[inline]
    pub(crate) fn if_bit(&self, bit: bool) -> WireKey {
        WireKey(self.0 & bit_mask(bit))
    }
}

/// All ones for `true`, all zeros for `false`, without branching on `bit`.
#[inline]
fn bit_mask(bit: bool) -> KeyBits {
    (0 as KeyBits).wrapping_sub(KeyBits::from(bit))
}

impl std::fmt::Debug for WireKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WireKey({:032x})", self.0)
    }
}

impl ConstantTimeEq for WireKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl BitXor<WireKey> for WireKey {
    type Output = WireKey;

    fn bitxor(self, rhs: WireKey) -> Self::Output {
        WireKey(self.0 ^ rhs.0)
    }
}

impl BitXor<KeyBits> for WireKey {
    type Output = WireKey;

    fn bitxor(self, rhs: KeyBits) -> Self::Output {
        WireKey(self.0 ^ rhs)
    }
}

impl From<KeyBits> for WireKey {
    fn from(bits: KeyBits) -> WireKey {
        WireKey(bits)
    }
}

impl Delta {
    pub(crate) fn gen_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(rng.gen::<KeyBits>() | 1)
    }

    /// Recovers the offset from both keys of a wire, if they form a valid pair.
    pub(crate) fn from_pair(pair: &WirePair) -> Option<Self> {
        let delta = pair.key0.0 ^ pair.key1.0;
        if delta & 1 == 1 {
            Some(Self(delta))
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Delta(..)")
    }
}

impl WirePair {
    pub(crate) fn new(key0: WireKey, delta: &Delta) -> Self {
        Self {
            key0,
            key1: key0.delta_xor(delta),
        }
    }

    /// Returns the key encoding `bit`, without branching on `bit`.
    #[inline]
    pub fn key(&self, bit: bool) -> WireKey {
        WireKey(self.key0.0 ^ ((self.key0.0 ^ self.key1.0) & bit_mask(bit)))
    }

    /// Whether `key1 == key0 ^ delta`, compared in constant time.
    pub(crate) fn has_offset(&self, delta: &Delta) -> bool {
        bool::from(self.key1.ct_eq(&self.key0.delta_xor(delta)))
    }

    /// Returns `Some(bit)` if `key` is one of the two keys of this pair.
    pub(crate) fn decode(&self, key: &WireKey) -> Option<bool> {
        let is_0 = key.ct_eq(&self.key0);
        let is_1 = key.ct_eq(&self.key1);
        if bool::from(is_0 | is_1) {
            Some(bool::from(is_1))
        } else {
            None
        }
    }
}

#[test]
fn test_xor_impl() {
    for _ in 0..20 {
        let x: u128 = rand::random();
        let y: u128 = rand::random();

        assert_eq!(WireKey(x ^ y), WireKey(x) ^ WireKey(y));
        assert_eq!(WireKey(x ^ y), WireKey(x) ^ y);
    }
}

#[test]
fn test_delta_has_signal_bit() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let delta = Delta::gen_random(&mut rng);
        let pair = WirePair::new(WireKey::gen_random(&mut rng), &delta);
        assert_ne!(pair.key0.signal_bit(), pair.key1.signal_bit());
        assert_eq!(Delta::from_pair(&pair), Some(delta));
        assert!(pair.has_offset(&delta));
    }
}

#[test]
fn test_decode() {
    let mut rng = rand::thread_rng();
    let delta = Delta::gen_random(&mut rng);
    let pair = WirePair::new(WireKey::gen_random(&mut rng), &delta);
    assert_eq!(pair.decode(&pair.key0), Some(false));
    assert_eq!(pair.decode(&pair.key1), Some(true));
    assert_eq!(pair.decode(&(pair.key0 ^ 2)), None);
}

#[test]
fn test_key_selection() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let delta = Delta::gen_random(&mut rng);
        let pair = WirePair::new(WireKey::gen_random(&mut rng), &delta);
        assert_eq!(pair.key(false), pair.key0);
        assert_eq!(pair.key(true), pair.key1);

        // pairs that do not share an offset are selected the same way
        let pair = WirePair {
            key0: WireKey::gen_random(&mut rng),
            key1: WireKey::gen_random(&mut rng),
        };
        assert_eq!(pair.key(false), pair.key0);
        assert_eq!(pair.key(true), pair.key1);
    }
}

#[test]
fn test_key_bytes() {
    let key = WireKey(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f11);
    let bytes = key.to_bytes();
    assert_eq!(bytes[0], 0x11);
    assert_eq!(WireKey::from_bytes(&bytes), Ok(key));
    assert!(WireKey::from_bytes(&bytes[1..]).is_err());
}
