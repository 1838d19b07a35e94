//! Values exchanged between the parties, with their byte layouts.
//!
//! Key buffers hold `2 * KEY_SIZE` bytes per wire, `key0` followed by `key1`, in the order of the
//! wires in the circuit. Translation tables hold one byte (`0` or `1`) per output wire.

use bincode::{deserialize, serialize};
use serde::{Deserialize, Serialize};

use crate::{
    types::{WireKey, WirePair, KEY_SIZE},
    Error,
};

const PAIR_SIZE: usize = 2 * KEY_SIZE;

/// Both keys of every input wire, in the order of
/// [`Circuit::all_input_wires`](crate::Circuit::all_input_wires).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputKeys(Vec<WirePair>);

/// Both keys of every output wire, in the order of
/// [`Circuit::output_wires`](crate::Circuit::output_wires).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputKeys(Vec<WirePair>);

/// The signal bit of `key0` of every output wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTable(Vec<bool>);

/// Everything the garbler keeps from a garbling, handed over to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitCreationValues {
    input_keys: InputKeys,
    output_keys: OutputKeys,
    translation_table: TranslationTable,
}

fn pairs_to_bytes(pairs: &[WirePair]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pairs.len() * PAIR_SIZE);
    for pair in pairs {
        bytes.extend_from_slice(&pair.key0.to_bytes());
        bytes.extend_from_slice(&pair.key1.to_bytes());
    }
    bytes
}

fn pairs_from_bytes(bytes: &[u8]) -> Result<Vec<WirePair>, Error> {
    if bytes.len() % PAIR_SIZE != 0 {
        return Err(Error::InvalidArgument(
            "key buffers must hold two keys per wire",
        ));
    }
    bytes
        .chunks_exact(PAIR_SIZE)
        .map(|chunk| {
            Ok(WirePair {
                key0: WireKey::from_bytes(&chunk[..KEY_SIZE])?,
                key1: WireKey::from_bytes(&chunk[KEY_SIZE..])?,
            })
        })
        .collect()
}

impl InputKeys {
    /// Wraps the key pairs of all input wires.
    pub fn new(pairs: Vec<WirePair>) -> Self {
        Self(pairs)
    }

    /// The key pairs, one per input wire.
    pub fn pairs(&self) -> &[WirePair] {
        &self.0
    }

    /// Number of input wires covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no input wire is covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the keys as `len() * 2 * KEY_SIZE` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        pairs_to_bytes(&self.0)
    }

    /// Parses a buffer produced by [`InputKeys::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        pairs_from_bytes(bytes).map(Self)
    }
}

impl OutputKeys {
    /// Wraps the key pairs of all output wires.
    pub fn new(pairs: Vec<WirePair>) -> Self {
        Self(pairs)
    }

    /// The key pairs, one per output wire.
    pub fn pairs(&self) -> &[WirePair] {
        &self.0
    }

    /// Number of output wires covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no output wire is covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the keys as `len() * 2 * KEY_SIZE` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        pairs_to_bytes(&self.0)
    }

    /// Parses a buffer produced by [`OutputKeys::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        pairs_from_bytes(bytes).map(Self)
    }
}

impl TranslationTable {
    /// Wraps one entry per output wire.
    pub fn new(entries: Vec<bool>) -> Self {
        Self(entries)
    }

    /// The entries, one per output wire.
    pub fn entries(&self) -> &[bool] {
        &self.0
    }

    /// Number of output wires covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes every entry as a single `0` or `1` byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().map(|&bit| u8::from(bit)).collect()
    }

    /// Parses a buffer produced by [`TranslationTable::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        bytes
            .iter()
            .map(|byte| match byte {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(Error::InvalidArgument(
                    "translation table entries must be 0 or 1",
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl CircuitCreationValues {
    pub(crate) fn new(
        input_keys: InputKeys,
        output_keys: OutputKeys,
        translation_table: TranslationTable,
    ) -> Self {
        Self {
            input_keys,
            output_keys,
            translation_table,
        }
    }

    /// Both keys of every input wire.
    pub fn input_keys(&self) -> &InputKeys {
        &self.input_keys
    }

    /// Both keys of every output wire.
    pub fn output_keys(&self) -> &OutputKeys {
        &self.output_keys
    }

    /// The translation table of the garbling.
    pub fn translation_table(&self) -> &TranslationTable {
        &self.translation_table
    }

    /// Moves the three values out.
    pub fn into_parts(self) -> (InputKeys, OutputKeys, TranslationTable) {
        (self.input_keys, self.output_keys, self.translation_table)
    }

    /// Serializes the values as a bincode message.
    pub fn to_bincode(&self) -> Result<Vec<u8>, Error> {
        Ok(serialize(self)?)
    }

    /// Deserializes values produced by [`CircuitCreationValues::to_bincode`].
    pub fn from_bincode(msg: &[u8]) -> Result<Self, Error> {
        Ok(deserialize(msg)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<WirePair> {
        (0..3u128)
            .map(|i| WirePair {
                key0: WireKey(i << 1),
                key1: WireKey((i << 1) | 1),
            })
            .collect()
    }

    #[test]
    fn key_buffer_layout() {
        let keys = InputKeys::new(pairs());
        let bytes = keys.to_bytes();
        assert_eq!(bytes.len(), 3 * 2 * KEY_SIZE);
        // wire 1: key0 = 2, key1 = 3, little-endian
        assert_eq!(bytes[2 * KEY_SIZE], 2);
        assert_eq!(bytes[3 * KEY_SIZE], 3);
        assert_eq!(InputKeys::from_bytes(&bytes), Ok(keys));
        assert!(OutputKeys::from_bytes(&bytes[1..]).is_err());
    }

    #[test]
    fn translation_table_layout() {
        let table = TranslationTable::new(vec![true, false, true]);
        assert_eq!(table.to_bytes(), vec![1, 0, 1]);
        assert_eq!(TranslationTable::from_bytes(&[1, 0, 1]), Ok(table));
        assert!(TranslationTable::from_bytes(&[2]).is_err());
    }

    #[test]
    fn bincode_messages() {
        let values = CircuitCreationValues::new(
            InputKeys::new(pairs()),
            OutputKeys::new(pairs()[..1].to_vec()),
            TranslationTable::new(vec![false]),
        );
        let msg = values.to_bincode().unwrap();
        assert_eq!(CircuitCreationValues::from_bincode(&msg), Ok(values.clone()));

        let (input_keys, output_keys, translation_table) = values.into_parts();
        assert_eq!(input_keys.len(), 3);
        assert_eq!(output_keys.pairs(), &pairs()[..1]);
        assert_eq!(translation_table.entries(), &[false]);
        assert_eq!(
            CircuitCreationValues::from_bincode(&msg[..3]),
            Err(Error::BincodeError)
        );
    }
}
