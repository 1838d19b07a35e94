//! The translation engine, turning output keys into plaintext bits.

use log::warn;

use crate::{
    types::WireKey,
    values::{OutputKeys, TranslationTable},
    Error,
};

/// Translates one key per output wire: the plaintext bit is the key's signal bit XOR the
/// translation table entry.
pub(crate) fn translate(
    translation_table: &TranslationTable,
    output_keys: &[WireKey],
) -> Result<Vec<bool>, Error> {
    if output_keys.len() != translation_table.len() {
        return Err(Error::InvalidArgument(
            "expected exactly one key per output wire",
        ));
    }
    Ok(output_keys
        .iter()
        .zip(translation_table.entries())
        .map(|(key, &entry)| key.signal_bit() ^ entry)
        .collect())
}

/// Translates one key per output wire, failing with [`Error::CheatAttempt`] if a key is neither
/// of the two valid keys of its wire.
pub(crate) fn verified_translate(
    output_keys: &[WireKey],
    all_output_keys: &OutputKeys,
) -> Result<Vec<bool>, Error> {
    if output_keys.len() != all_output_keys.len() {
        return Err(Error::InvalidArgument(
            "expected exactly one key per output wire",
        ));
    }
    output_keys
        .iter()
        .zip(all_output_keys.pairs())
        .enumerate()
        .map(|(output, (key, pair))| {
            pair.decode(key).ok_or_else(|| {
                warn!("translate: output {output} received an invalid key");
                Error::CheatAttempt { output }
            })
        })
        .collect()
}
