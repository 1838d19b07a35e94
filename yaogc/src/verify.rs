//! The verification engine, used to audit a garbling instead of evaluating it.
//!
//! Given both keys of every input wire, the engine re-derives both keys of every wire by
//! construction. Free gates propagate `key0`; the table of every other gate is decrypted under
//! all four combinations of input keys and each result has to be the output key dictated by the
//! gate's truth table. A tampered table row, a wrong offset or a mismatching translation table
//! all make verification fail.

use log::{debug, trace, warn};
use subtle::{Choice, ConstantTimeEq};

use crate::{
    scheme::GarblingScheme,
    tables::GarbledTablesHolder,
    types::{Delta, WireKey, WirePair},
    values::{InputKeys, OutputKeys, TranslationTable},
    Circuit, Error, Gate, GateKind,
};

/// Re-derives both keys of every output wire.
///
/// Returns `None` as soon as the garbling turns out to be inconsistent.
pub(crate) fn internal_verify(
    circuit: &Circuit,
    scheme: &dyn GarblingScheme,
    tables: &dyn GarbledTablesHolder,
    all_input_keys: &InputKeys,
) -> Result<Option<OutputKeys>, Error> {
    if all_input_keys.len() != circuit.num_inputs() {
        return Err(Error::NotAllInputsSet);
    }
    debug!(
        "verify: start wires={} gates={} table_bytes={}",
        circuit.num_wires(),
        circuit.gates().len(),
        tables.total_size()
    );

    let pairs = all_input_keys.pairs();
    let Some(delta) = pairs.first().and_then(Delta::from_pair) else {
        warn!("verify: input keys do not define a valid offset");
        return Ok(None);
    };
    if let Some(wire) = pairs.iter().position(|p| !p.has_offset(&delta)) {
        warn!("verify: input {wire} does not share the offset of the other inputs");
        return Ok(None);
    }

    let mut keys = vec![WireKey::default(); circuit.num_wires()];
    for (wire, pair) in circuit.all_input_wires().zip(pairs) {
        keys[wire as usize] = pair.key0;
    }

    let table_size = scheme.table_size();
    let mut table_gate = 0;
    for (index, gate) in circuit.gates().iter().enumerate() {
        let lhs = keys[gate.lhs()];
        let rhs = keys[gate.rhs()];
        let output = match gate.kind() {
            GateKind::Xor => lhs ^ rhs,
            GateKind::Xnor => (lhs ^ rhs).delta_xor(&delta),
            GateKind::Not => lhs.delta_xor(&delta),
            _ => {
                let rows = tables.gate_table(table_gate, table_size)?;
                table_gate += 1;
                let lhs = WirePair::new(lhs, &delta);
                let rhs = WirePair::new(rhs, &delta);
                match verify_table_gate(scheme, index as u64, gate, &lhs, &rhs, &delta, rows)? {
                    Some(output) => output,
                    None => {
                        warn!("verify: gate[{index}] {:?} is not garbled correctly", gate.kind());
                        return Ok(None);
                    }
                }
            }
        };
        trace!("verify: gate[{index}] {:?} -> {}", gate.kind(), gate.output());
        keys[gate.output() as usize] = output;
    }

    debug!("verify: complete table_gates={table_gate}");
    Ok(Some(OutputKeys::new(
        circuit
            .output_wires()
            .iter()
            .map(|&w| WirePair::new(keys[w as usize], &delta))
            .collect(),
    )))
}

/// Decrypts the table of a non-free gate under all four input combinations and returns the
/// output `key0` if every result matches the gate's truth table.
fn verify_table_gate(
    scheme: &dyn GarblingScheme,
    index: u64,
    gate: &Gate,
    lhs: &WirePair,
    rhs: &WirePair,
    delta: &Delta,
    rows: &[u8],
) -> Result<Option<WireKey>, Error> {
    let kind = gate.kind();
    let out = scheme.eval_gate(index, lhs.key0, rhs.key0, rows)?;
    let out0 = out.select(kind.eval(false, false), delta);

    let mut consistent = Choice::from(1);
    for (a, b) in [(false, true), (true, false), (true, true)] {
        let out = scheme.eval_gate(index, lhs.key(a), rhs.key(b), rows)?;
        consistent &= out.ct_eq(&out0.select(kind.eval(a, b), delta));
    }
    Ok(bool::from(consistent).then_some(out0))
}

/// Checks that the translation table matches both keys of every output wire.
pub(crate) fn verify_translation_table(
    translation_table: &TranslationTable,
    all_output_keys: &OutputKeys,
) -> bool {
    if translation_table.len() != all_output_keys.len() {
        warn!(
            "verify: {} output key pairs for {} translation table entries",
            all_output_keys.len(),
            translation_table.len()
        );
        return false;
    }
    for (output, (pair, &entry)) in all_output_keys
        .pairs()
        .iter()
        .zip(translation_table.entries())
        .enumerate()
    {
        let valid_pair = pair.key0.signal_bit() != pair.key1.signal_bit();
        if !valid_pair || pair.key0.signal_bit() != entry {
            warn!("verify: translation of output {output} does not match its keys");
            return false;
        }
    }
    true
}
