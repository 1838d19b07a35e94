//! The evaluation engine.

use log::{debug, trace};

use crate::{
    scheme::GarblingScheme, tables::GarbledTablesHolder, types::WireKey, values::InputKeys,
    Circuit, Error, GateKind,
};

/// Selects the key matching each of the party's plaintext input bits.
///
/// `all_input_keys` holds both keys of every input wire of every party; the keys of `party`
/// are located through the circuit. The result has one key per input wire of the party.
pub fn garbled_input_from_ungarbled(
    circuit: &Circuit,
    bits: &[bool],
    all_input_keys: &InputKeys,
    party: usize,
) -> Result<Vec<WireKey>, Error> {
    let count = circuit.number_of_inputs(party)?;
    let offset = circuit.input_offset(party)?;
    if bits.len() != count {
        return Err(Error::InsufficientInput);
    }
    let pairs = all_input_keys
        .pairs()
        .get(offset..offset + count)
        .ok_or(Error::InvalidArgument(
            "the input keys do not cover the wires of this party",
        ))?;
    Ok(pairs
        .iter()
        .zip(bits)
        .map(|(pair, &bit)| pair.key(bit))
        .collect())
}

/// Evaluates the garbled circuit on one key per input wire, returning one key per output wire.
pub(crate) fn evaluate(
    circuit: &Circuit,
    scheme: &dyn GarblingScheme,
    tables: &dyn GarbledTablesHolder,
    inputs: &[WireKey],
) -> Result<Vec<WireKey>, Error> {
    if inputs.len() != circuit.num_inputs() {
        return Err(Error::NotAllInputsSet);
    }
    debug!(
        "evaluate: start wires={} gates={} table_bytes={}",
        circuit.num_wires(),
        circuit.gates().len(),
        tables.total_size()
    );

    let mut keys = vec![WireKey::default(); circuit.num_wires()];
    for (wire, key) in circuit.all_input_wires().zip(inputs) {
        keys[wire as usize] = *key;
    }

    let table_size = scheme.table_size();
    let mut table_gate = 0;
    for (index, gate) in circuit.gates().iter().enumerate() {
        let lhs = keys[gate.lhs()];
        let rhs = keys[gate.rhs()];
        // the garbler shifted key0 of XNOR and NOT outputs, so the evaluator's key carries over
        keys[gate.output() as usize] = match gate.kind() {
            GateKind::Xor | GateKind::Xnor => lhs ^ rhs,
            GateKind::Not => lhs,
            _ => {
                let rows = tables.gate_table(table_gate, table_size)?;
                table_gate += 1;
                scheme.eval_gate(index as u64, lhs, rhs, rows)?
            }
        };
        trace!("evaluate: gate[{index}] {:?} -> {}", gate.kind(), gate.output());
    }

    debug!("evaluate: complete table_gates={table_gate}");
    Ok(circuit
        .output_wires()
        .iter()
        .map(|&w| keys[w as usize])
        .collect())
}
