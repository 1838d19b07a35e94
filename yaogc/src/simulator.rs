//! Local garbler / evaluator round trip under ideal conditions

use log::debug;

use crate::{Circuit, Error, GarbledCircuit, GarblingConfig};

/// Simulates the garbled execution of the circuit with the default [`GarblingConfig`].
///
/// See [`simulate_with`].
pub fn simulate(circuit: &Circuit, inputs: &[&[bool]]) -> Result<Vec<bool>, Error> {
    simulate_with(circuit, inputs, &GarblingConfig::default())
}

/// Simulates the garbled execution of the circuit, with `inputs[i]` being the input bits of
/// party `i + 1`.
///
/// A garbler instance garbles the circuit and hands its tables and translation table to a
/// separate evaluator instance, which evaluates them on the garbled inputs of all parties. The
/// garbler then translates the output keys, checking them against both keys of every output
/// wire. Oblivious transfer is replaced by the garbler selecting the input keys directly.
pub fn simulate_with(
    circuit: &Circuit,
    inputs: &[&[bool]],
    config: &GarblingConfig,
) -> Result<Vec<bool>, Error> {
    if inputs.len() != circuit.number_of_parties() {
        return Err(Error::InsufficientInput);
    }
    let mut garbler = GarbledCircuit::new(circuit.clone(), config)?;
    let (input_keys, all_output_keys, translation_table) = garbler.garble()?.into_parts();

    let mut evaluator = GarbledCircuit::new(garbler.circuit().clone(), config)?;
    evaluator.set_garbled_tables(garbler.take_garbled_tables())?;
    evaluator.set_translation_table(translation_table)?;

    let mut garbled_inputs = Vec::with_capacity(circuit.num_inputs());
    for (party, bits) in inputs.iter().enumerate() {
        garbled_inputs.extend(garbler.garbled_input_from_ungarbled(
            bits,
            &input_keys,
            party + 1,
        )?);
    }
    evaluator.set_inputs(garbled_inputs);

    let output_keys = evaluator.compute()?;
    debug!("simulate: {} output keys", output_keys.len());
    garbler.verified_translate(&output_keys, &all_output_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gate, GateKind, SchemeKind, TableLayout};

    #[test]
    fn simulates_like_plain_evaluation() {
        let circuit = Circuit::new(
            vec![
                Gate::binary(GateKind::Nand, 0, 1, 3),
                Gate::xor(3, 2, 4),
                Gate::not(4, 5),
            ],
            vec![vec![0, 1], vec![2]],
            vec![5, 3],
        );
        for config in [
            GarblingConfig::default(),
            GarblingConfig::new(SchemeKind::RowReduction, TableLayout::PerGate),
        ] {
            for x in 0..8u8 {
                let a = [x & 1 == 1, x & 2 == 2];
                let b = [x & 4 == 4];
                let expected = circuit.eval_plain(&[&a, &b]).unwrap();
                assert_eq!(simulate_with(&circuit, &[&a, &b], &config), Ok(expected));
            }
        }
    }

    #[test]
    fn rejects_missing_parties() {
        let circuit = Circuit::new(vec![Gate::and(0, 1, 2)], vec![vec![0], vec![1]], vec![2]);
        assert_eq!(
            simulate(&circuit, &[&[true]]),
            Err(Error::InsufficientInput)
        );
        assert_eq!(
            simulate(&circuit, &[&[true], &[]]),
            Err(Error::InsufficientInput)
        );
    }
}
