//! The garbling engine.
//!
//! Assigns a random `key0` to every input wire, draws the free-XOR offset and then walks the
//! gates in circuit order. Free gates derive their output key by XOR, all other gates are
//! garbled by the configured [`GarblingScheme`].

use log::{debug, trace};
use rand::{CryptoRng, RngCore};

use crate::{
    scheme::GarblingScheme,
    types::{Delta, WireKey, WirePair},
    values::{CircuitCreationValues, InputKeys, OutputKeys, TranslationTable},
    Circuit, Error, GateKind, WireId,
};

/// `key0` of every wire of a single garbling, together with its offset.
struct WireKeyMaterial {
    delta: Delta,
    keys: Vec<WireKey>,
}

impl WireKeyMaterial {
    fn pair(&self, wire: WireId) -> WirePair {
        WirePair::new(self.keys[wire as usize], &self.delta)
    }

    /// Collects the key pairs of the input and output wires and the translation table.
    fn creation_values(&self, circuit: &Circuit) -> CircuitCreationValues {
        let input_keys = InputKeys::new(circuit.all_input_wires().map(|w| self.pair(w)).collect());
        let output_pairs: Vec<WirePair> = circuit
            .output_wires()
            .iter()
            .map(|&w| self.pair(w))
            .collect();
        let translation_table =
            TranslationTable::new(output_pairs.iter().map(|p| p.key0.signal_bit()).collect());
        CircuitCreationValues::new(input_keys, OutputKeys::new(output_pairs), translation_table)
    }
}

/// Garbles `circuit`, returning the values kept by the garbler and the tables of all non-free
/// gates, back to back.
pub(crate) fn garble<R: RngCore + CryptoRng>(
    circuit: &Circuit,
    scheme: &dyn GarblingScheme,
    rng: &mut R,
) -> Result<(CircuitCreationValues, Vec<u8>), Error> {
    let (material, tables) = garble_wires(circuit, scheme, rng)?;
    Ok((material.creation_values(circuit), tables))
}

fn garble_wires<R: RngCore + CryptoRng>(
    circuit: &Circuit,
    scheme: &dyn GarblingScheme,
    rng: &mut R,
) -> Result<(WireKeyMaterial, Vec<u8>), Error> {
    debug!(
        "garble: start wires={} gates={} table_gates={} scheme={:?}",
        circuit.num_wires(),
        circuit.gates().len(),
        circuit.table_gates(),
        scheme.kind()
    );

    let mut keys = vec![WireKey::default(); circuit.num_wires()];
    for wire in circuit.all_input_wires() {
        keys[wire as usize] = WireKey::gen_random(rng);
    }
    let delta = Delta::gen_random(rng);

    let mut tables = Vec::with_capacity(circuit.table_gates() * scheme.table_size());
    for (index, gate) in circuit.gates().iter().enumerate() {
        let lhs = keys[gate.lhs()];
        let rhs = keys[gate.rhs()];
        let output = match gate.kind() {
            GateKind::Xor => lhs ^ rhs,
            GateKind::Xnor => (lhs ^ rhs).delta_xor(&delta),
            GateKind::Not => lhs.delta_xor(&delta),
            kind => scheme.garble_gate(
                index as u64,
                kind,
                &WirePair::new(lhs, &delta),
                &WirePair::new(rhs, &delta),
                &delta,
                &mut tables,
            )?,
        };
        trace!("garble: gate[{index}] {:?} -> {}", gate.kind(), gate.output());
        keys[gate.output() as usize] = output;
    }

    debug!("garble: complete table_bytes={}", tables.len());
    Ok((WireKeyMaterial { delta, keys }, tables))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use crate::{scheme::SchemeKind, Gate};

    fn mixed_circuit() -> Circuit {
        Circuit::new(
            vec![
                Gate::and(0, 1, 4),
                Gate::xor(2, 3, 5),
                Gate::binary(GateKind::Xnor, 4, 5, 6),
                Gate::not(0, 7),
                Gate::binary(GateKind::Nor, 6, 7, 8),
                Gate::or(1, 2, 9),
            ],
            vec![vec![0, 1], vec![2, 3]],
            vec![8, 9],
        )
    }

    #[test]
    fn free_xor_invariant_holds_on_every_wire() {
        let circuit = mixed_circuit();
        for kind in [SchemeKind::HalfGates, SchemeKind::RowReduction] {
            let (material, _) = garble_wires(
                &circuit,
                kind.build().as_ref(),
                &mut ChaCha20Rng::seed_from_u64(3),
            )
            .unwrap();
            let delta = material.delta;
            assert_eq!(delta.0 & 1, 1);
            for wire in 0..circuit.num_wires() as WireId {
                let pair = material.pair(wire);
                assert_eq!((pair.key0 ^ pair.key1).0, delta.0);
                assert_ne!(pair.key0.signal_bit(), pair.key1.signal_bit());
            }
        }
    }

    #[test]
    fn tables_only_for_non_free_gates() {
        let circuit = mixed_circuit();
        for kind in [SchemeKind::HalfGates, SchemeKind::RowReduction] {
            let scheme = kind.build();
            let (_, tables) = garble(
                &circuit,
                scheme.as_ref(),
                &mut ChaCha20Rng::seed_from_u64(4),
            )
            .unwrap();
            assert_eq!(tables.len(), 3 * scheme.table_size());
        }
    }

    #[test]
    fn translation_table_holds_signal_bits_of_key0() {
        let circuit = mixed_circuit();
        let (values, _) = garble(
            &circuit,
            SchemeKind::HalfGates.build().as_ref(),
            &mut ChaCha20Rng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(values.translation_table().len(), 2);
        for (pair, &entry) in values
            .output_keys()
            .pairs()
            .iter()
            .zip(values.translation_table().entries())
        {
            assert_eq!(pair.key0.signal_bit(), entry);
        }
        assert_eq!(values.input_keys().len(), 4);
    }
}
