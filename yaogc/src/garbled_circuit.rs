//! One garbled instance of a circuit, from garbling to translation.

use std::sync::Arc;

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::{
    config::GarblingConfig,
    evaluate, garble,
    scheme::{GarblingScheme, SchemeKind},
    tables::{ContiguousTables, GarbledTablesHolder, TableLayout},
    translate,
    types::{WireKey, KEY_SIZE},
    values::{CircuitCreationValues, InputKeys, OutputKeys, TranslationTable},
    verify, Circuit, Error, WireId,
};

/// The number of bytes of a seed accepted by [`GarbledCircuit::garble_with_seed`].
pub const SEED_SIZE: usize = 32;

/// A single garbled instance of a [`Circuit`].
///
/// The circuit description is shared (many instances can garble the same circuit); the garbled
/// tables, the translation table and the garbled inputs belong to this instance only. The
/// garbler calls [`GarbledCircuit::garble`] and ships the tables and translation table, the
/// evaluator installs them with [`GarbledCircuit::set_garbled_tables`] and
/// [`GarbledCircuit::set_translation_table`] before calling [`GarbledCircuit::compute`].
#[derive(Debug)]
pub struct GarbledCircuit {
    circuit: Arc<Circuit>,
    scheme: Box<dyn GarblingScheme>,
    layout: TableLayout,
    tables: Box<dyn GarbledTablesHolder>,
    translation_table: TranslationTable,
    inputs: Option<Vec<WireKey>>,
}

impl GarbledCircuit {
    /// Validates the circuit and creates an instance without any garbled tables.
    pub fn new(circuit: impl Into<Arc<Circuit>>, config: &GarblingConfig) -> Result<Self, Error> {
        let circuit = circuit.into();
        circuit.validate()?;
        Ok(Self {
            circuit,
            scheme: config.scheme(),
            layout: config.layout,
            tables: Box::new(ContiguousTables::default()),
            translation_table: TranslationTable::default(),
            inputs: None,
        })
    }

    /// Garbles the circuit using fresh randomness.
    pub fn garble(&mut self) -> Result<CircuitCreationValues, Error> {
        self.garble_with_rng(ChaCha20Rng::from_entropy())
    }

    /// Garbles the circuit with all keys derived from a ChaCha20 PRG seeded with `seed`.
    ///
    /// The same circuit, backend and seed always yield byte-identical keys, tables and
    /// translation table. Fails with [`Error::InvalidKey`] unless `seed` is [`SEED_SIZE`] bytes.
    pub fn garble_with_seed(&mut self, seed: &[u8]) -> Result<CircuitCreationValues, Error> {
        let seed: [u8; SEED_SIZE] = seed.try_into().map_err(|_| Error::InvalidKey)?;
        self.garble_with_rng(ChaCha20Rng::from_seed(seed))
    }

    fn garble_with_rng(&mut self, mut rng: ChaCha20Rng) -> Result<CircuitCreationValues, Error> {
        let (values, tables) = garble::garble(&self.circuit, self.scheme.as_ref(), &mut rng)?;
        self.tables = self.layout.holder(tables, self.scheme.table_size());
        self.translation_table = values.translation_table().clone();
        self.inputs = None;
        Ok(values)
    }

    /// Selects the keys of `party` matching its plaintext input `bits`.
    ///
    /// See [`garbled_input_from_ungarbled`](crate::garbled_input_from_ungarbled).
    pub fn garbled_input_from_ungarbled(
        &self,
        bits: &[bool],
        all_input_keys: &InputKeys,
        party: usize,
    ) -> Result<Vec<WireKey>, Error> {
        evaluate::garbled_input_from_ungarbled(&self.circuit, bits, all_input_keys, party)
    }

    /// Stores one key per input wire, ordered as [`Circuit::all_input_wires`].
    pub fn set_inputs(&mut self, garbled_inputs: Vec<WireKey>) {
        self.inputs = Some(garbled_inputs);
    }

    /// Evaluates the circuit on the stored inputs, returning one key per output wire.
    ///
    /// Fails with [`Error::NotAllInputsSet`] unless [`GarbledCircuit::set_inputs`] was called
    /// with a key for every input wire since the tables were last replaced.
    pub fn compute(&self) -> Result<Vec<WireKey>, Error> {
        let inputs = self.inputs.as_deref().ok_or(Error::NotAllInputsSet)?;
        evaluate::evaluate(
            &self.circuit,
            self.scheme.as_ref(),
            self.tables.as_ref(),
            inputs,
        )
    }

    /// Checks the garbled tables and the translation table against both keys of every input
    /// wire.
    pub fn verify(&self, all_input_keys: &InputKeys) -> Result<bool, Error> {
        Ok(match self.internal_verify(all_input_keys)? {
            Some(all_output_keys) => self.verify_translation_table(&all_output_keys),
            None => false,
        })
    }

    /// Checks the garbled tables against both keys of every input wire and returns both keys
    /// of every output wire, or `None` if the tables are not a correct garbling.
    ///
    /// Unlike [`GarbledCircuit::verify`], the translation table is not checked, so that tables
    /// can be verified once and shared by instances with different translation tables.
    pub fn internal_verify(&self, all_input_keys: &InputKeys) -> Result<Option<OutputKeys>, Error> {
        verify::internal_verify(
            &self.circuit,
            self.scheme.as_ref(),
            self.tables.as_ref(),
            all_input_keys,
        )
    }

    /// Checks that the translation table matches `key0` of every output wire.
    pub fn verify_translation_table(&self, all_output_keys: &OutputKeys) -> bool {
        verify::verify_translation_table(&self.translation_table, all_output_keys)
    }

    /// Translates one key per output wire into plaintext bits.
    pub fn translate(&self, output_keys: &[WireKey]) -> Result<Vec<bool>, Error> {
        translate::translate(&self.translation_table, output_keys)
    }

    /// Translates one key per output wire, failing with [`Error::CheatAttempt`] if a key is not
    /// one of the two keys of its wire in `all_output_keys`.
    pub fn verified_translate(
        &self,
        output_keys: &[WireKey],
        all_output_keys: &OutputKeys,
    ) -> Result<Vec<bool>, Error> {
        translate::verified_translate(output_keys, all_output_keys)
    }

    /// The garbled tables of this instance.
    pub fn garbled_tables(&self) -> &dyn GarbledTablesHolder {
        self.tables.as_ref()
    }

    /// Moves the garbled tables out of this instance, leaving it without tables.
    pub fn take_garbled_tables(&mut self) -> Box<dyn GarbledTablesHolder> {
        self.inputs = None;
        std::mem::replace(&mut self.tables, Box::new(ContiguousTables::default()))
    }

    /// Replaces the garbled tables, dropping the previous ones and any stored inputs.
    ///
    /// Fails with [`Error::InvalidArgument`] if the tables do not fit the circuit and backend.
    pub fn set_garbled_tables(
        &mut self,
        tables: Box<dyn GarbledTablesHolder>,
    ) -> Result<(), Error> {
        let table_size = self.scheme.table_size();
        let table_gates = self.circuit.table_gates();
        if tables.total_size() != table_gates * table_size {
            return Err(Error::InvalidArgument(
                "the garbled tables do not match the circuit",
            ));
        }
        for table_gate in 0..table_gates {
            tables.gate_table(table_gate, table_size)?;
        }
        debug!(
            "set_garbled_tables: layout={:?} buffers={}",
            tables.layout(),
            tables.num_buffers()
        );
        self.tables = tables;
        self.inputs = None;
        Ok(())
    }

    /// The translation table of this instance.
    pub fn translation_table(&self) -> &TranslationTable {
        &self.translation_table
    }

    /// Number of entries of the translation table, i.e. the number of output wires.
    pub fn translation_table_size(&self) -> usize {
        self.circuit.output_wires().len()
    }

    /// Replaces the translation table; it needs one entry per output wire.
    pub fn set_translation_table(
        &mut self,
        translation_table: TranslationTable,
    ) -> Result<(), Error> {
        if translation_table.len() != self.translation_table_size() {
            return Err(Error::InvalidArgument(
                "the translation table needs one entry per output wire",
            ));
        }
        self.translation_table = translation_table;
        Ok(())
    }

    /// The shared circuit description.
    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }

    /// The backend garbling the non-free gates.
    pub fn scheme(&self) -> SchemeKind {
        self.scheme.kind()
    }

    /// Input wires of the party with the given (1-based) number.
    pub fn input_wire_indices(&self, party: usize) -> Result<&[WireId], Error> {
        self.circuit.input_wires(party)
    }

    /// Input wires of all parties, ordered as every input key buffer.
    pub fn all_input_wire_indices(&self) -> Vec<WireId> {
        self.circuit.all_input_wires().collect()
    }

    /// The output wires.
    pub fn output_wire_indices(&self) -> &[WireId] {
        self.circuit.output_wires()
    }

    /// Number of input bits of the party with the given (1-based) number.
    pub fn number_of_inputs(&self, party: usize) -> Result<usize, Error> {
        self.circuit.number_of_inputs(party)
    }

    /// Number of parties providing inputs.
    pub fn number_of_parties(&self) -> usize {
        self.circuit.number_of_parties()
    }

    /// The number of bytes of every wire key.
    pub fn key_size(&self) -> usize {
        KEY_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Gate;

    fn and_circuit() -> Arc<Circuit> {
        Arc::new(Circuit::new(
            vec![Gate::and(0, 1, 2)],
            vec![vec![0], vec![1]],
            vec![2],
        ))
    }

    #[test]
    fn rejects_invalid_circuits() {
        let circuit = Circuit::new(vec![Gate::and(0, 1, 2)], vec![vec![0]], vec![2]);
        assert_eq!(
            GarbledCircuit::new(circuit, &GarblingConfig::default()).err(),
            Some(Error::InvalidCircuit)
        );
    }

    #[test]
    fn rejects_seeds_of_the_wrong_length() {
        let mut gc = GarbledCircuit::new(and_circuit(), &GarblingConfig::default()).unwrap();
        assert_eq!(gc.garble_with_seed(&[0; 16]), Err(Error::InvalidKey));
        assert_eq!(gc.garble_with_seed(&[0; 33]), Err(Error::InvalidKey));
        assert!(gc.garble_with_seed(&[0; SEED_SIZE]).is_ok());
    }

    #[test]
    fn compute_requires_inputs() {
        let mut gc = GarbledCircuit::new(and_circuit(), &GarblingConfig::default()).unwrap();
        let values = gc.garble().unwrap();
        assert_eq!(gc.compute(), Err(Error::NotAllInputsSet));

        let keys = values.input_keys().pairs();
        gc.set_inputs(vec![keys[0].key1]);
        assert_eq!(gc.compute(), Err(Error::NotAllInputsSet));

        gc.set_inputs(vec![keys[0].key1, keys[1].key1]);
        assert!(gc.compute().is_ok());

        // replacing the tables drops the inputs of the previous garbling
        let tables = gc.take_garbled_tables();
        gc.set_garbled_tables(tables).unwrap();
        assert_eq!(gc.compute(), Err(Error::NotAllInputsSet));
    }

    #[test]
    fn rejects_mismatching_tables() {
        let mut gc = GarbledCircuit::new(and_circuit(), &GarblingConfig::default()).unwrap();
        assert!(matches!(
            gc.set_garbled_tables(Box::new(ContiguousTables::new(vec![0; 48]))),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            gc.set_translation_table(TranslationTable::new(vec![true, false])),
            Err(Error::InvalidArgument(_))
        ));
        assert!(gc
            .set_garbled_tables(Box::new(ContiguousTables::new(vec![0; 32])))
            .is_ok());
    }

    #[test]
    fn accessors() {
        let gc = GarbledCircuit::new(and_circuit(), &GarblingConfig::default()).unwrap();
        assert_eq!(gc.key_size(), 16);
        assert_eq!(gc.number_of_parties(), 2);
        assert_eq!(gc.number_of_inputs(2), Ok(1));
        assert_eq!(gc.number_of_inputs(3), Err(Error::NoSuchParty(3)));
        assert_eq!(gc.input_wire_indices(1), Ok(&[0][..]));
        assert_eq!(gc.all_input_wire_indices(), vec![0, 1]);
        assert_eq!(gc.output_wire_indices(), &[2]);
        assert_eq!(gc.translation_table_size(), 1);
        assert_eq!(gc.scheme(), SchemeKind::HalfGates);
    }
}
