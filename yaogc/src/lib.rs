//! Yao garbled circuits with free-XOR, point-and-permute and verifiable garbling.
//!
//! This crate garbles boolean circuits made of XOR, XNOR, AND, NAND, OR, NOR and NOT gates,
//! evaluates them on garbled inputs, translates the garbled outputs back into bits and lets a
//! party holding both keys of every input wire check that a garbling is correct.
//!
//! XOR, XNOR and NOT gates are free: they need no garbled table. All other gates are garbled by
//! one of two [`GarblingScheme`] backends, [half-gates](https://eprint.iacr.org/2014/756.pdf)
//! (the default, 2 rows per gate) or garbled row reduction (3 rows per gate), both using
//! [blake3](https://github.com/BLAKE3-team/BLAKE3) as the tweakable hash.
//!
//! Oblivious transfer and communication channels are _not_ part of this crate. Sending the
//! garbled tables, the translation table and the garbled inputs to the evaluator needs to be
//! handled by the user of this crate.
//!
//! # Examples
//!
//! ```
//! use yaogc::{Circuit, Error, GarbledCircuit, GarblingConfig, Gate};
//!
//! fn main() -> Result<(), Error> {
//!     // Party 1 provides wire 0, party 2 provides wire 1, wire 2 holds their AND:
//!     let circuit = Circuit::new(vec![Gate::and(0, 1, 2)], vec![vec![0], vec![1]], vec![2]);
//!     let config = GarblingConfig::default();
//!
//!     // The garbler creates the keys, the garbled tables and the translation table:
//!     let mut garbler = GarbledCircuit::new(circuit.clone(), &config)?;
//!     let values = garbler.garble()?;
//!
//!     // The evaluator receives the tables and the translation table:
//!     let mut evaluator = GarbledCircuit::new(circuit, &config)?;
//!     evaluator.set_garbled_tables(garbler.take_garbled_tables())?;
//!     evaluator.set_translation_table(values.translation_table().clone())?;
//!
//!     // ... as well as one key per input wire, matching the inputs of both parties:
//!     let mut inputs = garbler.garbled_input_from_ungarbled(&[true], values.input_keys(), 1)?;
//!     inputs.extend(garbler.garbled_input_from_ungarbled(&[true], values.input_keys(), 2)?);
//!     evaluator.set_inputs(inputs);
//!
//!     let output_keys = evaluator.compute()?;
//!     assert_eq!(evaluator.translate(&output_keys)?, vec![true]);
//!
//!     // The garbler can detect output keys that were not produced by an honest evaluation:
//!     let output = garbler.verified_translate(&output_keys, values.output_keys())?;
//!     assert_eq!(output, vec![true]);
//!
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod circuit;
mod config;
mod evaluate;
mod garble;
mod garbled_circuit;
mod hash;
pub mod scheme;
mod simulator;
mod tables;
mod translate;
mod types;
mod values;
mod verify;

pub use circuit::*;
pub use config::{GarblingConfig, CONFIG_FILE, ENV_PREFIX};
pub use evaluate::garbled_input_from_ungarbled;
pub use garbled_circuit::{GarbledCircuit, SEED_SIZE};
pub use scheme::{GarblingScheme, SchemeKind};
pub use simulator::*;
pub use tables::{ContiguousTables, GarbledTablesHolder, PerGateTables, TableLayout};
pub use types::{Delta, WireKey, WirePair, KEY_SIZE};
pub use values::{CircuitCreationValues, InputKeys, OutputKeys, TranslationTable};

/// Errors occurring during the validation, garbling, evaluation or verification of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The circuit was evaluated before a key was set for every input wire.
    #[error("Not all garbled inputs have been set")]
    NotAllInputsSet,
    /// The circuit has no party with the given (1-based) number.
    #[error("The circuit has no party number {0}")]
    NoSuchParty(usize),
    /// The seed of the key generator does not have the expected size.
    #[error("The seed must be exactly 32 bytes long")]
    InvalidKey,
    /// A buffer or value passed by the caller has the wrong size or content.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// An output key is neither of the two keys of its wire.
    #[error("The garbled output {output} does not match any key of its wire")]
    CheatAttempt {
        /// Position of the offending key among the output wires.
        output: usize,
    },
    /// Not enough or too many input bits were provided.
    #[error("Not enough or too many input bits provided")]
    InsufficientInput,
    /// The provided circuit contains invalid gate connections.
    #[error("The provided circuit is invalid and cannot be executed")]
    InvalidCircuit,
    /// The provided circuit has too many gates or wires to be processed.
    #[error("The number of gates or wires in the circuit exceed the maximum that can be processed")]
    MaxCircuitSizeExceeded,
    /// The gate kind cannot be garbled into a table.
    #[error("The gate kind {0:?} has no garbled table")]
    UnsupportedGate(GateKind),
    /// The configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// The provided byte buffer could not be deserialized into the expected type.
    #[error("The message could not be serialized to / deserialized from bincode")]
    BincodeError,
}

impl Error {
    /// Whether the error reveals a dishonest evaluator.
    pub fn is_cheat_attempt(&self) -> bool {
        matches!(self, Error::CheatAttempt { .. })
    }
}

impl From<bincode::Error> for Error {
    fn from(_: bincode::Error) -> Self {
        Self::BincodeError
    }
}
