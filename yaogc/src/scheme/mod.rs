//! Garbling backends.
//!
//! Free gates (XOR, XNOR, NOT) are handled by the engines directly. Every other gate is garbled
//! and evaluated by a [`GarblingScheme`], which decides how many rows a gate table has and how
//! they are encrypted. The backend is chosen explicitly through [`SchemeKind`].

use serde::{Deserialize, Serialize};

use crate::{
    types::{Delta, WireKey, WirePair, KEY_SIZE},
    Error, GateKind,
};

mod half_gates;
mod row_reduction;

pub use half_gates::HalfGates;
pub use row_reduction::RowReduction;

/// The construction used to encrypt the rows of non-free gates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    /// Half-gates (Zahur, Rosulek, Evans 2015), 2 rows per gate.
    #[default]
    HalfGates,
    /// Garbled row reduction (Naor, Pinkas, Sumner 1999), 3 rows per gate.
    RowReduction,
}

impl SchemeKind {
    /// Builds the backend implementing this construction.
    pub fn build(&self) -> Box<dyn GarblingScheme> {
        match self {
            SchemeKind::HalfGates => Box::new(HalfGates),
            SchemeKind::RowReduction => Box::new(RowReduction),
        }
    }
}

/// Garbles and evaluates a single non-free gate.
///
/// Implementations must be deterministic: the same keys, offset and gate position always yield
/// the same rows and output key.
pub trait GarblingScheme: std::fmt::Debug + Send + Sync {
    /// The construction implemented by this backend.
    fn kind(&self) -> SchemeKind;

    /// Number of [`KEY_SIZE`] rows in the table of every non-free gate.
    fn rows_per_gate(&self) -> usize;

    /// Appends the rows of the gate at position `gate` to `rows` and returns the `key0` of its
    /// output wire.
    fn garble_gate(
        &self,
        gate: u64,
        kind: GateKind,
        lhs: &WirePair,
        rhs: &WirePair,
        delta: &Delta,
        rows: &mut Vec<u8>,
    ) -> Result<WireKey, Error>;

    /// Decrypts the output key of the gate at position `gate`, using the signal bits of the
    /// evaluator's input keys to pick the row.
    fn eval_gate(
        &self,
        gate: u64,
        lhs: WireKey,
        rhs: WireKey,
        rows: &[u8],
    ) -> Result<WireKey, Error>;

    /// Size in bytes of the table of every non-free gate.
    fn table_size(&self) -> usize {
        self.rows_per_gate() * KEY_SIZE
    }
}

/// Reads row `i` out of a gate table.
fn row(rows: &[u8], i: usize) -> Result<WireKey, Error> {
    rows.get(i * KEY_SIZE..(i + 1) * KEY_SIZE)
        .ok_or(Error::InvalidArgument("garbled table is too short"))
        .and_then(WireKey::from_bytes)
}
