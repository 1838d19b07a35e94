//! Point-and-permute tables with garbled row reduction (GRR3).
//!
//! The row selected by the signal bits `(0, 0)` is never sent: its output key is defined to be
//! the hash of the two input keys. The other three rows encrypt the matching output key under
//! `H(lhs, rhs, gate)`. Combined with free-XOR as described by Kolesnikov and Schneider, this
//! supports any binary gate.

use super::{row, GarblingScheme, SchemeKind};
use crate::{
    hash::{hash_keys, Domain},
    types::{Delta, WireKey, WirePair},
    Error, GateKind,
};

/// Three rows per gate, ordered by the signal bits `(0, 1)`, `(1, 0)`, `(1, 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowReduction;

impl GarblingScheme for RowReduction {
    fn kind(&self) -> SchemeKind {
        SchemeKind::RowReduction
    }

    fn rows_per_gate(&self) -> usize {
        3
    }

    fn garble_gate(
        &self,
        gate: u64,
        kind: GateKind,
        lhs: &WirePair,
        rhs: &WirePair,
        delta: &Delta,
        rows: &mut Vec<u8>,
    ) -> Result<WireKey, Error> {
        if kind.is_free() {
            return Err(Error::UnsupportedGate(kind));
        }
        let pa = lhs.key0.signal_bit();
        let pb = rhs.key0.signal_bit();

        // the plaintext values behind the keys carrying signal bits (0, 0)
        let (a, b) = (pa, pb);
        let h = hash_keys(Domain::RowReduction, lhs.key(a), rhs.key(b), gate);
        let out0 = h.select(kind.eval(a, b), delta);

        for (sa, sb) in [(false, true), (true, false), (true, true)] {
            let (a, b) = (sa ^ pa, sb ^ pb);
            let h = hash_keys(Domain::RowReduction, lhs.key(a), rhs.key(b), gate);
            let out = out0.select(kind.eval(a, b), delta);
            rows.extend_from_slice(&(h ^ out).to_bytes());
        }
        Ok(out0)
    }

    fn eval_gate(
        &self,
        gate: u64,
        lhs: WireKey,
        rhs: WireKey,
        rows: &[u8],
    ) -> Result<WireKey, Error> {
        let h = hash_keys(Domain::RowReduction, lhs, rhs, gate);
        let index = 2 * usize::from(lhs.signal_bit()) + usize::from(rhs.signal_bit());
        if index == 0 {
            // truncated tables are rejected whichever row is selected
            row(rows, 2)?;
            Ok(h)
        } else {
            Ok(h ^ row(rows, index - 1)?)
        }
    }
}
