//! Half-gates garbling with free-XOR (Zahur, Rosulek, Evans: "Two Halves Make a Whole").
//!
//! Every AND-like gate is written as `((a ^ αa) & (b ^ αb)) ^ αc` and garbled as an AND gate
//! over the relabelled inputs. Relabelling only changes which key the garbler calls `key0`, so
//! evaluation is the same for all of them.

use super::{row, GarblingScheme, SchemeKind};
use crate::{
    hash::{hash_key, Domain},
    types::{Delta, WireKey, WirePair},
    Error, GateKind,
};

/// Two rows per gate: the garbler half `T_G` followed by the evaluator half `T_E`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfGates;

/// Returns `(αa, αb, αc)` for the gate.
fn alphas(kind: GateKind) -> Result<(bool, bool, bool), Error> {
    match kind {
        GateKind::And => Ok((false, false, false)),
        GateKind::Nand => Ok((false, false, true)),
        GateKind::Or => Ok((true, true, true)),
        GateKind::Nor => Ok((true, true, false)),
        GateKind::Xor | GateKind::Xnor | GateKind::Not => Err(Error::UnsupportedGate(kind)),
    }
}

impl GarblingScheme for HalfGates {
    fn kind(&self) -> SchemeKind {
        SchemeKind::HalfGates
    }

    fn rows_per_gate(&self) -> usize {
        2
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
        let (alpha_a, alpha_b, alpha_c) = alphas(kind)?;

        let a0 = lhs.key0.select(alpha_a, delta);
        let b0 = rhs.key0.select(alpha_b, delta);
        let pa = a0.signal_bit();
        let pb = b0.signal_bit();
        let r = WireKey(delta.0);

        let ha0 = hash_key(Domain::HalfGatesGarbler, a0, gate);
        let ha1 = hash_key(Domain::HalfGatesGarbler, a0.delta_xor(delta), gate);
        let hb0 = hash_key(Domain::HalfGatesEvaluator, b0, gate);
        let hb1 = hash_key(Domain::HalfGatesEvaluator, b0.delta_xor(delta), gate);

        // garbler half-gate
        let t_g = ha0 ^ ha1 ^ r.if_bit(pb);
        let w_g = ha0 ^ t_g.if_bit(pa);

        // evaluator half-gate
        let t_e = hb0 ^ hb1 ^ a0;
        let w_e = hb0 ^ (t_e ^ a0).if_bit(pb);

        rows.extend_from_slice(&t_g.to_bytes());
        rows.extend_from_slice(&t_e.to_bytes());

        Ok((w_g ^ w_e).select(alpha_c, delta))
    }

    fn eval_gate(
        &self,
        gate: u64,
        lhs: WireKey,
        rhs: WireKey,
        rows: &[u8],
    ) -> Result<WireKey, Error> {
        let t_g = row(rows, 0)?;
        let t_e = row(rows, 1)?;

        let w_g = hash_key(Domain::HalfGatesGarbler, lhs, gate) ^ t_g.if_bit(lhs.signal_bit());
        let w_e =
            hash_key(Domain::HalfGatesEvaluator, rhs, gate) ^ (t_e ^ lhs).if_bit(rhs.signal_bit());

        Ok(w_g ^ w_e)
    }
}

#[test]
fn alphas_match_truth_tables() {
    for kind in [GateKind::And, GateKind::Nand, GateKind::Or, GateKind::Nor] {
        let (alpha_a, alpha_b, alpha_c) = alphas(kind).unwrap();
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(kind.eval(a, b), ((a ^ alpha_a) & (b ^ alpha_b)) ^ alpha_c);
            }
        }
    }
}
