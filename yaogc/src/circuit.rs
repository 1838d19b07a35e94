//! Boolean circuits: gates, wires of each party and structural validation.

use blake3::Hasher;

use crate::Error;

/// The id of a wire in the circuit.
pub type WireId = u32;

/// A blake3 hash that can be used to compare circuits for equality.
pub type CircuitBlake3Hash = [u8; 32];

const MAX_GATES: usize = (u32::MAX >> 4) as usize;
const MAX_WIRES: usize = (u32::MAX >> 2) as usize;

/// An immutable boolean circuit with the input wires of each party and the output wires.
///
/// Gates are evaluated in the order in which they are stored. A circuit is only garbled or
/// evaluated after [`Circuit::validate`] accepted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    /// The gates in evaluation order.
    gates: Vec<Gate>,
    /// The input wires of each party; party `p` is stored at index `p - 1`.
    input_wires: Vec<Vec<WireId>>,
    /// The wires exposed as outputs of the whole circuit.
    output_wires: Vec<WireId>,
    /// One past the largest wire id referenced anywhere in the circuit.
    num_wires: usize,
    /// Number of gates that need a garbled table.
    table_gates: usize,
}

impl Circuit {
    /// Creates a new circuit from its gates, the input wires of each party (party 1 first) and
    /// the output wires.
    pub fn new(gates: Vec<Gate>, input_wires: Vec<Vec<WireId>>, output_wires: Vec<WireId>) -> Self {
        let max_gate_wire = gates
            .iter()
            .flat_map(|g| g.inputs().iter().chain(std::iter::once(&g.output)))
            .max();
        let max_io_wire = input_wires.iter().flatten().chain(output_wires.iter()).max();
        let num_wires = max_gate_wire
            .into_iter()
            .chain(max_io_wire)
            .max()
            .map_or(0, |&w| w as usize + 1);
        let table_gates = gates.iter().filter(|g| !g.kind.is_free()).count();

        Self {
            gates,
            input_wires,
            output_wires,
            num_wires,
            table_gates,
        }
    }

    /// the gates of the circuit, in evaluation order
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// wires exposed as outputs of the circuit
    pub fn output_wires(&self) -> &[WireId] {
        &self.output_wires
    }

    /// number of parties providing inputs
    pub fn number_of_parties(&self) -> usize {
        self.input_wires.len()
    }

    /// Number of wire ids spanned by the circuit.
    pub fn num_wires(&self) -> usize {
        self.num_wires
    }

    /// Number of gates which are not free under free-XOR and thus carry a garbled table.
    pub fn table_gates(&self) -> usize {
        self.table_gates
    }

    /// Input wires of the party with the given (1-based) number.
    pub fn input_wires(&self, party: usize) -> Result<&[WireId], Error> {
        party
            .checked_sub(1)
            .and_then(|idx| self.input_wires.get(idx))
            .map(Vec::as_slice)
            .ok_or(Error::NoSuchParty(party))
    }

    /// Number of input bits of the party with the given (1-based) number.
    pub fn number_of_inputs(&self, party: usize) -> Result<usize, Error> {
        self.input_wires(party).map(<[WireId]>::len)
    }

    /// Total number of input wires over all parties.
    pub fn num_inputs(&self) -> usize {
        self.input_wires.iter().map(Vec::len).sum()
    }

    /// All input wires: the wires of party 1, followed by those of party 2 and so on.
    ///
    /// This is the order of every buffer holding one or two keys per input wire.
    pub fn all_input_wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.input_wires.iter().flatten().copied()
    }

    /// Position of the first input wire of `party` within [`Circuit::all_input_wires`].
    pub(crate) fn input_offset(&self, party: usize) -> Result<usize, Error> {
        self.input_wires(party)?;
        Ok(self.input_wires[..party - 1].iter().map(Vec::len).sum())
    }

    /// Calculates the blake3 hash of the circuit.
    pub fn blake3_hash(&self) -> CircuitBlake3Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.input_wires.len() as u64).to_le_bytes());
        for party_wires in self.input_wires.iter() {
            hasher.update(&(party_wires.len() as u64).to_le_bytes());
            for wire in party_wires {
                hasher.update(&wire.to_le_bytes());
            }
        }
        for gate in self.gates.iter() {
            gate.update_hash(&mut hasher);
        }
        for output_wire in self.output_wires.iter() {
            hasher.update(&output_wire.to_le_bytes());
        }
        *hasher.finalize().as_bytes()
    }

    /// Performs a syntax check of the circuit.
    ///
    /// A circuit is invalid if any of the following is true:
    ///   - it has no parties or no output wires
    ///   - an input wire belongs to more than one party or is written by a gate
    ///   - a gate reads a wire that is not yet defined or not lower than its own output wire
    ///   - a wire is written by more than one gate
    ///   - an output wire is undefined or read by another gate
    ///   - the number of gates or wires exceeds the maximum number supported
    pub fn validate(&self) -> Result<(), Error> {
        if self.gates.len() > MAX_GATES || self.num_wires > MAX_WIRES {
            return Err(Error::MaxCircuitSizeExceeded);
        }
        if self.input_wires.is_empty() || self.output_wires.is_empty() {
            return Err(Error::InvalidCircuit);
        }

        let mut defined = vec![false; self.num_wires];
        let mut read = vec![false; self.num_wires];
        for &w in self.input_wires.iter().flatten() {
            if defined[w as usize] {
                return Err(Error::InvalidCircuit);
            }
            defined[w as usize] = true;
        }
        for gate in self.gates.iter() {
            for &w in gate.inputs() {
                if !defined[w as usize] || w >= gate.output {
                    return Err(Error::InvalidCircuit);
                }
                read[w as usize] = true;
            }
            if defined[gate.output as usize] {
                return Err(Error::InvalidCircuit);
            }
            defined[gate.output as usize] = true;
        }
        for &o in self.output_wires.iter() {
            if !defined[o as usize] || read[o as usize] {
                return Err(Error::InvalidCircuit);
            }
        }
        Ok(())
    }

    /// Evaluates the circuit in the clear, given the input bits of every party.
    pub fn eval_plain(&self, inputs: &[&[bool]]) -> Result<Vec<bool>, Error> {
        self.validate()?;
        if inputs.len() != self.number_of_parties() {
            return Err(Error::InsufficientInput);
        }
        let mut wires = vec![false; self.num_wires];
        for (party_wires, party_bits) in self.input_wires.iter().zip(inputs) {
            if party_wires.len() != party_bits.len() {
                return Err(Error::InsufficientInput);
            }
            for (&w, &bit) in party_wires.iter().zip(party_bits.iter()) {
                wires[w as usize] = bit;
            }
        }
        for gate in self.gates.iter() {
            let [lhs, rhs] = gate.inputs;
            wires[gate.output as usize] = gate.kind.eval(wires[lhs as usize], wires[rhs as usize]);
        }
        Ok(self.output_wires.iter().map(|&o| wires[o as usize]).collect())
    }
}

/// The boolean function computed by a [`Gate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// `a ^ b`, free under free-XOR.
    Xor,
    /// `!(a ^ b)`, free under free-XOR.
    Xnor,
    /// `a & b`
    And,
    /// `!(a & b)`
    Nand,
    /// `a | b`
    Or,
    /// `!(a | b)`
    Nor,
    /// `!a`, free under free-XOR.
    Not,
}

impl GateKind {
    /// Number of input wires of a gate of this kind.
    pub fn arity(&self) -> usize {
        match self {
            GateKind::Not => 1,
            _ => 2,
        }
    }

    /// Whether the gate is computed by XOR-ing keys and needs no garbled table.
    pub fn is_free(&self) -> bool {
        matches!(self, GateKind::Xor | GateKind::Xnor | GateKind::Not)
    }

    /// Evaluates the gate on plaintext bits; `rhs` is ignored by unary gates.
    pub fn eval(&self, lhs: bool, rhs: bool) -> bool {
        match self {
            GateKind::Xor => lhs ^ rhs,
            GateKind::Xnor => !(lhs ^ rhs),
            GateKind::And => lhs & rhs,
            GateKind::Nand => !(lhs & rhs),
            GateKind::Or => lhs | rhs,
            GateKind::Nor => !(lhs | rhs),
            GateKind::Not => !lhs,
        }
    }

    fn type_byte(&self) -> u8 {
        match self {
            GateKind::Xor => 0,
            GateKind::Xnor => 1,
            GateKind::And => 2,
            GateKind::Nand => 3,
            GateKind::Or => 4,
            GateKind::Nor => 5,
            GateKind::Not => 6,
        }
    }
}

/// A single gate in a larger [`Circuit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    kind: GateKind,
    /// Unary gates repeat their single input.
    inputs: [WireId; 2],
    output: WireId,
}

impl Gate {
    /// Creates a gate reading `lhs` and `rhs`.
    ///
    /// Unary kinds only read `lhs`; `rhs` is dropped, so `binary(GateKind::Not, a, _, c)` is the
    /// same gate as [`Gate::not`]`(a, c)`.
    pub fn binary(kind: GateKind, lhs: WireId, rhs: WireId, output: WireId) -> Self {
        let rhs = if kind.arity() == 1 { lhs } else { rhs };
        Self {
            kind,
            inputs: [lhs, rhs],
            output,
        }
    }

    /// A gate computing the XOR of the two specified wires.
    pub fn xor(lhs: WireId, rhs: WireId, output: WireId) -> Self {
        Self::binary(GateKind::Xor, lhs, rhs, output)
    }

    /// A gate computing the AND of the two specified wires.
    pub fn and(lhs: WireId, rhs: WireId, output: WireId) -> Self {
        Self::binary(GateKind::And, lhs, rhs, output)
    }

    /// A gate computing the OR of the two specified wires.
    pub fn or(lhs: WireId, rhs: WireId, output: WireId) -> Self {
        Self::binary(GateKind::Or, lhs, rhs, output)
    }

    /// A gate computing the NOT of the specified wire.
    pub fn not(input: WireId, output: WireId) -> Self {
        Self {
            kind: GateKind::Not,
            inputs: [input, input],
            output,
        }
    }

    /// The boolean function of this gate.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// The ordered input wires of this gate.
    pub fn inputs(&self) -> &[WireId] {
        &self.inputs[..self.kind.arity()]
    }

    /// The wire written by this gate.
    pub fn output(&self) -> WireId {
        self.output
    }

    #[inline]
    pub(crate) fn lhs(&self) -> usize {
        self.inputs[0] as usize
    }

    #[inline]
    pub(crate) fn rhs(&self) -> usize {
        self.inputs[1] as usize
    }

    fn update_hash(&self, hasher: &mut Hasher) {
        hasher.update(&[self.kind.type_byte()]);
        for input in self.inputs() {
            hasher.update(&input.to_le_bytes());
        }
        hasher.update(&self.output.to_le_bytes());
    }
}
