use serde::{Deserialize, Serialize};

use crate::error::{GcError, Result};
use crate::gate::{Gate, GarbledGate, LogicGate};
use crate::label::Label;

/// A circuit over gates of kind `G`: a fixed number of input wires, a list of
/// gates in ascending wire-id order, and a list of output wire ids.
///
/// Wire ids `0..num_inputs` name the circuit's inputs; wire id
/// `num_inputs + i` names the output of `gates[i]`. A gate may only read
/// wires with a strictly smaller id than its own, which is what lets
/// [`Circuit::evaluate`] compute every wire in a single ascending pass with
/// no recursion or explicit dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit<G> {
    num_inputs: usize,
    gates: Vec<G>,
    outputs: Vec<usize>,
}

impl<G: Gate> Circuit<G> {
    /// Builds and structurally validates a circuit.
    ///
    /// Checks: `num_inputs >= 1`, every gate's input wires are strictly
    /// smaller than the gate's own wire id, every gate has arity 1 or 2
    /// (enforced by [`Gate::right`] returning `None` or `Some`), and every
    /// output wire id is within range.
    pub fn new(num_inputs: usize, gates: Vec<G>, outputs: Vec<usize>) -> Result<Self> {
        if num_inputs == 0 {
            return Err(GcError::Structural("circuit must have at least one input".into()));
        }
        if outputs.is_empty() {
            return Err(GcError::Structural("circuit must have at least one output".into()));
        }

        let total_wires = num_inputs + gates.len();
        for (i, gate) in gates.iter().enumerate() {
            let own_id = num_inputs + i;
            if gate.left() >= own_id {
                return Err(GcError::Structural(format!(
                    "gate {own_id} reads wire {} which is not strictly smaller than itself",
                    gate.left()
                )));
            }
            if let Some(r) = gate.right() {
                if r >= own_id {
                    return Err(GcError::Structural(format!(
                        "gate {own_id} reads wire {r} which is not strictly smaller than itself"
                    )));
                }
            }
        }
        for &out in &outputs {
            if out >= total_wires {
                return Err(GcError::Structural(format!(
                    "output wire {out} does not exist (circuit has {total_wires} wires)"
                )));
            }
        }

        Ok(Circuit { num_inputs, gates, outputs })
    }

    /// Number of input wires.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Total number of wires: inputs plus gate outputs.
    pub fn num_wires(&self) -> usize {
        self.num_inputs + self.gates.len()
    }

    /// The circuit's gates, in ascending wire-id order.
    pub fn gates(&self) -> &[G] {
        &self.gates
    }

    /// The wire ids designated as circuit outputs.
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// The wire id of the gate at index `i`.
    pub fn gate_wire_id(&self, i: usize) -> usize {
        self.num_inputs + i
    }
}

/// A circuit of plaintext [`LogicGate`]s.
pub type LogicCircuit = Circuit<LogicGate>;

impl LogicCircuit {
    /// Evaluates the circuit on a concrete assignment of input bits,
    /// returning the bits on the output wires.
    pub fn evaluate(&self, inputs: &[u8]) -> Result<Vec<u8>> {
        if inputs.len() != self.num_inputs {
            return Err(GcError::ShapeMismatch(format!(
                "circuit expects {} input bits, got {}",
                self.num_inputs,
                inputs.len()
            )));
        }
        if inputs.iter().any(|&b| b > 1) {
            return Err(GcError::Domain("input bits must be 0 or 1".into()));
        }

        let mut wires = vec![0u8; self.num_wires()];
        wires[..self.num_inputs].copy_from_slice(inputs);

        for (i, gate) in self.gates.iter().enumerate() {
            let left_bit = wires[gate.left()];
            let right_bit = gate.right().map(|r| wires[r]);
            wires[self.num_inputs + i] = gate.evaluate(left_bit, right_bit)?;
        }

        Ok(self.outputs.iter().map(|&w| wires[w]).collect())
    }
}

/// A circuit of encrypted [`GarbledGate`]s together with the evaluator-
/// visible input labels chosen for one garbler input assignment.
///
/// This carries no plaintext truth tables and no label-pair table: an
/// evaluator holding a `GarbledCircuit` can compute the output labels (via
/// [`crate::evaluator::evaluate`]) but cannot recover any bit it wasn't
/// meant to see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbledCircuit {
    circuit: Circuit<GarbledGate>,
    input_keys: Vec<Label>,
}

impl GarbledCircuit {
    /// Wraps an already-validated circuit of garbled gates with its bound
    /// input labels.
    pub fn new(circuit: Circuit<GarbledGate>, input_keys: Vec<Label>) -> Self {
        GarbledCircuit { circuit, input_keys }
    }

    /// The underlying circuit of garbled gates.
    pub fn inner(&self) -> &Circuit<GarbledGate> {
        &self.circuit
    }

    /// The evaluator-visible input labels, one per input wire in input
    /// order.
    pub fn input_keys(&self) -> &[Label] {
        &self.input_keys
    }
}

/// The pair of labels assigned to a wire, standing in for its `0` and `1`
/// values.
#[derive(Debug, Clone, Copy)]
pub struct LabelPair {
    /// The label representing bit `0` on this wire.
    pub zero: Label,
    /// The label representing bit `1` on this wire.
    pub one: Label,
}

impl LabelPair {
    /// Returns the label matching `bit`, or [`GcError::Domain`] if `bit` is
    /// not `0` or `1`.
    pub fn label_for(&self, bit: u8) -> Result<Label> {
        match bit {
            0 => Ok(self.zero),
            1 => Ok(self.one),
            other => Err(GcError::Domain(format!("bit must be 0 or 1, got {other}"))),
        }
    }

    /// Returns the bit (`0` or `1`) that `label` represents, or
    /// [`GcError::UnknownLabel`] if it matches neither.
    pub fn bit_for(&self, label: &Label, wire_id: usize) -> Result<u8> {
        if *label == self.zero {
            Ok(0)
        } else if *label == self.one {
            Ok(1)
        } else {
            Err(GcError::UnknownLabel { wire_id })
        }
    }
}
