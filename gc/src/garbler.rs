use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;

use crate::circuit::{Circuit, GarbledCircuit, LabelPair, LogicCircuit};
use crate::crypto;
use crate::error::{GcError, Result};
use crate::gate::{Gate, GarbledGate};
use crate::label::{Label, KEY_SIZE};

/// Garbles [`LogicCircuit`]s using a deterministic CSPRNG seeded by the
/// caller, and decodes an evaluator's output labels back into bits.
///
/// Every random choice the garbler makes (wire labels, row permutation) is
/// drawn from one continuous `ChaCha12Rng` stream, so garbling the same
/// circuit with the same input bits under the same seed produces
/// byte-identical output. After a call to [`Garbler::garble`], the garbler
/// retains the label pair for every wire so a later [`Garbler::decrypt`]
/// call can map the evaluator's output labels back to bits; a second call
/// to `garble` discards and replaces that table.
#[derive(Debug)]
pub struct Garbler {
    rng: ChaCha12Rng,
    keys: Vec<LabelPair>,
}

impl Garbler {
    /// Creates a garbler seeded with 32 bytes of CSPRNG state.
    pub fn new(seed_data: [u8; 32]) -> Self {
        Garbler { rng: ChaCha12Rng::from_seed(seed_data), keys: Vec::new() }
    }

    /// Creates a garbler seeded from a single `u64`, for callers (tests,
    /// reproducible CLI runs) that want a short, memorable seed rather than
    /// 32 raw bytes. The remaining 24 bytes are zero.
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed_data = [0u8; 32];
        seed_data[..8].copy_from_slice(&seed.to_le_bytes());
        Garbler::new(seed_data)
    }

    fn random_label(&mut self) -> Label {
        let mut bytes = [0u8; KEY_SIZE];
        self.rng.fill_bytes(&mut bytes);
        Label::new(bytes)
    }

    /// Garbles a plaintext circuit for a concrete garbler input assignment,
    /// producing a [`GarbledCircuit`] that already carries the
    /// evaluator-visible input labels for those bits.
    ///
    /// For each gate, a fresh label pair is drawn for its output wire, every
    /// row of its truth table is encrypted under the AES-256 key formed by
    /// that row's input labels, and the rows are then shuffled (Fisher-Yates,
    /// via the same RNG stream) so their order carries no information about
    /// which input combination produced which row.
    pub fn garble(&mut self, circuit: &LogicCircuit, garbler_input_bits: &[u8]) -> Result<GarbledCircuit> {
        if garbler_input_bits.len() != circuit.num_inputs() {
            return Err(GcError::ShapeMismatch(format!(
                "circuit expects {} input bits, got {}",
                circuit.num_inputs(),
                garbler_input_bits.len()
            )));
        }
        if garbler_input_bits.iter().any(|&b| b > 1) {
            return Err(GcError::Domain("input bits must be 0 or 1".into()));
        }

        let mut keys: Vec<LabelPair> = Vec::with_capacity(circuit.num_wires());
        for _ in 0..circuit.num_inputs() {
            keys.push(LabelPair { zero: self.random_label(), one: self.random_label() });
        }

        let mut garbled_gates = Vec::with_capacity(circuit.gates().len());
        for gate in circuit.gates() {
            let output_pair = LabelPair { zero: self.random_label(), one: self.random_label() };
            let left_pair = keys[gate.left()];
            let right_pair = gate.right().map(|r| keys[r]);

            let mut rows = Vec::with_capacity(1 << gate.arity());
            match right_pair {
                Some(right_pair) => {
                    for left_bit in 0..2u8 {
                        for right_bit in 0..2u8 {
                            let out_bit = gate.evaluate(left_bit, Some(right_bit))?;
                            let key_left = left_pair.label_for(left_bit)?;
                            let key_right = right_pair.label_for(right_bit)?;
                            let out_label = output_pair.label_for(out_bit)?;
                            rows.push(crypto::encrypt_row(&key_left, &key_right, &out_label));
                        }
                    }
                }
                None => {
                    for bit in 0..2u8 {
                        let out_bit = gate.evaluate(bit, None)?;
                        let key_single = left_pair.label_for(bit)?;
                        let out_label = output_pair.label_for(out_bit)?;
                        rows.push(crypto::encrypt_row(&key_single, &key_single, &out_label));
                    }
                }
            }

            rows.shuffle(&mut self.rng);

            garbled_gates.push(GarbledGate::new(gate.left(), gate.right(), rows));
            keys.push(output_pair);
        }

        let input_keys = keys[..circuit.num_inputs()]
            .iter()
            .zip(garbler_input_bits)
            .map(|(pair, &bit)| pair.label_for(bit))
            .collect::<Result<Vec<_>>>()?;

        self.keys = keys;

        let inner = Circuit::new(circuit.num_inputs(), garbled_gates, circuit.outputs().to_vec())?;
        Ok(GarbledCircuit::new(inner, input_keys))
    }

    /// Decodes the evaluator's output labels back into bits, using the label
    /// pair table left behind by the most recent call to [`Garbler::garble`].
    pub fn decrypt(&self, output_ids: &[usize], output_labels: &[Label]) -> Result<Vec<u8>> {
        if output_ids.len() != output_labels.len() {
            return Err(GcError::ShapeMismatch(format!(
                "expected {} output labels, got {}",
                output_ids.len(),
                output_labels.len()
            )));
        }
        output_ids
            .iter()
            .zip(output_labels)
            .map(|(&wire_id, label)| {
                let pair = self
                    .keys
                    .get(wire_id)
                    .ok_or_else(|| GcError::Structural(format!("wire {wire_id} does not exist")))?;
                pair.bit_for(label, wire_id)
            })
            .collect()
    }
}
