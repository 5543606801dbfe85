use crate::circuit::GarbledCircuit;
use crate::crypto;
use crate::error::{GcError, Result};
use crate::gate::Gate;
use crate::label::Label;

/// Evaluates a garbled circuit, returning the labels on its output wires.
///
/// The circuit's input labels are already bound inside `gc` (selected by the
/// garbler for its concrete input assignment), so the evaluator needs
/// nothing else to run this. It holds exactly one label per wire and never
/// learns the underlying bit: for each gate it tries every row in turn,
/// decrypting with the AES-256 key formed from its two known input labels,
/// and keeps the one output whose second plaintext block matches the padding
/// marker. Gates are visited in ascending wire-id order, so a gate's inputs
/// are always already resolved by the time it is reached.
pub fn evaluate(gc: &GarbledCircuit) -> Result<Vec<Label>> {
    let circuit = gc.inner();
    let input_labels = gc.input_keys();
    if input_labels.len() != circuit.num_inputs() {
        return Err(GcError::ShapeMismatch(format!(
            "circuit expects {} input labels, got {}",
            circuit.num_inputs(),
            input_labels.len()
        )));
    }

    let mut wires: Vec<Option<Label>> = vec![None; circuit.num_wires()];
    for (i, &label) in input_labels.iter().enumerate() {
        wires[i] = Some(label);
    }

    for (i, gate) in circuit.gates().iter().enumerate() {
        let own_id = circuit.gate_wire_id(i);
        let left_label = wires[gate.left()].expect("input wires are resolved before dependents");

        let resolved = match gate.right() {
            Some(r) => {
                let right_label = wires[r].expect("input wires are resolved before dependents");
                resolve_row(gate.rows(), &left_label, &right_label, own_id)?
            }
            None => resolve_row(gate.rows(), &left_label, &left_label, own_id)?,
        };

        wires[own_id] = Some(resolved);
    }

    circuit
        .outputs()
        .iter()
        .map(|&w| wires[w].ok_or_else(|| GcError::UnknownLabel { wire_id: w }))
        .collect()
}

/// Tries every row under the given key, rather than stopping at the first
/// match, so the time this takes does not depend on which row (if any)
/// decrypts correctly.
fn resolve_row(rows: &[[u8; 2 * crate::label::KEY_SIZE]], left: &Label, right: &Label, gate_id: usize) -> Result<Label> {
    let mut found: Option<Label> = None;
    for row in rows {
        if let Some(label) = crypto::decrypt_row(left, right, row)? {
            found = Some(label);
        }
    }
    found.ok_or(GcError::DecryptionFailed { gate_id })
}
