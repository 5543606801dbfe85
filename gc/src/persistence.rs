use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, GarbledCircuit, LabelPair, LogicCircuit};
use crate::error::{GcError, Result};
use crate::gate::{Gate, GarbledGate, LogicGate};
use crate::label::Label;

#[derive(Serialize, Deserialize)]
struct LogicGateDto {
    id: usize,
    inputs: Vec<usize>,
    values: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct LogicCircuitDto {
    input_ids: Vec<usize>,
    output_ids: Vec<usize>,
    gates: Vec<LogicGateDto>,
}

fn check_contiguous_input_ids(input_ids: &[usize]) -> Result<usize> {
    for (i, &id) in input_ids.iter().enumerate() {
        if id != i {
            return Err(GcError::Structural(format!(
                "input_ids must be the contiguous range 0..{}, got {id} at position {i}",
                input_ids.len()
            )));
        }
    }
    Ok(input_ids.len())
}

/// Writes a plaintext circuit to `path` as JSON.
pub fn store_circuit(circuit: &LogicCircuit, path: impl AsRef<Path>) -> Result<()> {
    let dto = LogicCircuitDto {
        input_ids: (0..circuit.num_inputs()).collect(),
        output_ids: circuit.outputs().to_vec(),
        gates: circuit
            .gates()
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let mut inputs = vec![g.left()];
                if let Some(r) = g.right() {
                    inputs.push(r);
                }
                LogicGateDto { id: circuit.gate_wire_id(i), inputs, values: g.table().to_vec() }
            })
            .collect(),
    };
    fs::write(path, serde_json::to_string_pretty(&dto)?)?;
    Ok(())
}

/// Reads and structurally validates a plaintext circuit from `path`.
pub fn load_circuit(path: impl AsRef<Path>) -> Result<LogicCircuit> {
    let text = fs::read_to_string(path)?;
    let dto: LogicCircuitDto = serde_json::from_str(&text)?;
    let num_inputs = check_contiguous_input_ids(&dto.input_ids)?;

    let gates = dto
        .gates
        .into_iter()
        .enumerate()
        .map(|(i, g)| {
            let expected_id = num_inputs + i;
            if g.id != expected_id {
                return Err(GcError::Structural(format!(
                    "gate at position {i} declares id {}, expected {expected_id}",
                    g.id
                )));
            }
            match g.inputs.as_slice() {
                &[left, right] => {
                    let table: [u8; 4] = g
                        .values
                        .try_into()
                        .map_err(|_| GcError::Domain("binary gate table must have 4 entries".into()))?;
                    LogicGate::binary(left, right, table)
                }
                &[left] => {
                    let table: [u8; 2] = g
                        .values
                        .try_into()
                        .map_err(|_| GcError::Domain("unary gate table must have 2 entries".into()))?;
                    LogicGate::unary(left, table)
                }
                other => Err(GcError::ShapeMismatch(format!("gate must have 1 or 2 inputs, got {}", other.len()))),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Circuit::new(num_inputs, gates, dto.output_ids)
}

#[derive(Serialize, Deserialize)]
struct GarbledGateDto {
    id: usize,
    inputs: Vec<usize>,
    values: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct GarbledCircuitDto {
    input_ids: Vec<usize>,
    output_ids: Vec<usize>,
    garbled_gates: Vec<GarbledGateDto>,
    input_keys: Vec<String>,
}

/// Writes a garbled circuit to `path` as JSON, hex-encoding every row and the
/// bound input labels.
pub fn store_garbled_circuit(gc: &GarbledCircuit, path: impl AsRef<Path>) -> Result<()> {
    let circuit = gc.inner();
    let dto = GarbledCircuitDto {
        input_ids: (0..circuit.num_inputs()).collect(),
        output_ids: circuit.outputs().to_vec(),
        garbled_gates: circuit
            .gates()
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let mut inputs = vec![g.left()];
                if let Some(r) = g.right() {
                    inputs.push(r);
                }
                GarbledGateDto {
                    id: circuit.gate_wire_id(i),
                    inputs,
                    values: g.rows().iter().map(hex::encode).collect(),
                }
            })
            .collect(),
        input_keys: gc.input_keys().iter().map(Label::to_hex).collect(),
    };
    fs::write(path, serde_json::to_string_pretty(&dto)?)?;
    Ok(())
}

/// Reads and structurally validates a garbled circuit from `path`.
pub fn load_garbled_circuit(path: impl AsRef<Path>) -> Result<GarbledCircuit> {
    let text = fs::read_to_string(path)?;
    let dto: GarbledCircuitDto = serde_json::from_str(&text)?;
    let num_inputs = check_contiguous_input_ids(&dto.input_ids)?;

    let gates = dto
        .garbled_gates
        .into_iter()
        .enumerate()
        .map(|(i, g)| {
            let expected_id = num_inputs + i;
            if g.id != expected_id {
                return Err(GcError::Structural(format!(
                    "garbled gate at position {i} declares id {}, expected {expected_id}",
                    g.id
                )));
            }
            let (left, right) = match g.inputs.as_slice() {
                &[left, right] => (left, Some(right)),
                &[left] => (left, None),
                other => {
                    return Err(GcError::ShapeMismatch(format!(
                        "gate must have 1 or 2 inputs, got {}",
                        other.len()
                    )))
                }
            };
            let rows = g
                .values
                .iter()
                .map(|row_hex| {
                    let bytes = hex::decode(row_hex)?;
                    let arr: [u8; 2 * crate::label::KEY_SIZE] = bytes
                        .try_into()
                        .map_err(|_| GcError::Domain("garbled row has wrong length".into()))?;
                    Ok(arr)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(GarbledGate::new(left, right, rows))
        })
        .collect::<Result<Vec<_>>>()?;

    let circuit = Circuit::new(num_inputs, gates, dto.output_ids)?;
    let input_keys = dto.input_keys.iter().map(|s| Label::from_hex(s)).collect::<Result<Vec<_>>>()?;
    Ok(GarbledCircuit::new(circuit, input_keys))
}

#[derive(Serialize, Deserialize)]
struct LabelPairDto {
    zero: String,
    one: String,
}

impl From<LabelPair> for LabelPairDto {
    fn from(pair: LabelPair) -> Self {
        LabelPairDto { zero: pair.zero.to_hex(), one: pair.one.to_hex() }
    }
}

impl LabelPairDto {
    fn into_pair(self) -> Result<LabelPair> {
        Ok(LabelPair { zero: Label::from_hex(&self.zero)?, one: Label::from_hex(&self.one)? })
    }
}

/// Writes the garbler's secret wire label pairs to `path`, keyed by wire id.
///
/// This material must never be sent to the evaluator: it lets its holder
/// decode every wire in the circuit, not just the ones it was meant to see.
pub fn store_label_pairs(keys: &[LabelPair], path: impl AsRef<Path>) -> Result<()> {
    let dto: Vec<LabelPairDto> = keys.iter().copied().map(LabelPairDto::from).collect();
    fs::write(path, serde_json::to_string_pretty(&dto)?)?;
    Ok(())
}

/// Reads the garbler's secret wire label pairs back from `path`.
pub fn load_label_pairs(path: impl AsRef<Path>) -> Result<Vec<LabelPair>> {
    let text = fs::read_to_string(path)?;
    let dto: Vec<LabelPairDto> = serde_json::from_str(&text)?;
    dto.into_iter().map(LabelPairDto::into_pair).collect()
}

/// Writes a flat list of wire labels (e.g. an evaluator's computed output
/// labels) to `path` as a JSON array of hex strings.
pub fn store_labels(labels: &[Label], path: impl AsRef<Path>) -> Result<()> {
    let hex_labels: Vec<String> = labels.iter().map(Label::to_hex).collect();
    fs::write(path, serde_json::to_string_pretty(&hex_labels)?)?;
    Ok(())
}

/// Reads a flat list of wire labels from `path`.
pub fn load_labels(path: impl AsRef<Path>) -> Result<Vec<Label>> {
    let text = fs::read_to_string(path)?;
    let hex_labels: Vec<String> = serde_json::from_str(&text)?;
    hex_labels.iter().map(|s| Label::from_hex(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::LogicGate;

    #[test]
    fn logic_circuit_round_trips_through_json() {
        let gate = LogicGate::binary(0, 1, [0, 1, 1, 0]).unwrap();
        let circuit = Circuit::new(2, vec![gate], vec![2]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circuit.json");
        store_circuit(&circuit, &path).unwrap();
        let loaded = load_circuit(&path).unwrap();

        assert_eq!(loaded.num_inputs(), circuit.num_inputs());
        assert_eq!(loaded.outputs(), circuit.outputs());
    }

    #[test]
    fn garbled_circuit_round_trips_with_input_keys() {
        use crate::garbler::Garbler;

        let gate = LogicGate::binary(0, 1, [0, 1, 1, 0]).unwrap();
        let circuit = Circuit::new(2, vec![gate], vec![2]).unwrap();
        let mut garbler = Garbler::from_seed_u64(3);
        let gc = garbler.garble(&circuit, &[1, 0]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbled.json");
        store_garbled_circuit(&gc, &path).unwrap();
        let loaded = load_garbled_circuit(&path).unwrap();

        assert_eq!(loaded.input_keys(), gc.input_keys());
        assert_eq!(loaded.inner().outputs(), gc.inner().outputs());
    }

    #[test]
    fn labels_round_trip_through_json() {
        let labels = vec![Label::new([1u8; crate::label::KEY_SIZE]), Label::new([2u8; crate::label::KEY_SIZE])];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        store_labels(&labels, &path).unwrap();
        let loaded = load_labels(&path).unwrap();
        assert_eq!(loaded, labels);
    }

    #[test]
    fn load_circuit_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_circuit(&path).is_err());
    }

    #[test]
    fn load_circuit_rejects_noncontiguous_input_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_ids.json");
        let text = serde_json::to_string(&LogicCircuitDto {
            input_ids: vec![0, 2],
            output_ids: vec![2],
            gates: vec![LogicGateDto { id: 2, inputs: vec![0, 1], values: vec![0, 1, 1, 0] }],
        })
        .unwrap();
        fs::write(&path, text).unwrap();
        assert!(load_circuit(&path).is_err());
    }
}
