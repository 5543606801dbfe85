use serde::{Deserialize, Serialize};

use crate::error::{GcError, Result};

/// A gate type usable inside a [`crate::circuit::Circuit`].
///
/// Implemented by [`LogicGate`] (plaintext truth tables) and [`GarbledGate`]
/// (encrypted rows), so the circuit's shape-validation and topological
/// evaluation machinery is written once and shared by both.
pub trait Gate {
    /// The id of this gate's left (or only, for a unary gate) input wire.
    fn left(&self) -> usize;

    /// The id of this gate's right input wire, or `None` for a unary gate.
    fn right(&self) -> Option<usize>;

    /// Number of input wires: `1` for unary, `2` for binary. The gate's row
    /// (or truth table) count is `2.pow(arity())`.
    fn arity(&self) -> usize {
        if self.right().is_some() { 2 } else { 1 }
    }
}

/// A plaintext logic gate: an input wire (or pair of wires) plus the truth
/// table mapping input bit combinations to an output bit.
///
/// `table[i]` is the output for the input bits packed as `left << 1 | right`
/// (or just `left` for a unary gate), matching the bit-packing used when
/// deriving a garbled row's AES key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicGate {
    pub(crate) left: usize,
    pub(crate) right: Option<usize>,
    pub(crate) table: Vec<u8>,
}

impl LogicGate {
    /// Builds a unary gate (e.g. NOT) from its input wire and 2-entry table.
    pub fn unary(left: usize, table: [u8; 2]) -> Result<Self> {
        validate_table(&table)?;
        Ok(LogicGate { left, right: None, table: table.to_vec() })
    }

    /// Builds a binary gate (e.g. AND/OR/XOR) from its two input wires and
    /// 4-entry table.
    pub fn binary(left: usize, right: usize, table: [u8; 4]) -> Result<Self> {
        validate_table(&table)?;
        if left == right {
            return Err(GcError::Structural(format!(
                "binary gate cannot use wire {left} as both inputs"
            )));
        }
        Ok(LogicGate { left, right: Some(right), table: table.to_vec() })
    }

    /// Looks up the output bit for a concrete assignment of input bits.
    pub fn evaluate(&self, left_bit: u8, right_bit: Option<u8>) -> Result<u8> {
        let index = match (self.right, right_bit) {
            (Some(_), Some(r)) => ((left_bit as usize) << 1) | (r as usize),
            (None, None) => left_bit as usize,
            _ => {
                return Err(GcError::ShapeMismatch(
                    "gate arity does not match number of input bits supplied".into(),
                ))
            }
        };
        self.table
            .get(index)
            .copied()
            .ok_or_else(|| GcError::Domain(format!("truth table index {index} out of range")))
    }

    /// The gate's truth table, read left to right by input index.
    pub fn table(&self) -> &[u8] {
        &self.table
    }
}

impl Gate for LogicGate {
    fn left(&self) -> usize {
        self.left
    }

    fn right(&self) -> Option<usize> {
        self.right
    }
}

fn validate_table(table: &[u8]) -> Result<()> {
    if table.iter().any(|&b| b > 1) {
        return Err(GcError::Domain("truth table entries must be 0 or 1".into()));
    }
    Ok(())
}

/// A garbled gate: the same shape as a [`LogicGate`] but with the truth
/// table replaced by a permuted list of AES-encrypted rows.
///
/// Row order carries no information about which row corresponds to which
/// input combination; the evaluator recovers the right row purely by trial
/// decryption (see [`crate::crypto::decrypt_row`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbledGate {
    pub(crate) left: usize,
    pub(crate) right: Option<usize>,
    pub(crate) rows: Vec<[u8; 2 * crate::label::KEY_SIZE]>,
}

impl GarbledGate {
    pub(crate) fn new(left: usize, right: Option<usize>, rows: Vec<[u8; 2 * crate::label::KEY_SIZE]>) -> Self {
        GarbledGate { left, right, rows }
    }

    /// The gate's encrypted rows, in permuted (garbled) order.
    pub fn rows(&self) -> &[[u8; 2 * crate::label::KEY_SIZE]] {
        &self.rows
    }
}

impl Gate for GarbledGate {
    fn left(&self) -> usize {
        self.left
    }

    fn right(&self) -> Option<usize> {
        self.right
    }
}
