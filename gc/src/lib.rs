//! Garbler and evaluator for two-party boolean circuits using Yao's garbled
//! circuit protocol.

pub mod circuit;
pub mod crypto;
pub mod error;
pub mod evaluator;
pub mod examples;
pub mod garbler;
pub mod gate;
pub mod label;
pub mod persistence;

pub use circuit::{Circuit, GarbledCircuit, LabelPair, LogicCircuit};
pub use error::{GcError, Result};
pub use evaluator::evaluate;
pub use garbler::Garbler;
pub use gate::{Gate, GarbledGate, LogicGate};
pub use label::Label;
