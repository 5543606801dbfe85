use thiserror::Error;

/// Error taxonomy for circuit construction, garbling, and evaluation.
///
/// Every fallible operation in this crate returns one of these variants rather
/// than a bare string, so callers (and tests) can match on the failure kind
/// instead of parsing a message.
#[derive(Debug, Error)]
pub enum GcError {
    /// Gate ids / input ids are not exactly `{0..n-1}`, an output id falls
    /// outside that range, a gate has an arity other than 1 or 2, or a gate
    /// references an input wire that is not strictly smaller than its own id.
    #[error("structural error: {0}")]
    Structural(String),

    /// A caller-supplied sequence (input bits, input labels, output labels)
    /// has a different length than the circuit expects.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A value fell outside its expected domain: a logic value not in
    /// `{0,1}`, a label not exactly `KEY_SIZE` bytes, a ciphertext not
    /// `2*KEY_SIZE` bytes, or a truth table whose length isn't `2^arity`.
    #[error("domain error: {0}")]
    Domain(String),

    /// A logic gate was used where a garbled gate was expected, or vice versa.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// None of a garbled gate's rows decrypted to a plaintext whose trailing
    /// `KEY_SIZE` bytes are the padding marker.
    #[error("decryption failed for gate {gate_id}: no row matched the padding marker")]
    DecryptionFailed {
        /// The id of the gate whose rows were scanned.
        gate_id: usize,
    },

    /// An output label equals neither of the wire's two known labels.
    #[error("unknown label for wire {wire_id}: matches neither L0 nor L1")]
    UnknownLabel {
        /// The wire whose label pair was consulted.
        wire_id: usize,
    },

    /// The requested file does not exist or could not be read/written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON payload or a hex string inside it was malformed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for GcError {
    fn from(err: serde_json::Error) -> Self {
        GcError::Parse(err.to_string())
    }
}

impl From<hex::FromHexError> for GcError {
    fn from(err: hex::FromHexError) -> Self {
        GcError::Parse(format!("invalid hex: {err}"))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GcError>;
