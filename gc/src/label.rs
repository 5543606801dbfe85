use crate::error::{GcError, Result};

/// Byte length of a wire label and of an AES-256 key derived from two labels.
pub const KEY_SIZE: usize = 16;

/// A wire label: one of the two random keys assigned to a wire, standing in
/// for one of its two possible bit values without revealing which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub [u8; KEY_SIZE]);

impl Label {
    /// Wraps a fixed-size byte array as a label.
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Label(bytes)
    }

    /// Builds a label from a slice, rejecting any length other than
    /// [`KEY_SIZE`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| GcError::Domain(format!("label must be {KEY_SIZE} bytes, got {}", bytes.len())))?;
        Ok(Label(arr))
    }

    /// Returns the label's bytes as a slice.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Encodes the label as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decodes a lowercase hex string into a label.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let label = Label::new([7u8; KEY_SIZE]);
        let hex = label.to_hex();
        assert_eq!(Label::from_hex(&hex).unwrap(), label);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Label::from_slice(&[0u8; 8]).is_err());
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Label::from_hex("not-hex").is_err());
    }
}
