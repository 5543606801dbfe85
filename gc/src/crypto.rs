use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray};
use aes::Aes256;

use crate::error::{GcError, Result};
use crate::label::{Label, KEY_SIZE};

/// Byte length of an AES-256 key, formed by concatenating two wire labels.
pub const AES_KEY_SIZE: usize = 32;

/// Marker written as the second plaintext block of every garbled row.
///
/// A row decrypts successfully, from the evaluator's point of view, exactly
/// when its second block equals this marker after decryption. It carries no
/// authentication: an adversarial garbler could make a wrong row "match" by
/// constructing a ciphertext whose second block decrypts to zero, but inside
/// this protocol the garbler is trusted to produce honest tables.
pub const PAD_MARKER: [u8; KEY_SIZE] = [0u8; KEY_SIZE];

/// Encrypts a gate's row: the output label under a key built from the row's
/// two (or one, doubled) input labels.
///
/// The plaintext is two blocks, `output_label || PAD_MARKER`, each encrypted
/// independently under the same AES-256 key (equivalent to ECB mode for this
/// fixed two-block message).
pub fn encrypt_row(key_left: &Label, key_right: &Label, output_label: &Label) -> [u8; 2 * KEY_SIZE] {
    let cipher = build_cipher(key_left, key_right);

    let mut block0 = GenericArray::clone_from_slice(output_label.as_bytes());
    let mut block1 = GenericArray::clone_from_slice(&PAD_MARKER);
    cipher.encrypt_block(&mut block0);
    cipher.encrypt_block(&mut block1);

    let mut out = [0u8; 2 * KEY_SIZE];
    out[..KEY_SIZE].copy_from_slice(&block0);
    out[KEY_SIZE..].copy_from_slice(&block1);
    out
}

/// Attempts to decrypt a single garbled row under the given key.
///
/// Returns the recovered output label only if the second decrypted block
/// equals [`PAD_MARKER`]; otherwise this row is not the one selected by the
/// evaluator's input labels.
pub fn decrypt_row(key_left: &Label, key_right: &Label, ciphertext: &[u8]) -> Result<Option<Label>> {
    if ciphertext.len() != 2 * KEY_SIZE {
        return Err(GcError::Domain(format!(
            "ciphertext must be {} bytes, got {}",
            2 * KEY_SIZE,
            ciphertext.len()
        )));
    }

    let cipher = build_cipher(key_left, key_right);

    let mut block0 = GenericArray::clone_from_slice(&ciphertext[..KEY_SIZE]);
    let mut block1 = GenericArray::clone_from_slice(&ciphertext[KEY_SIZE..]);
    cipher.decrypt_block(&mut block0);
    cipher.decrypt_block(&mut block1);

    if block1.as_slice() == PAD_MARKER.as_slice() {
        Ok(Some(Label::from_slice(&block0)?))
    } else {
        Ok(None)
    }
}

fn build_cipher(key_left: &Label, key_right: &Label) -> Aes256 {
    let mut key_bytes = [0u8; AES_KEY_SIZE];
    key_bytes[..KEY_SIZE].copy_from_slice(key_left.as_bytes());
    key_bytes[KEY_SIZE..].copy_from_slice(key_right.as_bytes());
    Aes256::new(GenericArray::from_slice(&key_bytes))
}
