//! Base58 public key validation.

/// Length in bytes of an ed25519 public key.
pub const PUBKEY_LEN: usize = 32;

/// Returns `true` if `s` is a base58 string decoding to exactly 32 bytes.
pub fn is_valid_pubkey(s: &str) -> bool {
    // 32 bytes encode to at most 44 base58 characters.
    if s.is_empty() || s.len() > 44 {
        return false;
    }
    matches!(bs58::decode(s).into_vec(), Ok(bytes) if bytes.len() == PUBKEY_LEN)
}
