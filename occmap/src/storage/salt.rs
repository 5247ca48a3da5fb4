//! Row key salting.
//!
//! Rows are spread over the key space by prefixing the dataset key with a
//! zero-padded salt: `|hash(key)| mod modulus`. The hash is the 32-bit
//! polynomial string hash (multiplier 31, UTF-16 code units) that existing
//! tables were written with.

use super::StorageError;

/// Prefixes dataset keys with a modulus salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulusSalt {
    modulus: u32,
    width: usize,
}

impl ModulusSalt {
    pub fn new(modulus: u32) -> Result<Self, StorageError> {
        if modulus == 0 {
            return Err(StorageError::Rejected(
                "salt modulus must be positive".to_string(),
            ));
        }
        let width = (modulus - 1).to_string().len();
        Ok(Self { modulus, width })
    }

    /// The salt of a key, zero-padded to a fixed width.
    pub fn salt(&self, key: &str) -> String {
        let bucket = (string_hash(key) % self.modulus as i32).unsigned_abs();
        format!("{:0width$}", bucket, width = self.width)
    }

    /// The full row key, `{salt}:{key}`.
    pub fn salted_key(&self, key: &str) -> String {
        format!("{}:{}", self.salt(key), key)
    }
}

fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}
