//! Product identifier scheme: `AGT` followed by six base-36 characters.

use rand::Rng;

use crate::error::StorageError;
use crate::record::ProductRecord;

pub const ID_PREFIX: &str = "AGT";

/// Number of random characters after the prefix.
pub const ID_SUFFIX_LEN: usize = 6;

/// Attempts made by [`generate_unique_id`] before giving up.
const MAX_ID_ATTEMPTS: usize = 32;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a candidate identifier. No collision check.
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_SUFFIX_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_SUFFIX_LEN {
        id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
    }
    id
}

/// Generate an identifier not used by any record in `existing`.
pub fn generate_unique_id<R: Rng + ?Sized>(
    rng: &mut R,
    existing: &[ProductRecord],
) -> Result<String, StorageError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = generate_id(rng);
        if !existing
            .iter()
            .any(|p| p.id.eq_ignore_ascii_case(&candidate))
        {
            return Ok(candidate);
        }
        tracing::debug!(id = %candidate, "generated product id collides, retrying");
    }
    Err(StorageError::IdAllocation {
        attempts: MAX_ID_ATTEMPTS,
    })
}

/// Identifiers are matched case-insensitively by upper-casing the query.
pub fn normalize_id(raw: &str) -> String {
    raw.to_uppercase()
}

/// True for `AGT` + six uppercase base-36 characters.
pub fn is_valid_id(id: &str) -> bool {
    match id.strip_prefix(ID_PREFIX) {
        Some(suffix) => {
            suffix.len() == ID_SUFFIX_LEN
                && suffix
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        }
        None => false,
    }
}
