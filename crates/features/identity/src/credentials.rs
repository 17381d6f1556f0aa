//! Password hashing for staff accounts.
//!
//! Passwords are stretched with HKDF-SHA256 over a per-account random salt
//! and stored hex-encoded next to the salt. Verification recomputes the
//! digest and compares without short-circuiting on the first differing byte.

use crate::error::IdentityError;
use hkdf::Hkdf;
use sha2::Sha256;

const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;
const HKDF_INFO: &[u8] = b"atelier:staff-credentials:v1";

/// Fresh random salt, hex-encoded for storage.
///
/// # Errors
/// Returns [`IdentityError::Internal`] if the OS entropy source fails.
pub fn generate_salt() -> Result<String, IdentityError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt).map_err(|e| IdentityError::Internal {
        message: e.to_string().into(),
        context: Some("Failed to generate salt".into()),
    })?;
    Ok(hex::encode(salt))
}

/// Derives the storable digest for a password under the given hex salt.
///
/// # Errors
/// Returns [`IdentityError::Internal`] if the salt is not valid hex.
pub fn hash_password(password: &str, salt_hex: &str) -> Result<String, IdentityError> {
    let salt = hex::decode(salt_hex).map_err(|e| IdentityError::Internal {
        message: e.to_string().into(),
        context: Some("Stored salt is not valid hex".into()),
    })?;

    let hk = Hkdf::<Sha256>::new(Some(&salt), password.as_bytes());
    let mut digest = [0u8; DIGEST_LEN];
    hk.expand(HKDF_INFO, &mut digest).map_err(|e| IdentityError::Internal {
        message: e.to_string().into(),
        context: Some("HKDF expand failed".into()),
    })?;

    Ok(hex::encode(digest))
}

/// Checks a password attempt against the stored salt and digest.
///
/// # Errors
/// Returns [`IdentityError::Internal`] if the stored salt is corrupt.
pub fn verify_password(
    password: &str,
    salt_hex: &str,
    stored_digest: &str,
) -> Result<bool, IdentityError> {
    let candidate = hash_password(password, salt_hex)?;
    Ok(digest_eq(candidate.as_bytes(), stored_digest.as_bytes()))
}

// Full-width comparison; both operands are fixed-size hex digests.
fn digest_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
