//! Password hashing.

use super::AuthError;

/// bcrypt work factor for newly hashed passwords.
const BCRYPT_COST: u32 = 10;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("password hash: {e}")))
}

/// Check a candidate password against a stored hash.
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(candidate, stored_hash)
        .map_err(|e| AuthError::Internal(format!("password verify: {e}")))
}
