//! Authentication domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain user. The password hash never leaves `auth::queries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// JWT claims shared by both token classes.
///
/// Access and refresh tokens carry the same identity claims; they differ
/// in lifetime and signing secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// User email.
    pub email: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
