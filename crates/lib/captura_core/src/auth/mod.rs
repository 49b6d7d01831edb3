//! Credential and session logic.
//!
//! Password hashing, issuance and verification of the two token classes,
//! and the queries behind the persisted refresh-token set.

pub mod jwt;
pub mod password;
pub mod queries;

use thiserror::Error;

/// Errors from the credential and session layer.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token: {0}")]
    Token(String),

    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}
