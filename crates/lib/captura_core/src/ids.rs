//! Row identifier generation.
//!
//! Records and session tokens are listed newest-first, so their ids are
//! UUIDv7 values minted app-side; PostgreSQL's `gen_random_uuid()` only
//! produces v4. The users table has no ordering requirement and keeps
//! the database default.

use uuid::Uuid;

/// Mint a time-ordered row id (UUIDv7).
pub fn new_row_id() -> Uuid {
    Uuid::now_v7()
}
