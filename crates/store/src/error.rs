use thiserror::Error;

/// Errors surfaced by a fee-store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
