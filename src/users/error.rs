// User operation errors

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum UserError {
    /// No record carries the requested id
    #[error("user {id} not found")]
    NotFound { id: i64 },

    #[error(transparent)]
    Storage(#[from] StoreError),
}
