use thiserror::Error;

use crate::data_structs::typedef::TraitId;

/// Typed failures of the extraction subsystem.
///
/// Recoverable conditions (empty slices, degenerate numeric inputs) are not
/// part of this taxonomy. They are logged and skipped where they occur.
#[derive(Debug, Error)]
pub enum GwasError {
    /// An input table is missing columns the operation requires.
    #[error("missing required column(s): {0:?}")]
    Schema(Vec<String>),

    /// A requested attribute is not part of the attribute registry.
    #[error("attribute {0} not found")]
    UnknownAttribute(String),

    /// A requested attribute is absent from the store and cannot be
    /// reconstructed downstream.
    #[error("attribute {0} is not materialized in the store")]
    NotStored(String),

    /// A task failed inside a scheduler batch. Remaining batches are never
    /// submitted; outputs already written stay on disk.
    #[error("task for trait {trait_id} failed in batch {batch}: {source}")]
    BatchTask {
        trait_id: TraitId,
        batch:    usize,
        #[source]
        source:   anyhow::Error,
    },
}

impl GwasError {
    pub fn schema<S: Into<String>>(missing: impl IntoIterator<Item = S>) -> Self {
        GwasError::Schema(missing.into_iter().map(Into::into).collect())
    }
}
