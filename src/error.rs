use crate::types::TreeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConsensusError>;

/// Errors raised while reconciling a tree ensemble.
///
/// None of these are recoverable: the computations are deterministic, so a
/// failing ensemble fails the same way every time.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Degenerate or malformed input (no qualifying trees, bad rounding input).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Data-integrity failure detected in an intermediate result.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Tree {tree}: invalid SSM identifier '{id}'")]
    InvalidSsmId { tree: TreeId, id: String },

    #[error("Tree {0} has mutation assignments but no entry in the tree summary")]
    MissingTree(TreeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(#[from] niffler::Error),
}
