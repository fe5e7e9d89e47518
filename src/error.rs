use thiserror::Error;

/// Error taxonomy for the IKC engine.
///
/// Each variant corresponds to a distinct failure kind the core can surface;
/// none are recovered internally. Structural invariants of the graph, core
/// numbers, and clustering hold at every boundary even after an error.
#[derive(Debug, Error)]
pub enum IkcError {
    #[error("input file not found: {0}")]
    InputFileNotFound(String),

    #[error("malformed edge line {line_no}: {text:?}")]
    MalformedEdgeLine { line_no: usize, text: String },

    #[error("streaming engine not initialized; call initial_clustering() first")]
    NotInitialized,

    #[error("edge references unknown vertex {0}")]
    EdgeReferencesUnknownVertex(u64),

    #[error("commit_batch called outside of batch mode")]
    BatchStateViolation,

    #[error("progress callback panicked: {0}")]
    CallbackPanicked(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IkcResult<T> = Result<T, IkcError>;

// Note: do not implement a blanket From<IkcError> to Box<dyn Error>. The
// standard library already provides a conflicting implementation for all
// StdError types. Leave conversions explicit where needed.
