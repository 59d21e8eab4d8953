use thiserror::Error;

/// Errors raised while building a store or its state containers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A sub-state slot was registered without a value
    #[error("sub-state slot {0} has no value")]
    MissingSubState(String),

    /// A store worker thread could not be started
    #[error("failed to spawn {name} thread: {reason}")]
    WorkerSpawn { name: &'static str, reason: String },
}
