use thiserror::Error;

/// Expected failure modes of the record-store adapters.
///
/// These are outcomes, not faults — handlers map them directly to response
/// codes. Anything unexpected is masked as `Unavailable` carrying only the
/// tracking tag of the operation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,

    #[error("credential mismatch")]
    Forbidden,

    #[error("no such record")]
    NotFound,

    #[error("backing store unavailable ({tag})")]
    Unavailable { tag: &'static str },
}

/// Selector for session-aware user lookups: the primary key or the stored
/// session token. Two variants keep "neither given" unrepresentable at the
/// adapter layer; the HTTP layer owns that 400.
#[derive(Debug, Clone)]
pub enum Selector {
    ByUsername(String),
    BySessionKey(String),
}

/// Collaborator notified of unexpected failures before they are masked as
/// `Unavailable`. `tag` is the stable identifier of the failing operation.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, tag: &'static str, err: &anyhow::Error);
}
