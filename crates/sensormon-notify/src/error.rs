/// Errors that can occur within the fan-out subsystem.
///
/// Never surfaced to the ingest caller: the ingest path logs these and
/// carries on.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A subscriber fell behind the channel capacity and missed events.
    #[error("Notify: subscriber lagged and missed {0} events")]
    Lagged(u64),

    /// Generic fan-out error for cases not covered by other variants.
    #[error("Notify: {0}")]
    Other(String),
}

/// Convenience `Result` alias for fan-out operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
