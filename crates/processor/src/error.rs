/// Errors reported across the plugin boundary. None of these are ever produced on the audio
/// thread.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proposed bus layout cannot be processed.
    #[error("unsupported bus layout: {0}")]
    UnsupportedLayout(String),

    /// No parameter has this id.
    #[error("unknown parameter id {0}")]
    UnknownParameter(u64),

    /// A saved state blob could not be restored.
    #[error("invalid state: {0}")]
    State(#[source] Box<dyn std::error::Error + Send + Sync>),
}
