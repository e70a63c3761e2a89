//! Errors raised while planning a composition.

#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    #[error("Cannot compose a timeline from zero clips")]
    EmptyInput,

    #[error("Clip {id} cannot be composed: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Invalid date stamp format: {0:?}")]
    InvalidOverlayFormat(String),
}
