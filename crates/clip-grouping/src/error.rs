//! Errors surfaced by the grouping engine.

#[derive(Debug, thiserror::Error)]
pub enum GroupingError {
    #[error("Grid resolution must be a positive number of degrees, got {0}")]
    InvalidGridResolution(f64),
}
