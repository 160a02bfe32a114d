use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("sleep bins need exactly {expected} edges, got {actual}")]
    BinEdgeCount { expected: usize, actual: usize },
    #[error("sleep bin edges must be finite and strictly increasing: {edges:?}")]
    BinEdgeOrder { edges: Vec<f64> },
}

pub type Result<T> = std::result::Result<T, ModelError>;
