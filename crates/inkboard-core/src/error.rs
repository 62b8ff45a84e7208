//! Error types shared across the core.

use crate::layers::{LayerId, LayerType};
use thiserror::Error;

/// Errors produced by board operations.
///
/// Only construction failures (`UnsupportedLayerType`, `DuplicateLayerId`,
/// `EmptyPath`, `Config`) are propagated by the public mutation API. The remaining
/// variants come from the checked helpers; the unchecked operations recover
/// from them locally with a no-op or a clamp.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("Layer type \"{0}\" is not supported by the factory")]
    UnsupportedLayerType(LayerType),
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),
    #[error("Layer id already exists: {0}")]
    DuplicateLayerId(LayerId),
    #[error("Path layer {0} has no samples")]
    EmptyPath(LayerId),
    #[error("Geometry {width}x{height} is below the minimum size {min}")]
    InvalidGeometry { width: f64, height: f64, min: f64 },
    #[error("Scale {scale} is outside [{min}, {max}]")]
    ScaleOutOfRange { scale: f64, min: f64, max: f64 },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
