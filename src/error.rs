use crate::config::ExecutionTarget;
use crate::dtype::DType;
use thiserror::Error;

/// Error types that can occur while pooling or scattering gradients
///
/// Every precondition is checked before any output is allocated or written, so an
/// `Err` never comes with a partially filled result.
///
/// # Variants
///
/// - `InvalidRank` - the array is neither 3D `[channels, height, width]` nor 4D `[batch, channels, height, width]`
/// - `EmptyDimension` - one axis of the array has extent zero
/// - `InvalidOutputSize` - the requested output size does not have exactly two components
/// - `ShapeMismatch` - two arrays that must agree in shape do not
/// - `DtypeMismatch` - the gradient element type differs from the original input's
/// - `IndexOutOfRange` - a stored index does not address an element of its spatial plane
/// - `Layout` - the array could not be viewed as `(planes, height, width)`
/// - `InvalidConfig` - a configuration value was rejected
/// - `BackendNotRegistered` - the registry has no backend for the requested target
/// - `ForwardNotRun` - a layer was asked for gradients before its forward pass
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolingError {
    #[error("{op}: non-empty 3D or 4D (batch mode) array expected, got {actual}D array")]
    InvalidRank { op: &'static str, actual: usize },

    #[error("{op}: expected non-empty dimensions, but shape {shape:?} has dimension {dim} being empty")]
    EmptyDimension {
        op: &'static str,
        shape: Vec<usize>,
        dim: usize,
    },

    #[error("output_size must have exactly 2 components (height, width), got {0}")]
    InvalidOutputSize(usize),

    #[error("{what}: expected shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("expected dtype {expected} for `grad_output` but got dtype {actual}")]
    DtypeMismatch { expected: DType, actual: DType },

    #[error("index {index} at position {position:?} is outside the spatial plane of {plane_size} elements")]
    IndexOutOfRange {
        index: i64,
        position: Vec<usize>,
        plane_size: usize,
    },

    #[error("layout error: {0}")]
    Layout(#[from] ndarray::ShapeError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no backend registered for execution target `{0}`")]
    BackendNotRegistered(ExecutionTarget),

    #[error("forward pass has not been run")]
    ForwardNotRun,
}
