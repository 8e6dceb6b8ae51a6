pub use crate::backend::{
    Backend, BackendRegistry, ParallelBackend, PoolingBackend, SequentialBackend,
};
pub use crate::config::{ExecutionTarget, PoolingConfig};
pub use crate::dtype::{DType, DynTensor, Element, TensorMeta};
pub use crate::error::PoolingError;
pub use crate::geometry::{output_shape, window_bounds};
pub use crate::layer::{AdaptiveMaxPooling2D, Layer, Tensor};
pub use crate::ops::{
    PoolingOutput, adaptive_max_pool2d, adaptive_max_pool2d_backward,
    adaptive_max_pool2d_backward_into, adaptive_max_pool2d_into, backward_dyn, forward_dyn,
};
