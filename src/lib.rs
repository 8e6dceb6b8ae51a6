//! Adaptive 2D max pooling for 3D `[channels, height, width]` and 4D
//! `[batch_size, channels, height, width]` arrays.
//!
//! For every output position the crate picks the maximum of an input window whose
//! bounds follow from the ratio of input to output size, records the flat offset of
//! that maximum within its spatial plane, and can later scatter output gradients back
//! to exactly those offsets.
//!
//! # Example
//! ```rust
//! use adaptive_pooling::prelude::*;
//! use ndarray::{Array, ArrayD, IxDyn};
//!
//! let registry = BackendRegistry::new(&PoolingConfig::default());
//! let backend = registry.default_backend().unwrap();
//!
//! let input = Array::from_shape_fn(IxDyn(&[3, 10, 7]), |ix| (ix[1] * 7 + ix[2]) as f32);
//! let PoolingOutput { output, indices } = adaptive_max_pool2d(backend, &input, (4, 3)).unwrap();
//! assert_eq!(output.shape(), &[3, 4, 3]);
//!
//! let grad = ArrayD::<f32>::ones(IxDyn(&[3, 4, 3]));
//! let grad_input = adaptive_max_pool2d_backward(backend, &grad, input.shape(), &indices).unwrap();
//! assert_eq!(grad_input.shape(), input.shape());
//! ```

/// Module `backend` provides the execution strategies for the pooling kernels.
///
/// - `PoolingBackend` - The interface every execution target implements
/// - `SequentialBackend` - Reference implementation on the calling thread
/// - `ParallelBackend` - rayon-based implementation, parallel across planes or output rows
/// - `Backend` - Enum over all backends, selected at configuration time
/// - `BackendRegistry` - One backend per execution target, built once and passed by reference
pub mod backend;

/// Module `config` contains the execution target selection and its validated configuration.
pub mod config;

/// Module `dtype` contains the element type abstraction and the dtype-erased array `DynTensor`.
pub mod dtype;

/// Module `error` contains the error type returned by every fallible operation.
pub mod error;

/// Module `geometry` computes adaptive window bounds along one axis.
///
/// Output index `a` of an axis of output extent `b` over input extent `c` covers the
/// half-open input interval `[floor(a * c / b), ceil((a + 1) * c / b))`.
pub mod geometry;

/// Module `kernel` contains the per-plane forward reduction and backward scatter.
pub mod kernel;

/// Module `layer` contains the stateful layer face of the operation.
pub mod layer;

/// Module `ops` is the public entry point: validation, allocation and dispatch to a backend.
///
/// # Functions
///
/// - `adaptive_max_pool2d` / `adaptive_max_pool2d_into` - Forward pass
/// - `adaptive_max_pool2d_backward` / `adaptive_max_pool2d_backward_into` - Backward pass
/// - `forward_dyn` / `backward_dyn` - Same, on arrays whose dtype is known only at run time
pub mod ops;

/// Convenience re-exports of the public API.
pub mod prelude;

/// Module `validation` contains the precondition checks shared by the operations.
pub mod validation;

pub use error::PoolingError;
