use crate::backend::PoolingBackend;
use crate::dtype::{DynTensor, Element, TensorMeta};
use crate::error::PoolingError;
use crate::geometry::output_shape;
use crate::validation::{
    validate_dtype, validate_indices, validate_non_empty, validate_rank, validate_shape,
};
use log::debug;
use ndarray::{ArrayD, IxDyn};

const FORWARD_OP: &str = "adaptive_max_pool2d";
const BACKWARD_OP: &str = "adaptive_max_pool2d_backward";

/// Result of a forward pass: the pooled values and the flat offset each came from.
///
/// Both arrays have shape `[batch_size?, channels, output_height, output_width]`.
/// `indices` is owned by the caller and is what
/// [`adaptive_max_pool2d_backward`] consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolingOutput<T> {
    pub output: ArrayD<T>,
    pub indices: ArrayD<i64>,
}

/// Plane decomposition `(planes, height, width)` of a validated shape
fn plane_dims(shape: &[usize]) -> (usize, usize, usize) {
    let n = shape.len();
    let planes = shape[..n - 2].iter().product();
    (planes, shape[n - 2], shape[n - 1])
}

/// Checks the input of a forward pass and returns its plane decomposition
fn check_input(input_shape: &[usize]) -> Result<(usize, usize, usize), PoolingError> {
    validate_non_empty(FORWARD_OP, input_shape)?;
    validate_rank(FORWARD_OP, input_shape)?;
    Ok(plane_dims(input_shape))
}

/// Checks every precondition of a backward pass.
///
/// # Returns
///
/// * `((usize, usize, usize), (usize, usize))` - `(planes, height, width)` of the input
///   and `(output_height, output_width)` of the gradient
fn check_backward(
    grad_shape: &[usize],
    input_shape: &[usize],
    indices: &ArrayD<i64>,
) -> Result<((usize, usize, usize), (usize, usize)), PoolingError> {
    validate_non_empty(BACKWARD_OP, grad_shape)?;
    validate_rank(BACKWARD_OP, grad_shape)?;
    validate_non_empty(BACKWARD_OP, input_shape)?;
    validate_rank(BACKWARD_OP, input_shape)?;

    let n = grad_shape.len();
    let output_size = (grad_shape[n - 2], grad_shape[n - 1]);
    validate_shape(
        "grad_output",
        &output_shape(input_shape, output_size),
        grad_shape,
    )?;
    validate_shape("indices", grad_shape, indices.shape())?;

    let dims = plane_dims(input_shape);
    validate_indices(indices, dims.1 * dims.2)?;

    Ok((dims, output_size))
}

/// Reshapes everything to planes and runs the backend's forward reduction.
///
/// All reshapes happen before the backend writes anything, so a layout error leaves
/// `output` and `indices` untouched.
fn run_forward<T: Element, B: PoolingBackend>(
    backend: &B,
    input: &ArrayD<T>,
    (planes, height, width): (usize, usize, usize),
    (output_height, output_width): (usize, usize),
    output: &mut ArrayD<T>,
    indices: &mut ArrayD<i64>,
) -> Result<(), PoolingError> {
    let input = input.as_standard_layout();
    let input = input.view().into_shape_with_order((planes, height, width))?;
    let output = output
        .view_mut()
        .into_shape_with_order((planes, output_height, output_width))?;
    let indices = indices
        .view_mut()
        .into_shape_with_order((planes, output_height, output_width))?;

    backend.forward_planes(input, output, indices);
    Ok(())
}

/// Reshapes everything to planes, zeroes `grad_input` and runs the backend's scatter.
fn run_backward<T: Element, B: PoolingBackend>(
    backend: &B,
    grad_output: &ArrayD<T>,
    indices: &ArrayD<i64>,
    (planes, height, width): (usize, usize, usize),
    (output_height, output_width): (usize, usize),
    grad_input: &mut ArrayD<T>,
) -> Result<(), PoolingError> {
    let grad_output = grad_output.as_standard_layout();
    let grad_output = grad_output
        .view()
        .into_shape_with_order((planes, output_height, output_width))?;
    let indices = indices.as_standard_layout();
    let indices = indices
        .view()
        .into_shape_with_order((planes, output_height, output_width))?;
    let mut grad_input = grad_input
        .view_mut()
        .into_shape_with_order((planes, height, width))?;

    grad_input.fill(T::zero());
    backend.backward_planes(grad_output, indices, grad_input);
    Ok(())
}

/// Applies adaptive 2D max pooling.
///
/// For every plane and every output position `(oh, ow)` the window
/// `[start(oh), end(oh)) x [start(ow), end(ow))` from
/// [`window_bounds`](crate::geometry::window_bounds) is scanned in row-major order.
/// The maximum is written to `output`, and its offset `ih * width + iw` within the
/// plane to `indices`. On ties the first element scanned wins; a NaN in a window
/// becomes that window's result.
///
/// # Parameters
///
/// - `backend` - Execution strategy
/// - `input` - Array of shape `[channels, height, width]` or `[batch_size, channels, height, width]`
/// - `output_size` - Requested output size as (height, width)
///
/// # Returns
///
/// - `Result<PoolingOutput<T>, PoolingError>` - Pooled values and their indices
///
/// # Errors
///
/// - `PoolingError::EmptyDimension` - If any dimension of `input` is zero
/// - `PoolingError::InvalidRank` - If `input` is not 3D or 4D
///
/// # Example
/// ```rust
/// use adaptive_pooling::prelude::*;
/// use ndarray::{Array, IxDyn};
///
/// let input = Array::from_shape_vec(
///     IxDyn(&[1, 1, 4, 4]),
///     (1..=16).map(|v| v as f32).collect(),
/// ).unwrap();
///
/// let result = adaptive_max_pool2d(&SequentialBackend::new(), &input, (2, 2)).unwrap();
///
/// assert_eq!(result.output.as_slice().unwrap(), &[6.0, 8.0, 14.0, 16.0]);
/// assert_eq!(result.indices.as_slice().unwrap(), &[5, 7, 13, 15]);
/// ```
pub fn adaptive_max_pool2d<T: Element, B: PoolingBackend>(
    backend: &B,
    input: &ArrayD<T>,
    output_size: (usize, usize),
) -> Result<PoolingOutput<T>, PoolingError> {
    let dims = check_input(input.shape())?;
    let shape = output_shape(input.shape(), output_size);
    debug!(
        "{}: input {:?} -> output {:?} ({} backend, {})",
        FORWARD_OP,
        input.shape(),
        shape,
        backend.target(),
        T::DTYPE
    );

    let mut output = ArrayD::<T>::zeros(IxDyn(&shape));
    let mut indices = ArrayD::<i64>::zeros(IxDyn(&shape));
    run_forward(backend, input, dims, output_size, &mut output, &mut indices)?;

    Ok(PoolingOutput { output, indices })
}

/// Applies adaptive 2D max pooling into caller-provided buffers.
///
/// Same semantics as [`adaptive_max_pool2d`]. The buffers must already have the
/// output shape and standard (row-major) layout; nothing is written on error.
///
/// # Errors
///
/// - `PoolingError::EmptyDimension` / `PoolingError::InvalidRank` - As for [`adaptive_max_pool2d`]
/// - `PoolingError::ShapeMismatch` - If `output` or `indices` does not have the output shape
/// - `PoolingError::Layout` - If a buffer is not in standard layout
pub fn adaptive_max_pool2d_into<T: Element, B: PoolingBackend>(
    backend: &B,
    input: &ArrayD<T>,
    output_size: (usize, usize),
    output: &mut ArrayD<T>,
    indices: &mut ArrayD<i64>,
) -> Result<(), PoolingError> {
    let dims = check_input(input.shape())?;
    let shape = output_shape(input.shape(), output_size);
    validate_shape("output", &shape, output.shape())?;
    validate_shape("indices", &shape, indices.shape())?;
    debug!(
        "{}: input {:?} -> output {:?} into provided buffers ({} backend)",
        FORWARD_OP,
        input.shape(),
        shape,
        backend.target()
    );

    run_forward(backend, input, dims, output_size, output, indices)
}

/// Computes the gradient of adaptive 2D max pooling with respect to its input.
///
/// A zeroed array of `input_shape` is allocated and every element of `grad_output`
/// is added at the input position recorded in `indices`.
///
/// # Parameters
///
/// - `backend` - Execution strategy
/// - `grad_output` - Gradient with respect to the pooled output
/// - `input_shape` - Shape of the input the forward pass was run on
/// - `indices` - Indices returned by the forward pass
///
/// # Returns
///
/// - `Result<ArrayD<T>, PoolingError>` - Gradient with respect to the input
///
/// # Errors
///
/// - `PoolingError::EmptyDimension` / `PoolingError::InvalidRank` - If `grad_output` or
///   `input_shape` is not a non-empty 3D or 4D shape
/// - `PoolingError::ShapeMismatch` - If the leading dimensions of `grad_output` differ from
///   the input's, or `indices` differs in shape from `grad_output`
/// - `PoolingError::IndexOutOfRange` - If an index does not address an input plane element
pub fn adaptive_max_pool2d_backward<T: Element, B: PoolingBackend>(
    backend: &B,
    grad_output: &ArrayD<T>,
    input_shape: &[usize],
    indices: &ArrayD<i64>,
) -> Result<ArrayD<T>, PoolingError> {
    let (dims, output_size) = check_backward(grad_output.shape(), input_shape, indices)?;
    debug!(
        "{}: grad_output {:?} -> grad_input {:?} ({} backend, {})",
        BACKWARD_OP,
        grad_output.shape(),
        input_shape,
        backend.target(),
        T::DTYPE
    );

    let mut grad_input = ArrayD::<T>::zeros(IxDyn(input_shape));
    run_backward(
        backend,
        grad_output,
        indices,
        dims,
        output_size,
        &mut grad_input,
    )?;

    Ok(grad_input)
}

/// Computes the input gradient into a caller-provided buffer.
///
/// `grad_input` must have the input's shape and standard layout. Its previous contents
/// are discarded: it is zero-filled before the scatter.
///
/// # Errors
///
/// - Everything [`adaptive_max_pool2d_backward`] reports
/// - `PoolingError::ShapeMismatch` - If `grad_input` does not have `input_shape`
/// - `PoolingError::Layout` - If `grad_input` is not in standard layout
pub fn adaptive_max_pool2d_backward_into<T: Element, B: PoolingBackend>(
    backend: &B,
    grad_output: &ArrayD<T>,
    input_shape: &[usize],
    indices: &ArrayD<i64>,
    grad_input: &mut ArrayD<T>,
) -> Result<(), PoolingError> {
    let (dims, output_size) = check_backward(grad_output.shape(), input_shape, indices)?;
    validate_shape("grad_input", input_shape, grad_input.shape())?;
    debug!(
        "{}: grad_output {:?} -> provided grad_input {:?} ({} backend)",
        BACKWARD_OP,
        grad_output.shape(),
        input_shape,
        backend.target()
    );

    run_backward(backend, grad_output, indices, dims, output_size, grad_input)
}

/// Applies adaptive 2D max pooling to an array whose element type is known only at run time.
///
/// # Returns
///
/// - `Result<(DynTensor, ArrayD<i64>), PoolingError>` - Pooled values, with the dtype of
///   `input`, and their indices
pub fn forward_dyn<B: PoolingBackend>(
    backend: &B,
    input: &DynTensor,
    output_size: (usize, usize),
) -> Result<(DynTensor, ArrayD<i64>), PoolingError> {
    match input {
        DynTensor::F32(a) => {
            let PoolingOutput { output, indices } = adaptive_max_pool2d(backend, a, output_size)?;
            Ok((output.into(), indices))
        }
        DynTensor::F64(a) => {
            let PoolingOutput { output, indices } = adaptive_max_pool2d(backend, a, output_size)?;
            Ok((output.into(), indices))
        }
    }
}

/// Computes the input gradient for an array whose element type is known only at run time.
///
/// # Parameters
///
/// - `backend` - Execution strategy
/// - `grad_output` - Gradient with respect to the pooled output
/// - `input` - Shape and dtype of the input the forward pass was run on
/// - `indices` - Indices returned by the forward pass
///
/// # Errors
///
/// - `PoolingError::DtypeMismatch` - If `grad_output` and the input differ in dtype;
///   checked before anything else and before any allocation
/// - Everything [`adaptive_max_pool2d_backward`] reports
pub fn backward_dyn<B: PoolingBackend>(
    backend: &B,
    grad_output: &DynTensor,
    input: &TensorMeta,
    indices: &ArrayD<i64>,
) -> Result<DynTensor, PoolingError> {
    validate_dtype(input.dtype, grad_output.dtype())?;

    match grad_output {
        DynTensor::F32(g) => {
            adaptive_max_pool2d_backward(backend, g, &input.shape, indices).map(DynTensor::from)
        }
        DynTensor::F64(g) => {
            adaptive_max_pool2d_backward(backend, g, &input.shape, indices).map(DynTensor::from)
        }
    }
}
