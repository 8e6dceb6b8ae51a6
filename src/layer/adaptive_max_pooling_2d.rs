use super::*;
use crate::backend::{Backend, PoolingBackend};
use crate::geometry;
use crate::ops::{PoolingOutput, adaptive_max_pool2d, adaptive_max_pool2d_backward};

/// Adaptive 2D max pooling layer.
///
/// Pools any `[channels, height, width]` or `[batch_size, channels, height, width]`
/// input down to a fixed `output_size`, whatever the input's spatial size. The window
/// of each output element is derived from the ratio of input to output size, so the
/// same layer handles inputs of different resolutions.
///
/// # Fields
///
/// - `output_size` - Requested output size as (height, width)
/// - `backend` - Execution strategy used by both passes
/// - `input_shape` - Shape of the input seen by the last forward pass
/// - `indices` - Indices of the maxima from the last forward pass, consumed by backward
///
/// # Examples
/// ```rust
/// use adaptive_pooling::prelude::*;
/// use ndarray::Array4;
///
/// let mut layer = AdaptiveMaxPooling2D::new((2, 3), SequentialBackend::new());
///
/// let input = Array4::from_shape_fn((2, 4, 7, 9), |(b, c, i, j)| {
///     (b * 100 + c * 10) as f32 + (i * 9 + j) as f32 * 0.01
/// })
/// .into_dyn();
///
/// let output = layer.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[2, 4, 2, 3]);
///
/// let grad_input = layer.backward(&Array4::ones((2, 4, 2, 3)).into_dyn()).unwrap();
/// assert_eq!(grad_input.shape(), input.shape());
/// assert_eq!(grad_input.sum(), (2 * 4 * 2 * 3) as f32);
/// ```
pub struct AdaptiveMaxPooling2D {
    output_size: (usize, usize),
    backend: Backend,
    input_shape: Vec<usize>,
    indices: Option<ArrayD<i64>>,
}

impl AdaptiveMaxPooling2D {
    /// Creates a new adaptive 2D max pooling layer.
    ///
    /// # Parameters
    ///
    /// - `output_size` - Requested output size as (height, width)
    /// - `backend` - Execution strategy, e.g. taken from a
    ///   [`BackendRegistry`](crate::backend::BackendRegistry)
    pub fn new(output_size: (usize, usize), backend: impl Into<Backend>) -> Self {
        AdaptiveMaxPooling2D {
            output_size,
            backend: backend.into(),
            input_shape: Vec::new(),
            indices: None,
        }
    }

    /// Returns the requested output size
    pub fn output_size(&self) -> (usize, usize) {
        self.output_size
    }

    /// Returns the backend used by this layer
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Returns the indices of the maxima found by the last forward pass
    pub fn indices(&self) -> Option<&ArrayD<i64>> {
        self.indices.as_ref()
    }
}

impl Layer for AdaptiveMaxPooling2D {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, PoolingError> {
        let PoolingOutput { output, indices } =
            adaptive_max_pool2d(&self.backend, input, self.output_size)?;

        // Save what backward needs
        self.input_shape = input.shape().to_vec();
        self.indices = Some(indices);

        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, PoolingError> {
        match &self.indices {
            Some(indices) => {
                adaptive_max_pool2d_backward(&self.backend, grad_output, &self.input_shape, indices)
            }
            None => Err(PoolingError::ForwardNotRun),
        }
    }

    fn layer_type(&self) -> &str {
        "AdaptiveMaxPooling2D"
    }

    fn output_shape(&self) -> String {
        if !self.input_shape.is_empty() {
            format!(
                "{:?}",
                geometry::output_shape(&self.input_shape, self.output_size)
            )
        } else {
            format!("(.., {}, {})", self.output_size.0, self.output_size.1)
        }
    }
}

impl std::fmt::Debug for AdaptiveMaxPooling2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveMaxPooling2D")
            .field("output_size", &self.output_size)
            .field("target", &self.backend.target())
            .field("input_shape", &self.input_shape)
            .finish()
    }
}
