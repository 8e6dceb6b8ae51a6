use crate::error::PoolingError;
use ndarray::ArrayD;

/// Adaptive 2D max pooling layer
pub mod adaptive_max_pooling_2d;

pub use adaptive_max_pooling_2d::AdaptiveMaxPooling2D;

/// Type alias for n-dimensional arrays used as tensors by layers
pub type Tensor = ArrayD<f32>;

/// Defines the interface for stateful layers.
///
/// A layer keeps whatever its forward pass needs for the following backward pass,
/// so `backward` must be preceded by `forward`.
pub trait Layer: Send + Sync {
    /// Performs forward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `input` - The input tensor to the layer
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The output tensor after forward computation
    /// - `Err(PoolingError)` - If the input was rejected
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, PoolingError>;

    /// Performs backward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `grad_output` - The gradient tensor from the next layer
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The gradient tensor to be passed to the previous layer
    /// - `Err(PoolingError)` - If the layer encountered an error during processing
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, PoolingError>;

    /// Returns the type name of the layer (e.g. "AdaptiveMaxPooling2D").
    fn layer_type(&self) -> &str {
        "Unknown"
    }

    /// Returns a description of the output shape of the layer.
    fn output_shape(&self) -> String {
        "Unknown".to_string()
    }
}
