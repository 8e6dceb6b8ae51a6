use crate::config::ExecutionTarget;
use crate::dtype::Element;
use ndarray::{ArrayView3, ArrayViewMut3};

/// Data-parallel implementation on the rayon thread pool
pub mod parallel;
/// Registry holding one backend per execution target
pub mod registry;
/// Sequential reference implementation
pub mod sequential;

pub use parallel::ParallelBackend;
pub use registry::BackendRegistry;
pub use sequential::SequentialBackend;

/// An execution strategy for the pooling kernels.
///
/// Backends receive arrays that have already been validated and reshaped to
/// `(planes, height, width)`, where a plane is one `(batch, channel)` pair. Each
/// backend decides only how the per-plane work is scheduled; the window arithmetic
/// and the reduction itself come from [`kernel`](crate::kernel), so every backend
/// produces identical values and indices, including the first-wins tie-break.
pub trait PoolingBackend {
    /// Returns the execution target this backend implements
    fn target(&self) -> ExecutionTarget;

    /// Runs the forward reduction over every plane.
    ///
    /// # Parameters
    ///
    /// - `input` - Input planes with shape `(planes, height, width)`
    /// - `output` - Destination with shape `(planes, output_height, output_width)`
    /// - `indices` - Destination for flat offsets, same shape as `output`
    fn forward_planes<T: Element>(
        &self,
        input: ArrayView3<T>,
        output: ArrayViewMut3<T>,
        indices: ArrayViewMut3<i64>,
    );

    /// Scatters output gradients back onto zero-initialized input gradients.
    ///
    /// # Parameters
    ///
    /// - `grad_output` - Output gradients with shape `(planes, output_height, output_width)`
    /// - `indices` - Flat offsets produced by the forward pass, same shape as `grad_output`
    /// - `grad_input` - Zeroed destination with shape `(planes, height, width)`
    fn backward_planes<T: Element>(
        &self,
        grad_output: ArrayView3<T>,
        indices: ArrayView3<i64>,
        grad_input: ArrayViewMut3<T>,
    );
}

/// A backend chosen at configuration time.
///
/// Wraps every concrete backend so a registry can hand out any of them without
/// runtime type inspection.
#[derive(Debug, Clone)]
pub enum Backend {
    Sequential(SequentialBackend),
    Parallel(ParallelBackend),
}

impl PoolingBackend for Backend {
    fn target(&self) -> ExecutionTarget {
        match self {
            Backend::Sequential(b) => b.target(),
            Backend::Parallel(b) => b.target(),
        }
    }

    fn forward_planes<T: Element>(
        &self,
        input: ArrayView3<T>,
        output: ArrayViewMut3<T>,
        indices: ArrayViewMut3<i64>,
    ) {
        match self {
            Backend::Sequential(b) => b.forward_planes(input, output, indices),
            Backend::Parallel(b) => b.forward_planes(input, output, indices),
        }
    }

    fn backward_planes<T: Element>(
        &self,
        grad_output: ArrayView3<T>,
        indices: ArrayView3<i64>,
        grad_input: ArrayViewMut3<T>,
    ) {
        match self {
            Backend::Sequential(b) => b.backward_planes(grad_output, indices, grad_input),
            Backend::Parallel(b) => b.backward_planes(grad_output, indices, grad_input),
        }
    }
}

impl From<SequentialBackend> for Backend {
    fn from(backend: SequentialBackend) -> Self {
        Backend::Sequential(backend)
    }
}

impl From<ParallelBackend> for Backend {
    fn from(backend: ParallelBackend) -> Self {
        Backend::Parallel(backend)
    }
}
