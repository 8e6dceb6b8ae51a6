use super::*;
use crate::kernel::{max_pool_plane, scatter_plane};

/// Reference backend: planes are processed one after another on the calling thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequentialBackend;

impl SequentialBackend {
    /// Creates the sequential backend
    pub fn new() -> Self {
        SequentialBackend
    }
}

impl PoolingBackend for SequentialBackend {
    fn target(&self) -> ExecutionTarget {
        ExecutionTarget::Sequential
    }

    fn forward_planes<T: Element>(
        &self,
        input: ArrayView3<T>,
        mut output: ArrayViewMut3<T>,
        mut indices: ArrayViewMut3<i64>,
    ) {
        for ((plane, out), idx) in input
            .outer_iter()
            .zip(output.outer_iter_mut())
            .zip(indices.outer_iter_mut())
        {
            max_pool_plane(plane, out, idx);
        }
    }

    fn backward_planes<T: Element>(
        &self,
        grad_output: ArrayView3<T>,
        indices: ArrayView3<i64>,
        mut grad_input: ArrayViewMut3<T>,
    ) {
        for ((grad, idx), grad_in) in grad_output
            .outer_iter()
            .zip(indices.outer_iter())
            .zip(grad_input.outer_iter_mut())
        {
            scatter_plane(grad, idx, grad_in);
        }
    }
}
