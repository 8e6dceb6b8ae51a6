use super::*;
use crate::config::{DEFAULT_PARALLEL_THRESHOLD, PoolingConfig};
use crate::error::PoolingError;
use crate::kernel::{max_pool_plane, max_pool_row, scatter_plane};
use log::trace;
use ndarray::Axis;
use rayon::prelude::*;

/// Data-parallel backend built on rayon.
///
/// With at least `threshold` planes, each `(batch, channel)` plane becomes one task.
/// Below that, forward splits the output rows of each plane across tasks instead,
/// which keeps all workers busy on 3D inputs with few channels. Every window is
/// still reduced sequentially by a single task, so the tie-break is unaffected.
///
/// Backward only ever parallelizes across planes: windows inside one plane may
/// select the same input element, so accumulation within a plane stays serialized.
///
/// # Fields
///
/// - `threshold` - Minimum plane count for plane-level parallelism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelBackend {
    threshold: usize,
}

impl ParallelBackend {
    /// Creates a parallel backend.
    ///
    /// # Errors
    ///
    /// - `PoolingError::InvalidConfig` - If `threshold` is zero
    pub fn new(threshold: usize) -> Result<Self, PoolingError> {
        if threshold == 0 {
            return Err(PoolingError::InvalidConfig(
                "parallel threshold must be greater than zero".to_string(),
            ));
        }
        Ok(ParallelBackend { threshold })
    }

    /// Creates a parallel backend from an already validated configuration
    pub fn from_config(config: &PoolingConfig) -> Self {
        ParallelBackend {
            threshold: config.parallel_threshold(),
        }
    }

    /// Returns the plane count threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for ParallelBackend {
    fn default() -> Self {
        ParallelBackend {
            threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl PoolingBackend for ParallelBackend {
    fn target(&self) -> ExecutionTarget {
        ExecutionTarget::Parallel
    }

    fn forward_planes<T: Element>(
        &self,
        input: ArrayView3<T>,
        mut output: ArrayViewMut3<T>,
        mut indices: ArrayViewMut3<i64>,
    ) {
        let planes = input.len_of(Axis(0));

        if planes >= self.threshold {
            trace!("forward: {} planes, one task per plane", planes);
            input
                .outer_iter()
                .into_par_iter()
                .zip(output.outer_iter_mut().into_par_iter())
                .zip(indices.outer_iter_mut().into_par_iter())
                .for_each(|((plane, out), idx)| max_pool_plane(plane, out, idx));
        } else {
            let output_height = output.len_of(Axis(1));
            trace!(
                "forward: {} planes below threshold {}, splitting {} output rows",
                planes, self.threshold, output_height
            );
            for ((plane, mut out), mut idx) in input
                .outer_iter()
                .zip(output.outer_iter_mut())
                .zip(indices.outer_iter_mut())
            {
                out.outer_iter_mut()
                    .into_par_iter()
                    .zip(idx.outer_iter_mut().into_par_iter())
                    .enumerate()
                    .for_each(|(oh, (out_row, idx_row))| {
                        max_pool_row(&plane, oh, output_height, out_row, idx_row)
                    });
            }
        }
    }

    fn backward_planes<T: Element>(
        &self,
        grad_output: ArrayView3<T>,
        indices: ArrayView3<i64>,
        mut grad_input: ArrayViewMut3<T>,
    ) {
        let planes = grad_output.len_of(Axis(0));

        if planes >= self.threshold {
            trace!("backward: {} planes, one task per plane", planes);
            grad_output
                .outer_iter()
                .into_par_iter()
                .zip(indices.outer_iter().into_par_iter())
                .zip(grad_input.outer_iter_mut().into_par_iter())
                .for_each(|((grad, idx), grad_in)| scatter_plane(grad, idx, grad_in));
        } else {
            trace!("backward: {} planes below threshold, sequential", planes);
            for ((grad, idx), grad_in) in grad_output
                .outer_iter()
                .zip(indices.outer_iter())
                .zip(grad_input.outer_iter_mut())
            {
                scatter_plane(grad, idx, grad_in);
            }
        }
    }
}
