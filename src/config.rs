use crate::error::PoolingError;
use std::fmt;
use std::str::FromStr;

/// Default minimum number of `(batch, channel)` planes before the parallel backend
/// hands one plane to each task instead of splitting output rows.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 32;

/// Execution targets a pooling backend can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionTarget {
    /// Reference implementation, one plane after another on the calling thread
    Sequential,
    /// Data-parallel implementation on the rayon thread pool
    Parallel,
}

impl fmt::Display for ExecutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionTarget::Sequential => write!(f, "sequential"),
            ExecutionTarget::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for ExecutionTarget {
    type Err = PoolingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "cpu" => Ok(ExecutionTarget::Sequential),
            "parallel" | "cpu-parallel" => Ok(ExecutionTarget::Parallel),
            other => Err(PoolingError::InvalidConfig(format!(
                "unknown execution target `{}`, expected one of: sequential, cpu, parallel, cpu-parallel",
                other
            ))),
        }
    }
}

/// Configuration used to build a [`BackendRegistry`](crate::backend::BackendRegistry).
///
/// # Fields
///
/// - `target` - The execution target selected by default
/// - `parallel_threshold` - Plane count at which the parallel backend switches from
///   splitting output rows to one task per plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolingConfig {
    target: ExecutionTarget,
    parallel_threshold: usize,
}

impl PoolingConfig {
    /// Creates a new configuration.
    ///
    /// # Parameters
    ///
    /// - `target` - Default execution target
    /// - `parallel_threshold` - Plane count threshold for the parallel backend
    ///
    /// # Returns
    ///
    /// - `Result<PoolingConfig, PoolingError>` - New configuration on success
    ///
    /// # Errors
    ///
    /// - `PoolingError::InvalidConfig` - If `parallel_threshold` is zero
    pub fn new(target: ExecutionTarget, parallel_threshold: usize) -> Result<Self, PoolingError> {
        if parallel_threshold == 0 {
            return Err(PoolingError::InvalidConfig(
                "parallel_threshold must be greater than zero".to_string(),
            ));
        }

        Ok(PoolingConfig {
            target,
            parallel_threshold,
        })
    }

    /// Returns the default execution target
    pub fn target(&self) -> ExecutionTarget {
        self.target
    }

    /// Returns the plane count threshold of the parallel backend
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }
}

impl Default for PoolingConfig {
    fn default() -> Self {
        PoolingConfig {
            target: ExecutionTarget::Parallel,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
