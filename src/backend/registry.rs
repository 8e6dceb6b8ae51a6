use super::*;
use crate::config::PoolingConfig;
use crate::error::PoolingError;
use ahash::AHashMap;
use log::debug;

/// Holds one backend per execution target.
///
/// Built once (typically at process start) and passed by reference to call sites;
/// there is no global dispatch table.
///
/// # Example
/// ```rust
/// use adaptive_pooling::prelude::*;
///
/// let config = PoolingConfig::new(ExecutionTarget::Sequential, 8).unwrap();
/// let registry = BackendRegistry::new(&config);
///
/// assert_eq!(registry.default_backend().unwrap().target(), ExecutionTarget::Sequential);
/// assert!(registry.get(ExecutionTarget::Parallel).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: AHashMap<ExecutionTarget, Backend>,
    default_target: ExecutionTarget,
}

impl BackendRegistry {
    /// Creates a registry with the sequential and parallel backends registered.
    ///
    /// # Parameters
    ///
    /// * `config` - Selects the default target and the parallel threshold
    pub fn new(config: &PoolingConfig) -> Self {
        let mut registry = BackendRegistry::empty(config.target());
        registry.register(SequentialBackend::new());
        registry.register(ParallelBackend::from_config(config));
        registry
    }

    /// Creates a registry without any backend
    pub fn empty(default_target: ExecutionTarget) -> Self {
        BackendRegistry {
            backends: AHashMap::new(),
            default_target,
        }
    }

    /// Registers a backend under its own target, returning the one it replaces
    pub fn register(&mut self, backend: impl Into<Backend>) -> Option<Backend> {
        let backend = backend.into();
        let target = backend.target();
        debug!("registering pooling backend for target `{}`", target);
        self.backends.insert(target, backend)
    }

    /// Looks up the backend of a target.
    ///
    /// # Errors
    ///
    /// - `PoolingError::BackendNotRegistered` - If no backend was registered for `target`
    pub fn get(&self, target: ExecutionTarget) -> Result<&Backend, PoolingError> {
        self.backends
            .get(&target)
            .ok_or(PoolingError::BackendNotRegistered(target))
    }

    /// Looks up the backend of the configured default target
    pub fn default_backend(&self) -> Result<&Backend, PoolingError> {
        self.get(self.default_target)
    }

    /// Returns the configured default target
    pub fn default_target(&self) -> ExecutionTarget {
        self.default_target
    }

    /// Returns whether a backend is registered for `target`
    pub fn contains(&self, target: ExecutionTarget) -> bool {
        self.backends.contains_key(&target)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        BackendRegistry::new(&PoolingConfig::default())
    }
}
