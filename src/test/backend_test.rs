use super::*;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;

/// Random input with many repeated values so that ties are common
fn tied_input(shape: &[usize]) -> ArrayD<f64> {
    Array::random(IxDyn(shape), Uniform::new(0, 4)).mapv(|v: i32| v as f64)
}

fn assert_backends_agree(shape: &[usize], output_size: (usize, usize), threshold: usize) {
    let input = tied_input(shape);
    let sequential = SequentialBackend::new();
    let parallel = ParallelBackend::new(threshold).unwrap();

    let expected = adaptive_max_pool2d(&sequential, &input, output_size).unwrap();
    let actual = adaptive_max_pool2d(&parallel, &input, output_size).unwrap();
    assert_eq!(expected, actual, "forward differs for {:?} -> {:?}", shape, output_size);

    let grad = Array::random(expected.output.raw_dim(), Uniform::new(-1.0, 1.0));
    let expected_grad =
        adaptive_max_pool2d_backward(&sequential, &grad, shape, &expected.indices).unwrap();
    let actual_grad =
        adaptive_max_pool2d_backward(&parallel, &grad, shape, &actual.indices).unwrap();
    // accumulation order within a plane is the same for both backends
    assert_eq!(expected_grad, actual_grad);
}

#[test]
fn parallel_matches_sequential_below_threshold() {
    // few planes: output rows are split across tasks
    assert_backends_agree(&[1, 1, 13, 11], (5, 4), 32);
    assert_backends_agree(&[3, 17, 17], (17, 17), 32);
    assert_backends_agree(&[2, 3, 9, 4], (2, 7), 32);
}

#[test]
fn parallel_matches_sequential_above_threshold() {
    // 64 planes: one task per plane
    assert_backends_agree(&[4, 16, 9, 10], (4, 3), 32);
    assert_backends_agree(&[40, 6, 5], (3, 2), 8);
    assert_backends_agree(&[2, 5, 8, 8], (8, 8), 1);
}

#[test]
fn backend_enum_delegates_target() {
    let sequential: Backend = SequentialBackend::new().into();
    let parallel: Backend = ParallelBackend::default().into();

    assert_eq!(sequential.target(), ExecutionTarget::Sequential);
    assert_eq!(parallel.target(), ExecutionTarget::Parallel);
}

#[test]
fn parallel_backend_rejects_zero_threshold() {
    assert!(matches!(
        ParallelBackend::new(0),
        Err(PoolingError::InvalidConfig(_))
    ));
    assert_eq!(ParallelBackend::new(5).unwrap().threshold(), 5);
    assert_eq!(
        ParallelBackend::default().threshold(),
        DEFAULT_PARALLEL_THRESHOLD
    );
}

#[test]
fn registry_registers_both_targets() {
    let config = PoolingConfig::new(ExecutionTarget::Sequential, 4).unwrap();
    let registry = BackendRegistry::new(&config);

    assert!(registry.contains(ExecutionTarget::Sequential));
    assert!(registry.contains(ExecutionTarget::Parallel));
    assert_eq!(registry.default_target(), ExecutionTarget::Sequential);
    assert_eq!(
        registry.default_backend().unwrap().target(),
        ExecutionTarget::Sequential
    );

    match registry.get(ExecutionTarget::Parallel).unwrap() {
        Backend::Parallel(p) => assert_eq!(p.threshold(), 4),
        other => panic!("unexpected backend {:?}", other),
    }
}

#[test]
fn empty_registry_reports_missing_backend() {
    let mut registry = BackendRegistry::empty(ExecutionTarget::Parallel);
    assert_eq!(
        registry.default_backend().unwrap_err(),
        PoolingError::BackendNotRegistered(ExecutionTarget::Parallel)
    );

    assert!(registry.register(ParallelBackend::new(2).unwrap()).is_none());
    let replaced = registry.register(ParallelBackend::new(3).unwrap());
    assert!(matches!(replaced, Some(Backend::Parallel(p)) if p.threshold() == 2));
    assert_eq!(registry.default_backend().unwrap().target(), ExecutionTarget::Parallel);
}

#[test]
fn registry_default_uses_default_config() {
    let registry = BackendRegistry::default();
    assert_eq!(registry.default_target(), ExecutionTarget::Parallel);
    assert!(registry.get(ExecutionTarget::Sequential).is_ok());
}
