use adaptive_pooling::geometry::axis_windows;
use adaptive_pooling::prelude::*;
use approx::assert_relative_eq;
use ndarray::{ArrayD, Axis, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

fn random_input(rng: &mut StdRng, shape: &[usize]) -> ArrayD<f64> {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let len: usize = shape.iter().product();
    let data: Vec<f64> = (0..len).map(|_| rng.sample(normal)).collect();
    ArrayD::from_shape_vec(IxDyn(shape), data).unwrap()
}

#[test]
fn test_adaptive_max_pooling_2d_random_shapes() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = PoolingConfig::new(ExecutionTarget::Parallel, 4).unwrap();
    let registry = BackendRegistry::new(&config);

    for _ in 0..25 {
        let batched = rng.random_bool(0.5);
        let channels = rng.random_range(1..=5);
        let height = rng.random_range(1..=20);
        let width = rng.random_range(1..=20);
        let output_size = (rng.random_range(1..=12), rng.random_range(1..=12));

        let shape = if batched {
            vec![rng.random_range(1..=3), channels, height, width]
        } else {
            vec![channels, height, width]
        };
        let input = random_input(&mut rng, &shape);

        let sequential = registry.get(ExecutionTarget::Sequential).unwrap();
        let parallel = registry.get(ExecutionTarget::Parallel).unwrap();

        let result = adaptive_max_pool2d(sequential, &input, output_size).unwrap();
        assert_eq!(result, adaptive_max_pool2d(parallel, &input, output_size).unwrap());
        assert_eq!(result.output.shape(), output_shape(&shape, output_size).as_slice());

        // every output is the maximum of its window and sits at its index
        let plane_size = height * width;
        let planes = input.len() / plane_size;
        let flat_input = input
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((planes, plane_size))
            .unwrap();
        let out_len = output_size.0 * output_size.1;
        let flat_output = result
            .output
            .clone()
            .into_shape_with_order((planes, out_len))
            .unwrap();
        let flat_indices = result
            .indices
            .clone()
            .into_shape_with_order((planes, out_len))
            .unwrap();

        for p in 0..planes {
            for (oh, rows) in axis_windows(output_size.0, height).enumerate() {
                for (ow, cols) in axis_windows(output_size.1, width).enumerate() {
                    let o = oh * output_size.1 + ow;
                    let index = flat_indices[[p, o]] as usize;
                    assert!(rows.contains(&(index / width)));
                    assert!(cols.contains(&(index % width)));
                    assert_eq!(flat_output[[p, o]], flat_input[[p, index]]);

                    for i in rows.clone() {
                        for j in cols.clone() {
                            assert!(flat_input[[p, i * width + j]] <= flat_output[[p, o]]);
                        }
                    }
                }
            }
        }

        // the input gradient sums to the output gradient, plane by plane
        let grad = random_input(&mut rng, result.output.shape());
        let grad_input =
            adaptive_max_pool2d_backward(parallel, &grad, &shape, &result.indices).unwrap();
        assert_eq!(grad_input.shape(), shape.as_slice());
        let lead = shape.len() - 2;
        let expected = grad.sum_axis(Axis(lead + 1)).sum_axis(Axis(lead));
        let actual = grad_input.sum_axis(Axis(lead + 1)).sum_axis(Axis(lead));
        for (e, a) in expected.iter().zip(actual.iter()) {
            assert_relative_eq!(*e, *a, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_adaptive_max_pooling_2d_layer_in_registry() {
    let registry = BackendRegistry::default();
    let backend = registry.default_backend().unwrap().clone();
    let mut layer = AdaptiveMaxPooling2D::new((1, 1), backend);

    // global max pooling as the 1x1 special case
    let input = ArrayD::from_shape_fn(IxDyn(&[2, 3, 5, 4]), |ix| {
        ((ix[0] * 7 + ix[1] * 5 + ix[2] * 3 + ix[3]) % 11) as f32
    });
    let output = layer.forward(&input).unwrap();
    assert_eq!(output.shape(), &[2, 3, 1, 1]);

    for b in 0..2 {
        for c in 0..3 {
            let plane_max = input
                .index_axis(Axis(0), b)
                .index_axis(Axis(0), c)
                .iter()
                .cloned()
                .fold(f32::NEG_INFINITY, f32::max);
            assert_relative_eq!(output[[b, c, 0, 0]], plane_max);
        }
    }

    let grad_input = layer.backward(&ArrayD::ones(IxDyn(&[2, 3, 1, 1]))).unwrap();
    assert_relative_eq!(grad_input.sum(), 6.0);
}

#[test]
fn test_adaptive_max_pooling_2d_dtype_mismatch_produces_no_output() {
    let backend = SequentialBackend::new();
    let input = DynTensor::from(ArrayD::<f64>::from_elem(IxDyn(&[1, 4, 4]), 3.0));
    let (output, indices) = forward_dyn(&backend, &input, (2, 2)).unwrap();
    assert_eq!(output.dtype(), DType::F64);

    let grad = DynTensor::from(ArrayD::<f32>::ones(IxDyn(&[1, 2, 2])));
    let err = backward_dyn(&backend, &grad, &input.meta(), &indices).unwrap_err();
    assert_eq!(
        err,
        PoolingError::DtypeMismatch {
            expected: DType::F64,
            actual: DType::F32,
        }
    );
}
