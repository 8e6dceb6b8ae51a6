use super::*;

fn pool(plane: Array2<f32>, output_size: (usize, usize)) -> (Array2<f32>, Array2<i64>) {
    let mut output = Array2::zeros(output_size);
    let mut indices = Array2::zeros(output_size);
    max_pool_plane(plane.view(), output.view_mut(), indices.view_mut());
    (output, indices)
}

#[test]
fn max_pool_plane_picks_window_maxima() {
    let plane = Array2::from_shape_vec((4, 4), (1..=16).map(|v| v as f32).collect()).unwrap();
    let (output, indices) = pool(plane, (2, 2));

    assert_eq!(output, array![[6.0, 8.0], [14.0, 16.0]]);
    assert_eq!(indices, array![[5, 7], [13, 15]]);
}

#[test]
fn ties_keep_first_element_in_scan_order() {
    let (output, indices) = pool(Array2::from_elem((2, 2), 5.0), (1, 1));
    assert_relative_eq!(output[[0, 0]], 5.0);
    assert_eq!(indices[[0, 0]], 0);

    // equal maxima on the first and second row: the one on the first row wins
    let (_, indices) = pool(array![[1.0, 3.0], [3.0, 2.0]], (1, 1));
    assert_eq!(indices[[0, 0]], 1);

    // equal maxima on the same row: the leftmost wins
    let (_, indices) = pool(array![[0.0, 7.0, 7.0], [7.0, 0.0, 0.0]], (1, 1));
    assert_eq!(indices[[0, 0]], 1);
}

#[test]
fn nan_wins_its_window() {
    let (output, indices) = pool(array![[1.0, f32::NAN], [f32::NAN, 9.0]], (1, 1));
    assert!(output[[0, 0]].is_nan());
    assert_eq!(indices[[0, 0]], 1);

    // windows without NaN are unaffected
    let (output, indices) = pool(array![[f32::NAN, 0.0, 2.0, 3.0]], (1, 2));
    assert!(output[[0, 0]].is_nan());
    assert_eq!(indices[[0, 0]], 0);
    assert_relative_eq!(output[[0, 1]], 3.0);
    assert_eq!(indices[[0, 1]], 3);
}

#[test]
fn all_negative_infinity_reports_window_start() {
    let (output, indices) = pool(Array2::from_elem((1, 3), f32::NEG_INFINITY), (1, 2));
    assert_eq!(output[[0, 0]], f32::NEG_INFINITY);
    assert_eq!(output[[0, 1]], f32::NEG_INFINITY);
    // windows are [0, 2) and [1, 3)
    assert_eq!(indices, array![[0, 1]]);
}

#[test]
fn max_pool_row_matches_plane() {
    let plane = Array2::from_shape_fn((7, 5), |(i, j)| ((i * 31 + j * 17) % 11) as f64);
    let mut output = Array2::zeros((3, 4));
    let mut indices = Array2::zeros((3, 4));
    max_pool_plane(plane.view(), output.view_mut(), indices.view_mut());

    for oh in 0..3 {
        let mut row = Array1::zeros(4);
        let mut row_indices = Array1::zeros(4);
        max_pool_row(&plane.view(), oh, 3, row.view_mut(), row_indices.view_mut());
        assert_eq!(row, output.row(oh));
        assert_eq!(row_indices, indices.row(oh));
    }
}

#[test]
fn scatter_plane_accumulates_shared_indices() {
    let grad_output = array![[1.0f32, 2.0]];
    let indices = array![[3i64, 3]];
    let mut grad_input = Array2::<f32>::zeros((2, 2));

    scatter_plane(grad_output.view(), indices.view(), grad_input.view_mut());

    assert_eq!(grad_input, array![[0.0, 0.0], [0.0, 3.0]]);
}

#[test]
fn overlapping_windows_sharing_a_maximum_accumulate() {
    // windows [0, 2) and [1, 3) both select the middle element
    let (output, indices) = pool(array![[0.0, 5.0, 0.0]], (1, 2));
    assert_eq!(output, array![[5.0, 5.0]]);
    assert_eq!(indices, array![[1, 1]]);

    let mut grad_input = Array2::<f32>::zeros((1, 3));
    scatter_plane(
        Array2::ones((1, 2)).view(),
        indices.view(),
        grad_input.view_mut(),
    );
    assert_eq!(grad_input, array![[0.0, 2.0, 0.0]]);
}
