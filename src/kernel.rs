use crate::dtype::Element;
use crate::geometry::window_bounds;
use ndarray::{ArrayView2, ArrayViewMut1, ArrayViewMut2, Zip, s};

/// Finds the maximum of one window and the flat offset where it occurs.
///
/// Scans rows `[rows.0, rows.1)` and columns `[cols.0, cols.1)` in row-major order.
/// Only a strictly greater value replaces the running maximum, so on ties the first
/// element in scan order wins. A NaN wins outright and ends the scan.
///
/// # Returns
///
/// * `(T, i64)` - The maximum value and its offset `ih * width + iw` within the plane
#[inline]
fn window_max<T: Element>(
    plane: &ArrayView2<T>,
    rows: (usize, usize),
    cols: (usize, usize),
) -> (T, i64) {
    let width = plane.ncols();
    let mut max_val = T::neg_infinity();
    let mut max_index = rows.0 * width + cols.0;

    'scan: for ih in rows.0..rows.1 {
        let row = plane.slice(s![ih, cols.0..cols.1]);
        for (dw, &val) in row.iter().enumerate() {
            if val.is_nan() {
                max_val = val;
                max_index = ih * width + cols.0 + dw;
                break 'scan;
            }
            if val > max_val {
                max_val = val;
                max_index = ih * width + cols.0 + dw;
            }
        }
    }

    (max_val, max_index as i64)
}

/// Computes one output row of a single `(height, width)` plane.
///
/// # Parameters
///
/// - `input` - The input plane
/// - `oh` - Index of the output row being computed
/// - `output_height` - Total number of output rows of the plane
/// - `output` - Destination for the row's maximum values
/// - `indices` - Destination for the row's flat offsets, same length as `output`
pub fn max_pool_row<T: Element>(
    input: &ArrayView2<T>,
    oh: usize,
    output_height: usize,
    mut output: ArrayViewMut1<T>,
    mut indices: ArrayViewMut1<i64>,
) {
    let (input_height, input_width) = input.dim();
    let output_width = output.len();
    let rows = window_bounds(oh, output_height, input_height);

    for (ow, (out, idx)) in output.iter_mut().zip(indices.iter_mut()).enumerate() {
        let cols = window_bounds(ow, output_width, input_width);
        let (val, index) = window_max(input, rows, cols);
        *out = val;
        *idx = index;
    }
}

/// Adaptive max pooling of a single `(height, width)` plane.
///
/// The output size is taken from the shape of `output`; `indices` must have the same
/// shape. Every element of both is written.
pub fn max_pool_plane<T: Element>(
    input: ArrayView2<T>,
    mut output: ArrayViewMut2<T>,
    mut indices: ArrayViewMut2<i64>,
) {
    let output_height = output.nrows();
    for (oh, (out_row, idx_row)) in output
        .rows_mut()
        .into_iter()
        .zip(indices.rows_mut())
        .enumerate()
    {
        max_pool_row(&input, oh, output_height, out_row, idx_row);
    }
}

/// Scatters the gradients of one plane back to the positions that produced each maximum.
///
/// Values are added, not assigned, so two outputs whose overlapping windows selected
/// the same input element both contribute. `grad_input` is expected to be zeroed by
/// the caller and every index to be within the plane.
pub fn scatter_plane<T: Element>(
    grad_output: ArrayView2<T>,
    indices: ArrayView2<i64>,
    mut grad_input: ArrayViewMut2<T>,
) {
    let width = grad_input.ncols();
    Zip::from(&grad_output)
        .and(&indices)
        .for_each(|&grad, &index| {
            let index = index as usize;
            let target = &mut grad_input[[index / width, index % width]];
            *target = *target + grad;
        });
}
