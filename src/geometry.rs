use std::ops::Range;

/// Returns the first input index covered by output index `a`.
///
/// Equivalent to `floor(a * c / b)`.
///
/// # Parameters
///
/// - `a` - Output index along the axis
/// - `b` - Output extent of the axis
/// - `c` - Input extent of the axis
#[inline]
pub fn start_index(a: usize, b: usize, c: usize) -> usize {
    (a / b) * c + ((a % b) * c) / b
}

/// Returns one past the last input index covered by output index `a`.
///
/// Equivalent to `ceil((a + 1) * c / b)`.
///
/// # Parameters
///
/// - `a` - Output index along the axis
/// - `b` - Output extent of the axis
/// - `c` - Input extent of the axis
#[inline]
pub fn end_index(a: usize, b: usize, c: usize) -> usize {
    1 + ((a + 1) * c - 1) / b
}

/// Computes the half-open input interval `[start, end)` pooled into one output index.
///
/// For `input_extent > 0` and `output_index < output_extent` the result always
/// satisfies `start < end <= input_extent`. Consecutive windows never leave a gap,
/// and they overlap only when `input_extent` is not a multiple of `output_extent`.
///
/// # Parameters
///
/// - `output_index` - Position along the output axis
/// - `output_extent` - Size of the output axis
/// - `input_extent` - Size of the input axis
///
/// # Returns
///
/// * `(usize, usize)` - The `(start, end)` bounds of the window
///
/// # Example
/// ```rust
/// use adaptive_pooling::geometry::window_bounds;
///
/// // 5 inputs pooled into 3 outputs
/// assert_eq!(window_bounds(0, 3, 5), (0, 2));
/// assert_eq!(window_bounds(1, 3, 5), (1, 4));
/// assert_eq!(window_bounds(2, 3, 5), (3, 5));
/// ```
#[inline]
pub fn window_bounds(
    output_index: usize,
    output_extent: usize,
    input_extent: usize,
) -> (usize, usize) {
    debug_assert!(input_extent > 0 && output_index < output_extent);
    (
        start_index(output_index, output_extent, input_extent),
        end_index(output_index, output_extent, input_extent),
    )
}

/// Iterates over the windows of every output index of one axis, in order.
pub fn axis_windows(
    output_extent: usize,
    input_extent: usize,
) -> impl Iterator<Item = Range<usize>> {
    (0..output_extent).map(move |o| {
        let (start, end) = window_bounds(o, output_extent, input_extent);
        start..end
    })
}

/// Calculates the output shape of adaptive 2D pooling.
///
/// The leading axes (`[channels]` or `[batch_size, channels]`) are kept and the two
/// trailing spatial axes are replaced by `output_size`.
///
/// # Parameters
///
/// * `input_shape` - Shape of the input, in format \[batch_size?, channels, height, width\].
/// * `output_size` - Requested output size as (height, width).
///
/// # Returns
///
/// * `Vec<usize>` - The output shape, in format \[batch_size?, channels, output_height, output_width\].
pub fn output_shape(input_shape: &[usize], output_size: (usize, usize)) -> Vec<usize> {
    let leading = &input_shape[..input_shape.len().saturating_sub(2)];
    let mut shape = leading.to_vec();
    shape.push(output_size.0);
    shape.push(output_size.1);
    shape
}
