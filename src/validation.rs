use crate::dtype::DType;
use crate::error::PoolingError;
use ndarray::{ArrayD, Dimension};

/// Validates that the shape is 3D `[channels, height, width]` or 4D `[batch, channels, height, width]`.
///
/// # Errors
///
/// Returns `PoolingError::InvalidRank` for any other number of dimensions.
pub fn validate_rank(op: &'static str, shape: &[usize]) -> Result<(), PoolingError> {
    if shape.len() != 3 && shape.len() != 4 {
        return Err(PoolingError::InvalidRank {
            op,
            actual: shape.len(),
        });
    }
    Ok(())
}

/// Validates that every dimension of the shape is greater than zero.
///
/// # Errors
///
/// Returns `PoolingError::EmptyDimension` naming the first empty dimension.
pub fn validate_non_empty(op: &'static str, shape: &[usize]) -> Result<(), PoolingError> {
    if let Some(dim) = shape.iter().position(|&d| d == 0) {
        return Err(PoolingError::EmptyDimension {
            op,
            shape: shape.to_vec(),
            dim,
        });
    }
    Ok(())
}

/// Converts an output size given as a slice into `(height, width)`.
///
/// # Errors
///
/// Returns `PoolingError::InvalidOutputSize` if the slice does not have exactly two components.
pub fn validate_output_size(output_size: &[usize]) -> Result<(usize, usize), PoolingError> {
    match output_size {
        &[height, width] => Ok((height, width)),
        _ => Err(PoolingError::InvalidOutputSize(output_size.len())),
    }
}

/// Validates that an array has exactly the expected shape.
///
/// # Errors
///
/// Returns `PoolingError::ShapeMismatch` describing `what` was compared.
pub fn validate_shape(
    what: &'static str,
    expected: &[usize],
    actual: &[usize],
) -> Result<(), PoolingError> {
    if expected != actual {
        return Err(PoolingError::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

/// Validates that the gradient has the element type of the original input.
///
/// # Errors
///
/// Returns `PoolingError::DtypeMismatch` if the two differ.
pub fn validate_dtype(expected: DType, actual: DType) -> Result<(), PoolingError> {
    if expected != actual {
        return Err(PoolingError::DtypeMismatch { expected, actual });
    }
    Ok(())
}

/// Validates that every stored index addresses an element of a plane of `plane_size` elements.
///
/// # Errors
///
/// Returns `PoolingError::IndexOutOfRange` for the first offending index in logical order.
/// Indices produced by a forward pass never trigger this.
pub fn validate_indices(indices: &ArrayD<i64>, plane_size: usize) -> Result<(), PoolingError> {
    let offending = indices
        .indexed_iter()
        .find(|&(_, &index)| index < 0 || index as u64 >= plane_size as u64);

    if let Some((position, &index)) = offending {
        return Err(PoolingError::IndexOutOfRange {
            index,
            position: position.slice().to_vec(),
            plane_size,
        });
    }
    Ok(())
}
