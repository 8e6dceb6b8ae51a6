use ndarray::ArrayD;
use num_traits::Float;
use std::fmt;

/// Runtime tag for the element type of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    F64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
        }
    }
}

/// Real element types that can be pooled.
///
/// Implemented for `f32` and `f64`. `Float` supplies `-inf` for seeding the running
/// maximum and NaN detection; the conversions to and from [`DynTensor`] let the
/// dtype-erased API recover a typed array.
pub trait Element: Float + Send + Sync + fmt::Debug + 'static {
    /// The runtime tag of this type
    const DTYPE: DType;

    /// Wraps a typed array into a [`DynTensor`]
    fn into_dyn_tensor(array: ArrayD<Self>) -> DynTensor;

    /// Borrows the typed array out of a [`DynTensor`], if the dtype matches
    fn from_dyn_tensor(tensor: &DynTensor) -> Option<&ArrayD<Self>>;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn into_dyn_tensor(array: ArrayD<Self>) -> DynTensor {
        DynTensor::F32(array)
    }

    fn from_dyn_tensor(tensor: &DynTensor) -> Option<&ArrayD<Self>> {
        match tensor {
            DynTensor::F32(a) => Some(a),
            _ => None,
        }
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn into_dyn_tensor(array: ArrayD<Self>) -> DynTensor {
        DynTensor::F64(array)
    }

    fn from_dyn_tensor(tensor: &DynTensor) -> Option<&ArrayD<Self>> {
        match tensor {
            DynTensor::F64(a) => Some(a),
            _ => None,
        }
    }
}

/// An n-dimensional array whose element type is only known at run time.
///
/// This is the currency of the dtype-erased entry points
/// [`forward_dyn`](crate::ops::forward_dyn) and [`backward_dyn`](crate::ops::backward_dyn),
/// where a gradient of the wrong element type is reported instead of coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum DynTensor {
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

impl DynTensor {
    /// Returns the element type tag
    pub fn dtype(&self) -> DType {
        match self {
            DynTensor::F32(_) => DType::F32,
            DynTensor::F64(_) => DType::F64,
        }
    }

    /// Returns the shape of the wrapped array
    pub fn shape(&self) -> &[usize] {
        match self {
            DynTensor::F32(a) => a.shape(),
            DynTensor::F64(a) => a.shape(),
        }
    }

    /// Captures shape and dtype, which is all backward needs from the original input
    pub fn meta(&self) -> TensorMeta {
        TensorMeta {
            shape: self.shape().to_vec(),
            dtype: self.dtype(),
        }
    }

    /// Borrows the array as `ArrayD<T>` if `T` is its element type
    pub fn as_array<T: Element>(&self) -> Option<&ArrayD<T>> {
        T::from_dyn_tensor(self)
    }
}

impl From<ArrayD<f32>> for DynTensor {
    fn from(array: ArrayD<f32>) -> Self {
        DynTensor::F32(array)
    }
}

impl From<ArrayD<f64>> for DynTensor {
    fn from(array: ArrayD<f64>) -> Self {
        DynTensor::F64(array)
    }
}

/// Shape and element type of the input a forward pass was run on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorMeta {
    pub shape: Vec<usize>,
    pub dtype: DType,
}

impl TensorMeta {
    /// Creates the metadata for an input of the given shape and element type
    pub fn new(shape: Vec<usize>, dtype: DType) -> Self {
        TensorMeta { shape, dtype }
    }

    /// Creates the metadata of a typed array
    pub fn of<T: Element>(array: &ArrayD<T>) -> Self {
        TensorMeta {
            shape: array.shape().to_vec(),
            dtype: T::DTYPE,
        }
    }
}
