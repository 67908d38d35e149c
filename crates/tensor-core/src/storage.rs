use crate::dtype::{DType, Element};
use crate::error::{Result, TensorError};

/// CPU-side tensor storage, one variant per concrete dtype.
///
/// The variant set mirrors [`DType`] exactly; `DType::Undefined` has no
/// storage form and is rejected by [`CpuStorage::zeros`].
#[derive(Debug, Clone, PartialEq)]
pub enum CpuStorage {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    Bool(Vec<bool>),
}

impl CpuStorage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        match self {
            CpuStorage::F32(v) => v.len(),
            CpuStorage::F64(v) => v.len(),
            CpuStorage::I32(v) => v.len(),
            CpuStorage::I64(v) => v.len(),
            CpuStorage::U8(v) => v.len(),
            CpuStorage::U16(v) => v.len(),
            CpuStorage::Bool(v) => v.len(),
        }
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage. Never `Undefined`.
    pub fn dtype(&self) -> DType {
        match self {
            CpuStorage::F32(_) => DType::Float32,
            CpuStorage::F64(_) => DType::Float64,
            CpuStorage::I32(_) => DType::Int32,
            CpuStorage::I64(_) => DType::Int64,
            CpuStorage::U8(_) => DType::UInt8,
            CpuStorage::U16(_) => DType::UInt16,
            CpuStorage::Bool(_) => DType::Bool,
        }
    }

    /// Create zero-filled storage for the given dtype and element count.
    ///
    /// # Errors
    /// Returns [`TensorError::UnsupportedDType`] for `DType::Undefined`.
    pub fn zeros(dtype: DType, n: usize) -> Result<Self> {
        match dtype {
            DType::Float32 => Ok(CpuStorage::F32(vec![0.0; n])),
            DType::Float64 => Ok(CpuStorage::F64(vec![0.0; n])),
            DType::Int32 => Ok(CpuStorage::I32(vec![0; n])),
            DType::Int64 => Ok(CpuStorage::I64(vec![0; n])),
            DType::UInt8 => Ok(CpuStorage::U8(vec![0; n])),
            DType::UInt16 => Ok(CpuStorage::U16(vec![0; n])),
            DType::Bool => Ok(CpuStorage::Bool(vec![false; n])),
            DType::Undefined => Err(TensorError::UnsupportedDType(
                "cannot allocate storage for Undefined dtype".to_string(),
            )),
        }
    }

    /// Returns the data as an f32 slice.
    ///
    /// # Errors
    /// Returns [`TensorError::DTypeMismatch`] if the storage is not Float32.
    pub fn as_f32_slice(&self) -> Result<&[f32]> {
        match self {
            CpuStorage::F32(v) => Ok(v.as_slice()),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::Float32,
                got: other.dtype(),
            }),
        }
    }

    /// Returns the data as a mutable f32 slice.
    ///
    /// # Errors
    /// Returns [`TensorError::DTypeMismatch`] if the storage is not Float32.
    pub fn as_f32_slice_mut(&mut self) -> Result<&mut [f32]> {
        match self {
            CpuStorage::F32(v) => Ok(v.as_mut_slice()),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::Float32,
                got: other.dtype(),
            }),
        }
    }

    /// Returns the data as an f64 slice.
    ///
    /// # Errors
    /// Returns [`TensorError::DTypeMismatch`] if the storage is not Float64.
    pub fn as_f64_slice(&self) -> Result<&[f64]> {
        match self {
            CpuStorage::F64(v) => Ok(v.as_slice()),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::Float64,
                got: other.dtype(),
            }),
        }
    }

    /// Returns the data as a mutable f64 slice.
    ///
    /// # Errors
    /// Returns [`TensorError::DTypeMismatch`] if the storage is not Float64.
    pub fn as_f64_slice_mut(&mut self) -> Result<&mut [f64]> {
        match self {
            CpuStorage::F64(v) => Ok(v.as_mut_slice()),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::Float64,
                got: other.dtype(),
            }),
        }
    }

    /// Create storage from an f32 vector.
    pub fn from_f32_vec(data: Vec<f32>) -> Self {
        CpuStorage::F32(data)
    }

    /// Create storage from an f64 vector.
    pub fn from_f64_vec(data: Vec<f64>) -> Self {
        CpuStorage::F64(data)
    }
}

/// Element types that know how to wrap an owned vector into [`CpuStorage`].
///
/// Implemented for every concrete [`DType`]; this is the storage-side half of
/// the compile-time-to-runtime mapping in [`crate::dtype`].
pub trait StorageElement: Element {
    fn into_storage(data: Vec<Self>) -> CpuStorage;
}

impl StorageElement for f32 {
    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::F32(data)
    }
}

impl StorageElement for f64 {
    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::F64(data)
    }
}

impl StorageElement for i32 {
    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::I32(data)
    }
}

impl StorageElement for i64 {
    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::I64(data)
    }
}

impl StorageElement for u8 {
    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::U8(data)
    }
}

impl StorageElement for u16 {
    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::U16(data)
    }
}

impl StorageElement for bool {
    fn into_storage(data: Vec<Self>) -> CpuStorage {
        CpuStorage::Bool(data)
    }
}
