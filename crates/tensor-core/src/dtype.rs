use std::fmt;
use std::mem::size_of;

use crate::error::{Result, TensorError};

// The storage model assumes exact native sizes for every supported element
// type. A platform where these do not hold must fail to build.
const _: () = assert!(size_of::<f32>() == 4);
const _: () = assert!(size_of::<f64>() == 8);
const _: () = assert!(size_of::<i32>() == 4);
const _: () = assert!(size_of::<i64>() == 8);
const _: () = assert!(size_of::<u8>() == 1);
const _: () = assert!(size_of::<u16>() == 2);
const _: () = assert!(size_of::<bool>() == 1);

/// Coarse category of an element type.
///
/// `Bool` is kept separate from `UInt` even though both may occupy a single
/// byte: a boolean carries truth-value semantics, not an integer magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtypeCode {
    Undefined,
    Bool,
    Int,
    UInt,
    Float,
    Object,
}

/// Supported element types for tensor storage.
///
/// `Undefined` is the dtype of an uninitialized tensor; every query on it
/// fails with [`TensorError::UnsupportedDType`]. The seven concrete tags are
/// the closed set the storage layer knows how to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Undefined,
    Float32,
    Float64,
    Int32,
    Int64,
    UInt8,
    UInt16,
    Bool,
}

/// Full description of a concrete dtype: category, storage size, and
/// canonical name.
///
/// Derived from [`DType`] via [`DType::descriptor`]; never constructed by
/// hand, so it cannot drift out of step with the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtypeDescriptor {
    pub code: DtypeCode,
    pub byte_size: usize,
    pub name: &'static str,
}

impl DType {
    /// Size in bytes of a single element.
    ///
    /// # Errors
    /// Returns [`TensorError::UnsupportedDType`] for `Undefined`.
    pub fn byte_size(self) -> Result<usize> {
        match self {
            DType::Float32 => Ok(4),
            DType::Float64 => Ok(8),
            DType::Int32 => Ok(4),
            DType::Int64 => Ok(8),
            DType::UInt8 => Ok(1),
            DType::UInt16 => Ok(2),
            DType::Bool => Ok(1),
            DType::Undefined => Err(TensorError::UnsupportedDType(
                "unsupported data type: Undefined".to_string(),
            )),
        }
    }

    /// Coarse category of this dtype. Total over all tags.
    pub fn code(self) -> DtypeCode {
        match self {
            DType::Float32 | DType::Float64 => DtypeCode::Float,
            DType::Int32 | DType::Int64 => DtypeCode::Int,
            DType::UInt8 | DType::UInt16 => DtypeCode::UInt,
            DType::Bool => DtypeCode::Bool,
            DType::Undefined => DtypeCode::Undefined,
        }
    }

    /// Canonical display name, e.g. `"Float32"`.
    ///
    /// # Errors
    /// Returns [`TensorError::UnsupportedDType`] for `Undefined`.
    pub fn name(self) -> Result<&'static str> {
        match self {
            DType::Float32 => Ok("Float32"),
            DType::Float64 => Ok("Float64"),
            DType::Int32 => Ok("Int32"),
            DType::Int64 => Ok("Int64"),
            DType::UInt8 => Ok("UInt8"),
            DType::UInt16 => Ok("UInt16"),
            DType::Bool => Ok("Bool"),
            DType::Undefined => Err(TensorError::UnsupportedDType(
                "unsupported data type: Undefined".to_string(),
            )),
        }
    }

    /// The full `(code, byte_size, name)` description of a concrete dtype.
    ///
    /// # Errors
    /// Returns [`TensorError::UnsupportedDType`] for `Undefined`.
    pub fn descriptor(self) -> Result<DtypeDescriptor> {
        Ok(DtypeDescriptor {
            code: self.code(),
            byte_size: self.byte_size()?,
            name: self.name()?,
        })
    }

    /// Runtime tag for a native element type known at compile time.
    ///
    /// Types outside the supported set do not implement [`Element`], so an
    /// unsupported `T` fails to compile rather than falling back to
    /// `Undefined`.
    pub fn of<T: Element>() -> DType {
        T::DTYPE
    }

    /// Whether this dtype is accepted by the floating-point GEMM kernels.
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display must be total; the fallible contract lives on name().
        match self.name() {
            Ok(name) => write!(f, "{}", name),
            Err(_) => write!(f, "Undefined"),
        }
    }
}

/// Native element types that can back a tensor.
///
/// One impl per supported type maps the compile-time type to its runtime
/// [`DType`] tag.
pub trait Element: Copy + Clone + Default + Send + Sync + 'static {
    const DTYPE: DType;
}

impl Element for f32 {
    const DTYPE: DType = DType::Float32;
}

impl Element for f64 {
    const DTYPE: DType = DType::Float64;
}

impl Element for i32 {
    const DTYPE: DType = DType::Int32;
}

impl Element for i64 {
    const DTYPE: DType = DType::Int64;
}

impl Element for u8 {
    const DTYPE: DType = DType::UInt8;
}

impl Element for u16 {
    const DTYPE: DType = DType::UInt16;
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;
}
