use crate::backend::{self, GemmBackend};
use crate::device::Device;
use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::storage::{CpuStorage, StorageElement};

/// A tensor backed by CPU storage.
///
/// Holds typed element data with an associated shape, element strides, and
/// device tag. Freshly constructed tensors are row-major contiguous; strided
/// views arise only through [`Tensor::t`]. Compute is dispatched through a
/// [`GemmBackend`].
#[derive(Debug, Clone)]
pub struct Tensor {
    storage: CpuStorage,
    shape: Shape,
    strides: Vec<usize>,
    device: Device,
}

impl Tensor {
    /// Create a new f32 tensor from data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new(data: Vec<f32>, shape: Shape) -> Self {
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        let strides = shape.strides();
        Tensor {
            storage: CpuStorage::from_f32_vec(data),
            shape,
            strides,
            device: Device::Cpu,
        }
    }

    /// Create a new f64 tensor from data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len() != shape.numel()`.
    pub fn new_f64(data: Vec<f64>, shape: Shape) -> Self {
        assert_eq!(
            data.len(),
            shape.numel(),
            "data length {} does not match shape {} (numel={})",
            data.len(),
            shape,
            shape.numel()
        );
        let strides = shape.strides();
        Tensor {
            storage: CpuStorage::from_f64_vec(data),
            shape,
            strides,
            device: Device::Cpu,
        }
    }

    /// Create a tensor from any supported element vector.
    ///
    /// The element type fixes the dtype through the compile-time mapping.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if the data length does not
    /// match the shape's element count.
    pub fn from_vec<T: StorageElement>(data: Vec<T>, shape: Shape) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                got: vec![data.len()],
            });
        }
        let strides = shape.strides();
        Ok(Tensor {
            storage: T::into_storage(data),
            shape,
            strides,
            device: Device::Cpu,
        })
    }

    /// Create a zero-filled tensor with the given shape, dtype, and device.
    ///
    /// # Errors
    /// Returns [`TensorError::UnsupportedDType`] for `DType::Undefined`.
    pub fn zeros(shape: Shape, dtype: DType, device: Device) -> Result<Self> {
        let storage = CpuStorage::zeros(dtype, shape.numel())?;
        let strides = shape.strides();
        Ok(Tensor {
            storage,
            shape,
            strides,
            device,
        })
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's element strides.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Returns the device this tensor's storage resides on.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Whether the tensor's layout is row-major contiguous.
    pub fn is_contiguous(&self) -> bool {
        self.shape.is_contiguous(&self.strides)
    }

    /// Returns the underlying data as an f32 slice, in storage order.
    ///
    /// # Errors
    /// Returns [`TensorError::DTypeMismatch`] if the dtype is not Float32.
    pub fn data_f32(&self) -> Result<&[f32]> {
        self.storage.as_f32_slice()
    }

    /// Returns the underlying data as an f64 slice, in storage order.
    ///
    /// # Errors
    /// Returns [`TensorError::DTypeMismatch`] if the dtype is not Float64.
    pub fn data_f64(&self) -> Result<&[f64]> {
        self.storage.as_f64_slice()
    }

    /// Returns the underlying storage reference.
    pub fn storage(&self) -> &CpuStorage {
        &self.storage
    }

    /// 2-D transpose as a strided view: dims and strides swap, storage is
    /// shared unchanged.
    ///
    /// # Errors
    /// Returns [`TensorError::RankMismatch`] for non-2D tensors.
    pub fn t(&self) -> Result<Tensor> {
        if self.shape.ndim() != 2 {
            return Err(TensorError::RankMismatch {
                operand: "self",
                expected: 2,
                got: self.shape.ndim(),
            });
        }
        Ok(Tensor {
            storage: self.storage.clone(),
            shape: Shape::new(vec![self.shape.dim(1), self.shape.dim(0)]),
            strides: vec![self.strides[1], self.strides[0]],
            device: self.device,
        })
    }

    /// Returns a row-major contiguous tensor with the same logical contents,
    /// copying the data iff the layout is strided.
    pub fn contiguous(&self) -> Tensor {
        if self.is_contiguous() {
            return self.clone();
        }
        let order = self.gather_order();
        Tensor {
            storage: gather(&self.storage, &order),
            shape: self.shape.clone(),
            strides: self.shape.strides(),
            device: self.device,
        }
    }

    /// Reshape the tensor, returning a new tensor with the same data but a
    /// different shape. Strided views are materialized first.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if the element count changes.
    pub fn reshape(&self, new_shape: Shape) -> Result<Tensor> {
        if self.shape.numel() != new_shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape.dims().to_vec(),
                got: new_shape.dims().to_vec(),
            });
        }
        let base = self.contiguous();
        let strides = new_shape.strides();
        Ok(Tensor {
            storage: base.storage,
            shape: new_shape,
            strides,
            device: self.device,
        })
    }

    /// Matrix multiplication of two 2D tensors using the given backend.
    ///
    /// self is [m, k], other is [k, n], result is [m, n]. See
    /// [`backend::matmul`] for the full precondition contract.
    pub fn matmul(&self, other: &Tensor, backend: &dyn GemmBackend) -> Result<Tensor> {
        backend::matmul(self, other, backend)
    }

    // Storage indices of each element in row-major logical order.
    fn gather_order(&self) -> Vec<usize> {
        let ndim = self.shape.ndim();
        let numel = self.shape.numel();
        let mut order = Vec::with_capacity(numel);
        let mut index = vec![0usize; ndim];
        for _ in 0..numel {
            let offset: usize = index
                .iter()
                .zip(self.strides.iter())
                .map(|(i, s)| i * s)
                .sum();
            order.push(offset);
            for d in (0..ndim).rev() {
                index[d] += 1;
                if index[d] < self.shape.dim(d) {
                    break;
                }
                index[d] = 0;
            }
        }
        order
    }
}

fn gather(storage: &CpuStorage, order: &[usize]) -> CpuStorage {
    match storage {
        CpuStorage::F32(v) => CpuStorage::F32(order.iter().map(|&i| v[i]).collect()),
        CpuStorage::F64(v) => CpuStorage::F64(order.iter().map(|&i| v[i]).collect()),
        CpuStorage::I32(v) => CpuStorage::I32(order.iter().map(|&i| v[i]).collect()),
        CpuStorage::I64(v) => CpuStorage::I64(order.iter().map(|&i| v[i]).collect()),
        CpuStorage::U8(v) => CpuStorage::U8(order.iter().map(|&i| v[i]).collect()),
        CpuStorage::U16(v) => CpuStorage::U16(order.iter().map(|&i| v[i]).collect()),
        CpuStorage::Bool(v) => CpuStorage::Bool(order.iter().map(|&i| v[i]).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuBackend;

    #[test]
    fn test_new_tensor() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Shape::new(vec![2, 3]));
        assert_eq!(t.shape().ndim(), 2);
        assert_eq!(t.shape().dim(0), 2);
        assert_eq!(t.shape().dim(1), 3);
        assert_eq!(t.dtype(), DType::Float32);
        assert_eq!(t.device(), Device::Cpu);
        assert!(t.is_contiguous());
        assert_eq!(t.data_f32().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_vec_dtypes() {
        let t = Tensor::from_vec(vec![1i32, 2, 3, 4], Shape::new(vec![2, 2])).unwrap();
        assert_eq!(t.dtype(), DType::Int32);

        let t = Tensor::from_vec(vec![true, false], Shape::new(vec![2])).unwrap();
        assert_eq!(t.dtype(), DType::Bool);

        let t = Tensor::from_vec(vec![1.0f64, 2.0], Shape::new(vec![2])).unwrap();
        assert_eq!(t.dtype(), DType::Float64);
        assert_eq!(t.data_f64().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        assert!(Tensor::from_vec(vec![1.0f32, 2.0], Shape::new(vec![3])).is_err());
    }

    #[test]
    fn test_zeros() {
        let z = Tensor::zeros(Shape::new(vec![2, 3]), DType::Float32, Device::Cpu).unwrap();
        assert_eq!(z.data_f32().unwrap(), &[0.0; 6]);
        assert_eq!(z.dtype(), DType::Float32);

        let z = Tensor::zeros(Shape::new(vec![4]), DType::Int64, Device::Cpu).unwrap();
        assert_eq!(z.dtype(), DType::Int64);
    }

    #[test]
    fn test_zeros_undefined_rejected() {
        assert!(Tensor::zeros(Shape::new(vec![2]), DType::Undefined, Device::Cpu).is_err());
    }

    #[test]
    #[should_panic]
    fn test_new_shape_mismatch_panics() {
        let _t = Tensor::new(vec![1.0, 2.0], Shape::new(vec![3]));
    }

    #[test]
    fn test_transpose_view() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Shape::new(vec![2, 3]));
        let tt = t.t().unwrap();
        assert_eq!(tt.shape().dims(), &[3, 2]);
        assert_eq!(tt.strides(), &[1, 3]);
        assert!(!tt.is_contiguous());
        // Storage is untouched by the view.
        assert_eq!(tt.data_f32().unwrap(), t.data_f32().unwrap());
    }

    #[test]
    fn test_transpose_rank_error() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0], Shape::new(vec![3]));
        assert!(t.t().is_err());
    }

    #[test]
    fn test_contiguous_materializes_transpose() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Shape::new(vec![2, 3]));
        let tt = t.t().unwrap().contiguous();
        assert!(tt.is_contiguous());
        assert_eq!(tt.shape().dims(), &[3, 2]);
        assert_eq!(tt.data_f32().unwrap(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_contiguous_identity() {
        let t = Tensor::new(vec![1.0, 2.0], Shape::new(vec![2]));
        let c = t.contiguous();
        assert_eq!(c.data_f32().unwrap(), t.data_f32().unwrap());
    }

    #[test]
    fn test_reshape() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Shape::new(vec![2, 3]));
        let r = t.reshape(Shape::new(vec![3, 2])).unwrap();
        assert_eq!(r.shape().dims(), &[3, 2]);
        assert_eq!(r.data_f32().unwrap(), t.data_f32().unwrap());
    }

    #[test]
    fn test_reshape_mismatch() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0], Shape::new(vec![3]));
        assert!(t.reshape(Shape::new(vec![2, 2])).is_err());
    }

    #[test]
    fn test_matmul_entry_point() {
        let backend = CpuBackend::new();
        let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], Shape::new(vec![2, 2]));
        let b = Tensor::new(vec![5.0, 6.0, 7.0, 8.0], Shape::new(vec![2, 2]));
        let c = a.matmul(&b, &backend).unwrap();
        assert_eq!(c.shape().dims(), &[2, 2]);
        assert_eq!(c.data_f32().unwrap(), &[19.0, 22.0, 43.0, 50.0]);
    }
}
