use std::fmt::Debug;

use tracing::debug;

use crate::device::Device;
use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Trait for GEMM kernel providers (CPU now, accelerators later).
///
/// Kernels compute `C = A @ B` over row-major, contiguous, no-transpose
/// buffers with alpha = 1 and beta = 0. Input validation against the declared
/// dimensions is the kernel's responsibility; everything above the buffer
/// level (ranks, dtypes, devices, output allocation) is validated by
/// [`matmul`] before the kernel is reached.
pub trait GemmBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &'static str;

    /// Returns the device this backend computes on.
    fn device(&self) -> Device;

    /// Single-precision GEMM.
    ///
    /// - `a`: row-major data of shape [m, k]
    /// - `b`: row-major data of shape [k, n]
    /// - Returns: row-major data of shape [m, n]
    fn sgemm(&self, a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Result<Vec<f32>>;

    /// Double-precision GEMM. Same layout contract as [`Self::sgemm`].
    fn dgemm(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>>;
}

/// Matrix product of two 2-D tensors: `a` is [m, k], `b` is [k, n], the
/// result is a freshly allocated [m, n] tensor of the common dtype and
/// device.
///
/// Preconditions, checked in order; the first violation fails the call and
/// nothing is allocated:
/// 1. `a` has rank 2;
/// 2. `b` has rank 2;
/// 3. `a`'s column count equals `b`'s row count;
/// 4. `a` and `b` share a dtype;
/// 5. `a`, `b`, and the backend share a device;
/// 6. the dtype has a kernel: Float32 routes to `sgemm`, Float64 to `dgemm`,
///    every other dtype is rejected with [`TensorError::UnsupportedDType`].
///
/// Strided operands are materialized into contiguous buffers before the
/// kernel call; the copy is transparent to the caller. When any of m, n, k is
/// zero the zero-filled result is returned without invoking the kernel.
pub fn matmul(a: &Tensor, b: &Tensor, backend: &dyn GemmBackend) -> Result<Tensor> {
    if a.shape().ndim() != 2 {
        return Err(TensorError::RankMismatch {
            operand: "A",
            expected: 2,
            got: a.shape().ndim(),
        });
    }
    if b.shape().ndim() != 2 {
        return Err(TensorError::RankMismatch {
            operand: "B",
            expected: 2,
            got: b.shape().ndim(),
        });
    }

    let m = a.shape().dim(0);
    let k = a.shape().dim(1);
    let k2 = b.shape().dim(0);
    let n = b.shape().dim(1);

    if k != k2 {
        return Err(TensorError::MatmulMismatch { m, k, k2, n });
    }
    if a.dtype() != b.dtype() {
        return Err(TensorError::DTypeMismatch {
            expected: a.dtype(),
            got: b.dtype(),
        });
    }
    if a.device() != b.device() {
        return Err(TensorError::DeviceMismatch {
            expected: a.device(),
            got: b.device(),
        });
    }
    if a.device() != backend.device() {
        return Err(TensorError::DeviceMismatch {
            expected: backend.device(),
            got: a.device(),
        });
    }

    let dtype = a.dtype();
    if !dtype.is_float() {
        return Err(TensorError::UnsupportedDType(format!(
            "{} is not supported by matmul",
            dtype
        )));
    }

    // Degenerate product: the result is all zeros and the kernel never sees
    // a zero-sized buffer.
    if m == 0 || n == 0 || k == 0 {
        return Tensor::zeros(Shape::new(vec![m, n]), dtype, a.device());
    }

    debug!(
        backend = backend.name(),
        dtype = %dtype,
        m, k, n,
        "dispatching matmul"
    );

    let a_c = a.contiguous();
    let b_c = b.contiguous();

    match dtype {
        DType::Float32 => {
            let c = backend.sgemm(a_c.data_f32()?, b_c.data_f32()?, m, k, n)?;
            Ok(Tensor::new(c, Shape::new(vec![m, n])))
        }
        DType::Float64 => {
            let c = backend.dgemm(a_c.data_f64()?, b_c.data_f64()?, m, k, n)?;
            Ok(Tensor::new_f64(c, Shape::new(vec![m, n])))
        }
        other => Err(TensorError::UnsupportedDType(format!(
            "{} is not supported by matmul",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuBackend;

    fn f32_tensor(data: Vec<f32>, dims: Vec<usize>) -> Tensor {
        Tensor::new(data, Shape::new(dims))
    }

    #[test]
    fn test_matmul_basic() {
        let backend = CpuBackend::new();
        let a = f32_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
        let b = f32_tensor(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]);
        let c = matmul(&a, &b, &backend).unwrap();
        assert_eq!(c.shape().dims(), &[2, 2]);
        assert_eq!(c.data_f32().unwrap(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_identity() {
        let backend = CpuBackend::new();
        let a = f32_tensor(vec![1.0, 0.0, 0.0, 1.0], vec![2, 2]);
        let b = f32_tensor(vec![3.5, -1.0, 2.0, 0.25], vec![2, 2]);
        let c = matmul(&a, &b, &backend).unwrap();
        assert_eq!(c.data_f32().unwrap(), b.data_f32().unwrap());
    }

    #[test]
    fn test_matmul_f64() {
        let backend = CpuBackend::new();
        let a = Tensor::new_f64(vec![1.0, 2.0, 3.0, 4.0], Shape::new(vec![2, 2]));
        let b = Tensor::new_f64(vec![5.0, 6.0, 7.0, 8.0], Shape::new(vec![2, 2]));
        let c = matmul(&a, &b, &backend).unwrap();
        assert_eq!(c.dtype(), DType::Float64);
        assert_eq!(c.data_f64().unwrap(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_shape_law() {
        let backend = CpuBackend::new();
        let a = f32_tensor(vec![0.0; 12], vec![3, 4]);
        let b = f32_tensor(vec![0.0; 8], vec![4, 2]);
        let c = matmul(&a, &b, &backend).unwrap();
        assert_eq!(c.shape().dims(), &[3, 2]);
    }

    #[test]
    fn test_matmul_rank_errors() {
        let backend = CpuBackend::new();
        let vec3 = f32_tensor(vec![1.0, 2.0, 3.0], vec![3]);
        let mat = f32_tensor(vec![0.0; 9], vec![3, 3]);
        let cube = f32_tensor(vec![0.0; 8], vec![2, 2, 2]);

        match matmul(&vec3, &mat, &backend) {
            Err(TensorError::RankMismatch { operand: "A", got: 1, .. }) => {}
            other => panic!("unexpected result: {:?}", other.map(|t| t.shape().clone())),
        }
        match matmul(&mat, &cube, &backend) {
            Err(TensorError::RankMismatch { operand: "B", got: 3, .. }) => {}
            other => panic!("unexpected result: {:?}", other.map(|t| t.shape().clone())),
        }
    }

    #[test]
    fn test_matmul_inner_dim_mismatch() {
        let backend = CpuBackend::new();
        let a = f32_tensor(vec![0.0; 3], vec![1, 3]);
        let b = f32_tensor(vec![0.0; 4], vec![2, 2]);
        match matmul(&a, &b, &backend) {
            Err(TensorError::MatmulMismatch { m: 1, k: 3, k2: 2, n: 2 }) => {}
            other => panic!("unexpected result: {:?}", other.map(|t| t.shape().clone())),
        }
    }

    #[test]
    fn test_matmul_dtype_mismatch() {
        let backend = CpuBackend::new();
        let a = f32_tensor(vec![0.0; 4], vec![2, 2]);
        let b = Tensor::new_f64(vec![0.0; 4], Shape::new(vec![2, 2]));
        assert!(matches!(
            matmul(&a, &b, &backend),
            Err(TensorError::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_matmul_unsupported_dtype() {
        let backend = CpuBackend::new();
        let a = Tensor::from_vec(vec![1i32, 2, 3, 4], Shape::new(vec![2, 2])).unwrap();
        let b = Tensor::from_vec(vec![1i32, 2, 3, 4], Shape::new(vec![2, 2])).unwrap();
        assert!(matches!(
            matmul(&a, &b, &backend),
            Err(TensorError::UnsupportedDType(_))
        ));
    }

    #[test]
    fn test_matmul_transposed_view_matches_contiguous() {
        let backend = CpuBackend::new();
        let base = f32_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
        let a = f32_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![3, 2]);

        let view = base.t().unwrap(); // [3, 2] strided view
        let materialized = view.contiguous();

        let c_view = matmul(&view, &a.t().unwrap(), &backend).unwrap();
        let c_mat = matmul(&materialized, &a.t().unwrap().contiguous(), &backend).unwrap();
        assert_eq!(c_view.data_f32().unwrap(), c_mat.data_f32().unwrap());
    }

    #[test]
    fn test_matmul_zero_dims() {
        let backend = CpuBackend::new();

        let a = f32_tensor(vec![], vec![0, 3]);
        let b = f32_tensor(vec![0.0; 6], vec![3, 2]);
        let c = matmul(&a, &b, &backend).unwrap();
        assert_eq!(c.shape().dims(), &[0, 2]);
        assert_eq!(c.shape().numel(), 0);

        let a = f32_tensor(vec![0.0; 6], vec![2, 3]);
        let b = f32_tensor(vec![], vec![3, 0]);
        let c = matmul(&a, &b, &backend).unwrap();
        assert_eq!(c.shape().dims(), &[2, 0]);

        // k == 0: result is a zero matrix.
        let a = f32_tensor(vec![], vec![2, 0]);
        let b = f32_tensor(vec![], vec![0, 2]);
        let c = matmul(&a, &b, &backend).unwrap();
        assert_eq!(c.shape().dims(), &[2, 2]);
        assert_eq!(c.data_f32().unwrap(), &[0.0; 4]);
    }
}
