pub mod gemm;

use std::ops::{AddAssign, Mul};

use crate::backend::GemmBackend;
use crate::device::Device;
use crate::error::{Result, TensorError};

/// Pure-Rust CPU GEMM backend.
///
/// The default path is a blocked triple loop, written for correctness and
/// cache behavior rather than peak throughput. With the `blas` feature,
/// matrices at or above the threshold in [`gemm`] route through the system
/// BLAS instead.
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn check_lens<T>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Result<()> {
    if a.len() != m * k {
        return Err(TensorError::Other(format!(
            "gemm: a.len()={} but expected m*k={}",
            a.len(),
            m * k
        )));
    }
    if b.len() != k * n {
        return Err(TensorError::Other(format!(
            "gemm: b.len()={} but expected k*n={}",
            b.len(),
            k * n
        )));
    }
    Ok(())
}

// Blocked over j and k so that a stripe of b stays cache-resident while a
// full row of c is produced.
fn gemm_blocked<T>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Vec<T>
where
    T: Copy + Default + Mul<Output = T> + AddAssign,
{
    const BLOCK_SIZE: usize = 64;

    if m == 0 || n == 0 {
        return Vec::new();
    }

    let mut c = vec![T::default(); m * n];
    for (i, row) in c.chunks_mut(n).enumerate().take(m) {
        for jb in (0..n).step_by(BLOCK_SIZE) {
            let j_end = (jb + BLOCK_SIZE).min(n);
            for kb in (0..k).step_by(BLOCK_SIZE) {
                let k_end = (kb + BLOCK_SIZE).min(k);
                for kk in kb..k_end {
                    let a_ik = a[i * k + kk];
                    for j in jb..j_end {
                        row[j] += a_ik * b[kk * n + j];
                    }
                }
            }
        }
    }
    c
}

impl GemmBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn device(&self) -> Device {
        Device::Cpu
    }

    fn sgemm(&self, a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Result<Vec<f32>> {
        check_lens(a, b, m, k, n)?;

        #[cfg(feature = "blas")]
        if gemm::use_blas(m, k, n) {
            return Ok(gemm::sgemm_blas(a, b, m, k, n));
        }

        Ok(gemm_blocked(a, b, m, k, n))
    }

    fn dgemm(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        check_lens(a, b, m, k, n)?;

        #[cfg(feature = "blas")]
        if gemm::use_blas(m, k, n) {
            return Ok(gemm::dgemm_blas(a, b, m, k, n));
        }

        Ok(gemm_blocked(a, b, m, k, n))
    }
}
