//! BLAS-accelerated GEMM path, enabled with the `blas` feature.
//!
//! Small products stay on the blocked pure-Rust kernel; the library-call
//! overhead only pays off once every dimension reaches [`BLAS_THRESHOLD`].

// Keeps the BLAS provider linked even though it is never named directly.
#[cfg(feature = "blas")]
use blas_src as _;

/// Minimum value of m, k, and n before the system BLAS is used.
#[cfg(feature = "blas")]
pub const BLAS_THRESHOLD: usize = 64;

#[cfg(feature = "blas")]
pub(crate) fn use_blas(m: usize, k: usize, n: usize) -> bool {
    m >= BLAS_THRESHOLD && k >= BLAS_THRESHOLD && n >= BLAS_THRESHOLD
}

/// Row-major, no-transpose `C = A @ B` through `cblas_sgemm`.
#[cfg(feature = "blas")]
pub(crate) fn sgemm_blas(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Vec<f32> {
    use cblas::{Layout, Transpose};

    let mut c = vec![0.0f32; m * n];
    unsafe {
        cblas::sgemm(
            Layout::RowMajor,
            Transpose::None,
            Transpose::None,
            m as i32,
            n as i32,
            k as i32,
            1.0, // alpha
            a,
            k as i32, // lda
            b,
            n as i32, // ldb
            0.0, // beta
            &mut c,
            n as i32, // ldc
        );
    }
    c
}

/// Row-major, no-transpose `C = A @ B` through `cblas_dgemm`.
#[cfg(feature = "blas")]
pub(crate) fn dgemm_blas(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    use cblas::{Layout, Transpose};

    let mut c = vec![0.0f64; m * n];
    unsafe {
        cblas::dgemm(
            Layout::RowMajor,
            Transpose::None,
            Transpose::None,
            m as i32,
            n as i32,
            k as i32,
            1.0,
            a,
            k as i32,
            b,
            n as i32,
            0.0,
            &mut c,
            n as i32,
        );
    }
    c
}
