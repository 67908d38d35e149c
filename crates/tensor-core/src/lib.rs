//! `tensor-core` - Typed tensor element model and dtype/device-aware matmul
//! dispatch.
//!
//! This crate provides:
//! - A closed [`DType`] registry with byte sizes, categories, and canonical
//!   names, plus a compile-time mapping from native element types ([`Element`])
//! - A [`Tensor`] type over typed CPU storage, with strided transpose views
//!   and contiguous materialization
//! - A [`GemmBackend`] trait for pluggable GEMM kernels and a validating
//!   [`backend::matmul`] dispatch over (dtype, device)
//! - A reference [`CpuBackend`] implementation, optionally BLAS-accelerated
//!   through the `blas` feature

pub mod backend;
pub mod cpu;
pub mod device;
pub mod dtype;
pub mod error;
pub mod shape;
pub mod storage;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use backend::GemmBackend;
pub use cpu::CpuBackend;
pub use device::Device;
pub use dtype::{DType, DtypeCode, DtypeDescriptor, Element};
pub use error::{Result, TensorError};
pub use shape::Shape;
pub use storage::{CpuStorage, StorageElement};
pub use tensor::Tensor;
