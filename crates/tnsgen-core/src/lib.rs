//! # tnsgen-core
//!
//! Sparse tensor construction, packing, and `.tns` interchange.
//!
//! This crate provides the pipeline behind the `gentensor` command:
//!
//! - Dimension and mode-format spec parsing ([`format`])
//! - COO-style tensor representation ([`tensor`])
//! - Seeded random generation driven by per-mode formats ([`generate`])
//! - Packing into per-mode compressed index structures ([`pack`])
//! - All-or-nothing `.tns` serialization ([`io`])
//!
//! One invocation runs parse → generate → pack → serialize with no shared
//! state between invocations.
//!
//! ```
//! use tnsgen_core::format::{parse_dims, parse_formats};
//! use tnsgen_core::generate::{generate, GenConfig};
//! use tnsgen_core::pack::pack;
//!
//! let shape = parse_dims("4,4").unwrap();
//! let formats = parse_formats("d,s").unwrap();
//! let tensor = generate("A", &shape, &formats, &GenConfig::default()).unwrap();
//! let packed = pack(&tensor).unwrap();
//! assert_eq!(packed.nnz(), tensor.nnz());
//! ```

#![deny(warnings)]

pub mod error;
pub mod format;
pub mod generate;
pub mod io;
pub mod pack;
#[cfg(test)]
mod property_tests;
pub mod tensor;

// Re-exports
pub use error::{ConsistencyError, ParseError, TnsError, TnsResult};
pub use format::{parse_dims, parse_formats, ModeFormat};
pub use generate::{generate, GenConfig};
pub use pack::{pack, ModeIndex, PackedTensor};
pub use tensor::SparseTensor;
