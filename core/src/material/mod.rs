//! CPU-side material definitions.
//!
//! - [`CpuMaterial`] - Named property bag produced by the reference backend
//! - [`MaterialSemantic`] / [`MaterialValue`] - PBR factors and their defaults
//!
//! Shader-graph instantiation is the host's concern; these types only carry
//! the PBR factors decoded from a document.

mod types;

pub use types::{CpuMaterial, MaterialSemantic, MaterialValue};
