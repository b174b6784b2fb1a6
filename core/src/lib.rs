//! # RedLilium glTF
//!
//! Runtime glTF decoder for RedLilium Engine: node graphs, skeletons, and
//! mesh streams converted into engine space.

pub mod backend;
pub mod config;
pub mod gltf;
pub mod material;
pub mod math;
pub mod mesh;
pub mod scene;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
