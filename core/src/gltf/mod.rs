//! glTF 2.0 scene decoder.
//!
//! Turns a glTF JSON document with embedded base64 buffers into node graphs,
//! skeletons, and rigid or skinned mesh data, converted into engine space by
//! the parser's [`ImportConfig`](crate::config::ImportConfig).
//!
//! # Pipeline
//!
//! - [`buffer`] resolves buffers from data URIs and caches them by index.
//! - [`accessor`] copies the strided bytes an accessor covers.
//! - [`nodes`] parses all nodes into an index-stable [`NodeGraph`], then
//!   back-fills parent links.
//! - [`primitive`] decodes vertex attribute and index streams.
//! - [`skeleton`] roots a bone hierarchy at the joints' common ancestor.
//! - [`assembler`] merges primitives into sections and computes bounds.
//!
//! [`GltfParser`] ties these together, memoizes every load, and hands the
//! results to an [`ImportBackend`](crate::backend::ImportBackend) to
//! instantiate materials and meshes.
//!
//! # Example
//!
//! ```ignore
//! use redlilium_gltf::backend::CpuBackend;
//! use redlilium_gltf::config::ImportConfig;
//! use redlilium_gltf::gltf::GltfParser;
//!
//! let mut parser = GltfParser::from_file("robot.gltf", CpuBackend::new(), ImportConfig::default())?;
//! for scene in parser.load_scenes()? {
//!     println!("{}: {:?}", scene.name, scene.root_node_indices);
//! }
//! let body = parser.load_skeletal_mesh(0, 0, Some(2))?;
//! println!("{} bones", body.skeleton.bone_count());
//! ```

pub mod accessor;
pub mod assembler;
pub mod buffer;
pub mod document;
mod error;
pub mod material;
pub mod nodes;
mod parser;
pub mod primitive;
pub mod scene;
pub mod skeleton;
#[cfg(test)]
mod tests;
pub mod types;

pub use accessor::{decode_accessor, AccessorData, ComponentType, ElementType};
pub use document::Document;
pub use error::{ErrorClass, GltfError};
pub use nodes::NodeGraph;
pub use parser::GltfParser;
pub use primitive::Primitive;
pub use types::*;
