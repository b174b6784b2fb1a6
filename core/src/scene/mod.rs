//! Scene graph types for decoded documents.
//!
//! These types are format-agnostic and index-based: every node, scene and
//! bone refers to others by index into an owning table.
//!
//! - [`Node`] - A node with its converted local transform and relations
//! - [`Scene`] - A named set of root nodes
//! - [`BoneEntry`] / [`Skeleton`] - Bone hierarchy resolved from a skin

mod types;

pub use types::{BoneEntry, Node, Scene, Skeleton};
