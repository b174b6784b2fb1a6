//! CPU-side decoded mesh types.
//!
//! This module provides the GPU-agnostic geometry handed to a mesh-build
//! backend:
//!
//! - [`MeshSection`] - One material slot: vertex streams plus triangles
//! - [`StaticMeshData`] - Rigid mesh made of sections
//! - [`SkeletalMeshData`] - Skinned mesh with per-vertex bone influences
//! - [`BoundingBox`] - Axis-aligned bounds with import padding
//!
//! Sections are generic over the material handle type so each backend can
//! carry its own material objects.

mod data;

pub use data::{
    BoneInfluence, BoundingBox, MeshSection, SkeletalMeshData, SkinnedSection, StaticMeshData,
};
