//! Merging decoded primitives into rigid and skinned meshes.

use std::sync::Arc;

use crate::config::ImportConfig;
use crate::math::Mat4;
use crate::mesh::{
    BoneInfluence, BoundingBox, MeshSection, SkeletalMeshData, SkinnedSection, StaticMeshData,
};
use crate::scene::Skeleton;

use super::error::GltfError;
use super::primitive::Primitive;

/// Split an index stream into triangles, dropping degenerate ones.
pub fn triangulate(indices: &[u32], mesh: usize, primitive: usize) -> Vec<[u32; 3]> {
    let chunks = indices.chunks_exact(3);
    if !chunks.remainder().is_empty() {
        log::warn!(
            "mesh {mesh} primitive {primitive}: ignoring {} trailing indices",
            chunks.remainder().len()
        );
    }
    chunks
        .map(|t| [t[0], t[1], t[2]])
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect()
}

/// Bounds of every section's positions, padded by the configured margins.
pub fn mesh_bounds<'a>(
    sections: impl IntoIterator<Item = &'a Primitive>,
    config: &ImportConfig,
) -> BoundingBox {
    BoundingBox::from_points(sections.into_iter().flat_map(|p| p.positions.iter()))
        .map_or_else(BoundingBox::zero, |b| {
            b.padded(config.bounds_margin, config.bounds_vertical_margin)
        })
}

fn section<M>(primitive: Primitive, material: M, mesh: usize, index: usize) -> MeshSection<M> {
    let triangles = triangulate(&primitive.indices, mesh, index);
    MeshSection {
        material,
        material_index: primitive.material,
        positions: primitive.positions,
        normals: primitive.normals,
        uv_sets: primitive.uv_sets,
        triangles,
    }
}

/// One section per primitive, in primitive order.
pub fn assemble_static<M>(
    mesh: usize,
    primitives: Vec<(Primitive, M)>,
    config: &ImportConfig,
) -> StaticMeshData<M> {
    let bounds = mesh_bounds(primitives.iter().map(|(p, _)| p), config);
    let sections = primitives
        .into_iter()
        .enumerate()
        .map(|(i, (primitive, material))| section(primitive, material, mesh, i))
        .collect();
    StaticMeshData { sections, bounds }
}

/// Skinned sections: every joint index of every vertex must resolve to a
/// bone of `skeleton`.
pub fn assemble_skeletal<M>(
    mesh: usize,
    skin: usize,
    primitives: Vec<(Primitive, M)>,
    skeleton: Arc<Skeleton>,
    root_transform: Mat4,
    config: &ImportConfig,
) -> Result<SkeletalMeshData<M>, GltfError> {
    let bounds = mesh_bounds(primitives.iter().map(|(p, _)| p), config);
    let mut sections = Vec::with_capacity(primitives.len());
    for (i, (primitive, material)) in primitives.into_iter().enumerate() {
        if !primitive.is_skinned() {
            log::warn!("mesh {mesh} primitive {i}: no JOINTS_0 in a skinned mesh");
        }
        let influences = influences(&primitive, &skeleton, mesh, skin)?;
        sections.push(SkinnedSection {
            section: section(primitive, material, mesh, i),
            influences,
        });
    }
    Ok(SkeletalMeshData {
        sections,
        skeleton,
        root_transform,
        bounds,
    })
}

/// Per-vertex bone influences across all joint sets; zero weights dropped.
fn influences(
    primitive: &Primitive,
    skeleton: &Skeleton,
    mesh: usize,
    skin: usize,
) -> Result<Vec<Vec<BoneInfluence>>, GltfError> {
    let mut out = vec![Vec::new(); primitive.vertex_count()];
    for (joints, weights) in primitive.joint_sets.iter().zip(&primitive.weight_sets) {
        for (vertex, (joint4, weight4)) in joints.iter().zip(weights).enumerate() {
            for (&joint, &weight) in joint4.iter().zip(weight4) {
                let bone = skeleton
                    .bone_for_joint(joint as usize)
                    .ok_or(GltfError::UnmappedJoint { mesh, skin, joint })?;
                if weight > 0.0 {
                    out[vertex].push(BoneInfluence { bone, weight });
                }
            }
        }
    }
    Ok(out)
}
