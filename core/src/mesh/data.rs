//! CPU-side mesh data structures.

use std::sync::Arc;

use crate::math::{Mat4, Vec2, Vec3};
use crate::scene::Skeleton;

/// Axis-aligned bounding box in engine space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl BoundingBox {
    /// Empty box at the origin.
    pub fn zero() -> Self {
        Self {
            min: Vec3::zeros(),
            max: Vec3::zeros(),
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for p in iter {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    /// Box center.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box by `margin` of its extent on both sides of every axis,
    /// then by `vertical_margin` more on the top of the Z axis.
    pub fn padded(&self, margin: f32, vertical_margin: f32) -> Self {
        let extent = self.extent();
        let pad = extent * margin;
        let mut max = self.max + pad;
        max.z += extent.z * vertical_margin;
        Self {
            min: self.min - pad,
            max,
        }
    }

    /// Whether `p` lies inside or on the box.
    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }
}

/// One drawable section of a mesh with a single material slot.
///
/// All vertex streams are parallel and indexed by the same vertex slot.
/// `normals` is either empty or as long as `positions`; every UV set is as
/// long as `positions`.
#[derive(Debug, Clone)]
pub struct MeshSection<M> {
    /// Material handle for this section.
    pub material: M,
    /// Document material index, `None` for the default material.
    pub material_index: Option<usize>,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals.
    pub normals: Vec<Vec3>,
    /// UV sets, in `TEXCOORD_n` order.
    pub uv_sets: Vec<Vec<Vec2>>,
    /// Non-degenerate triangles as vertex slot triples.
    pub triangles: Vec<[u32; 3]>,
}

impl<M> MeshSection<M> {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the section carries normals.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }
}

/// A rigid mesh: one section per source primitive.
#[derive(Debug, Clone)]
pub struct StaticMeshData<M> {
    /// Sections in primitive order; section `i` uses material slot `i`.
    pub sections: Vec<MeshSection<M>>,
    /// Padded bounds of all section positions.
    pub bounds: BoundingBox,
}

impl<M> StaticMeshData<M> {
    /// Total vertices across sections.
    pub fn vertex_count(&self) -> usize {
        self.sections.iter().map(MeshSection::vertex_count).sum()
    }

    /// Total triangles across sections.
    pub fn triangle_count(&self) -> usize {
        self.sections.iter().map(MeshSection::triangle_count).sum()
    }
}

/// Weight of one bone on one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfluence {
    /// Index into [`Skeleton::bones`].
    pub bone: usize,
    /// Blend weight.
    pub weight: f32,
}

/// A mesh section plus skinning data.
#[derive(Debug, Clone)]
pub struct SkinnedSection<M> {
    /// Geometry and material.
    pub section: MeshSection<M>,
    /// Per-vertex bone influences, parallel to `section.positions`.
    pub influences: Vec<Vec<BoneInfluence>>,
}

/// A skinned mesh bound to a skeleton.
#[derive(Debug, Clone)]
pub struct SkeletalMeshData<M> {
    /// Sections in primitive order.
    pub sections: Vec<SkinnedSection<M>>,
    /// Bone hierarchy every influence refers to.
    pub skeleton: Arc<Skeleton>,
    /// Inverse world transform of the node the mesh was instanced from,
    /// identity when none was given.
    pub root_transform: Mat4,
    /// Padded bounds of all section positions.
    pub bounds: BoundingBox,
}

impl<M> SkeletalMeshData<M> {
    /// Total vertices across sections.
    pub fn vertex_count(&self) -> usize {
        self.sections.iter().map(|s| s.section.vertex_count()).sum()
    }

    /// Total triangles across sections.
    pub fn triangle_count(&self) -> usize {
        self.sections.iter().map(|s| s.section.triangle_count()).sum()
    }
}
