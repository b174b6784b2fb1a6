//! Scene graph data types.

use std::collections::{BTreeMap, HashMap};

use crate::math::Mat4;

/// A node of the document's transform hierarchy.
///
/// `local_transform` is already converted into engine space (basis change
/// and unit scale applied).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Index in the document's node table.
    pub index: usize,
    /// Node name, or its decimal index when the document has none.
    pub name: String,
    /// Transform relative to the parent node.
    pub local_transform: Mat4,
    /// Mesh attached to this node, if any.
    pub mesh_index: Option<usize>,
    /// Skin used by the attached mesh, if any.
    pub skin_index: Option<usize>,
    /// Parent node, `None` for hierarchy roots.
    pub parent_index: Option<usize>,
    /// Child node indices in declaration order.
    pub children_indices: Vec<usize>,
}

impl Node {
    /// Creates a node with identity transform and no relations.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: index.to_string(),
            local_transform: Mat4::identity(),
            mesh_index: None,
            skin_index: None,
            parent_index: None,
            children_indices: Vec::new(),
        }
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.local_transform = transform;
        self
    }

    /// Set the child node indices.
    #[must_use]
    pub fn with_children(mut self, children: Vec<usize>) -> Self {
        self.children_indices = children;
        self
    }

    /// Whether this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_index.is_none()
    }
}

/// A scene: a named forest of root nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Index in the document's scene list.
    pub index: usize,
    /// Scene name, or its decimal index when the document has none.
    pub name: String,
    /// Root node indices in declaration order.
    pub root_node_indices: Vec<usize>,
}

/// One bone of a [`Skeleton`].
#[derive(Debug, Clone, PartialEq)]
pub struct BoneEntry {
    /// Bone name, unique within its skeleton.
    pub name: String,
    /// Document node this bone was built from.
    pub node_index: usize,
    /// Index of the parent bone in [`Skeleton::bones`].
    pub parent: Option<usize>,
    /// Bind-pose transform relative to the parent bone, in engine space.
    pub bind_transform: Mat4,
}

/// Bone hierarchy resolved from a skin.
///
/// Bones are stored parent-before-children, so `bones[i].parent < i` for
/// every non-root bone.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    /// Node the hierarchy was rooted at (the joints' common ancestor).
    pub root_node: usize,
    /// Bones in depth-first order.
    pub bones: Vec<BoneEntry>,
    /// Skin joint index → bone name.
    pub joint_to_bone: BTreeMap<usize, String>,
    bone_lookup: HashMap<String, usize>,
}

impl Skeleton {
    /// Creates an empty skeleton rooted at `root_node`.
    pub fn new(root_node: usize) -> Self {
        Self {
            root_node,
            bones: Vec::new(),
            joint_to_bone: BTreeMap::new(),
            bone_lookup: HashMap::new(),
        }
    }

    /// Append a bone and return its index.
    ///
    /// The caller is responsible for name uniqueness (see
    /// [`Self::unique_bone_name`]); a duplicate name replaces the lookup entry.
    pub fn add_bone(&mut self, bone: BoneEntry) -> usize {
        let index = self.bones.len();
        self.bone_lookup.insert(bone.name.clone(), index);
        self.bones.push(bone);
        index
    }

    /// Returns `base` if no bone uses it yet, otherwise `base` with
    /// underscores appended until it is unused.
    pub fn unique_bone_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        while self.bone_lookup.contains_key(&name) {
            name.push('_');
        }
        name
    }

    /// Find a bone index by name.
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bone_lookup.get(name).copied()
    }

    /// Map a skin joint index to the bone index it drives.
    pub fn bone_for_joint(&self, joint: usize) -> Option<usize> {
        self.joint_to_bone
            .get(&joint)
            .and_then(|name| self.find_bone(name))
    }

    /// Number of bones.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}
