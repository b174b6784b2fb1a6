//! Node graph construction.
//!
//! Nodes are parsed into an index-stable table first; parent links are
//! back-filled in a second pass once every node exists.

use std::collections::HashMap;

use crate::math::{
    mat4_from_scale_rotation_translation, quat_from_array, BasisConversion, Mat4, Vec3,
};
use crate::scene::Node;

use super::document::{Document, Entry, Table};
use super::error::GltfError;

/// All nodes of a document, indexed by node index.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    names: HashMap<String, usize>,
}

impl NodeGraph {
    /// Parse every node, converting local transforms with `conversion`.
    pub fn build(document: &Document, conversion: &BasisConversion) -> Result<Self, GltfError> {
        let count = document.len(Table::Nodes)?;
        let mut nodes = Vec::with_capacity(count);
        for index in 0..count {
            let entry = document.entry(Table::Nodes, index)?;
            nodes.push(parse_node(&entry, index, count, conversion)?);
        }

        link_parents(&mut nodes)?;

        let mut names = HashMap::with_capacity(count);
        for node in &nodes {
            names.entry(node.name.clone()).or_insert(node.index);
        }

        Ok(Self { nodes, names })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Result<&Node, GltfError> {
        self.nodes.get(index).ok_or(GltfError::IndexOutOfRange {
            kind: "node",
            index,
            count: self.nodes.len(),
        })
    }

    /// First node carrying `name`, in index order.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.names.get(name).map(|&i| &self.nodes[i])
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    pub fn has_ancestor(&self, node: usize, ancestor: usize) -> bool {
        let mut current = Some(node);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = self.nodes.get(index).and_then(|n| n.parent_index);
        }
        false
    }

    /// Lowest node that is an ancestor of (or equal to) every joint.
    ///
    /// Climbs from the first joint until the candidate covers all of them.
    /// Returns `None` for an empty set or when the joints live in disjoint
    /// trees.
    pub fn find_common_root(&self, joints: &[usize]) -> Option<usize> {
        let mut candidate = *joints.first()?;
        loop {
            if joints.iter().all(|&j| self.has_ancestor(j, candidate)) {
                return Some(candidate);
            }
            candidate = self.nodes.get(candidate)?.parent_index?;
        }
    }

    /// Local transform of `index` composed with all of its ancestors'.
    pub fn world_transform(&self, index: usize) -> Result<Mat4, GltfError> {
        let mut node = self.node(index)?;
        let mut world = node.local_transform;
        while let Some(parent) = node.parent_index {
            node = self.node(parent)?;
            world = node.local_transform * world;
        }
        Ok(world)
    }
}

fn parse_node(
    entry: &Entry<'_>,
    index: usize,
    count: usize,
    conversion: &BasisConversion,
) -> Result<Node, GltfError> {
    let mut node = Node::new(index);
    if let Some(name) = entry.opt_str("name")? {
        node.name = name.to_string();
    }
    node.mesh_index = entry.opt_usize("mesh")?;
    node.skin_index = entry.opt_usize("skin")?;

    let children = entry.opt_index_array("children")?.unwrap_or_default();
    if let Some(&child) = children.iter().find(|&&c| c >= count) {
        return Err(GltfError::IndexOutOfRange {
            kind: "node",
            index: child,
            count,
        });
    }
    node.children_indices = children;

    let authored = match entry.opt_f32_array::<16>("matrix")? {
        Some(m) => Mat4::from_column_slice(&m),
        None => {
            let translation = entry.opt_f32_array::<3>("translation")?.unwrap_or([0.0; 3]);
            let rotation = entry
                .opt_f32_array::<4>("rotation")?
                .unwrap_or([0.0, 0.0, 0.0, 1.0]);
            let scale = entry.opt_f32_array::<3>("scale")?.unwrap_or([1.0; 3]);
            mat4_from_scale_rotation_translation(
                Vec3::from(scale),
                quat_from_array(rotation),
                Vec3::from(translation),
            )
        }
    };
    node.local_transform = conversion.matrix(&authored);

    Ok(node)
}

/// Second pass: assign `parent_index` from every children list.
fn link_parents(nodes: &mut [Node]) -> Result<(), GltfError> {
    for parent in 0..nodes.len() {
        for i in 0..nodes[parent].children_indices.len() {
            let child = nodes[parent].children_indices[i];
            if child == parent {
                return Err(GltfError::CyclicHierarchy { node: child });
            }
            if let Some(existing) = nodes[child].parent_index {
                return Err(GltfError::MultipleParents {
                    node: child,
                    parent,
                    existing,
                });
            }
            nodes[child].parent_index = Some(parent);
        }
    }

    // With single parents, a chain longer than the node count is a cycle.
    for start in 0..nodes.len() {
        let mut current = nodes[start].parent_index;
        let mut steps = 0;
        while let Some(index) = current {
            steps += 1;
            if steps > nodes.len() {
                return Err(GltfError::CyclicHierarchy { node: start });
            }
            current = nodes[index].parent_index;
        }
    }
    Ok(())
}
