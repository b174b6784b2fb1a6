//! Skeleton construction from a skin.
//!
//! The bone hierarchy is rooted at the lowest common ancestor of the skin's
//! joints and covers every node below it, joints or not. Bind transforms
//! come from the inverse bind matrices where a node has one and from the
//! node's own local transform otherwise.

use std::collections::HashMap;

use crate::math::{BasisConversion, Mat4};
use crate::scene::{BoneEntry, Skeleton};

use super::accessor::{decode_accessor, ComponentType, ElementType};
use super::buffer::BufferStore;
use super::document::{Document, Table};
use super::error::GltfError;
use super::nodes::NodeGraph;

/// Build the skeleton of skin `skin`.
pub fn build_skeleton(
    document: &Document,
    buffers: &mut BufferStore,
    graph: &NodeGraph,
    conversion: &BasisConversion,
    skin: usize,
) -> Result<Skeleton, GltfError> {
    let entry = document.entry(Table::Skins, skin)?;
    let joints = entry
        .opt_index_array("joints")?
        .ok_or_else(|| GltfError::MissingField {
            context: entry.context().to_string(),
            field: "joints",
        })?;
    if joints.is_empty() {
        return Err(GltfError::EmptyJointSet { skin });
    }
    for &joint in &joints {
        graph.node(joint)?;
    }

    let root = graph
        .find_common_root(&joints)
        .ok_or(GltfError::NoCommonRoot { skin })?;

    let inverse_binds = match entry.opt_usize("inverseBindMatrices")? {
        Some(accessor) => read_inverse_binds(document, buffers, accessor, skin, &joints)?,
        None => HashMap::new(),
    };

    let joint_slots: HashMap<usize, usize> = joints
        .iter()
        .enumerate()
        .rev()
        .map(|(slot, &node)| (node, slot))
        .collect();

    let mut skeleton = Skeleton::new(root);
    let mut stack: Vec<(usize, Option<usize>)> = vec![(root, None)];
    while let Some((index, parent_bone)) = stack.pop() {
        let node = graph.node(index)?;

        let bind_transform = match inverse_binds.get(&index) {
            Some(inverse_bind) => {
                let bind = inverse_bind
                    .try_inverse()
                    .ok_or(GltfError::SingularBindMatrix { skin, node: index })?;
                let parent_bind = node.parent_index.and_then(|p| inverse_binds.get(&p));
                let local = match parent_bind {
                    Some(parent_inverse_bind) if index != root => parent_inverse_bind * bind,
                    _ => {
                        if index != root {
                            log::warn!(
                                "skin {skin}: bone node {index} has an inverse bind matrix but its parent is not a joint"
                            );
                        }
                        bind
                    }
                };
                log::debug!("skin {skin}: node {index} bound from inverse bind matrix");
                conversion.matrix(&local)
            }
            None => node.local_transform,
        };

        let name = skeleton.unique_bone_name(&node.name);
        if let Some(&slot) = joint_slots.get(&index) {
            skeleton.joint_to_bone.insert(slot, name.clone());
        }
        let bone = skeleton.add_bone(BoneEntry {
            name,
            node_index: index,
            parent: parent_bone,
            bind_transform,
        });

        for &child in node.children_indices.iter().rev() {
            stack.push((child, Some(bone)));
        }
    }

    Ok(skeleton)
}

/// Inverse bind matrices keyed by joint node.
fn read_inverse_binds(
    document: &Document,
    buffers: &mut BufferStore,
    accessor: usize,
    skin: usize,
    joints: &[usize],
) -> Result<HashMap<usize, Mat4>, GltfError> {
    let data = decode_accessor(document, buffers, accessor)?;
    if data.component_type != ComponentType::F32 || data.arity != ElementType::Mat4.arity() {
        return Err(GltfError::UnsupportedFormat {
            usage: format!("skin {skin} inverseBindMatrices"),
            element_type: data.element_type.name(),
            component_type: data.component_type.name(),
        });
    }
    if data.count != joints.len() {
        log::warn!(
            "skin {skin}: {} inverse bind matrices for {} joints",
            data.count,
            joints.len()
        );
    }

    Ok(joints
        .iter()
        .zip(data.read_normalized::<16>())
        .map(|(&node, m)| (node, Mat4::from_column_slice(&m)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn build(value: Value, skin: usize) -> Result<Skeleton, GltfError> {
        let document = Document::from_value(value).unwrap();
        let conversion = BasisConversion::identity();
        let graph = NodeGraph::build(&document, &conversion).unwrap();
        build_skeleton(&document, &mut BufferStore::new(), &graph, &conversion, skin)
    }

    #[test]
    fn duplicate_names_get_underscores() {
        let skeleton = build(
            json!({
                "nodes": [
                    { "name": "Root", "children": [1, 2] },
                    { "name": "Bone" },
                    { "name": "Bone" }
                ],
                "skins": [{ "joints": [1, 2] }]
            }),
            0,
        )
        .unwrap();

        let names: Vec<&str> = skeleton.bones.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Bone", "Bone_"]);
        assert_eq!(skeleton.joint_to_bone[&0], "Bone");
        assert_eq!(skeleton.joint_to_bone[&1], "Bone_");
        assert_eq!(skeleton.root_node, 0);
    }

    #[test]
    fn preorder_with_parent_links() {
        let skeleton = build(
            json!({
                "nodes": [
                    { "name": "A", "children": [1, 3] },
                    { "name": "B", "children": [2] },
                    { "name": "C" },
                    { "name": "D" },
                    { "name": "Mesh" }
                ],
                "skins": [{ "joints": [2, 3] }]
            }),
            0,
        )
        .unwrap();

        let names: Vec<&str> = skeleton.bones.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        let parents: Vec<Option<usize>> = skeleton.bones.iter().map(|b| b.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(0)]);
        assert_eq!(skeleton.bone_for_joint(0), Some(2));
        assert_eq!(skeleton.bone_for_joint(1), Some(3));
        assert_eq!(skeleton.bone_for_joint(2), None);
    }

    #[test]
    fn joint_subtree_root() {
        let skeleton = build(
            json!({
                "nodes": [
                    { "children": [1, 3] },
                    { "name": "Hips", "children": [2] },
                    { "name": "Spine" },
                    { "name": "Body" }
                ],
                "skins": [{ "joints": [2, 1] }]
            }),
            0,
        )
        .unwrap();
        assert_eq!(skeleton.root_node, 1);
        assert_eq!(skeleton.bone_count(), 2);
        assert_eq!(skeleton.joint_to_bone[&0], "Spine");
        assert_eq!(skeleton.joint_to_bone[&1], "Hips");
    }

    #[test]
    fn empty_joints_fail() {
        let err = build(json!({ "nodes": [{}], "skins": [{ "joints": [] }] }), 0).unwrap_err();
        assert!(matches!(err, GltfError::EmptyJointSet { skin: 0 }));
        assert_eq!(err.class(), crate::gltf::ErrorClass::Semantic);
    }

    #[test]
    fn disjoint_joints_fail() {
        assert!(matches!(
            build(json!({ "nodes": [{}, {}], "skins": [{ "joints": [0, 1] }] }), 0),
            Err(GltfError::NoCommonRoot { skin: 0 })
        ));
    }

    #[test]
    fn joint_out_of_range_fails() {
        assert!(matches!(
            build(json!({ "nodes": [{}], "skins": [{ "joints": [4] }] }), 0),
            Err(GltfError::IndexOutOfRange { kind: "node", index: 4, .. })
        ));
        assert!(matches!(
            build(json!({ "nodes": [{}], "skins": [] }), 0),
            Err(GltfError::IndexOutOfRange { kind: "skin", .. })
        ));
    }

    #[test]
    fn nodes_without_bind_matrices_use_local_transform() {
        let skeleton = build(
            json!({
                "nodes": [
                    { "children": [1] },
                    { "translation": [0, 3, 0] }
                ],
                "skins": [{ "joints": [0, 1] }]
            }),
            0,
        )
        .unwrap();
        assert_eq!(skeleton.bones[1].bind_transform[(1, 3)], 3.0);
    }
}
