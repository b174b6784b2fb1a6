//! Scene resolution.

use crate::scene::Scene;

use super::document::{Document, Table};
use super::error::GltfError;
use super::nodes::NodeGraph;

/// Resolve scene `index` against the node graph.
pub fn load_scene(
    document: &Document,
    graph: &NodeGraph,
    index: usize,
) -> Result<Scene, GltfError> {
    let entry = document.entry(Table::Scenes, index)?;
    let name = entry
        .opt_str("name")?
        .map_or_else(|| index.to_string(), str::to_string);
    let root_node_indices = entry.opt_index_array("nodes")?.unwrap_or_default();
    for &root in &root_node_indices {
        graph.node(root)?;
    }
    Ok(Scene {
        index,
        name,
        root_node_indices,
    })
}

/// Resolve every scene in document order. Fails if the document declares no
/// `scenes` array.
pub fn load_scenes(document: &Document, graph: &NodeGraph) -> Result<Vec<Scene>, GltfError> {
    let root = document.root();
    if root.opt_array(Table::Scenes.key())?.is_none() {
        return Err(GltfError::MissingField {
            context: root.context().to_string(),
            field: "scenes",
        });
    }
    (0..document.len(Table::Scenes)?)
        .map(|index| load_scene(document, graph, index))
        .collect()
}

/// The document's `scene` field, if present.
pub fn default_scene(document: &Document) -> Result<Option<usize>, GltfError> {
    document.root().opt_usize("scene")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::BasisConversion;
    use serde_json::{json, Value};

    fn setup(value: Value) -> (Document, NodeGraph) {
        let document = Document::from_value(value).unwrap();
        let graph = NodeGraph::build(&document, &BasisConversion::identity()).unwrap();
        (document, graph)
    }

    #[test]
    fn resolves_roots_and_names() {
        let (document, graph) = setup(json!({
            "scene": 1,
            "scenes": [{ "name": "Main", "nodes": [0] }, { "nodes": [1, 2] }],
            "nodes": [{}, {}, {}]
        }));
        let scenes = load_scenes(&document, &graph).unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].name, "Main");
        assert_eq!(scenes[0].root_node_indices, vec![0]);
        assert_eq!(scenes[1].name, "1");
        assert_eq!(scenes[1].root_node_indices, vec![1, 2]);
        assert_eq!(default_scene(&document).unwrap(), Some(1));
    }

    #[test]
    fn node_out_of_range_fails() {
        let (document, graph) = setup(json!({
            "scenes": [{ "nodes": [3] }],
            "nodes": [{}]
        }));
        assert!(matches!(
            load_scene(&document, &graph, 0),
            Err(GltfError::IndexOutOfRange { kind: "node", index: 3, .. })
        ));
        assert!(matches!(
            load_scene(&document, &graph, 1),
            Err(GltfError::IndexOutOfRange { kind: "scene", index: 1, count: 1 })
        ));
    }

    #[test]
    fn missing_scenes_fails() {
        let (document, graph) = setup(json!({ "nodes": [] }));
        assert!(matches!(
            load_scenes(&document, &graph),
            Err(GltfError::MissingField { field: "scenes", .. })
        ));
        assert_eq!(default_scene(&document).unwrap(), None);
    }
}
