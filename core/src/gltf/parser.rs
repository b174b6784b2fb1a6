//! The parser context: one document, its caches, and the backend.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::backend::{CpuBackend, ImportBackend};
use crate::config::ImportConfig;
use crate::math::{BasisConversion, Mat4};
use crate::scene::{Node, Scene, Skeleton};

use super::accessor::{decode_accessor, AccessorData};
use super::assembler;
use super::buffer::BufferStore;
use super::document::{Document, Table};
use super::error::GltfError;
use super::material::parse_material;
use super::nodes::NodeGraph;
use super::primitive::{load_primitives, Primitive};
use super::scene;
use super::skeleton::build_skeleton;

/// Decodes one glTF document on request.
///
/// Every load is memoized by index for the lifetime of the parser. The parser
/// is single-threaded; shard documents across parsers for parallel imports.
pub struct GltfParser<B: ImportBackend = CpuBackend> {
    document: Document,
    backend: B,
    config: ImportConfig,
    conversion: BasisConversion,
    buffers: BufferStore,
    nodes: Option<Arc<NodeGraph>>,
    materials: HashMap<usize, B::Material>,
    default_material: Option<B::Material>,
    static_meshes: HashMap<usize, B::StaticMesh>,
    skeletal_meshes: HashMap<(usize, usize, Option<usize>), B::SkeletalMesh>,
    skeletons: HashMap<usize, Arc<Skeleton>>,
}

impl<B: ImportBackend> GltfParser<B> {
    /// Parser over an already-tokenized document with the default
    /// configuration.
    pub fn new(value: serde_json::Value, backend: B) -> Result<Self, GltfError> {
        Self::from_value(value, backend, ImportConfig::default())
    }

    pub fn from_value(
        value: serde_json::Value,
        backend: B,
        config: ImportConfig,
    ) -> Result<Self, GltfError> {
        Self::with_document(Document::from_value(value)?, backend, config)
    }

    pub fn from_slice(bytes: &[u8], backend: B, config: ImportConfig) -> Result<Self, GltfError> {
        Self::with_document(Document::from_slice(bytes)?, backend, config)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str, backend: B, config: ImportConfig) -> Result<Self, GltfError> {
        Self::from_slice(json.as_bytes(), backend, config)
    }

    /// Read and parse a `.gltf` file. Buffers must still be embedded.
    pub fn from_file(
        path: impl AsRef<Path>,
        backend: B,
        config: ImportConfig,
    ) -> Result<Self, GltfError> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes, backend, config)
    }

    fn with_document(
        document: Document,
        backend: B,
        config: ImportConfig,
    ) -> Result<Self, GltfError> {
        if !config.scale.is_finite() || config.scale == 0.0 {
            return Err(GltfError::InvalidConfig("scale must be finite and non-zero"));
        }
        let conversion = config
            .conversion()
            .ok_or(GltfError::InvalidConfig("basis matrix is not invertible"))?;
        Ok(Self {
            document,
            backend,
            config,
            conversion,
            buffers: BufferStore::new(),
            nodes: None,
            materials: HashMap::new(),
            default_material: None,
            static_meshes: HashMap::new(),
            skeletal_meshes: HashMap::new(),
            skeletons: HashMap::new(),
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Decode accessor `index` into an owned byte copy.
    pub fn decode_accessor(&mut self, index: usize) -> Result<AccessorData, GltfError> {
        decode_accessor(&self.document, &mut self.buffers, index)
    }

    /// Build the node graph once; later calls return the cached table.
    pub fn load_all_nodes(&mut self) -> Result<Arc<NodeGraph>, GltfError> {
        if let Some(graph) = &self.nodes {
            return Ok(Arc::clone(graph));
        }
        let graph = Arc::new(NodeGraph::build(&self.document, &self.conversion)?);
        log::debug!("Built node graph with {} nodes", graph.len());
        self.nodes = Some(Arc::clone(&graph));
        Ok(graph)
    }

    pub fn load_node(&mut self, index: usize) -> Result<Node, GltfError> {
        Ok(self.load_all_nodes()?.node(index)?.clone())
    }

    /// First node named `name`.
    pub fn load_node_by_name(&mut self, name: &str) -> Result<Node, GltfError> {
        self.load_all_nodes()?
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| GltfError::NodeNotFound {
                name: name.to_string(),
            })
    }

    pub fn load_scene(&mut self, index: usize) -> Result<Scene, GltfError> {
        let graph = self.load_all_nodes()?;
        scene::load_scene(&self.document, &graph, index)
    }

    pub fn load_scenes(&mut self) -> Result<Vec<Scene>, GltfError> {
        let graph = self.load_all_nodes()?;
        scene::load_scenes(&self.document, &graph)
    }

    pub fn default_scene(&self) -> Result<Option<usize>, GltfError> {
        scene::default_scene(&self.document)
    }

    pub fn load_material(&mut self, index: usize) -> Result<B::Material, GltfError> {
        if let Some(material) = self.materials.get(&index) {
            return Ok(material.clone());
        }
        let description = parse_material(&self.document, index)?;
        let material = self.backend.create_material(index, &description)?;
        self.materials.insert(index, material.clone());
        Ok(material)
    }

    fn default_material(&mut self) -> Result<B::Material, GltfError> {
        if let Some(material) = &self.default_material {
            return Ok(material.clone());
        }
        let material = self.backend.default_material()?;
        self.default_material = Some(material.clone());
        Ok(material)
    }

    /// Decode the primitives of `mesh` and resolve their materials.
    fn mesh_primitives(
        &mut self,
        mesh: usize,
    ) -> Result<Vec<(Primitive, B::Material)>, GltfError> {
        let primitives =
            load_primitives(&self.document, &mut self.buffers, &self.conversion, mesh)?;
        primitives
            .into_iter()
            .map(|primitive| {
                let material = match primitive.material {
                    Some(index) => self.load_material(index)?,
                    None => self.default_material()?,
                };
                Ok((primitive, material))
            })
            .collect()
    }

    pub fn load_static_mesh(&mut self, mesh: usize) -> Result<B::StaticMesh, GltfError> {
        if let Some(handle) = self.static_meshes.get(&mesh) {
            return Ok(handle.clone());
        }
        let primitives = self.mesh_primitives(mesh)?;
        let data = assembler::assemble_static(mesh, primitives, &self.config);
        log::debug!(
            "Assembled static mesh {mesh}: {} sections, {} triangles",
            data.sections.len(),
            data.triangle_count()
        );
        let handle = self.backend.build_static_mesh(mesh, data)?;
        self.static_meshes.insert(mesh, handle.clone());
        Ok(handle)
    }

    /// Every mesh in document order; stops at the first failure.
    pub fn load_static_meshes(&mut self) -> Result<Vec<B::StaticMesh>, GltfError> {
        (0..self.document.len(Table::Meshes)?)
            .map(|mesh| self.load_static_mesh(mesh))
            .collect()
    }

    /// Skeleton of skin `skin`, built once.
    pub fn load_skeleton(&mut self, skin: usize) -> Result<Arc<Skeleton>, GltfError> {
        if let Some(skeleton) = self.skeletons.get(&skin) {
            return Ok(Arc::clone(skeleton));
        }
        let graph = self.load_all_nodes()?;
        let skeleton = Arc::new(build_skeleton(
            &self.document,
            &mut self.buffers,
            &graph,
            &self.conversion,
            skin,
        )?);
        log::debug!(
            "Built skeleton for skin {skin}: {} bones rooted at node {}",
            skeleton.bone_count(),
            skeleton.root_node
        );
        self.skeletons.insert(skin, Arc::clone(&skeleton));
        Ok(skeleton)
    }

    /// Skinned mesh `mesh` bound to skin `skin`.
    ///
    /// With an instancing `node`, the inverse of that node's world transform
    /// is reported as the mesh's root transform.
    pub fn load_skeletal_mesh(
        &mut self,
        mesh: usize,
        skin: usize,
        node: Option<usize>,
    ) -> Result<B::SkeletalMesh, GltfError> {
        let key = (mesh, skin, node);
        if let Some(handle) = self.skeletal_meshes.get(&key) {
            return Ok(handle.clone());
        }

        let skeleton = self.load_skeleton(skin)?;
        let root_transform = match node {
            Some(node) => self
                .load_all_nodes()?
                .world_transform(node)?
                .try_inverse()
                .ok_or(GltfError::SingularTransform { node })?,
            None => Mat4::identity(),
        };

        let primitives = self.mesh_primitives(mesh)?;
        let data = assembler::assemble_skeletal(
            mesh,
            skin,
            primitives,
            skeleton,
            root_transform,
            &self.config,
        )?;
        let handle = self.backend.build_skeletal_mesh(mesh, data)?;
        self.skeletal_meshes.insert(key, handle.clone());
        Ok(handle)
    }
}
