//! Scenario tests over programmatically built documents.

use base64::Engine as _;
use serde_json::{json, Value};

use crate::backend::CpuBackend;
use crate::config::ImportConfig;
use crate::gltf::GltfParser;


pub(super) const F32: u32 = 5126;
pub(super) const U8: u32 = 5121;
pub(super) const U16: u32 = 5123;
pub(super) const U32: u32 = 5125;

pub(super) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a glTF document whose accessors live in one embedded buffer.
#[derive(Default)]
pub(super) struct DocumentBuilder {
    bytes: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    nodes: Vec<Value>,
    meshes: Vec<Value>,
    skins: Vec<Value>,
    materials: Vec<Value>,
    scenes: Vec<Value>,
    scene: Option<usize>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` as one tightly packed buffer view and an accessor with
    /// one element per item.
    pub fn accessor<T: bytemuck::Pod>(
        &mut self,
        data: &[T],
        component_type: u32,
        element_type: &str,
    ) -> usize {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        let raw: &[u8] = bytemuck::cast_slice(data);
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": self.bytes.len(),
            "byteLength": raw.len(),
        }));
        self.bytes.extend_from_slice(raw);
        self.accessors.push(json!({
            "bufferView": self.views.len() - 1,
            "componentType": component_type,
            "count": data.len(),
            "type": element_type,
        }));
        self.accessors.len() - 1
    }

    pub fn positions(&mut self, positions: &[[f32; 3]]) -> usize {
        self.accessor(positions, F32, "VEC3")
    }

    pub fn node(&mut self, node: Value) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn mesh(&mut self, primitives: Value) -> usize {
        self.meshes.push(json!({ "primitives": primitives }));
        self.meshes.len() - 1
    }

    pub fn skin(&mut self, skin: Value) -> usize {
        self.skins.push(skin);
        self.skins.len() - 1
    }

    pub fn material(&mut self, material: Value) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn scene(&mut self, scene: Value) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    pub fn default_scene(&mut self, scene: usize) {
        self.scene = Some(scene);
    }

    pub fn build(&self) -> Value {
        let uri = format!(
            "data:application/octet-stream;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        );
        let mut root = json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": self.bytes.len(), "uri": uri }],
            "bufferViews": self.views,
            "accessors": self.accessors,
            "nodes": self.nodes,
            "meshes": self.meshes,
            "skins": self.skins,
            "materials": self.materials,
        });
        if !self.scenes.is_empty() {
            root["scenes"] = json!(self.scenes);
        }
        if let Some(scene) = self.scene {
            root["scene"] = json!(scene);
        }
        root
    }

    /// Parser with identity basis and unit scale.
    pub fn parser(&self) -> GltfParser<CpuBackend> {
        self.parser_with(ImportConfig::identity())
    }

    pub fn parser_with(&self, config: ImportConfig) -> GltfParser<CpuBackend> {
        init_logger();
        GltfParser::from_value(self.build(), CpuBackend::new(), config).expect("valid config")
    }
}
