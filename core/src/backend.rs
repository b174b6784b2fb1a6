//! Material and mesh construction services.
//!
//! The decoder does not own final material or mesh objects. It hands decoded
//! factors and geometry to an [`ImportBackend`], which returns opaque handles
//! that the parser caches and gives back to callers.

use std::sync::Arc;

use crate::gltf::GltfMaterial;
use crate::material::{CpuMaterial, MaterialSemantic, MaterialValue};
use crate::mesh::{SkeletalMeshData, StaticMeshData};

/// Failure reported by an [`ImportBackend`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The mesh has no sections to build.
    #[error("mesh {mesh} has no sections")]
    EmptyMesh {
        /// Mesh index in the source document.
        mesh: usize,
    },
    /// The backend refused the request.
    #[error("{0}")]
    Rejected(String),
}

/// Builds host objects from decoded data.
pub trait ImportBackend {
    /// Material handle.
    type Material: Clone;
    /// Rigid mesh handle.
    type StaticMesh: Clone;
    /// Skinned mesh handle.
    type SkeletalMesh: Clone;

    /// Instantiate material `index` from its PBR factors.
    fn create_material(
        &mut self,
        index: usize,
        material: &GltfMaterial,
    ) -> Result<Self::Material, BackendError>;

    /// Placeholder material for primitives that reference none.
    fn default_material(&mut self) -> Result<Self::Material, BackendError>;

    fn build_static_mesh(
        &mut self,
        mesh: usize,
        data: StaticMeshData<Self::Material>,
    ) -> Result<Self::StaticMesh, BackendError>;

    fn build_skeletal_mesh(
        &mut self,
        mesh: usize,
        data: SkeletalMeshData<Self::Material>,
    ) -> Result<Self::SkeletalMesh, BackendError>;
}

/// Backend that keeps the decoded data on the CPU behind `Arc` handles.
#[derive(Debug, Default)]
pub struct CpuBackend {
    default_material: Option<Arc<CpuMaterial>>,
    materials_created: usize,
    meshes_built: usize,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materials created so far, the default material excluded.
    pub fn materials_created(&self) -> usize {
        self.materials_created
    }

    /// Static and skeletal meshes built so far.
    pub fn meshes_built(&self) -> usize {
        self.meshes_built
    }
}

/// Map PBR factors onto material properties.
pub fn pbr_material(material: &GltfMaterial) -> CpuMaterial {
    CpuMaterial::new(material.name.clone())
        .with(
            MaterialSemantic::BaseColorFactor,
            MaterialValue::Vec4(material.base_color_factor),
        )
        .with(
            MaterialSemantic::MetallicFactor,
            MaterialValue::Float(material.metallic_factor),
        )
        .with(
            MaterialSemantic::RoughnessFactor,
            MaterialValue::Float(material.roughness_factor),
        )
}

impl ImportBackend for CpuBackend {
    type Material = Arc<CpuMaterial>;
    type StaticMesh = Arc<StaticMeshData<Arc<CpuMaterial>>>;
    type SkeletalMesh = Arc<SkeletalMeshData<Arc<CpuMaterial>>>;

    fn create_material(
        &mut self,
        _index: usize,
        material: &GltfMaterial,
    ) -> Result<Self::Material, BackendError> {
        self.materials_created += 1;
        Ok(Arc::new(pbr_material(material)))
    }

    fn default_material(&mut self) -> Result<Self::Material, BackendError> {
        let material = self.default_material.get_or_insert_with(|| {
            Arc::new(CpuMaterial::new(Some("DefaultSurface".to_string())))
        });
        Ok(Arc::clone(material))
    }

    fn build_static_mesh(
        &mut self,
        mesh: usize,
        data: StaticMeshData<Self::Material>,
    ) -> Result<Self::StaticMesh, BackendError> {
        if data.sections.is_empty() {
            return Err(BackendError::EmptyMesh { mesh });
        }
        self.meshes_built += 1;
        Ok(Arc::new(data))
    }

    fn build_skeletal_mesh(
        &mut self,
        mesh: usize,
        data: SkeletalMeshData<Self::Material>,
    ) -> Result<Self::SkeletalMesh, BackendError> {
        if data.sections.is_empty() {
            return Err(BackendError::EmptyMesh { mesh });
        }
        self.meshes_built += 1;
        Ok(Arc::new(data))
    }
}
