//! Data types produced by the glTF decoder.

/// PBR metallic-roughness factors of one glTF material.
///
/// Handed to [`ImportBackend::create_material`](crate::backend::ImportBackend::create_material)
/// so the host can map them onto its own material system.
#[derive(Debug, Clone, PartialEq)]
pub struct GltfMaterial {
    /// Material name from the glTF file.
    pub name: Option<String>,
    /// Base color factor (linear RGBA).
    pub base_color_factor: [f32; 4],
    /// Metallic factor.
    pub metallic_factor: f32,
    /// Roughness factor.
    pub roughness_factor: f32,
}

impl Default for GltfMaterial {
    fn default() -> Self {
        Self {
            name: None,
            base_color_factor: [1.0; 4],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
        }
    }
}
