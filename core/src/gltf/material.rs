//! Material description decoding.

use super::document::{Document, Table};
use super::error::GltfError;
use super::types::GltfMaterial;

/// Read the PBR factors of material `index`. Absent factors take their glTF
/// defaults; present factors of the wrong type fail.
pub fn parse_material(document: &Document, index: usize) -> Result<GltfMaterial, GltfError> {
    let entry = document.entry(Table::Materials, index)?;
    let mut material = GltfMaterial {
        name: entry.opt_str("name")?.map(str::to_string),
        ..Default::default()
    };

    if let Some(pbr) = entry.opt_object("pbrMetallicRoughness")? {
        if let Some(color) = pbr.opt_f32_array::<4>("baseColorFactor")? {
            material.base_color_factor = color;
        }
        if let Some(metallic) = pbr.opt_f32("metallicFactor")? {
            material.metallic_factor = metallic;
        }
        if let Some(roughness) = pbr.opt_f32("roughnessFactor")? {
            material.roughness_factor = roughness;
        }
    }

    Ok(material)
}
