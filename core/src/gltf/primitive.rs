//! Primitive attribute and index stream decoding.

use std::collections::HashMap;

use crate::math::{BasisConversion, Vec2, Vec3};

use super::accessor::{decode_accessor, AccessorData, ComponentType, ElementType};
use super::buffer::BufferStore;
use super::document::{Document, Entry, Table};
use super::error::GltfError;

/// glTF `mode` value for triangle lists.
const TRIANGLES: i64 = 4;

const FLOAT: &[ComponentType] = &[ComponentType::F32];
const FLOAT_OR_UNORM: &[ComponentType] =
    &[ComponentType::F32, ComponentType::U8, ComponentType::U16];
const JOINT_INDEX: &[ComponentType] = &[ComponentType::U8, ComponentType::U16];
const VERTEX_INDEX: &[ComponentType] =
    &[ComponentType::U8, ComponentType::U16, ComponentType::U32];

/// Decoded vertex streams of one primitive, already converted to engine
/// space. Every per-vertex array is parallel to `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    /// Either empty or one normal per position.
    pub normals: Vec<Vec3>,
    pub uv_sets: Vec<Vec<Vec2>>,
    pub joint_sets: Vec<Vec<[u16; 4]>>,
    pub weight_sets: Vec<Vec<[f32; 4]>>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

impl Primitive {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_skinned(&self) -> bool {
        !self.joint_sets.is_empty()
    }
}

/// Decode every primitive of mesh `mesh`.
pub fn load_primitives(
    document: &Document,
    buffers: &mut BufferStore,
    conversion: &BasisConversion,
    mesh: usize,
) -> Result<Vec<Primitive>, GltfError> {
    let entry = document.entry(Table::Meshes, mesh)?;
    entry
        .objects("primitives", "primitive")?
        .iter()
        .enumerate()
        .map(|(primitive, entry)| {
            load_primitive(document, buffers, conversion, mesh, primitive, entry)
        })
        .collect()
}

/// Decode one primitive.
pub fn load_primitive<'d>(
    document: &'d Document,
    buffers: &mut BufferStore,
    conversion: &BasisConversion,
    mesh: usize,
    primitive: usize,
    entry: &Entry<'d>,
) -> Result<Primitive, GltfError> {
    if let Some(mode) = entry.opt_i64("mode")? {
        if mode != TRIANGLES {
            return Err(GltfError::UnsupportedTopology {
                mesh,
                primitive,
                mode,
            });
        }
    }

    let attributes = entry.opt_index_map("attributes")?.unwrap_or_default();
    let mut reader = AttributeReader {
        document,
        buffers,
        attributes,
        mesh,
        primitive,
    };

    let positions = reader
        .floats("POSITION", ElementType::Vec3, FLOAT, |p: [f32; 3]| {
            conversion.point(&Vec3::from(p))
        })?
        .ok_or(GltfError::MissingPositions { mesh, primitive })?;
    let vertex_count = positions.len();

    let mut normals = reader
        .floats("NORMAL", ElementType::Vec3, FLOAT, |n: [f32; 3]| {
            conversion.direction(&Vec3::from(n))
        })?
        .unwrap_or_default();
    if !normals.is_empty() && normals.len() != vertex_count {
        log::warn!(
            "mesh {mesh} primitive {primitive}: {} normals for {vertex_count} vertices, padding with zeros",
            normals.len()
        );
        normals.resize(vertex_count, Vec3::zeros());
    }

    let mut uv_sets = Vec::new();
    for set in 0.. {
        let semantic = format!("TEXCOORD_{set}");
        let uvs = reader.floats(
            &semantic,
            ElementType::Vec2,
            FLOAT_OR_UNORM,
            |[u, v]: [f32; 2]| Vec2::new(u, 1.0 - v),
        )?;
        let Some(uvs) = uvs else {
            break;
        };
        reader.check_count(&semantic, uvs.len(), vertex_count)?;
        uv_sets.push(uvs);
    }

    let mut joint_sets = Vec::new();
    let mut weight_sets = Vec::new();
    for set in 0.. {
        let semantic = format!("JOINTS_{set}");
        let Some(joints) = reader.joints(&semantic)? else {
            break;
        };
        reader.check_count(&semantic, joints.len(), vertex_count)?;

        let semantic = format!("WEIGHTS_{set}");
        let weights = reader
            .floats(&semantic, ElementType::Vec4, FLOAT_OR_UNORM, |w: [f32; 4]| w)?
            .ok_or(GltfError::MissingWeights {
                mesh,
                primitive,
                set,
            })?;
        reader.check_count(&semantic, weights.len(), vertex_count)?;

        joint_sets.push(joints);
        weight_sets.push(weights);
    }

    let indices = match entry.opt_usize("indices")? {
        Some(accessor) => reader.indices(accessor, vertex_count)?,
        None => (0..vertex_count as u32).collect(),
    };

    Ok(Primitive {
        positions,
        normals,
        uv_sets,
        joint_sets,
        weight_sets,
        indices,
        material: entry.opt_usize("material")?,
    })
}

struct AttributeReader<'d, 'b> {
    document: &'d Document,
    buffers: &'b mut BufferStore,
    attributes: HashMap<&'d str, usize>,
    mesh: usize,
    primitive: usize,
}

impl AttributeReader<'_, '_> {
    fn usage(&self, semantic: &str) -> String {
        format!("mesh {} primitive {} {semantic}", self.mesh, self.primitive)
    }

    /// Decode accessor `index` and check it has one of the accepted formats.
    fn decode(
        &mut self,
        semantic: &str,
        index: usize,
        element_type: ElementType,
        formats: &[ComponentType],
    ) -> Result<AccessorData, GltfError> {
        let data = decode_accessor(self.document, self.buffers, index)?;
        if !data.is(element_type, formats) {
            return Err(GltfError::UnsupportedFormat {
                usage: self.usage(semantic),
                element_type: data.element_type.name(),
                component_type: data.component_type.name(),
            });
        }
        Ok(data)
    }

    /// Read a float attribute through `transform`, or `None` if absent.
    fn floats<T, F, const N: usize>(
        &mut self,
        semantic: &str,
        element_type: ElementType,
        formats: &[ComponentType],
        transform: F,
    ) -> Result<Option<Vec<T>>, GltfError>
    where
        F: Fn([f32; N]) -> T,
    {
        let Some(&index) = self.attributes.get(semantic) else {
            return Ok(None);
        };
        let data = self.decode(semantic, index, element_type, formats)?;
        Ok(Some(data.read_normalized::<N>().into_iter().map(transform).collect()))
    }

    fn joints(&mut self, semantic: &str) -> Result<Option<Vec<[u16; 4]>>, GltfError> {
        let Some(&index) = self.attributes.get(semantic) else {
            return Ok(None);
        };
        let data = self.decode(semantic, index, ElementType::Vec4, JOINT_INDEX)?;
        Ok(Some(
            data.read_uints::<4>()
                .into_iter()
                .map(|j| j.map(|c| c as u16))
                .collect(),
        ))
    }

    fn indices(&mut self, accessor: usize, vertex_count: usize) -> Result<Vec<u32>, GltfError> {
        let data = self.decode("indices", accessor, ElementType::Scalar, VERTEX_INDEX)?;
        let indices: Vec<u32> = data.read_uints::<1>().into_iter().map(|[i]| i).collect();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GltfError::VertexIndexOutOfRange {
                mesh: self.mesh,
                primitive: self.primitive,
                index,
                count: vertex_count,
            });
        }
        Ok(indices)
    }

    fn check_count(&self, semantic: &str, actual: usize, expected: usize) -> Result<(), GltfError> {
        if actual == expected {
            return Ok(());
        }
        Err(GltfError::AttributeCountMismatch {
            mesh: self.mesh,
            primitive: self.primitive,
            attribute: semantic.to_string(),
            expected,
            actual,
        })
    }
}
