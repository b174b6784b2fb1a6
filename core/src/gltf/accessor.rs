//! Accessor and buffer view decoding.
//!
//! An accessor describes `count` elements of `arity` components each, read
//! from a buffer view at a fixed stride. [`decode_accessor`] copies exactly
//! the bytes the accessor covers; the typed readers on [`AccessorData`] then
//! interpret them as little-endian components.

use super::buffer::BufferStore;
use super::document::{Document, Table};
use super::error::GltfError;

/// Numeric encoding of a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            5120 => Self::I8,
            5121 => Self::U8,
            5122 => Self::I16,
            5123 => Self::U16,
            5125 => Self::U32,
            5126 => Self::F32,
            _ => return None,
        })
    }

    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::F32 => "f32",
        }
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "SCALAR" => Self::Scalar,
            "VEC2" => Self::Vec2,
            "VEC3" => Self::Vec3,
            "VEC4" => Self::Vec4,
            "MAT2" => Self::Mat2,
            "MAT3" => Self::Mat3,
            "MAT4" => Self::Mat4,
            _ => return None,
        })
    }

    /// Number of components per element.
    pub fn arity(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }
}

/// A decoded accessor: an owned copy of the strided bytes it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorData {
    pub component_type: ComponentType,
    pub element_type: ElementType,
    pub normalized: bool,
    /// Distance in bytes between consecutive elements.
    pub stride: usize,
    /// Components per element.
    pub arity: usize,
    /// Bytes per component.
    pub element_size: usize,
    pub count: usize,
    /// Element `i` starts at `i * stride`.
    pub bytes: Vec<u8>,
}

impl AccessorData {
    /// Whether this accessor has one of the given formats.
    pub fn is(&self, element_type: ElementType, components: &[ComponentType]) -> bool {
        self.element_type == element_type && components.contains(&self.component_type)
    }

    fn element(&self, i: usize) -> &[u8] {
        let start = i * self.stride;
        &self.bytes[start..start + self.element_size * self.arity]
    }

    fn component<'a>(&self, element: &'a [u8], c: usize) -> &'a [u8] {
        &element[c * self.element_size..(c + 1) * self.element_size]
    }

    /// Read every element as `N` floats. Integer components are normalized
    /// to `[0, 1]` (unsigned) or `[-1, 1]` (signed).
    ///
    /// Reads at most `arity` components per element; missing ones are zero.
    pub fn read_normalized<const N: usize>(&self) -> Vec<[f32; N]> {
        let n = N.min(self.arity);
        (0..self.count)
            .map(|i| {
                let element = self.element(i);
                let mut out = [0.0f32; N];
                for (c, slot) in out.iter_mut().enumerate().take(n) {
                    *slot = normalized(self.component_type, self.component(element, c));
                }
                out
            })
            .collect()
    }

    /// Read every element as `N` unsigned integers. Float and signed
    /// components are not meaningful here; callers check the format first.
    pub fn read_uints<const N: usize>(&self) -> Vec<[u32; N]> {
        let n = N.min(self.arity);
        (0..self.count)
            .map(|i| {
                let element = self.element(i);
                let mut out = [0u32; N];
                for (c, slot) in out.iter_mut().enumerate().take(n) {
                    *slot = unsigned(self.component_type, self.component(element, c));
                }
                out
            })
            .collect()
    }
}

fn normalized(ty: ComponentType, b: &[u8]) -> f32 {
    match ty {
        ComponentType::F32 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        ComponentType::U8 => b[0] as f32 / 255.0,
        ComponentType::U16 => u16::from_le_bytes([b[0], b[1]]) as f32 / 65535.0,
        ComponentType::U32 => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32 / u32::MAX as f32,
        ComponentType::I8 => (i8::from_le_bytes([b[0]]) as f32 / 127.0).max(-1.0),
        ComponentType::I16 => (i16::from_le_bytes([b[0], b[1]]) as f32 / 32767.0).max(-1.0),
    }
}

fn unsigned(ty: ComponentType, b: &[u8]) -> u32 {
    match ty {
        ComponentType::U8 | ComponentType::I8 => b[0] as u32,
        ComponentType::U16 | ComponentType::I16 => u16::from_le_bytes([b[0], b[1]]) as u32,
        ComponentType::U32 | ComponentType::F32 => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
    }
}

fn out_of_bounds(context: &str, start: usize, end: usize, available: usize) -> GltfError {
    GltfError::OutOfBounds {
        context: context.to_string(),
        start,
        end,
        available,
    }
}

/// Largest zero-filled accessor, matching the 32-bit byte lengths of
/// binary glTF buffers.
pub const MAX_ZERO_FILL_BYTES: usize = u32::MAX as usize;

/// Decode accessor `index`.
///
/// Without a buffer view the result is zero-filled. Otherwise the accessor
/// window `[byteOffset, byteOffset + stride * (count - 1) + element bytes)`
/// must lie inside the buffer view, and the view inside its buffer.
pub fn decode_accessor(
    document: &Document,
    buffers: &mut BufferStore,
    index: usize,
) -> Result<AccessorData, GltfError> {
    let accessor = document.entry(Table::Accessors, index)?;

    let code = accessor.i64("componentType")?;
    let component_type =
        ComponentType::from_code(code).ok_or(GltfError::UnknownComponentType {
            accessor: index,
            code,
        })?;
    let type_name = accessor.str("type")?;
    let element_type = ElementType::from_name(type_name).ok_or_else(|| {
        GltfError::UnknownElementType {
            accessor: index,
            name: type_name.to_string(),
        }
    })?;
    let count = accessor.usize("count")?;
    let normalized = accessor.opt_bool("normalized")?.unwrap_or(false);

    let element_size = component_type.size();
    let arity = element_type.arity();
    let packed = element_size * arity;

    let Some(view_index) = accessor.opt_usize("bufferView")? else {
        let len = packed
            .checked_mul(count)
            .filter(|len| *len <= MAX_ZERO_FILL_BYTES)
            .ok_or_else(|| {
                out_of_bounds(
                    accessor.context(),
                    0,
                    packed.saturating_mul(count),
                    MAX_ZERO_FILL_BYTES,
                )
            })?;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| out_of_bounds(accessor.context(), 0, len, 0))?;
        bytes.resize(len, 0);
        return Ok(AccessorData {
            component_type,
            element_type,
            normalized,
            stride: packed,
            arity,
            element_size,
            count,
            bytes,
        });
    };

    let view = document.entry(Table::BufferViews, view_index)?;
    let buffer = buffers.get(document, view.usize("buffer")?)?;
    let view_offset = view.opt_usize("byteOffset")?.unwrap_or(0);
    let view_length = view.usize("byteLength")?;
    let view_end = view_offset
        .checked_add(view_length)
        .filter(|end| *end <= buffer.len())
        .ok_or_else(|| {
            out_of_bounds(
                view.context(),
                view_offset,
                view_offset.saturating_add(view_length),
                buffer.len(),
            )
        })?;
    let view_bytes = &buffer[view_offset..view_end];

    // A zero stride means tightly packed.
    let stride = view
        .opt_usize("byteStride")?
        .filter(|&stride| stride != 0)
        .unwrap_or(packed);
    if stride < packed {
        return Err(GltfError::InvalidStride {
            view: view_index,
            stride,
            element: packed,
        });
    }
    let start = accessor.opt_usize("byteOffset")?.unwrap_or(0);
    let span = match count {
        0 => Some(0),
        _ => stride
            .checked_mul(count - 1)
            .and_then(|s| s.checked_add(packed)),
    };
    let end = span
        .and_then(|span| start.checked_add(span))
        .filter(|end| *end <= view_bytes.len())
        .ok_or_else(|| {
            out_of_bounds(
                accessor.context(),
                start,
                span.map_or(usize::MAX, |s| start.saturating_add(s)),
                view_bytes.len(),
            )
        })?;

    Ok(AccessorData {
        component_type,
        element_type,
        normalized,
        stride,
        arity,
        element_size,
        count,
        bytes: view_bytes[start..end].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn data_uri(bytes: &[u8]) -> String {
        format!(
            "data:application/octet-stream;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    fn document(bytes: &[u8], view: Value, accessor: Value) -> Document {
        Document::from_value(json!({
            "buffers": [{ "byteLength": bytes.len(), "uri": data_uri(bytes) }],
            "bufferViews": [view],
            "accessors": [accessor],
        }))
        .unwrap()
    }

    #[rstest]
    #[case::i8(5120, 1)]
    #[case::u8(5121, 1)]
    #[case::i16(5122, 2)]
    #[case::u16(5123, 2)]
    #[case::u32(5125, 4)]
    #[case::f32(5126, 4)]
    fn component_sizes(#[case] code: i64, #[case] size: usize) {
        assert_eq!(ComponentType::from_code(code).unwrap().size(), size);
    }

    #[rstest]
    #[case::scalar("SCALAR", 1)]
    #[case::vec2("VEC2", 2)]
    #[case::vec3("VEC3", 3)]
    #[case::vec4("VEC4", 4)]
    #[case::mat2("MAT2", 4)]
    #[case::mat3("MAT3", 9)]
    #[case::mat4("MAT4", 16)]
    fn element_arities(#[case] name: &str, #[case] arity: usize) {
        assert_eq!(ElementType::from_name(name).unwrap().arity(), arity);
    }

    #[test]
    fn unknown_codes_fail() {
        let doc = document(
            &[0; 4],
            json!({ "buffer": 0, "byteLength": 4 }),
            json!({ "bufferView": 0, "componentType": 5124, "count": 1, "type": "SCALAR" }),
        );
        assert!(matches!(
            decode_accessor(&doc, &mut BufferStore::new(), 0),
            Err(GltfError::UnknownComponentType { accessor: 0, code: 5124 })
        ));

        let doc = document(
            &[0; 4],
            json!({ "buffer": 0, "byteLength": 4 }),
            json!({ "bufferView": 0, "componentType": 5126, "count": 1, "type": "VEC5" }),
        );
        assert!(matches!(
            decode_accessor(&doc, &mut BufferStore::new(), 0),
            Err(GltfError::UnknownElementType { .. })
        ));
    }

    #[test]
    fn vec3_floats_tightly_packed() {
        let floats: Vec<f32> = (0..9).map(|i| i as f32 * 0.5).collect();
        let bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_le_bytes()).collect();
        let doc = document(
            &bytes,
            json!({ "buffer": 0, "byteLength": 36 }),
            json!({ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" }),
        );
        let data = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap();
        assert_eq!(data.stride, 12);
        assert_eq!(data.bytes.len(), 36);
        let vectors = data.read_normalized::<3>();
        assert_eq!(vectors.len(), 3);
        for (i, v) in vectors.iter().enumerate() {
            assert_eq!(v, &[floats[3 * i], floats[3 * i + 1], floats[3 * i + 2]]);
        }
    }

    #[test]
    fn interleaved_stride_and_offsets() {
        // Two vertices of [pos.x, pos.y, uv.u, uv.v], read the uv half.
        let floats = [1.0f32, 2.0, 0.25, 0.75, 3.0, 4.0, 0.5, 1.0];
        let mut bytes = vec![0u8; 4];
        bytes.extend(floats.iter().flat_map(|f| f.to_le_bytes()));
        let doc = document(
            &bytes,
            json!({ "buffer": 0, "byteOffset": 4, "byteLength": 32, "byteStride": 16 }),
            json!({ "bufferView": 0, "byteOffset": 8, "componentType": 5126, "count": 2, "type": "VEC2" }),
        );
        let data = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap();
        assert_eq!(data.stride, 16);
        assert_eq!(data.bytes.len(), 24);
        assert_eq!(data.read_normalized::<2>(), vec![[0.25, 0.75], [0.5, 1.0]]);
    }

    #[test]
    fn u8_indices() {
        let doc = document(
            &[0, 1, 2, 0],
            json!({ "buffer": 0, "byteLength": 4 }),
            json!({ "bufferView": 0, "componentType": 5121, "count": 3, "type": "SCALAR" }),
        );
        let data = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap();
        assert_eq!(data.read_uints::<1>(), vec![[0], [1], [2]]);
    }

    #[test]
    fn u16_window_is_count_times_two() {
        let bytes: Vec<u8> = [0u16, 1, 2, 0xFFFF]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let doc = document(
            &bytes,
            json!({ "buffer": 0, "byteLength": 8 }),
            json!({ "bufferView": 0, "componentType": 5123, "count": 3, "type": "SCALAR" }),
        );
        let data = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap();
        assert_eq!(data.bytes.len(), 6);
        assert_eq!(data.read_uints::<1>(), vec![[0], [1], [2]]);
    }

    #[test]
    fn window_past_view_fails() {
        let doc = document(
            &[0; 16],
            json!({ "buffer": 0, "byteLength": 8 }),
            json!({ "bufferView": 0, "componentType": 5126, "count": 3, "type": "SCALAR" }),
        );
        let err = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap_err();
        assert!(matches!(
            err,
            GltfError::OutOfBounds { start: 0, end: 12, available: 8, .. }
        ));
    }

    #[test]
    fn view_past_buffer_fails() {
        let doc = document(
            &[0; 8],
            json!({ "buffer": 0, "byteOffset": 4, "byteLength": 8 }),
            json!({ "bufferView": 0, "componentType": 5121, "count": 1, "type": "SCALAR" }),
        );
        assert!(matches!(
            decode_accessor(&doc, &mut BufferStore::new(), 0),
            Err(GltfError::OutOfBounds { start: 4, end: 12, available: 8, .. })
        ));
    }

    #[test]
    fn no_view_is_zero_filled() {
        let doc = Document::from_value(json!({
            "accessors": [{ "componentType": 5123, "count": 5, "type": "VEC2" }]
        }))
        .unwrap();
        let data = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap();
        assert_eq!(data.stride, 4);
        assert_eq!(data.bytes, vec![0; 20]);
        assert!(data.read_uints::<2>().iter().all(|e| *e == [0, 0]));
    }

    #[test]
    fn zero_stride_is_tightly_packed() {
        let floats = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_le_bytes()).collect();
        let doc = document(
            &bytes,
            json!({ "buffer": 0, "byteLength": 36, "byteStride": 0 }),
            json!({ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" }),
        );
        let data = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap();
        assert_eq!(data.stride, 12);
        assert_eq!(
            data.read_normalized::<3>(),
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn stride_shorter_than_element_fails() {
        let doc = document(
            &[0; 36],
            json!({ "buffer": 0, "byteLength": 36, "byteStride": 8 }),
            json!({ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" }),
        );
        let err = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap_err();
        assert!(matches!(
            err,
            GltfError::InvalidStride { view: 0, stride: 8, element: 12 }
        ));
        assert_eq!(err.class(), crate::gltf::ErrorClass::Structural);
    }

    #[test]
    fn huge_zero_filled_accessor_fails() {
        let doc = Document::from_value(json!({
            "accessors": [{ "componentType": 5126, "count": 1_000_000_000_000u64, "type": "MAT4" }]
        }))
        .unwrap();
        assert!(matches!(
            decode_accessor(&doc, &mut BufferStore::new(), 0),
            Err(GltfError::OutOfBounds { start: 0, available: MAX_ZERO_FILL_BYTES, .. })
        ));
    }

    #[test]
    fn normalized_integers() {
        let doc = document(
            &[0, 255, 0, 0],
            json!({ "buffer": 0, "byteLength": 4 }),
            json!({ "bufferView": 0, "componentType": 5121, "normalized": true, "count": 2, "type": "VEC2" }),
        );
        let data = decode_accessor(&doc, &mut BufferStore::new(), 0).unwrap();
        assert!(data.normalized);
        assert_eq!(data.read_normalized::<2>(), vec![[0.0, 1.0], [0.0, 0.0]]);
    }
}
