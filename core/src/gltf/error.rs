//! Error types for glTF decoding.

use crate::backend::BackendError;

/// Broad failure category of a [`GltfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A required field is missing or malformed, or an index is out of range.
    Structural,
    /// A byte window exceeds the bytes available.
    Bounds,
    /// Well-formed data that cannot be interpreted, such as unknown type codes
    /// or joints without bones.
    Semantic,
    /// Reading or tokenizing the source document failed.
    Io,
    /// The mesh or material backend reported a failure.
    Backend,
}

/// Errors that can occur during glTF decoding.
///
/// Every variant names the entity and stage that failed, so the message can
/// be surfaced to users as-is.
#[derive(Debug, thiserror::Error)]
pub enum GltfError {
    /// Failed to read the document from disk.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON.
    #[error("glTF parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// The document root is not a JSON object.
    #[error("document root is not a JSON object")]
    NotAnObject,
    /// The parser configuration cannot be used.
    #[error("invalid import configuration: {0}")]
    InvalidConfig(&'static str),
    /// A required field is absent.
    #[error("{context}: missing required field `{field}`")]
    MissingField {
        /// Entity being decoded, e.g. `accessor 3`.
        context: String,
        /// Field name.
        field: &'static str,
    },
    /// A field is present but has the wrong JSON type.
    #[error("{context}: field `{field}` is not {expected}")]
    WrongType {
        /// Entity being decoded.
        context: String,
        /// Field name.
        field: &'static str,
        /// Expected JSON type, with article ("an array").
        expected: &'static str,
    },
    /// An array field has the wrong number of elements.
    #[error("{context}: `{field}` has {actual} elements, expected {expected}")]
    WrongLength {
        /// Entity being decoded.
        context: String,
        /// Field name.
        field: &'static str,
        /// Required element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },
    /// An index refers past the end of its table.
    #[error("{kind} index {index} out of range ({count} available)")]
    IndexOutOfRange {
        /// Table name, e.g. `node`.
        kind: &'static str,
        /// Requested index.
        index: usize,
        /// Table length.
        count: usize,
    },
    /// A node appears in more than one children list, or in its own.
    #[error("node {node} is claimed as a child by node {parent} but already has parent {existing}")]
    MultipleParents {
        /// Child node.
        node: usize,
        /// Second claiming parent.
        parent: usize,
        /// Parent assigned first.
        existing: usize,
    },
    /// A node is its own ancestor.
    #[error("node {node} is its own ancestor")]
    CyclicHierarchy {
        /// Node on the cycle.
        node: usize,
    },
    /// No node carries the requested name.
    #[error("no node named `{name}`")]
    NodeNotFound {
        /// Requested name.
        name: String,
    },
    /// Buffer URI is not an embedded base64 data URI.
    #[error("buffer {buffer}: only base64 data URIs are supported")]
    UnsupportedUri {
        /// Buffer index.
        buffer: usize,
    },
    /// Base64 payload of a data URI failed to decode.
    #[error("buffer {buffer}: base64 decode failed: {source}")]
    Base64 {
        /// Buffer index.
        buffer: usize,
        /// Decoder error.
        #[source]
        source: base64::DecodeError,
    },
    /// A byte window exceeds the bytes available.
    #[error("{context}: byte range {start}..{end} exceeds {available} available bytes")]
    OutOfBounds {
        /// Entity being decoded.
        context: String,
        /// Window start.
        start: usize,
        /// Window end (exclusive).
        end: usize,
        /// Bytes available.
        available: usize,
    },
    /// Buffer view stride is shorter than one element.
    #[error("buffer view {view}: byteStride {stride} is shorter than the {element}-byte element")]
    InvalidStride {
        /// Buffer view index.
        view: usize,
        /// Declared stride.
        stride: usize,
        /// Bytes per element of the reading accessor.
        element: usize,
    },
    /// Unknown accessor component type code.
    #[error("accessor {accessor}: unknown component type {code}")]
    UnknownComponentType {
        /// Accessor index.
        accessor: usize,
        /// Component type code.
        code: i64,
    },
    /// Unknown accessor element type string.
    #[error("accessor {accessor}: unknown element type `{name}`")]
    UnknownElementType {
        /// Accessor index.
        accessor: usize,
        /// Element type string.
        name: String,
    },
    /// Accessor format not accepted for its use.
    #[error("{usage}: unsupported accessor format {element_type}/{component_type}")]
    UnsupportedFormat {
        /// What the accessor was read for, e.g. `mesh 0 primitive 1 NORMAL`.
        usage: String,
        /// Element type name.
        element_type: &'static str,
        /// Component type name.
        component_type: &'static str,
    },
    /// Unsupported primitive topology.
    #[error("mesh {mesh} primitive {primitive}: unsupported topology mode {mode}")]
    UnsupportedTopology {
        /// Mesh index.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
        /// glTF primitive mode.
        mode: i64,
    },
    /// A primitive is missing position data.
    #[error("mesh {mesh} primitive {primitive} has no POSITION attribute")]
    MissingPositions {
        /// Mesh index in the glTF document.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
    },
    /// Vertex streams of one primitive disagree in length.
    #[error("mesh {mesh} primitive {primitive}: {attribute} has {actual} elements, expected {expected}")]
    AttributeCountMismatch {
        /// Mesh index.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
        /// Attribute semantic.
        attribute: String,
        /// Vertex count from POSITION.
        expected: usize,
        /// Attribute element count.
        actual: usize,
    },
    /// A `JOINTS_n` set has no matching `WEIGHTS_n` set.
    #[error("mesh {mesh} primitive {primitive}: JOINTS_{set} has no matching WEIGHTS_{set}")]
    MissingWeights {
        /// Mesh index.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
        /// Attribute set number.
        set: usize,
    },
    /// An index references a vertex past the end of the primitive.
    #[error("mesh {mesh} primitive {primitive}: vertex index {index} out of range ({count} vertices)")]
    VertexIndexOutOfRange {
        /// Mesh index.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
        /// Offending vertex index.
        index: u32,
        /// Vertex count.
        count: usize,
    },
    /// The skin lists no joints.
    #[error("skin {skin} has no joints")]
    EmptyJointSet {
        /// Skin index.
        skin: usize,
    },
    /// No node is an ancestor of every joint.
    #[error("skin {skin}: joints have no common root node")]
    NoCommonRoot {
        /// Skin index.
        skin: usize,
    },
    /// An inverse bind matrix cannot be inverted.
    #[error("skin {skin}: inverse bind matrix of node {node} is singular")]
    SingularBindMatrix {
        /// Skin index.
        skin: usize,
        /// Joint node.
        node: usize,
    },
    /// The instancing node's world transform cannot be inverted.
    #[error("node {node}: world transform is singular")]
    SingularTransform {
        /// Instancing node.
        node: usize,
    },
    /// A vertex references a joint with no bone.
    #[error("mesh {mesh}: joint index {joint} has no bone in skin {skin}")]
    UnmappedJoint {
        /// Mesh index.
        mesh: usize,
        /// Skin index.
        skin: usize,
        /// Joint index from the vertex stream.
        joint: u16,
    },
    /// The material or mesh backend failed.
    #[error("backend failure: {0}")]
    Backend(#[from] BackendError),
}

impl GltfError {
    /// Category of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Io(_) | Self::Json(_) => ErrorClass::Io,
            Self::NotAnObject
            | Self::MissingField { .. }
            | Self::WrongType { .. }
            | Self::WrongLength { .. }
            | Self::IndexOutOfRange { .. }
            | Self::MultipleParents { .. }
            | Self::CyclicHierarchy { .. }
            | Self::NodeNotFound { .. }
            | Self::UnsupportedUri { .. }
            | Self::Base64 { .. }
            | Self::AttributeCountMismatch { .. }
            | Self::MissingWeights { .. }
            | Self::VertexIndexOutOfRange { .. }
            | Self::InvalidStride { .. } => ErrorClass::Structural,
            Self::OutOfBounds { .. } => ErrorClass::Bounds,
            Self::InvalidConfig(_)
            | Self::UnknownComponentType { .. }
            | Self::UnknownElementType { .. }
            | Self::UnsupportedFormat { .. }
            | Self::UnsupportedTopology { .. }
            | Self::MissingPositions { .. }
            | Self::EmptyJointSet { .. }
            | Self::NoCommonRoot { .. }
            | Self::SingularBindMatrix { .. }
            | Self::SingularTransform { .. }
            | Self::UnmappedJoint { .. } => ErrorClass::Semantic,
            Self::Backend(_) => ErrorClass::Backend,
        }
    }
}
