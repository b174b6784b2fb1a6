use base64::Engine as _;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use serde_json::{json, Value};

use redlilium_gltf::backend::CpuBackend;
use redlilium_gltf::config::ImportConfig;
use redlilium_gltf::gltf::GltfParser;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// A `size` x `size` vertex grid as one mesh with u32 indices.
fn grid_document(size: u32) -> Value {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    for y in 0..size {
        for x in 0..size {
            positions.push([x as f32, 0.0, y as f32]);
        }
    }
    let mut indices: Vec<u32> = Vec::new();
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let i = y * size + x;
            indices.extend_from_slice(&[i, i + 1, i + size, i + 1, i + size + 1, i + size]);
        }
    }

    let mut bytes: Vec<u8> = bytemuck::cast_slice(&positions).to_vec();
    let index_offset = bytes.len();
    bytes.extend_from_slice(bytemuck::cast_slice(&indices));

    json!({
        "buffers": [{
            "byteLength": bytes.len(),
            "uri": format!(
                "data:application/octet-stream;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(&bytes)
            ),
        }],
        "bufferViews": [
            { "buffer": 0, "byteLength": index_offset },
            { "buffer": 0, "byteOffset": index_offset, "byteLength": bytes.len() - index_offset },
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": positions.len(), "type": "VEC3" },
            { "bufferView": 1, "componentType": 5125, "count": indices.len(), "type": "SCALAR" },
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
    })
}

fn parser(document: &Value) -> GltfParser<CpuBackend> {
    GltfParser::from_value(document.clone(), CpuBackend::new(), ImportConfig::default())
        .expect("valid document")
}

// ---------------------------------------------------------------------------
// Accessor decoding
// ---------------------------------------------------------------------------

fn bench_decode_positions(c: &mut Criterion) {
    let document = grid_document(256);
    let mut parser = parser(&document);
    c.bench_function("decode_accessor_vec3_65536", |b| {
        b.iter(|| black_box(parser.decode_accessor(black_box(0)).expect("decode")));
    });
}

fn bench_decode_indices(c: &mut Criterion) {
    let document = grid_document(256);
    let mut parser = parser(&document);
    c.bench_function("decode_accessor_u32_indices", |b| {
        b.iter(|| black_box(parser.decode_accessor(black_box(1)).expect("decode")));
    });
}

// ---------------------------------------------------------------------------
// Mesh assembly
// ---------------------------------------------------------------------------

fn bench_static_mesh_small(c: &mut Criterion) {
    let document = grid_document(32);
    c.bench_function("load_static_mesh_32x32", |b| {
        b.iter_batched(
            || parser(&document),
            |mut parser| black_box(parser.load_static_mesh(0).expect("mesh")),
            BatchSize::SmallInput,
        );
    });
}

fn bench_static_mesh_large(c: &mut Criterion) {
    let document = grid_document(256);
    c.bench_function("load_static_mesh_256x256", |b| {
        b.iter_batched(
            || parser(&document),
            |mut parser| black_box(parser.load_static_mesh(0).expect("mesh")),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_decode_positions,
    bench_decode_indices,
    bench_static_mesh_small,
    bench_static_mesh_large,
);

criterion_main!(benches);
