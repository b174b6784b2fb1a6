//! Buffer resolution and caching.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine as _;

use super::document::{Document, Table};
use super::error::GltfError;

/// Decoded buffer bytes, cached by buffer index.
///
/// Only embedded base64 data URIs are resolved.
#[derive(Debug, Default)]
pub struct BufferStore {
    buffers: HashMap<usize, Arc<[u8]>>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of buffer `index`, decoding it on first use.
    pub fn get(&mut self, document: &Document, index: usize) -> Result<Arc<[u8]>, GltfError> {
        if let Some(bytes) = self.buffers.get(&index) {
            return Ok(Arc::clone(bytes));
        }

        let entry = document.entry(Table::Buffers, index)?;
        let uri = entry.str("uri")?;
        let bytes = decode_data_uri(uri, index)?;

        if let Some(declared) = entry.opt_usize("byteLength")? {
            if bytes.len() < declared {
                return Err(GltfError::OutOfBounds {
                    context: entry.context().to_string(),
                    start: 0,
                    end: declared,
                    available: bytes.len(),
                });
            }
        }

        log::debug!("Decoded buffer {index} ({} bytes)", bytes.len());
        let bytes: Arc<[u8]> = bytes.into();
        self.buffers.insert(index, Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Number of buffers decoded so far.
    pub fn cached(&self) -> usize {
        self.buffers.len()
    }
}

/// Decode a `data:[<mediatype>];base64,<payload>` URI.
pub fn decode_data_uri(uri: &str, buffer: usize) -> Result<Vec<u8>, GltfError> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or(GltfError::UnsupportedUri { buffer })?;

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|source| GltfError::Base64 { buffer, source })
}
