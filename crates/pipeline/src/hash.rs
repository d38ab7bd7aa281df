//! MD5 content fingerprints.
//!
//! Two strategies, one digest: disk files stream through fixed-size
//! reads, in-memory buffers feed an incremental accumulator in 2 MiB
//! chunks. Both produce the digest of hashing the full content at once.

use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::PipelineError;
use crate::types::FileContent;

/// Chunk size for blob-style sources: 2 MiB.
pub const HASH_CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Computes the MD5 of `data` and returns the lowercase hex digest.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes the MD5 of an entire file, streaming in fixed-size reads.
pub fn hash_file(path: &Path) -> Result<String, PipelineError> {
    let mut file = std::fs::File::open(path).map_err(|e| read_error(path, e))?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| read_error(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hashes a candidate's content through the strategy matching its source.
pub fn hash_content(content: &FileContent) -> Result<String, PipelineError> {
    match content {
        FileContent::Disk(path) => hash_file(path),
        FileContent::Memory(data) => Ok(ChunkedHasher::hash_chunked(data)),
    }
}

fn read_error(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::FileRead {
        path: path.to_string_lossy().into_owned(),
        source,
    }
}

/// Incremental MD5 accumulator for sources that arrive in chunks.
#[derive(Default)]
pub struct ChunkedHasher {
    hasher: Md5,
}

impl ChunkedHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk into the accumulator.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Consumes the accumulator and returns the lowercase hex digest.
    pub fn finalize(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Hashes `data` in fixed [`HASH_CHUNK_SIZE`] chunks.
    pub fn hash_chunked(data: &[u8]) -> String {
        let mut hasher = Self::new();
        for chunk in data.chunks(HASH_CHUNK_SIZE) {
            hasher.update(chunk);
        }
        hasher.finalize()
    }
}
