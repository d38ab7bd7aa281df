//! Data types flowing through the ingestion pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::PipelineError;

/// Where a file's bytes live.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// A file on disk, read on demand.
    Disk(PathBuf),
    /// An owned in-memory buffer (the browser-upload analog).
    Memory(Arc<Vec<u8>>),
}

impl FileContent {
    /// Reads the full content into memory.
    pub fn read_all(&self) -> Result<Vec<u8>, PipelineError> {
        match self {
            FileContent::Disk(path) => {
                std::fs::read(path).map_err(|e| PipelineError::FileRead {
                    path: path.to_string_lossy().into_owned(),
                    source: e,
                })
            }
            FileContent::Memory(data) => Ok(data.as_ref().clone()),
        }
    }
}

/// An in-memory file handle: the `File`/`FileList` analog for callers
/// without a filesystem (wasm hosts, embedded assets, tests).
#[derive(Debug, Clone)]
pub struct VirtualFile {
    /// Bare file name, e.g. `index.html`.
    pub name: String,
    /// Directory-relative path when the file came from a directory
    /// picker-style source, e.g. `dist/index.html`.
    pub relative_path: Option<String>,
    /// File bytes.
    pub data: Arc<Vec<u8>>,
}

impl VirtualFile {
    /// A bare file, as from a single-file picker.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            relative_path: None,
            data: Arc::new(data),
        }
    }

    /// A file carrying a directory-relative path, as from a directory picker.
    pub fn with_relative_path(
        name: impl Into<String>,
        relative_path: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            relative_path: Some(relative_path.into()),
            data: Arc::new(data),
        }
    }
}

/// Raw input to the pipeline. Each shape belongs to one runtime;
/// mixing shapes across a single call is impossible by construction.
#[derive(Debug, Clone)]
pub enum DeployInput {
    /// Filesystem roots: files or directories.
    Paths(Vec<PathBuf>),
    /// An in-memory file collection.
    Files(Vec<VirtualFile>),
}

/// A file awaiting processing, produced by discovery and consumed by
/// the assembler.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Handle to the underlying bytes.
    pub content: FileContent,
    /// Path as reported by the source, separators normalized to `/`.
    pub raw_path: String,
    /// Byte length, known before content is read.
    pub size: u64,
}

/// The pipeline's final output unit, immutable once assembled.
#[derive(Debug, Clone)]
pub struct StaticFile {
    /// Forward-slash, optimized deployment-relative path.
    pub path: String,
    /// Owned byte source.
    pub content: FileContent,
    /// Byte length of `content`.
    pub size: u64,
    /// Lowercase hex MD5 of `content`.
    pub md5: String,
}

/// Snapshot of upload progress, reported once per staged file.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    /// Deployment-relative path of the file just staged.
    pub path: String,
    /// Files staged so far, this one included.
    pub uploaded_files: usize,
    pub total_files: usize,
    /// Bytes staged so far, this file included.
    pub uploaded_bytes: u64,
    pub total_bytes: u64,
}

/// Shared progress callback, invoked by the upload client.
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Options controlling pipeline behavior. Purely advisory input,
/// never persisted.
#[derive(Clone)]
pub struct DeployOptions {
    /// Flatten the common parent directory out of deployment paths.
    pub path_detect: bool,
    /// Consult the SPA oracle and synthesize a rewrite config on a hit.
    pub spa_detect: bool,
    /// Upload timeout hint, passed through to the upload client.
    pub timeout: Option<Duration>,
    /// Upload concurrency hint, passed through to the upload client.
    pub max_concurrency: Option<usize>,
    /// Progress callback, passed through to the upload client.
    pub on_progress: Option<ProgressCallback>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            path_detect: true,
            spa_detect: true,
            timeout: None,
            max_concurrency: None,
            on_progress: None,
        }
    }
}

impl std::fmt::Debug for DeployOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployOptions")
            .field("path_detect", &self.path_detect)
            .field("spa_detect", &self.spa_detect)
            .field("timeout", &self.timeout)
            .field("max_concurrency", &self.max_concurrency)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}
