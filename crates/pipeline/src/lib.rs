//! Static-site deployment ingestion pipeline.
//!
//! Turns raw input — filesystem roots or an in-memory file collection —
//! into a validated, hashed list of deployable files. The same pipeline
//! serves both runtimes; only discovery differs:
//!
//! 1. **Discover** — enumerate candidate files
//! 2. **Filter** — drop OS/editor junk
//! 3. **Optimize** — strip the common parent directory
//! 4. **Check** — path safety and zero-byte exclusion
//! 5. **Hash** — MD5 content fingerprints
//! 6. **Validate** — enforce server-supplied limits
//!
//! [`assemble`] runs the whole pipeline; [`preflight`] runs the atomic
//! batch validation regime for callers that want a full report before
//! committing.

pub mod assemble;
pub mod discover;
pub mod error;
pub mod hash;
pub mod junk;
pub mod limits;
pub mod optimize;
pub mod paths;
pub mod types;
pub mod validate;

// Re-export primary types for convenience.
pub use assemble::{SPA_CONFIG_FILENAME, SpaOracle, assemble, preflight};
pub use discover::{DiskDiscoverer, Discoverer, MemoryDiscoverer, discoverer_for};
pub use error::PipelineError;
pub use hash::{ChunkedHasher, hash_bytes, hash_content, hash_file};
pub use limits::{LimitsSession, PlatformLimits};
pub use optimize::{OptimizedPath, optimize_paths};
pub use types::{
    CandidateFile, DeployInput, DeployOptions, FileContent, ProgressCallback, StaticFile,
    UploadProgress, VirtualFile,
};
pub use validate::{
    BatchReport, CheckedFile, FileCheck, FileStatus, RejectCause, validate_batch,
    validate_fail_fast,
};
