//! Limit enforcement.
//!
//! Two enforcement regimes coexist by design, not by accident:
//!
//! - [`validate_fail_fast`] raises on the first violation and is what
//!   the ingestion pipeline runs right before upload.
//! - [`validate_batch`] inspects every file, collects all violations,
//!   and applies all-or-nothing semantics. It backs pre-flight checks
//!   where a caller wants the full picture before committing.

use serde::Serialize;

use crate::error::PipelineError;
use crate::limits::PlatformLimits;
use crate::paths::{file_name, has_blocked_extension, is_safe_filename, is_safe_path};

/// Minimal (path, size) view of a file: all that limit enforcement needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub path: String,
    pub size: u64,
}

/// Why a file cannot deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectCause {
    UnsafePath,
    UnsafeName,
    BlockedExtension,
    TooLarge { max: u64 },
    /// The file was individually valid but the batch carries errors.
    BatchRejected,
}

/// Per-file outcome in the atomic batch regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Ready,
    /// Dropped without blocking the batch (zero-byte files).
    Excluded { reason: String },
    Failed { cause: RejectCause },
}

/// A file annotated with its validation outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CheckedFile {
    pub path: String,
    pub size: u64,
    pub status: FileStatus,
}

/// Result of the atomic batch regime.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Every file, annotated.
    pub files: Vec<CheckedFile>,
    /// Paths genuinely ready to deploy. Empty unless `errors` is empty.
    pub valid_files: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub can_deploy: bool,
}

/// Fail-fast regime: returns on the first violation.
///
/// Rule order: empty set, file count, then per file in input order
/// (path safety, name validity, blocked extension, per-file size) with
/// a running total checked after each file.
pub fn validate_fail_fast(
    files: &[FileCheck],
    limits: &PlatformLimits,
) -> Result<(), PipelineError> {
    if files.is_empty() {
        return Err(PipelineError::NoFiles);
    }
    if files.len() as u64 > limits.max_files_count {
        return Err(PipelineError::TooManyFiles {
            count: files.len(),
            max: limits.max_files_count,
        });
    }

    let mut total: u64 = 0;
    for file in files {
        let name = file_name(&file.path);
        if !is_safe_path(&file.path) {
            return Err(PipelineError::UnsafePath(file.path.clone()));
        }
        if !is_safe_filename(name) {
            return Err(PipelineError::UnsafeName(file.path.clone()));
        }
        if has_blocked_extension(name) {
            return Err(PipelineError::BlockedExtension(file.path.clone()));
        }
        if file.size > limits.max_file_size {
            return Err(PipelineError::FileTooLarge {
                path: file.path.clone(),
                size: file.size,
                max: limits.max_file_size,
            });
        }
        total += file.size;
        if total > limits.max_total_size {
            return Err(PipelineError::TotalSizeExceeded {
                total,
                max: limits.max_total_size,
            });
        }
    }

    Ok(())
}

/// Atomic batch regime: validates every file, collecting all violations.
///
/// Zero-byte files are exclusions (warnings), everything else an error.
/// Any error makes the whole batch non-deployable: otherwise-valid files
/// are re-labeled as failed by the batch, exclusions keep their status.
pub fn validate_batch(files: &[FileCheck], limits: &PlatformLimits) -> BatchReport {
    let mut checked = Vec::with_capacity(files.len());
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if files.is_empty() {
        errors.push("no files to deploy".to_string());
    }
    if files.len() as u64 > limits.max_files_count {
        errors.push(format!(
            "too many files: {} exceeds the limit of {}",
            files.len(),
            limits.max_files_count
        ));
    }

    let mut total: u64 = 0;
    for file in files {
        let name = file_name(&file.path);
        let status = if !is_safe_path(&file.path) {
            errors.push(format!("{}: unsafe path", file.path));
            FileStatus::Failed {
                cause: RejectCause::UnsafePath,
            }
        } else if file.size == 0 {
            warnings.push(format!("{}: excluded (empty file)", file.path));
            FileStatus::Excluded {
                reason: "empty file".to_string(),
            }
        } else if !is_safe_filename(name) {
            errors.push(format!("{}: unsafe file name", file.path));
            FileStatus::Failed {
                cause: RejectCause::UnsafeName,
            }
        } else if has_blocked_extension(name) {
            errors.push(format!("{}: blocked file extension", file.path));
            FileStatus::Failed {
                cause: RejectCause::BlockedExtension,
            }
        } else if file.size > limits.max_file_size {
            errors.push(format!(
                "{}: {} bytes exceeds the per-file limit of {}",
                file.path, file.size, limits.max_file_size
            ));
            FileStatus::Failed {
                cause: RejectCause::TooLarge {
                    max: limits.max_file_size,
                },
            }
        } else {
            total += file.size;
            FileStatus::Ready
        };
        checked.push(CheckedFile {
            path: file.path.clone(),
            size: file.size,
            status,
        });
    }

    if total > limits.max_total_size {
        errors.push(format!(
            "total size {} bytes exceeds the limit of {}",
            total, limits.max_total_size
        ));
    }

    let can_deploy = errors.is_empty();
    if !can_deploy {
        for file in &mut checked {
            if matches!(file.status, FileStatus::Ready) {
                file.status = FileStatus::Failed {
                    cause: RejectCause::BatchRejected,
                };
            }
        }
    }

    let valid_files = if can_deploy {
        checked
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Ready))
            .map(|f| f.path.clone())
            .collect()
    } else {
        Vec::new()
    };

    BatchReport {
        files: checked,
        valid_files,
        errors,
        warnings,
        can_deploy,
    }
}
