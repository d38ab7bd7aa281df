//! Candidate file discovery.
//!
//! Two interchangeable discoverers produce the same intermediate shape:
//! an ordered list of candidates with a raw path, a size and a content
//! handle. [`DiskDiscoverer`] walks filesystem roots; [`MemoryDiscoverer`]
//! unpacks an in-memory file collection. Each rejects input meant for
//! the other, guarding against accidental cross-environment misuse.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::PipelineError;
use crate::paths::normalize_separators;
use crate::types::{CandidateFile, DeployInput, FileContent};

/// Produces deployment candidates from a runtime-specific input shape.
pub trait Discoverer: Send + Sync {
    fn discover(&self, input: &DeployInput) -> Result<Vec<CandidateFile>, PipelineError>;
}

/// Picks the discoverer matching the input shape. Selection happens
/// once here rather than by type-sniffing inside the pipeline.
pub fn discoverer_for(input: &DeployInput) -> &'static dyn Discoverer {
    match input {
        DeployInput::Paths(_) => &DiskDiscoverer,
        DeployInput::Files(_) => &MemoryDiscoverer,
    }
}

/// Filesystem discoverer: recursively enumerates regular files under
/// each root. A file root yields exactly one candidate. Entries are
/// visited in file-name order so discovery order is deterministic.
pub struct DiskDiscoverer;

impl Discoverer for DiskDiscoverer {
    fn discover(&self, input: &DeployInput) -> Result<Vec<CandidateFile>, PipelineError> {
        let roots = match input {
            DeployInput::Paths(roots) => roots,
            DeployInput::Files(_) => {
                return Err(PipelineError::Environment(
                    "in-memory file collection handed to the filesystem discoverer".into(),
                ));
            }
        };

        let mut candidates = Vec::new();
        for root in roots {
            walk_root(root, &mut candidates)?;
        }
        Ok(candidates)
    }
}

fn walk_root(root: &Path, out: &mut Vec<CandidateFile>) -> Result<(), PipelineError> {
    let meta = std::fs::metadata(root).map_err(|e| PipelineError::FileRead {
        path: root.display().to_string(),
        source: e,
    })?;

    if meta.is_file() {
        out.push(disk_candidate(root.to_path_buf(), meta.len()));
        return Ok(());
    }

    // An unreadable entry skips its subtree but never aborts siblings.
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => out.push(disk_candidate(entry.into_path(), meta.len())),
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping file without metadata");
            }
        }
    }

    Ok(())
}

fn disk_candidate(path: PathBuf, size: u64) -> CandidateFile {
    let raw_path = normalize_separators(&path.to_string_lossy());
    CandidateFile {
        content: FileContent::Disk(path),
        raw_path,
        size,
    }
}

/// In-memory discoverer: unpacks a [`VirtualFile`](crate::types::VirtualFile)
/// collection, the browser `FileList` analog. Uses a file's directory-relative
/// path when present, its bare name otherwise.
pub struct MemoryDiscoverer;

impl Discoverer for MemoryDiscoverer {
    fn discover(&self, input: &DeployInput) -> Result<Vec<CandidateFile>, PipelineError> {
        let files = match input {
            DeployInput::Files(files) => files,
            DeployInput::Paths(_) => {
                return Err(PipelineError::Environment(
                    "filesystem paths handed to the in-memory discoverer".into(),
                ));
            }
        };

        Ok(files
            .iter()
            .map(|file| {
                let raw = file.relative_path.as_deref().unwrap_or(&file.name);
                CandidateFile {
                    content: FileContent::Memory(file.data.clone()),
                    raw_path: normalize_separators(raw),
                    size: file.data.len() as u64,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VirtualFile;
    use std::fs;
    use tempfile::TempDir;

    fn create_site_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("index.html"), b"<html></html>").unwrap();
        fs::create_dir_all(root.join("assets").join("js")).unwrap();
        fs::create_dir_all(root.join("assets").join("css")).unwrap();
        fs::write(root.join("assets").join("js").join("app.js"), b"APP").unwrap();
        fs::write(root.join("assets").join("css").join("main.css"), b"CSS").unwrap();

        dir
    }

    #[test]
    fn disk_discovers_all_files_in_order() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let candidates = DiskDiscoverer.discover(&input).unwrap();

        assert_eq!(candidates.len(), 3);
        // Sorted walk: assets/css, assets/js, then index.html.
        assert!(candidates[0].raw_path.ends_with("assets/css/main.css"));
        assert!(candidates[1].raw_path.ends_with("assets/js/app.js"));
        assert!(candidates[2].raw_path.ends_with("index.html"));
    }

    #[test]
    fn disk_sizes_match_content() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let candidates = DiskDiscoverer.discover(&input).unwrap();
        for candidate in &candidates {
            assert_eq!(
                candidate.size as usize,
                candidate.content.read_all().unwrap().len()
            );
        }
    }

    #[test]
    fn disk_file_root_yields_one_candidate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("only.txt");
        fs::write(&path, b"one").unwrap();

        let input = DeployInput::Paths(vec![path]);
        let candidates = DiskDiscoverer.discover(&input).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].size, 3);
    }

    #[test]
    fn disk_missing_root_is_an_error() {
        let input = DeployInput::Paths(vec![PathBuf::from("/nonexistent/site")]);
        let result = DiskDiscoverer.discover(&input);
        assert!(matches!(result, Err(PipelineError::FileRead { .. })));
    }

    #[test]
    fn disk_rejects_memory_input() {
        let input = DeployInput::Files(vec![VirtualFile::new("a.txt", b"x".to_vec())]);
        assert!(matches!(
            DiskDiscoverer.discover(&input),
            Err(PipelineError::Environment(_))
        ));
    }

    #[test]
    fn memory_uses_relative_path_when_present() {
        let input = DeployInput::Files(vec![
            VirtualFile::with_relative_path("app.js", "dist\\js\\app.js", b"APP".to_vec()),
            VirtualFile::new("index.html", b"<html></html>".to_vec()),
        ]);
        let candidates = MemoryDiscoverer.discover(&input).unwrap();

        assert_eq!(candidates[0].raw_path, "dist/js/app.js");
        assert_eq!(candidates[1].raw_path, "index.html");
        assert_eq!(candidates[0].size, 3);
    }

    #[test]
    fn memory_rejects_path_input() {
        let input = DeployInput::Paths(vec![PathBuf::from(".")]);
        assert!(matches!(
            MemoryDiscoverer.discover(&input),
            Err(PipelineError::Environment(_))
        ));
    }

    #[test]
    fn discoverer_for_matches_shape() {
        let paths = DeployInput::Paths(vec![]);
        let files = DeployInput::Files(vec![]);
        assert!(discoverer_for(&paths).discover(&paths).is_ok());
        assert!(discoverer_for(&files).discover(&files).is_ok());
    }
}
