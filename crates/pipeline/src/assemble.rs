//! Unified assembler: the end-to-end ingestion pipeline.
//!
//! Turns raw deploy input into a validated, hashed list of
//! [`StaticFile`]s, in order: discovery, junk filtering, path
//! optimization, path-safety checks, zero-byte exclusion, hashing,
//! fail-fast limit validation and optional SPA config synthesis.
//! The output preserves discovery order of surviving candidates.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::discover::discoverer_for;
use crate::error::PipelineError;
use crate::hash::{hash_bytes, hash_content};
use crate::junk::{is_junk, is_junk_path};
use crate::limits::PlatformLimits;
use crate::optimize::{OptimizedPath, optimize_paths};
use crate::paths::{file_name, is_safe_path};
use crate::types::{CandidateFile, DeployInput, DeployOptions, FileContent, StaticFile};
use crate::validate::{BatchReport, FileCheck, validate_batch, validate_fail_fast};

/// Reserved name of the synthesized SPA rewrite document.
pub const SPA_CONFIG_FILENAME: &str = "static.json";

/// Decides whether a final path set looks like a single-page app.
///
/// An optional collaborator: absence or failure both degrade to "no".
pub trait SpaOracle: Send + Sync {
    fn looks_like_spa<'a>(
        &'a self,
        paths: &'a [String],
    ) -> Pin<
        Box<
            dyn Future<Output = Result<bool, Box<dyn std::error::Error + Send + Sync>>>
                + Send
                + 'a,
        >,
    >;
}

/// Runs the full ingestion pipeline over `input`.
///
/// Limit fetching is the caller's job: `limits` must already hold the
/// session's platform limits. The oracle is only consulted when
/// `options.spa_detect` is on; its failure never aborts the deployment.
pub async fn assemble(
    input: DeployInput,
    options: &DeployOptions,
    limits: &PlatformLimits,
    spa_oracle: Option<&dyn SpaOracle>,
) -> Result<Vec<StaticFile>, PipelineError> {
    let (kept, optimized) = discover_and_optimize(&input, options)?;

    for opt in &optimized {
        if !is_safe_path(&opt.path) {
            return Err(PipelineError::UnsafePath(opt.path.clone()));
        }
    }

    let mut files = Vec::with_capacity(kept.len());
    for (candidate, opt) in kept.into_iter().zip(optimized) {
        // Zero-byte files are a silent per-file exclusion, not an error.
        if candidate.size == 0 {
            debug!(path = %opt.path, "excluding empty file");
            continue;
        }
        let md5 = hash_content(&candidate.content)?;
        files.push(StaticFile {
            path: opt.path,
            content: candidate.content,
            size: candidate.size,
            md5,
        });
    }

    let checks: Vec<FileCheck> = files
        .iter()
        .map(|f| FileCheck {
            path: f.path.clone(),
            size: f.size,
        })
        .collect();
    validate_fail_fast(&checks, limits)?;

    if options.spa_detect
        && let Some(oracle) = spa_oracle
        && !files.iter().any(|f| f.path == SPA_CONFIG_FILENAME)
    {
        let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        match oracle.looks_like_spa(&paths).await {
            Ok(true) => {
                debug!("single-page app detected, appending rewrite config");
                files.push(spa_config_file());
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "SPA detection failed, skipping config synthesis"),
        }
    }

    debug!(files = files.len(), "assembly complete");
    Ok(files)
}

/// Pre-flight check: discovery and optimization followed by the atomic
/// batch regime, collecting every violation instead of stopping at the
/// first. Nothing is hashed or uploaded.
pub fn preflight(
    input: DeployInput,
    options: &DeployOptions,
    limits: &PlatformLimits,
) -> Result<BatchReport, PipelineError> {
    let (kept, optimized) = discover_and_optimize(&input, options)?;
    let checks: Vec<FileCheck> = kept
        .iter()
        .zip(&optimized)
        .map(|(candidate, opt)| FileCheck {
            path: opt.path.clone(),
            size: candidate.size,
        })
        .collect();
    Ok(validate_batch(&checks, limits))
}

fn discover_and_optimize(
    input: &DeployInput,
    options: &DeployOptions,
) -> Result<(Vec<CandidateFile>, Vec<OptimizedPath>), PipelineError> {
    match input {
        DeployInput::Paths(roots) if roots.is_empty() => {
            return Err(PipelineError::InvalidInput("empty path list".to_string()));
        }
        DeployInput::Files(files) if files.is_empty() => {
            return Err(PipelineError::InvalidInput(
                "empty file collection".to_string(),
            ));
        }
        _ => {}
    }

    let discoverer = discoverer_for(input);
    let candidates = discoverer.discover(input)?;
    debug!(candidates = candidates.len(), "discovery complete");

    // Junk file names go before optimization so artifacts cannot skew
    // the common-prefix computation.
    let mut kept = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if is_junk(file_name(&candidate.raw_path)) {
            debug!(path = %candidate.raw_path, "dropping junk file");
        } else {
            kept.push(candidate);
        }
    }

    let raw_paths: Vec<String> = kept.iter().map(|c| c.raw_path.clone()).collect();
    let optimized = optimize_paths(&raw_paths, options.path_detect);

    // Junk directory segments are judged on the final relative path: a
    // source tree that merely lives under an archive-named ancestor
    // must not lose its files.
    let mut files = Vec::with_capacity(kept.len());
    let mut paths = Vec::with_capacity(kept.len());
    for (candidate, opt) in kept.into_iter().zip(optimized) {
        if is_junk_path(&opt.path) {
            debug!(path = %opt.path, "dropping junk file");
        } else {
            files.push(candidate);
            paths.push(opt);
        }
    }
    Ok((files, paths))
}

/// Builds the synthesized SPA config: rewrite every path to the index
/// document.
fn spa_config_file() -> StaticFile {
    let doc = serde_json::json!({
        "rewrites": [
            { "source": "**", "destination": "/index.html" }
        ]
    });
    let data = doc.to_string().into_bytes();
    let md5 = hash_bytes(&data);
    let size = data.len() as u64;
    StaticFile {
        path: SPA_CONFIG_FILENAME.to_string(),
        content: FileContent::Memory(Arc::new(data)),
        size,
        md5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VirtualFile;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FixedOracle(bool);

    impl SpaOracle for FixedOracle {
        fn looks_like_spa<'a>(
            &'a self,
            _paths: &'a [String],
        ) -> Pin<
            Box<
                dyn Future<Output = Result<bool, Box<dyn std::error::Error + Send + Sync>>>
                    + Send
                    + 'a,
            >,
        > {
            let answer = self.0;
            Box::pin(async move { Ok(answer) })
        }
    }

    struct BrokenOracle;

    impl SpaOracle for BrokenOracle {
        fn looks_like_spa<'a>(
            &'a self,
            _paths: &'a [String],
        ) -> Pin<
            Box<
                dyn Future<Output = Result<bool, Box<dyn std::error::Error + Send + Sync>>>
                    + Send
                    + 'a,
            >,
        > {
            Box::pin(async { Err("oracle offline".into()) })
        }
    }

    fn limits() -> PlatformLimits {
        PlatformLimits {
            max_file_size: 1024 * 1024,
            max_files_count: 100,
            max_total_size: 10 * 1024 * 1024,
        }
    }

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

    #[tokio::test]
    async fn assembles_a_directory_with_default_options() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);

        let files = assemble(input, &DeployOptions::default(), &limits(), None)
            .await
            .unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["assets/css/main.css", "assets/js/app.js", "index.html"]
        );
        for file in &files {
            assert_eq!(file.md5.len(), 32);
            assert_eq!(file.size as usize, file.content.read_all().unwrap().len());
        }
    }

    #[tokio::test]
    async fn keep_paths_preserves_the_directory_chain() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let options = DeployOptions {
            path_detect: false,
            ..Default::default()
        };

        let files = assemble(input, &options, &limits(), None).await.unwrap();
        let root = crate::paths::normalize_separators(&dir.path().to_string_lossy());
        assert!(files.iter().all(|f| f.path.starts_with(&root)));
    }

    #[tokio::test]
    async fn junk_files_never_reach_the_output() {
        let dir = create_site_tree();
        fs::write(dir.path().join(".DS_Store"), b"junk").unwrap();
        fs::write(dir.path().join("assets").join("Thumbs.db"), b"junk").unwrap();

        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let files = assemble(input, &DeployOptions::default(), &limits(), None)
            .await
            .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| !f.path.contains("DS_Store")));
    }

    #[tokio::test]
    async fn junk_directories_inside_the_tree_are_dropped() {
        let dir = create_site_tree();
        fs::create_dir_all(dir.path().join("__MACOSX")).unwrap();
        fs::write(dir.path().join("__MACOSX").join("meta.txt"), b"meta").unwrap();

        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let files = assemble(input, &DeployOptions::default(), &limits(), None)
            .await
            .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| !f.path.contains("__MACOSX")));
    }

    #[tokio::test]
    async fn junk_named_ancestor_does_not_drop_the_tree() {
        // The deploy root itself sits under a __MACOSX directory; only
        // final relative paths count for segment matching.
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("__MACOSX");
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("index.html"), b"<html></html>").unwrap();
        fs::write(root.join("assets").join("app.js"), b"APP").unwrap();

        let input = DeployInput::Paths(vec![root]);
        let files = assemble(input, &DeployOptions::default(), &limits(), None)
            .await
            .unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["assets/app.js", "index.html"]);
    }

    #[tokio::test]
    async fn zero_byte_files_are_dropped_without_failing() {
        let dir = create_site_tree();
        fs::write(dir.path().join("empty.txt"), b"").unwrap();

        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let files = assemble(input, &DeployOptions::default(), &limits(), None)
            .await
            .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.path != "empty.txt"));
    }

    #[tokio::test]
    async fn memory_input_assembles_identically() {
        let input = DeployInput::Files(vec![
            VirtualFile::with_relative_path("index.html", "dist/index.html", b"<html></html>".to_vec()),
            VirtualFile::with_relative_path("app.js", "dist/assets/app.js", b"APP".to_vec()),
        ]);

        let files = assemble(input, &DeployOptions::default(), &limits(), None)
            .await
            .unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["index.html", "assets/app.js"]);
    }

    #[tokio::test]
    async fn hash_parity_between_disk_and_memory_input() {
        let dir = TempDir::new().unwrap();
        let data = b"identical bytes in both runtimes".to_vec();
        fs::write(dir.path().join("file.bin"), &data).unwrap();

        let disk = assemble(
            DeployInput::Paths(vec![dir.path().to_path_buf()]),
            &DeployOptions::default(),
            &limits(),
            None,
        )
        .await
        .unwrap();
        let memory = assemble(
            DeployInput::Files(vec![VirtualFile::new("file.bin", data)]),
            &DeployOptions::default(),
            &limits(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(disk[0].md5, memory[0].md5);
    }

    #[tokio::test]
    async fn empty_input_shapes_are_rejected_before_io() {
        let result = assemble(
            DeployInput::Paths(Vec::new()),
            &DeployOptions::default(),
            &limits(),
            None,
        )
        .await;
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));

        let result = preflight(
            DeployInput::Files(Vec::new()),
            &DeployOptions::default(),
            &limits(),
        );
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn empty_directory_is_a_no_files_error() {
        let dir = TempDir::new().unwrap();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let result = assemble(input, &DeployOptions::default(), &limits(), None).await;
        assert!(matches!(result, Err(PipelineError::NoFiles)));
    }

    #[tokio::test]
    async fn fail_fast_violations_surface() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.bin"), vec![0u8; 2048]).unwrap();

        let tight = PlatformLimits {
            max_file_size: 1024,
            max_files_count: 100,
            max_total_size: 10 * 1024,
        };
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let result = assemble(input, &DeployOptions::default(), &tight, None).await;
        assert!(matches!(result, Err(PipelineError::FileTooLarge { .. })));
    }

    #[tokio::test]
    async fn traversal_paths_are_rejected() {
        let input = DeployInput::Files(vec![VirtualFile::with_relative_path(
            "secret.txt",
            "../secret.txt",
            b"x".to_vec(),
        )]);
        let options = DeployOptions {
            path_detect: false,
            ..Default::default()
        };
        let result = assemble(input, &options, &limits(), None).await;
        assert!(matches!(result, Err(PipelineError::UnsafePath(_))));
    }

    #[test]
    fn preflight_rejects_traversal_paths_like_deploy_does() {
        let input = DeployInput::Files(vec![VirtualFile::with_relative_path(
            "secret.txt",
            "../secret.txt",
            b"x".to_vec(),
        )]);
        let options = DeployOptions {
            path_detect: false,
            ..Default::default()
        };

        let report = preflight(input, &options, &limits()).unwrap();
        assert!(!report.can_deploy);
        assert!(report.valid_files.is_empty());
        assert!(report.errors.iter().any(|e| e.contains("unsafe path")));
    }

    #[tokio::test]
    async fn spa_hit_appends_the_rewrite_config() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);

        let oracle = FixedOracle(true);
        let files = assemble(input, &DeployOptions::default(), &limits(), Some(&oracle))
            .await
            .unwrap();

        let config = files.last().unwrap();
        assert_eq!(config.path, SPA_CONFIG_FILENAME);
        let body = config.content.read_all().unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["rewrites"][0]["destination"], "/index.html");
        assert_eq!(config.md5, hash_bytes(&body));
    }

    #[tokio::test]
    async fn spa_miss_appends_nothing() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);

        let oracle = FixedOracle(false);
        let files = assemble(input, &DeployOptions::default(), &limits(), Some(&oracle))
            .await
            .unwrap();
        assert!(files.iter().all(|f| f.path != SPA_CONFIG_FILENAME));
    }

    #[tokio::test]
    async fn existing_config_is_never_duplicated() {
        let dir = create_site_tree();
        fs::write(dir.path().join(SPA_CONFIG_FILENAME), b"{}").unwrap();

        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let oracle = FixedOracle(true);
        let files = assemble(input, &DeployOptions::default(), &limits(), Some(&oracle))
            .await
            .unwrap();

        let configs = files
            .iter()
            .filter(|f| f.path == SPA_CONFIG_FILENAME)
            .count();
        assert_eq!(configs, 1);
    }

    #[tokio::test]
    async fn oracle_failure_degrades_to_no() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);

        let files = assemble(
            input,
            &DeployOptions::default(),
            &limits(),
            Some(&BrokenOracle),
        )
        .await
        .unwrap();
        assert!(files.iter().all(|f| f.path != SPA_CONFIG_FILENAME));
    }

    #[tokio::test]
    async fn spa_detect_off_skips_the_oracle() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let options = DeployOptions {
            spa_detect: false,
            ..Default::default()
        };

        let oracle = FixedOracle(true);
        let files = assemble(input, &options, &limits(), Some(&oracle))
            .await
            .unwrap();
        assert!(files.iter().all(|f| f.path != SPA_CONFIG_FILENAME));
    }

    #[test]
    fn preflight_reports_without_uploading() {
        let dir = create_site_tree();
        fs::write(dir.path().join("legacy.php"), b"<?php").unwrap();
        fs::write(dir.path().join("empty.txt"), b"").unwrap();

        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let report = preflight(input, &DeployOptions::default(), &limits()).unwrap();

        assert!(!report.can_deploy);
        assert!(report.valid_files.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.files.len(), 5);
    }

    #[test]
    fn preflight_all_valid() {
        let dir = create_site_tree();
        let input = DeployInput::Paths(vec![dir.path().to_path_buf()]);
        let report = preflight(input, &DeployOptions::default(), &limits()).unwrap();

        assert!(report.can_deploy);
        assert_eq!(report.valid_files.len(), 3);
    }

    #[test]
    fn preflight_missing_root_propagates() {
        let input = DeployInput::Paths(vec![PathBuf::from("/nonexistent/site")]);
        let result = preflight(input, &DeployOptions::default(), &limits());
        assert!(result.is_err());
    }
}
