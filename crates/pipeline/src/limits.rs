//! Server-supplied platform limits.
//!
//! Limits are fetched once per session by the surrounding system and
//! held in a [`LimitsSession`] with an explicit lifecycle: unset until
//! `init`, read-only afterwards. Reading before initialization is a
//! caller bug, reported as [`PipelineError::LimitsNotInitialized`].

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Upload limits enforced by the hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLimits {
    /// Maximum size of a single file, in bytes.
    pub max_file_size: u64,
    /// Maximum number of files in one deployment.
    pub max_files_count: u64,
    /// Maximum cumulative size of a deployment, in bytes.
    pub max_total_size: u64,
}

/// Session-scoped limits cache.
#[derive(Debug, Default)]
pub struct LimitsSession {
    limits: RwLock<Option<PlatformLimits>>,
}

impl LimitsSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the fetched limits for the rest of the session.
    pub fn init(&self, limits: PlatformLimits) {
        *self
            .limits
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(limits);
    }

    /// Returns the session limits, or an error when uninitialized.
    pub fn get(&self) -> Result<PlatformLimits, PipelineError> {
        let guard = self.limits.read().unwrap_or_else(PoisonError::into_inner);
        (*guard).ok_or(PipelineError::LimitsNotInitialized)
    }

    /// Clears the session, returning it to the uninitialized state.
    pub fn reset(&self) {
        *self
            .limits
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.limits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
