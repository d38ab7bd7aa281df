//! Data transfer types for the hosting API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deployment: a named, immutable snapshot of uploaded files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub files_count: u64,
    pub total_size: u64,
    pub status: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the deployment carries a config document (e.g. SPA rewrites).
    #[serde(default)]
    pub has_config: bool,
}

/// An alias: a human-chosen name bound to a deployment, movable at will.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub deployment_id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Account details for the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub plan: String,
    #[serde(default)]
    pub deployments_count: u64,
}
