//! Typed client for the static hosting API.
//!
//! Thin plumbing around the remote collaborators of the ingestion
//! pipeline: platform limits, deployment upload, aliases, account and
//! SPA detection. The wire protocol here is only what the pipeline's
//! output requires; everything interesting happens in
//! `sitedeploy-pipeline` before this crate is involved.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{Account, Alias, Deployment};
