//! API error types.

/// Errors produced by the hosting API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] sitedeploy_pipeline::PipelineError),
}
