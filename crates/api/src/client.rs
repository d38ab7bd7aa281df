//! HTTP client for the hosting API.
//!
//! Thin plumbing over the remote endpoints the pipeline collaborates
//! with: platform limits, deployment upload, alias and account
//! management, and SPA detection. The client implements the pipeline's
//! [`SpaOracle`] so it can be handed straight to `assemble`.

use std::future::Future;
use std::pin::Pin;

use reqwest::multipart;
use serde::Serialize;
use sitedeploy_pipeline::{DeployOptions, PlatformLimits, SpaOracle, StaticFile, UploadProgress};
use tracing::debug;

use crate::error::ApiError;
use crate::types::{Account, Alias, Deployment};

/// Typed client for the hosting API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    path: &'a str,
    size: u64,
    md5: &'a str,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps non-success statuses to [`ApiError::Status`] with the body text.
    async fn checked(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ApiError::Status {
            code: status.as_u16(),
            message,
        })
    }

    /// Fetches the platform upload limits. Callers cache the result in a
    /// `LimitsSession` for the rest of the session.
    pub async fn fetch_limits(&self) -> Result<PlatformLimits, ApiError> {
        let resp = self
            .http
            .get(self.url("/limits"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    /// Uploads an assembled file list as a new deployment.
    ///
    /// Sends one multipart request: a JSON manifest part carrying path,
    /// size and MD5 per file, followed by the file parts in list order.
    /// `options.on_progress` is invoked once per file as it is staged
    /// into the request body.
    pub async fn create_deployment(
        &self,
        files: &[StaticFile],
        options: &DeployOptions,
    ) -> Result<Deployment, ApiError> {
        let manifest: Vec<ManifestEntry<'_>> = files
            .iter()
            .map(|f| ManifestEntry {
                path: &f.path,
                size: f.size,
                md5: &f.md5,
            })
            .collect();

        let total_files = files.len();
        let total_bytes: u64 = files.iter().map(|f| f.size).sum();
        let mut staged_bytes: u64 = 0;

        let mut form = multipart::Form::new().text("manifest", serde_json::to_string(&manifest)?);
        for (idx, file) in files.iter().enumerate() {
            let part = multipart::Part::bytes(file.content.read_all()?)
                .file_name(file.path.clone());
            form = form.part(format!("file{idx}"), part);

            staged_bytes += file.size;
            if let Some(on_progress) = &options.on_progress {
                on_progress(UploadProgress {
                    path: file.path.clone(),
                    uploaded_files: idx + 1,
                    total_files,
                    uploaded_bytes: staged_bytes,
                    total_bytes,
                });
            }
        }

        debug!(files = files.len(), "uploading deployment");

        let mut request = self
            .http
            .post(self.url("/deployments"))
            .bearer_auth(&self.token)
            .multipart(form);
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    pub async fn list_deployments(&self) -> Result<Vec<Deployment>, ApiError> {
        let resp = self
            .http
            .get(self.url("/deployments"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    pub async fn get_deployment(&self, id: &str) -> Result<Deployment, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/deployments/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    pub async fn delete_deployment(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/deployments/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::checked(resp).await?;
        Ok(())
    }

    pub async fn list_aliases(&self) -> Result<Vec<Alias>, ApiError> {
        let resp = self
            .http
            .get(self.url("/aliases"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    /// Points `name` at `deployment_id`, creating or moving the alias.
    pub async fn set_alias(&self, name: &str, deployment_id: &str) -> Result<Alias, ApiError> {
        let body = serde_json::json!({ "name": name, "deployment_id": deployment_id });
        let resp = self
            .http
            .post(self.url("/aliases"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    pub async fn delete_alias(&self, name: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/aliases/{name}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::checked(resp).await?;
        Ok(())
    }

    pub async fn account(&self) -> Result<Account, ApiError> {
        let resp = self
            .http
            .get(self.url("/account"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    /// Asks the API whether the final path set looks like a single-page app.
    pub async fn detect_spa(&self, paths: &[String]) -> Result<bool, ApiError> {
        #[derive(serde::Deserialize)]
        struct SpaResponse {
            spa: bool,
        }

        let resp = self
            .http
            .post(self.url("/detect-spa"))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "paths": paths }))
            .send()
            .await?;
        let body: SpaResponse = Self::checked(resp).await?.json().await?;
        Ok(body.spa)
    }
}

impl SpaOracle for ApiClient {
    fn looks_like_spa<'a>(
        &'a self,
        paths: &'a [String],
    ) -> Pin<
        Box<
            dyn Future<Output = Result<bool, Box<dyn std::error::Error + Send + Sync>>>
                + Send
                + 'a,
        >,
    > {
        Box::pin(async move {
            self.detect_spa(paths)
                .await
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        })
    }
}
