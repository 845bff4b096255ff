//! reqwest-backed [`AdminApi`].

use async_trait::async_trait;
use oscode_records::{
    Ack, DashboardOverview, ErrorBody, LoginRequest, LoginResponse, LogoutRequest,
    UploadResponse, VerifyResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{AdminApi, ApiError, ApiResult, CallContext};
use crate::config::ConsoleConfig;
use crate::resource::ResourceKind;
use crate::upload::ImageAsset;

/// Admin API client over HTTP.
#[derive(Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
}

impl HttpAdminApi {
    pub fn new(config: &ConsoleConfig) -> ApiResult<Self> {
        Self::with_client(Client::new(), &config.api_base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> ApiResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidInput(format!("bad API base URL {}: {}", base_url, e)))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`, with the session token appended as
    /// `session_id` when given.
    fn endpoint(&self, path: &str, token: Option<&str>) -> ApiResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::InvalidInput(format!("bad endpoint {}: {}", path, e)))?;
        if let Some(token) = token {
            url.query_pairs_mut().append_pair("session_id", token);
        }
        Ok(url)
    }

    fn resource_endpoint(
        &self,
        kind: ResourceKind,
        id: Option<&str>,
        token: &str,
    ) -> ApiResult<Url> {
        let mut url = self.endpoint(&format!("/api/admin/{}", kind.path()), Some(token))?;
        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|_| ApiError::InvalidInput("base URL cannot carry a path".to_string()))?
                .push(id);
        }
        Ok(url)
    }

    /// Send `request`, racing it against the call's cancellation token.
    /// Non-2xx answers become [`ApiError::Status`] carrying the server's
    /// `detail` when it sent one.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        ctx: &CallContext,
    ) -> ApiResult<T> {
        if ctx.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let request = request.timeout(ctx.deadline);
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let detail = response
                    .json::<ErrorBody>()
                    .await
                    .map(|body| body.detail)
                    .unwrap_or_else(|_| {
                        status
                            .canonical_reason()
                            .unwrap_or("request failed")
                            .to_string()
                    });
                debug!(status = %status, detail = %detail, "Admin API request rejected");
                return Err(ApiError::Status(status, detail));
            }

            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        };

        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => Err(ApiError::Cancelled),
            result = exchange => result,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        ctx: &CallContext,
    ) -> ApiResult<T> {
        debug!(method = %method, path = url.path(), "Admin API request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, ctx).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AdminApi for HttpAdminApi {
    async fn login(
        &self,
        credentials: &LoginRequest,
        ctx: &CallContext,
    ) -> ApiResult<LoginResponse> {
        let url = self.endpoint("/api/admin/login", None)?;
        let request = self.client.post(url).json(credentials);
        self.send(request, ctx).await
    }

    async fn verify(&self, token: &str, ctx: &CallContext) -> ApiResult<Option<String>> {
        let url = self.endpoint("/api/admin/verify", Some(token))?;
        let body: Value = self.call(Method::GET, url, None, ctx).await?;
        Ok(serde_json::from_value::<VerifyResponse>(body)
            .ok()
            .map(|resp| resp.username))
    }

    async fn logout(&self, token: &str, ctx: &CallContext) -> ApiResult<()> {
        let url = self.endpoint("/api/admin/logout", None)?;
        let request = self.client.post(url).json(&LogoutRequest {
            session_id: token.to_string(),
        });
        let _: Value = self.send(request, ctx).await?;
        Ok(())
    }

    async fn list(
        &self,
        kind: ResourceKind,
        token: &str,
        ctx: &CallContext,
    ) -> ApiResult<Vec<Value>> {
        let url = self.resource_endpoint(kind, None, token)?;
        self.call(Method::GET, url, None, ctx).await
    }

    async fn create(
        &self,
        kind: ResourceKind,
        token: &str,
        record: &Value,
        ctx: &CallContext,
    ) -> ApiResult<Ack> {
        let url = self.resource_endpoint(kind, None, token)?;
        self.call(Method::POST, url, Some(record), ctx).await
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        token: &str,
        record: &Value,
        ctx: &CallContext,
    ) -> ApiResult<Ack> {
        let url = self.resource_endpoint(kind, Some(id), token)?;
        self.call(Method::PUT, url, Some(record), ctx).await
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        id: &str,
        token: &str,
        ctx: &CallContext,
    ) -> ApiResult<Ack> {
        let url = self.resource_endpoint(kind, Some(id), token)?;
        self.call(Method::DELETE, url, None, ctx).await
    }

    async fn upload_image(
        &self,
        token: &str,
        asset: &ImageAsset,
        ctx: &CallContext,
    ) -> ApiResult<UploadResponse> {
        let url = self.endpoint("/api/admin/upload-image", None)?;
        let part = Part::bytes(asset.bytes.clone())
            .file_name(asset.file_name.clone())
            .mime_str(&asset.content_type)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("session_id", token.to_string());

        debug!(file = %asset.file_name, size = asset.bytes.len(), "Uploading image");
        let request = self.client.post(url).multipart(form);
        self.send(request, ctx).await
    }

    async fn dashboard(&self, token: &str, ctx: &CallContext) -> ApiResult<DashboardOverview> {
        let url = self.endpoint("/api/admin/dashboard-stats", Some(token))?;
        self.call(Method::GET, url, None, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpAdminApi {
        HttpAdminApi::with_client(Client::new(), base).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_token() {
        let url = api("http://localhost:8000/")
            .endpoint("/api/admin/verify", Some("a+b/c=="))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/admin/verify?session_id=a%2Bb%2Fc%3D%3D"
        );
    }

    #[test]
    fn test_resource_endpoint_with_id() {
        let url = api("http://localhost:8000")
            .resource_endpoint(ResourceKind::TeamMember, Some("m 1"), "tok")
            .unwrap();
        assert_eq!(url.path(), "/api/admin/team-members/m%201");
        assert_eq!(url.query(), Some("session_id=tok"));
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let url = api("https://example.org/backend")
            .resource_endpoint(ResourceKind::ContactMessage, None, "tok")
            .unwrap();
        assert_eq!(url.path(), "/backend/api/admin/contact-forms");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(HttpAdminApi::with_client(Client::new(), "not a url").is_err());
    }

    #[tokio::test]
    async fn test_cancelled_context_sends_nothing() {
        // Port 9 (discard) would fail to connect; cancellation must win first.
        let api = api("http://127.0.0.1:9");
        let ctx = CallContext::new(std::time::Duration::from_secs(5));
        ctx.cancel.cancel();

        let result = api.verify("tok", &ctx).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
