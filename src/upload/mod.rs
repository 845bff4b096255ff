//! Upload Adapter
//!
//! Sends one image to the server and hands back the stored path. It runs
//! outside the form's submit cycle: the caller writes the path into the open
//! draft with [`crate::form::FormMachine::apply_upload`]. No retries, no
//! queue.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{AdminApi, CallContext};
use crate::error::{ConsoleError, ConsoleResult};
use crate::session::SessionContext;

/// A file picked by the operator.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub struct UploadAdapter {
    api: Arc<dyn AdminApi>,
}

impl UploadAdapter {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    /// Upload `asset` and return its server-relative path.
    pub async fn upload(
        &self,
        asset: &ImageAsset,
        session: &SessionContext,
        ctx: &CallContext,
    ) -> ConsoleResult<String> {
        if !asset.is_image() {
            warn!(file = %asset.file_name, content_type = %asset.content_type, "Refusing non-image upload");
            return Err(ConsoleError::UnsupportedFile(asset.content_type.clone()));
        }

        let response = self
            .api
            .upload_image(session.token(), asset, ctx)
            .await
            .map_err(|e| {
                warn!(file = %asset.file_name, "Image upload failed: {}", e);
                ConsoleError::from(e)
            })?;

        info!(path = %response.image_url, "Image uploaded");
        Ok(response.image_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeAdminApi;
    use std::time::Duration;

    fn ctx() -> CallContext {
        CallContext::new(Duration::from_secs(5))
    }

    fn png() -> ImageAsset {
        ImageAsset::new("avatar.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[tokio::test]
    async fn test_upload_returns_server_path() {
        let fake = Arc::new(FakeAdminApi::new());
        let session = fake.open_session("admin").await;
        let adapter = UploadAdapter::new(fake.clone());

        let path = adapter.upload(&png(), &session, &ctx()).await.unwrap();

        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with("avatar.png"));
        assert_eq!(fake.uploads().await, vec![path]);
    }

    #[tokio::test]
    async fn test_non_image_is_refused_locally() {
        let fake = Arc::new(FakeAdminApi::new());
        let session = fake.open_session("admin").await;
        let adapter = UploadAdapter::new(fake.clone());
        let pdf = ImageAsset::new("cv.pdf", "application/pdf", vec![1, 2, 3]);

        let err = adapter.upload(&pdf, &session, &ctx()).await.unwrap_err();

        assert_eq!(err, ConsoleError::UnsupportedFile("application/pdf".to_string()));
        assert_eq!(fake.calls("upload").await, 0);
    }

    #[tokio::test]
    async fn test_upload_failure_is_reported() {
        let fake = Arc::new(FakeAdminApi::new());
        let session = fake.open_session("admin").await;
        fake.set_offline(true).await;

        let err = UploadAdapter::new(fake.clone())
            .upload(&png(), &session, &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, ConsoleError::Network(_)));
        assert!(fake.uploads().await.is_empty());
    }

    #[test]
    fn test_content_type_check_is_case_insensitive() {
        assert!(ImageAsset::new("a.JPG", "IMAGE/JPEG", Vec::new()).is_image());
        assert!(!ImageAsset::new("a", "", Vec::new()).is_image());
    }

    #[test]
    fn test_debug_omits_bytes() {
        let printed = format!("{:?}", png());
        assert!(printed.contains("len: 4"));
    }
}
