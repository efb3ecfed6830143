use futures::future::try_join_all;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::{ImgbbConfig, DEFAULT_IMGBB_UPLOAD_URL, IMGBB_PLACEHOLDER_KEY},
    error::{GenError, Result},
    models::{ImageBlob, UploadedAsset},
};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<UploadData>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Pushes reference image blobs to the hosting service and hands back public
/// URLs the generation provider can fetch.
#[derive(Clone, Debug)]
pub struct AssetUploader {
    client: Client,
    api_key: Option<String>,
    upload_url: String,
}

impl AssetUploader {
    pub fn new(client: Client, config: &ImgbbConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            upload_url: config
                .upload_url
                .clone()
                .unwrap_or_else(|| DEFAULT_IMGBB_UPLOAD_URL.to_string()),
        }
    }

    /// Fail fast when the hosting key is unset or still the sample
    /// placeholder. Must run before any network call when images are present.
    pub fn ensure_configured(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            None | Some("") | Some(IMGBB_PLACEHOLDER_KEY) => Err(GenError::Config(
                "image hosting API key is missing; set IMGBB_API_KEY".into(),
            )),
            Some(key) => Ok(key),
        }
    }

    /// Upload a single blob, returning the asset with its public URL.
    pub async fn upload(&self, blob: &ImageBlob) -> Result<UploadedAsset> {
        let api_key = self.ensure_configured()?;

        let part = Part::bytes(blob.bytes.clone()).file_name(blob.file_name.clone());
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(&self.upload_url)
            .query(&[("key", api_key)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| GenError::Upload(format!("upload request failed: {}", e)))?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| GenError::Upload(format!("malformed upload response: {}", e)))?;

        if !body.success {
            let message = body
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(GenError::Upload(message));
        }

        let public_url = body
            .data
            .and_then(|d| d.url)
            .ok_or_else(|| GenError::Upload("no URL in upload response".into()))?;

        log::debug!("📤 Uploaded {} -> {}", blob.file_name, public_url);

        Ok(UploadedAsset {
            file_name: blob.file_name.clone(),
            public_url,
        })
    }

    /// Upload all blobs concurrently. The returned URLs are in input order,
    /// whatever order the individual uploads complete in.
    pub async fn upload_all(&self, blobs: &[ImageBlob]) -> Result<Vec<String>> {
        let assets = try_join_all(blobs.iter().map(|blob| self.upload(blob))).await?;
        Ok(assets.into_iter().map(|asset| asset.public_url).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn uploader(url: &str, key: Option<&str>) -> AssetUploader {
        let mut config = ImgbbConfig::new().with_upload_url(url);
        config.api_key = key.map(String::from);
        AssetUploader::new(Client::new(), &config)
    }

    #[test]
    fn test_guard_rejects_missing_and_placeholder_keys() {
        assert!(matches!(
            uploader("http://unused", None).ensure_configured(),
            Err(GenError::Config(_))
        ));
        assert!(matches!(
            uploader("http://unused", Some(IMGBB_PLACEHOLDER_KEY)).ensure_configured(),
            Err(GenError::Config(_))
        ));
        assert!(uploader("http://unused", Some("real-key"))
            .ensure_configured()
            .is_ok());
    }

    #[tokio::test]
    async fn test_upload_returns_nested_url() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .match_query(Matcher::UrlEncoded("key".into(), "real-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": {"url": "https://i.ibb.co/abc/ref.png"}}"#)
            .create_async()
            .await;

        let uploader = uploader(&server.url(), Some("real-key"));
        let blob = ImageBlob::new("ref.png", vec![1, 2, 3]);
        let asset = uploader.upload(&blob).await.unwrap();
        assert_eq!(asset.public_url, "https://i.ibb.co/abc/ref.png");
    }

    #[tokio::test]
    async fn test_upload_surfaces_provider_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false, "error": {"message": "Invalid API key"}}"#)
            .create_async()
            .await;

        let uploader = uploader(&server.url(), Some("real-key"));
        let blob = ImageBlob::new("ref.png", vec![1, 2, 3]);
        let err = uploader.upload(&blob).await.unwrap_err();
        match err {
            GenError::Upload(msg) => assert!(msg.contains("Invalid API key")),
            other => panic!("expected Upload error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_all_preserves_input_order() {
        let mut server = mockito::Server::new_async().await;
        // Each mock keys off the filename inside the multipart body, so the
        // response-to-blob mapping is fixed regardless of completion order.
        let _first = server
            .mock("POST", "/")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("first.png".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": {"url": "https://i.ibb.co/one.png"}}"#)
            .create_async()
            .await;
        let _second = server
            .mock("POST", "/")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("second.png".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": {"url": "https://i.ibb.co/two.png"}}"#)
            .create_async()
            .await;
        let _third = server
            .mock("POST", "/")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("third.png".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": {"url": "https://i.ibb.co/three.png"}}"#)
            .create_async()
            .await;

        let uploader = uploader(&server.url(), Some("real-key"));
        let blobs = vec![
            ImageBlob::new("first.png", vec![1]),
            ImageBlob::new("second.png", vec![2]),
            ImageBlob::new("third.png", vec![3]),
        ];

        let urls = uploader.upload_all(&blobs).await.unwrap();
        assert_eq!(
            urls,
            vec![
                "https://i.ibb.co/one.png",
                "https://i.ibb.co/two.png",
                "https://i.ibb.co/three.png"
            ]
        );
    }
}
