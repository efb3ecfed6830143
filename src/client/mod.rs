pub mod enhancer;
pub mod poller;
pub mod submitter;
pub mod uploader;

use reqwest::Client;

use crate::{
    config::{Config, DEFAULT_KIE_BASE_URL},
    error::{GenError, Result},
    models::{GenerationRequest, GenerationResult},
};

pub use enhancer::enhance;
pub use poller::JobPoller;
pub use submitter::JobSubmitter;
pub use uploader::AssetUploader;

/// Facade over the generation pipeline: validate → upload references →
/// submit job → poll to a terminal state.
#[derive(Clone, Debug)]
pub struct GenerationClient {
    uploader: AssetUploader,
    submitter: JobSubmitter,
    poller: JobPoller,
}

impl GenerationClient {
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .kie
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                GenError::Config("generation API key is missing; set KIE_API_KEY".into())
            })?;
        let base_url = config
            .kie
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_KIE_BASE_URL.to_string());

        let client = Client::new();

        Ok(Self {
            uploader: AssetUploader::new(client.clone(), &config.imgbb),
            submitter: JobSubmitter::new(client.clone(), api_key.clone(), base_url.clone()),
            poller: JobPoller::new(client, api_key, base_url, &config.poll),
        })
    }

    pub fn uploader(&self) -> &AssetUploader {
        &self.uploader
    }

    pub fn submitter(&self) -> &JobSubmitter {
        &self.submitter
    }

    pub fn poller(&self) -> &JobPoller {
        &self.poller
    }

    /// Run one full generation. Failures from any sub-step are logged here
    /// and propagated with their original message; no partial results.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        match self.run(&request).await {
            Ok(image_url) => Ok(GenerationResult {
                image_url,
                prompt: request.prompt,
            }),
            Err(e) => {
                log::error!("❌ Image generation failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&self, request: &GenerationRequest) -> Result<String> {
        request.validate()?;

        let resolution_tag = request.quality.resolution_tag();

        let mut reference_urls = Vec::new();
        if !request.images.is_empty() {
            // Guard before any network traffic.
            self.uploader.ensure_configured()?;
            reference_urls = self.uploader.upload_all(&request.images).await?;
            log::info!("📤 Uploaded {} reference image(s)", reference_urls.len());
        }

        let job_id = self
            .submitter
            .submit(
                &request.prompt,
                request.aspect_ratio,
                resolution_tag,
                &reference_urls,
            )
            .await?;

        self.poller.poll(&job_id).await
    }
}
