use reqwest::Client;
use serde_json::{json, Value};

use crate::{
    error::{GenError, Result},
    models::AspectRatio,
};

pub const MODEL_ID: &str = "nano-banana-pro";

/// The provider requires a callback URL even when results are collected by
/// polling; it is never invoked by this client.
const CALLBACK_URL: &str = "https://placeholder.com/callback";

/// Fields probed, in order, for the job identifier. The provider is not
/// consistent about where it puts the id across job types.
const JOB_ID_FIELDS: [&[&str]; 6] = [
    &["data", "taskId"],
    &["data", "task_id"],
    &["data", "id"],
    &["task_id"],
    &["id"],
    &["jobId"],
];

/// Creates generation jobs and hands back the opaque job id to poll on.
#[derive(Clone, Debug)]
pub struct JobSubmitter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl JobSubmitter {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    pub async fn submit(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        resolution_tag: &str,
        reference_urls: &[String],
    ) -> Result<String> {
        let mut input = json!({
            "prompt": prompt,
            "aspect_ratio": aspect_ratio.as_str(),
            "resolution": resolution_tag,
            "output_format": "png",
        });
        if !reference_urls.is_empty() {
            input["image_input"] = json!(reference_urls);
        }

        let body = json!({
            "model": MODEL_ID,
            "callBackUrl": CALLBACK_URL,
            "input": input,
        });

        log::info!("🎨 Submitting generation job ({} resolution)", resolution_tag);

        let response = self
            .client
            .post(format!("{}/createTask", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenError::Submission(format!("create request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body: Value = response.json().await.unwrap_or_else(|_| json!({}));
            let message = error_body["message"]
                .as_str()
                .or_else(|| error_body["msg"].as_str())
                .map(String::from)
                .unwrap_or_else(|| {
                    format!(
                        "API request failed: {}",
                        status.canonical_reason().unwrap_or("unknown status")
                    )
                });
            return Err(GenError::Submission(message));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| GenError::Submission(format!("malformed create response: {}", e)))?;

        // 2xx responses can still carry a provider-level error code.
        if let Some(code) = data["code"].as_i64() {
            if code != 0 && code != 200 {
                let message = data["msg"]
                    .as_str()
                    .or_else(|| data["message"].as_str())
                    .map(String::from)
                    .unwrap_or_else(|| format!("API returned error code: {}", code));
                return Err(GenError::Submission(message));
            }
        }

        let job_id = Self::extract_job_id(&data)
            .ok_or_else(|| GenError::Submission("no job id found".into()))?;

        log::info!("🆔 Job created: {}", job_id);
        Ok(job_id)
    }

    fn extract_job_id(data: &Value) -> Option<String> {
        for path in JOB_ID_FIELDS {
            let mut current = data;
            for key in path {
                current = &current[*key];
            }
            if let Some(id) = current.as_str() {
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
            // Some configurations report numeric ids.
            if let Some(id) = current.as_i64() {
                return Some(id.to_string());
            }
        }
        None
    }
}
