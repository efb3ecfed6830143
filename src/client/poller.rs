use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{
    config::PollConfig,
    error::{GenError, Result},
    models::{Job, JobStatus},
};

type Extractor = fn(&Value) -> Option<String>;

/// Ordered result-URL probes. The provider's response schema varies by job
/// type and configuration, so the poller checks every shape seen in the
/// wild. The order is a contract: earlier shapes win, and new shapes get
/// appended, never inserted.
const EXTRACTORS: &[Extractor] = &[
    result_json_result_urls,
    result_json_image_url_camel,
    result_json_image_url_snake,
    output_image_url_snake,
    output_image_url_camel,
    output_url,
    output_as_string,
    result_image_url_snake,
    result_image_url_camel,
    result_url,
    result_as_string,
    top_image_url_camel,
    top_image_url_snake,
    top_url,
    data_image_url,
    data_output_image_url,
    images_first_url,
    images_first_as_string,
    output_array_image_url,
];

/// Some job types wrap the result in a JSON-encoded string field.
fn parsed_result_json(job: &Value) -> Option<Value> {
    let raw = job["resultJson"].as_str()?;
    serde_json::from_str(raw).ok()
}

fn result_json_result_urls(job: &Value) -> Option<String> {
    let parsed = parsed_result_json(job)?;
    parsed["resultUrls"][0].as_str().map(String::from)
}

fn result_json_image_url_camel(job: &Value) -> Option<String> {
    let parsed = parsed_result_json(job)?;
    parsed["imageUrl"].as_str().map(String::from)
}

fn result_json_image_url_snake(job: &Value) -> Option<String> {
    let parsed = parsed_result_json(job)?;
    parsed["image_url"].as_str().map(String::from)
}

fn output_image_url_snake(job: &Value) -> Option<String> {
    job["output"]["image_url"].as_str().map(String::from)
}

fn output_image_url_camel(job: &Value) -> Option<String> {
    job["output"]["imageUrl"].as_str().map(String::from)
}

fn output_url(job: &Value) -> Option<String> {
    job["output"]["url"].as_str().map(String::from)
}

fn output_as_string(job: &Value) -> Option<String> {
    job["output"].as_str().map(String::from)
}

fn result_image_url_snake(job: &Value) -> Option<String> {
    job["result"]["image_url"].as_str().map(String::from)
}

fn result_image_url_camel(job: &Value) -> Option<String> {
    job["result"]["imageUrl"].as_str().map(String::from)
}

fn result_url(job: &Value) -> Option<String> {
    job["result"]["url"].as_str().map(String::from)
}

fn result_as_string(job: &Value) -> Option<String> {
    job["result"].as_str().map(String::from)
}

fn top_image_url_camel(job: &Value) -> Option<String> {
    job["imageUrl"].as_str().map(String::from)
}

fn top_image_url_snake(job: &Value) -> Option<String> {
    job["image_url"].as_str().map(String::from)
}

fn top_url(job: &Value) -> Option<String> {
    job["url"].as_str().map(String::from)
}

fn data_image_url(job: &Value) -> Option<String> {
    job["data"]["image_url"].as_str().map(String::from)
}

fn data_output_image_url(job: &Value) -> Option<String> {
    job["data"]["output"]["image_url"].as_str().map(String::from)
}

fn images_first_url(job: &Value) -> Option<String> {
    job["images"].as_array()?;
    job["images"][0]["url"].as_str().map(String::from)
}

fn images_first_as_string(job: &Value) -> Option<String> {
    job["images"].as_array()?;
    job["images"][0].as_str().map(String::from)
}

fn output_array_image_url(job: &Value) -> Option<String> {
    job["output"].as_array()?;
    job["output"][0]["image_url"].as_str().map(String::from)
}

fn is_http_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

/// First candidate, in extractor order, that is a well-formed http(s) URL.
pub(crate) fn extract_result_url(job: &Value) -> Option<String> {
    EXTRACTORS
        .iter()
        .filter_map(|extract| extract(job))
        .find(|candidate| is_http_url(candidate))
}

/// Normalized status token, read from `status` or `state`, uppercased.
/// Numeric statuses are stringified. Anything else counts as absent, which
/// the poll loop treats as pending.
fn normalized_status(job: &Value) -> Option<String> {
    let raw = job
        .get("status")
        .filter(|v| !v.is_null())
        .or_else(|| job.get("state"))?;
    match raw {
        Value::String(s) => Some(s.to_uppercase()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn failure_message(job: &Value) -> String {
    job["error"]
        .as_str()
        .or_else(|| job["failReason"].as_str())
        .or_else(|| job["msg"].as_str())
        .unwrap_or("Image generation failed")
        .to_string()
}

/// Polls a generation job to a terminal state: bounded attempts, fixed
/// inter-attempt wait, sequential queries. Transient transport failures are
/// retried within the attempt budget; job failure and extraction failure are
/// terminal.
#[derive(Clone, Debug)]
pub struct JobPoller {
    client: Client,
    api_key: String,
    base_url: String,
    max_attempts: u32,
    interval: Duration,
}

impl JobPoller {
    pub fn new(client: Client, api_key: String, base_url: String, config: &PollConfig) -> Self {
        Self {
            client,
            api_key,
            base_url,
            max_attempts: config.max_attempts,
            interval: Duration::from_millis(config.interval_ms),
        }
    }

    /// Drive the job to a terminal state and return its result URL.
    pub async fn poll(&self, job_id: &str) -> Result<String> {
        let mut job = Job::new(job_id);

        for attempt in 1..=self.max_attempts {
            let payload = match self.query_status(job_id).await {
                Ok(payload) => payload,
                Err(e) => {
                    if attempt == self.max_attempts {
                        return Err(e);
                    }
                    log::warn!("🔁 Poll attempt {} failed: {}", attempt, e);
                    tokio::time::sleep(self.interval).await;
                    continue;
                }
            };

            // Some responses wrap the job payload in a data envelope.
            let job_data = payload
                .get("data")
                .filter(|d| d.is_object())
                .unwrap_or(&payload);

            let status = normalized_status(job_data)
                .map(|token| JobStatus::from_token(&token))
                .unwrap_or(JobStatus::Pending);

            match status {
                JobStatus::Succeeded => {
                    return match extract_result_url(job_data) {
                        Some(url) => {
                            job.succeed(url.clone());
                            log::info!("✅ Job {} completed: {}", job.id, url);
                            Ok(url)
                        }
                        None => {
                            log::error!(
                                "Job {} reported success but no URL was found in: {}",
                                job.id,
                                payload
                            );
                            Err(GenError::Extraction(
                                "job completed but no valid image URL found in response".into(),
                            ))
                        }
                    };
                }
                JobStatus::Failed => {
                    let message = failure_message(job_data);
                    job.fail(message.clone());
                    return Err(GenError::Job(message));
                }
                _ => {
                    log::debug!("⏳ Job {} still pending (attempt {})", job.id, attempt);
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        job.time_out();
        Err(GenError::Timeout(format!(
            "image generation timed out after {} attempts",
            self.max_attempts
        )))
    }

    async fn query_status(&self, job_id: &str) -> Result<Value> {
        let response = self
            .client
            .get(format!("{}/recordInfo", self.base_url))
            .query(&[("taskId", job_id)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| GenError::Request(format!("status query failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenError::Request(format!(
                "status check failed: {}",
                status.canonical_reason().unwrap_or("unknown status")
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GenError::Request(format!("malformed status response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn poller(url: &str, max_attempts: u32) -> JobPoller {
        let config = PollConfig::new()
            .with_max_attempts(max_attempts)
            .with_interval_ms(1);
        JobPoller::new(
            Client::new(),
            "test-key".to_string(),
            url.to_string(),
            &config,
        )
    }

    fn status_mock(server: &mut mockito::Server, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/recordInfo")
            .match_query(Matcher::UrlEncoded("taskId".into(), "task-1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    #[tokio::test]
    async fn test_success_with_output_image_url() {
        let mut server = mockito::Server::new_async().await;
        let _m = status_mock(
            &mut server,
            r#"{"status": "SUCCESS", "output": {"image_url": "https://x/y.png"}}"#,
        )
        .create_async()
        .await;

        let url = poller(&server.url(), 3).poll("task-1").await.unwrap();
        assert_eq!(url, "https://x/y.png");
    }

    #[tokio::test]
    async fn test_failed_state_carries_provider_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = status_mock(&mut server, r#"{"state": "FAILED", "msg": "bad prompt"}"#)
            .create_async()
            .await;

        let err = poller(&server.url(), 3).poll("task-1").await.unwrap_err();
        match err {
            GenError::Job(msg) => assert!(msg.contains("bad prompt")),
            other => panic!("expected Job error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_without_url_is_extraction_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = status_mock(&mut server, r#"{"status": "SUCCESS"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = poller(&server.url(), 5).poll("task-1").await.unwrap_err();
        assert!(matches!(err, GenError::Extraction(_)));
        // Terminal: no retry even though attempts remained.
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_times_out_after_exact_attempt_budget() {
        let mut server = mockito::Server::new_async().await;
        let mock = status_mock(&mut server, r#"{"status": "PENDING"}"#)
            .expect(60)
            .create_async()
            .await;

        let err = poller(&server.url(), 60).poll("task-1").await.unwrap_err();
        assert!(matches!(err, GenError::Timeout(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_errors_retried_then_propagated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/recordInfo")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let err = poller(&server.url(), 3).poll("task-1").await.unwrap_err();
        assert!(matches!(err, GenError::Request(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_status_field_counts_as_pending() {
        let mut server = mockito::Server::new_async().await;
        let mock = status_mock(&mut server, r#"{"progress": 0.4}"#)
            .expect(2)
            .create_async()
            .await;

        let err = poller(&server.url(), 2).poll("task-1").await.unwrap_err();
        assert!(matches!(err, GenError::Timeout(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_numeric_status_and_data_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _m = status_mock(
            &mut server,
            r#"{"data": {"status": 1, "output": {"url": "https://cdn/z.png"}}}"#,
        )
        .create_async()
        .await;

        let url = poller(&server.url(), 3).poll("task-1").await.unwrap();
        assert_eq!(url, "https://cdn/z.png");
    }

    #[test]
    fn test_result_json_wins_over_output() {
        let job = json!({
            "resultJson": "{\"resultUrls\": [\"https://first/a.png\"]}",
            "output": {"image_url": "https://second/b.png"}
        });
        assert_eq!(
            extract_result_url(&job).unwrap(),
            "https://first/a.png"
        );
    }

    #[test]
    fn test_non_http_candidates_are_skipped() {
        let job = json!({
            "imageUrl": "not-a-url",
            "url": "https://valid/c.png"
        });
        assert_eq!(extract_result_url(&job).unwrap(), "https://valid/c.png");
    }

    #[test]
    fn test_plain_string_and_array_shapes() {
        let plain = json!({"output": "https://plain/d.png"});
        assert_eq!(extract_result_url(&plain).unwrap(), "https://plain/d.png");

        let images = json!({"images": [{"url": "https://imgs/e.png"}]});
        assert_eq!(extract_result_url(&images).unwrap(), "https://imgs/e.png");

        let string_images = json!({"images": ["https://imgs/f.png"]});
        assert_eq!(
            extract_result_url(&string_images).unwrap(),
            "https://imgs/f.png"
        );

        let output_array = json!({"output": [{"image_url": "https://arr/g.png"}]});
        assert_eq!(
            extract_result_url(&output_array).unwrap(),
            "https://arr/g.png"
        );
    }

    #[test]
    fn test_malformed_result_json_falls_through() {
        let job = json!({
            "resultJson": "{not json",
            "output": {"image_url": "https://fallback/h.png"}
        });
        assert_eq!(
            extract_result_url(&job).unwrap(),
            "https://fallback/h.png"
        );
    }

    #[test]
    fn test_no_candidates_yields_none() {
        assert!(extract_result_url(&json!({"status": "SUCCESS"})).is_none());
    }
}
