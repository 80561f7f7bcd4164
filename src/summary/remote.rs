//! Remote summarization engine.
//!
//! Posts one chunk per request to an HTTP inference endpoint that fronts a
//! summarization model, with explicit generation bounds and sampling
//! disabled so repeated runs produce identical bullets.

use crate::error::PipelineError;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{SummaryEngine, SummaryOptions};

#[derive(Debug, Serialize)]
struct SummaryPayload<'a> {
    inputs: &'a str,
    parameters: SummaryParameters,
}

#[derive(Debug, Serialize)]
struct SummaryParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary_text: String,
}

pub struct RemoteSummaryEngine {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteSummaryEngine {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        info!("Initialized remote summary engine with endpoint: {}", endpoint);

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }
}

#[async_trait]
impl SummaryEngine for RemoteSummaryEngine {
    fn name(&self) -> &'static str {
        "remote-summary"
    }

    async fn summarize(
        &self,
        text: &str,
        options: &SummaryOptions,
    ) -> Result<String, PipelineError> {
        let body = SummaryPayload {
            inputs: text,
            parameters: SummaryParameters {
                max_length: options.max_length,
                min_length: options.min_length,
                do_sample: options.sample,
            },
        };

        debug!("Summarizing chunk of {} chars", text.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::model_failure("remote-summary", e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| PipelineError::model_failure("remote-summary", e))?;

        if !status.is_success() {
            error!(
                "Summarization request failed with status {}: {}",
                status, response_text
            );
            return Err(PipelineError::model_failure(
                "remote-summary",
                format!("request failed with status {}", status),
            ));
        }

        // The endpoint returns either a bare object or a one-element array,
        // matching common summarization-pipeline servers
        let summary = match serde_json::from_str::<SummaryResponse>(&response_text) {
            Ok(parsed) => parsed.summary_text,
            Err(_) => serde_json::from_str::<Vec<SummaryResponse>>(&response_text)
                .ok()
                .and_then(|mut list| list.pop())
                .map(|r| r.summary_text)
                .ok_or_else(|| {
                    PipelineError::model_failure(
                        "remote-summary",
                        "unrecognized response shape",
                    )
                })?,
        };

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_generation_bounds() {
        let payload = SummaryPayload {
            inputs: "some text",
            parameters: SummaryParameters {
                max_length: 160,
                min_length: 25,
                do_sample: false,
            },
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"max_length\":160"));
        assert!(json.contains("\"min_length\":25"));
        assert!(json.contains("\"do_sample\":false"));
    }

    #[test]
    fn test_response_parsing_object_and_array() {
        let object = r#"{"summary_text":"A point."}"#;
        let parsed: SummaryResponse = serde_json::from_str(object).unwrap();
        assert_eq!(parsed.summary_text, "A point.");

        let array = r#"[{"summary_text":"A point."}]"#;
        let parsed: Vec<SummaryResponse> = serde_json::from_str(array).unwrap();
        assert_eq!(parsed[0].summary_text, "A point.");
    }
}
