//! Text-to-image generation client
//!
//! Submits a txt2img job, polls the status endpoint until the job completes,
//! downloads the first output URL and saves it under the configured output
//! directory. Every failure along the way degrades to "no image": the error
//! is logged and the chapter simply goes unillustrated.

use crate::config::ImageConfig;
use crate::error::{MemoirError, Result};
use crate::utils::{content_fingerprint, ensure_directory};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Txt2ImgRequest<'a> {
    prompt: &'a str,
    negprompt: &'a str,
    samples: u32,
    steps: u32,
    aspect_ratio: &'a str,
    guidance_scale: f32,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    process_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    result: Option<JobResult>,
}

#[derive(Debug, Deserialize)]
struct JobResult {
    #[serde(default)]
    output: Vec<String>,
}

/// Client for the hosted text-to-image service
pub struct ImageGenerator {
    http: reqwest::Client,
    config: ImageConfig,
    api_key: String,
}

impl ImageGenerator {
    /// Create a generator from configuration; the API key is read from the
    /// configured environment variable.
    pub fn new(config: ImageConfig) -> Result<Self> {
        let api_key = config.api_key()?;

        Ok(Self {
            http: reqwest::Client::new(),
            config,
            api_key,
        })
    }

    /// Generate an image for the prompt and return its local path.
    ///
    /// Returns `None` when the service fails at any stage; the error is
    /// logged and the caller continues without an image.
    pub async fn generate(&self, prompt: &str) -> Option<String> {
        match self.try_generate(prompt).await {
            Ok(path) => {
                log::info!("Image saved at {}", path);
                Some(path)
            }
            Err(e) => {
                log::error!("Error generating image: {}", e);
                None
            }
        }
    }

    async fn try_generate(&self, prompt: &str) -> Result<String> {
        let process_id = self.submit_job(prompt).await?;
        let image_url = self.wait_for_output(&process_id).await?;
        self.download_image(&image_url, prompt).await
    }

    /// Submit the txt2img job and return its process id
    async fn submit_job(&self, prompt: &str) -> Result<String> {
        let payload = Txt2ImgRequest {
            prompt,
            negprompt: &self.config.negative_prompt,
            samples: self.config.samples,
            steps: self.config.steps,
            aspect_ratio: &self.config.aspect_ratio,
            guidance_scale: self.config.guidance_scale,
            seed: self.config.seed,
        };

        let response = self
            .http
            .post(format!("{}/generate/txt2img", self.config.api_base))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let submit: SubmitResponse = response.json().await?;
        log::debug!("Submitted txt2img job {}", submit.process_id);
        Ok(submit.process_id)
    }

    /// Poll the status endpoint until the job completes or the timeout passes
    async fn wait_for_output(&self, process_id: &str) -> Result<String> {
        let deadline = std::time::Instant::now()
            + Duration::from_secs(self.config.poll_timeout_secs);

        loop {
            let response = self
                .http
                .get(format!("{}/status/{}", self.config.api_base, process_id))
                .bearer_auth(&self.api_key)
                .send()
                .await?
                .error_for_status()?;

            let status: StatusResponse = response.json().await?;

            match status.status.as_str() {
                "COMPLETED" => {
                    let url = status
                        .result
                        .and_then(|r| r.output.into_iter().next())
                        .ok_or_else(|| {
                            MemoirError::ImageGeneration(format!(
                                "Job {} completed without output",
                                process_id
                            ))
                        })?;
                    return Ok(url);
                }
                "FAILED" => {
                    return Err(MemoirError::ImageGeneration(format!(
                        "Job {} failed",
                        process_id
                    )));
                }
                other => {
                    log::debug!("Job {} status: {}", process_id, other);
                }
            }

            if std::time::Instant::now() >= deadline {
                return Err(MemoirError::ImageGeneration(format!(
                    "Timed out waiting for job {}",
                    process_id
                )));
            }

            tokio::time::sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
        }
    }

    /// Download the image and write it under the output directory
    async fn download_image(&self, url: &str, prompt: &str) -> Result<String> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        ensure_directory(&self.config.output_dir)?;

        let file_name = format!("{:x}.png", content_fingerprint(prompt));
        let path = PathBuf::from(&self.config.output_dir).join(file_name);
        std::fs::write(&path, &bytes)?;

        Ok(path.to_string_lossy().to_string())
    }
}
