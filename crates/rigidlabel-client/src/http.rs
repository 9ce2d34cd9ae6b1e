#![forbid(unsafe_code)]

//! Blocking HTTP implementation of [`TransformService`].

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use rigidlabel_core::TransformResult;
use serde::de::DeserializeOwned;

use crate::error::{ErrorCode, Result, ServiceError};
use crate::service::TransformService;
use crate::wire::{
    CheckerboardPreview, CheckerboardRequest, ComputeRequest, HealthInfo, Label, LabelListItem,
    LabelSaveResult, decode_response,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Connection settings for [`HttpTransformService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Extra attempts for idempotent GETs that fail transiently.
    pub retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            retries: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransformService {
    client: Client,
    base_url: String,
    retries: u32,
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

impl HttpTransformService {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url);
        if base_url.is_empty() {
            return Err(ServiceError::invalid("base_url must not be empty"));
        }
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            retries: config.retries,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    fn send<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> Result<T> {
        let response = request.header("Accept", "application/json").send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        tracing::debug!(
            target: "rigidlabel.client",
            endpoint,
            status,
            bytes = body.len(),
            "service response"
        );
        decode_response(endpoint, status, &body)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let mut attempt = 0_u32;
        loop {
            attempt = attempt.saturating_add(1);
            let request = self.client.get(self.url(endpoint)).query(query);
            match self.send(endpoint, request) {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt > self.retries || !error.is_transient() {
                        return Err(error);
                    }
                    let backoff_ms = 100_u64.saturating_mul(1_u64 << (attempt - 1).min(6));
                    tracing::warn!(
                        target: "rigidlabel.client",
                        endpoint,
                        attempt,
                        backoff_ms,
                        %error,
                        "retrying request"
                    );
                    thread::sleep(Duration::from_millis(backoff_ms));
                }
            }
        }
    }

    fn post<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.send(endpoint, request)
    }
}

impl TransformService for HttpTransformService {
    fn health(&self) -> Result<HealthInfo> {
        self.get("/health", &[])
    }

    fn compute(&self, request: &ComputeRequest) -> Result<TransformResult> {
        let _span = tracing::debug_span!(
            target: "rigidlabel.client",
            "compute",
            points = request.tie_points.len(),
            mode = %request.transform_mode
        )
        .entered();
        let result: TransformResult = self.post("/compute/rigid", request)?;
        tracing::info!(
            target: "rigidlabel.client",
            rms_error = result.rms_error,
            num_points = result.num_points,
            "transform computed"
        );
        Ok(result)
    }

    fn save_label(&self, label: &Label) -> Result<LabelSaveResult> {
        self.post("/labels/save", label)
    }

    fn load_label(&self, image_fixed: &str, image_moving: &str) -> Result<Option<Label>> {
        let query = [("image_fixed", image_fixed), ("image_moving", image_moving)];
        match self.get("/labels/load", &query) {
            Ok(label) => Ok(Some(label)),
            Err(ServiceError::Api {
                code: ErrorCode::LabelNotFound,
                ..
            }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn list_labels(&self) -> Result<Vec<LabelListItem>> {
        self.get("/labels/list", &[])
    }

    fn checkerboard(&self, request: &CheckerboardRequest) -> Result<CheckerboardPreview> {
        request.validate()?;
        self.post("/warp/checkerboard", request)
    }
}
