//! Amazon Bedrock Titan text embeddings.
//!
//! Calls the Bedrock runtime `InvokeModel` endpoint with a Bedrock API key
//! sent as a bearer token, so no request signing is involved.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, error_from_response};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Titan text embeddings v2.
pub const DEFAULT_MODEL: &str = "amazon.titan-embed-text-v2:0";

/// Amazon Bedrock Titan embedding provider.
pub struct BedrockTitanProvider {
    /// Bedrock API key.
    api_key: Option<String>,

    /// AWS region hosting the runtime endpoint.
    region: String,

    /// Explicit endpoint, overriding the regional one.
    endpoint: Option<String>,

    /// HTTP client.
    client: reqwest::Client,

    /// Model ID.
    model: String,

    /// Requested output dimensions (v2 accepts 256, 512 or 1024).
    dimensions: Option<usize>,

    /// Ask the model for unit-length vectors.
    normalize: Option<bool>,
}

impl BedrockTitanProvider {
    /// Environment variable holding the Bedrock API key.
    pub const API_KEY_ENV: &'static str = "AWS_BEARER_TOKEN_BEDROCK";

    /// Create a new provider, reading the key from the environment.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var(Self::API_KEY_ENV).ok(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: None,
            normalize: None,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Override the runtime endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the model ID.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Request a specific output dimension.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Ask for normalized vectors.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = Some(normalize);
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Base URL of the runtime endpoint.
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
        }
    }

    fn invoke_url(&self, model: &str) -> String {
        format!("{}/model/{model}/invoke", self.endpoint())
    }
}

impl Default for BedrockTitanProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for BedrockTitanProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn default_dimension(&self) -> usize {
        match (self.dimensions, self.model.as_str()) {
            (Some(dims), _) => dims,
            (None, "amazon.titan-embed-text-v1") => 1536,
            (None, _) => 1024,
        }
    }

    fn settings_fingerprint(&self) -> String {
        let dimensions = self
            .dimensions
            .map_or_else(|| "default".to_string(), |d| d.to_string());
        let normalize = match self.normalize {
            Some(true) => "true",
            Some(false) => "false",
            None => "default",
        };
        format!("dimensions={dimensions};normalize={normalize}")
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EmbeddingError::ProviderNotConfigured(self.name().to_string()))?;

        let model = request.model.unwrap_or_else(|| self.model.clone());
        let dimensions = request.dimensions.or(self.dimensions);

        debug!("Invoking Bedrock model {model} in {}", self.region);

        let body = TitanRequest {
            input_text: &request.text,
            dimensions,
            normalize: self.normalize,
        };

        let response = self
            .client
            .post(self.invoke_url(&model))
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let result: TitanResponse = response.json().await?;

        let embedding = result
            .embedding
            .ok_or_else(|| EmbeddingError::InvalidResponse("missing `embedding` field".to_string()))?;

        let dimension = embedding.len();
        match dimensions {
            Some(expected) if expected != dimension => {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: dimension,
                });
            }
            _ => {}
        }

        info!("Generated embedding with {dimension} dimensions");

        Ok(EmbeddingResponse {
            embedding,
            model,
            dimension,
            tokens_used: result.input_text_token_count,
        })
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Titan `InvokeModel` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalize: Option<bool>,
}

/// Titan `InvokeModel` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResponse {
    embedding: Option<Vec<f32>>,
    input_text_token_count: Option<u64>,
}
