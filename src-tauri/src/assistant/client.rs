//! HTTP client for the external assistant service.
//!
//! One method per endpoint; every call is a single POST with no retry,
//! no cancellation, and the client-wide 30 second timeout. Non-2xx
//! statuses map uniformly to [`ShopMateError::Status`].

use std::time::Duration;

use indexmap::IndexMap;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use tracing::info;
use url::Url;

use super::types::{
    AnalyzeImageResponse, ClarifyRequest, ClarifyingQuestion, FeedbackRequest, Product,
    RecommendRequest, RecommendResponse, SummarizeRequest, SummarizeResponse,
};
use crate::error::ShopMateError;

pub struct AssistantClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AssistantClient {
    /// Build a client for the given service origin.
    pub fn new(base_url: &str) -> Result<Self, ShopMateError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ShopMateError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .user_agent("ShopMate/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ShopMateError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ShopMateError> {
        self.base_url
            .join(path)
            .map_err(|e| ShopMateError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// POST the prepared JPEG to `/analyze-image` as a multipart file field.
    pub async fn analyze_image(
        &self,
        jpeg_bytes: Vec<u8>,
    ) -> Result<AnalyzeImageResponse, ShopMateError> {
        info!("Uploading product photo ({} bytes)", jpeg_bytes.len());
        let part = multipart::Part::bytes(jpeg_bytes)
            .file_name("upload.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| ShopMateError::Config(format!("Failed to build upload part: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/analyze-image")?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ShopMateError::Transport(e.to_string()))?;

        Self::parse_json(response).await
    }

    /// Fetch the clarifying question set for a product type.
    pub async fn clarify_preferences(
        &self,
        product_type: &str,
    ) -> Result<Vec<ClarifyingQuestion>, ShopMateError> {
        info!("Fetching clarifying questions for '{}'", product_type);
        let response = self
            .client
            .post(self.endpoint("/clarify-preferences")?)
            .json(&ClarifyRequest { product_type })
            .send()
            .await
            .map_err(|e| ShopMateError::Transport(e.to_string()))?;

        Self::parse_json(response).await
    }

    /// Fetch ranked recommendations for a product type and preference map.
    pub async fn recommend(
        &self,
        product_type: &str,
        preferences: &IndexMap<String, String>,
    ) -> Result<Vec<Product>, ShopMateError> {
        info!("Fetching recommendations for '{}'", product_type);
        let response = self
            .client
            .post(self.endpoint("/recommend")?)
            .json(&RecommendRequest {
                product_type,
                preferences,
            })
            .send()
            .await
            .map_err(|e| ShopMateError::Transport(e.to_string()))?;

        let body: RecommendResponse = Self::parse_json(response).await?;
        Ok(body.recommendations)
    }

    /// Request a natural-language session summary.
    pub async fn summarize(
        &self,
        product_type: &str,
        preferences: &IndexMap<String, String>,
        recommendations: &[Product],
        cart: &[Product],
    ) -> Result<String, ShopMateError> {
        info!("Fetching session summary");
        let response = self
            .client
            .post(self.endpoint("/summarize")?)
            .json(&SummarizeRequest {
                product_type,
                preferences,
                recommendations,
                cart,
            })
            .send()
            .await
            .map_err(|e| ShopMateError::Transport(e.to_string()))?;

        let body: SummarizeResponse = Self::parse_json(response).await?;
        Ok(body.summary)
    }

    /// Submit free-text feedback. The response body is ignored; callers
    /// treat failures as best-effort telemetry loss.
    pub async fn send_feedback(&self, feedback: &str) -> Result<(), ShopMateError> {
        let response = self
            .client
            .post(self.endpoint("/feedback")?)
            .json(&FeedbackRequest { feedback })
            .send()
            .await
            .map_err(|e| ShopMateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShopMateError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(())
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ShopMateError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ShopMateError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ShopMateError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        let result = AssistantClient::new("not a url");
        assert!(matches!(result, Err(ShopMateError::Config(_))));
    }

    #[test]
    fn accepts_origin_with_port() {
        assert!(AssistantClient::new("http://localhost:8000").is_ok());
    }
}
