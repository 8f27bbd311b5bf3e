use crate::config::Config;
use crate::constants::{API_KEY_HEADER, EDIT_MODEL, IMAGEN_MODEL, OUTPUT_MIME_TYPE};
use crate::edit::{ApiErrorResponse, GenerateContentRequestBody, GenerateContentResponse, InlineData};
use crate::error::{ImageGenError, Result};
use crate::images::{ImagenPredictRequestBody, ImagenPredictResponse};
use crate::models::{AspectRatio, ImageData, ReferenceImage};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Response,
};
use serde::Serialize;

/// The two provider operations the batch requester depends on.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Text-to-image. Returns up to `count` images.
    async fn generate_images(
        &self,
        prompt: &str,
        count: u8,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<ImageData>>;

    /// Image-to-image. `Ok(None)` when the model answered without an image part.
    async fn edit_image(&self, prompt: &str, reference: &ReferenceImage) -> Result<Option<ImageData>>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.api_base, model, method)
    }

    pub fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| ImageGenError::Config(format!("invalid API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Response> {
        let response = self
            .client
            .post(url)
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }
        Err(provider_error(response).await)
    }
}

async fn provider_error(response: Response) -> ImageGenError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) if api_error.error.status.is_empty() => api_error.error.message,
        Ok(api_error) => format!("{} ({})", api_error.error.message, api_error.error.status),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body,
    };
    ImageGenError::Provider { status, message }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate_images(
        &self,
        prompt: &str,
        count: u8,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<ImageData>> {
        let url = self.endpoint(IMAGEN_MODEL, "predict");
        let body = ImagenPredictRequestBody::new(prompt, count, aspect_ratio.as_str());
        log::debug!("Requesting {} image(s) at {} from {}", count, aspect_ratio, IMAGEN_MODEL);

        let response: ImagenPredictResponse = self.post_json(&url, &body).await?.json().await?;
        let images = response
            .predictions
            .into_iter()
            .filter_map(|prediction| {
                let data = prediction.bytes_base64_encoded?;
                let mime_type = prediction
                    .mime_type
                    .unwrap_or_else(|| OUTPUT_MIME_TYPE.to_string());
                Some(ImageData::new(mime_type, data))
            })
            .take(count as usize)
            .collect();
        Ok(images)
    }

    async fn edit_image(&self, prompt: &str, reference: &ReferenceImage) -> Result<Option<ImageData>> {
        let url = self.endpoint(EDIT_MODEL, "generateContent");
        let body = GenerateContentRequestBody::new(
            InlineData {
                mime_type: reference.mime_type.clone(),
                data: reference.data.clone(),
            },
            prompt,
        );
        log::debug!("Requesting image edit from {}", EDIT_MODEL);

        let response: GenerateContentResponse = self.post_json(&url, &body).await?.json().await?;
        Ok(response
            .first_image()
            .map(|inline| ImageData::new(inline.mime_type, inline.data)))
    }
}
