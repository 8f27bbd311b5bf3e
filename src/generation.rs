use crate::constants::{MAX_BATCH_IMAGES, MAX_IMAGES_PER_PROMPT, MIN_IMAGES_PER_PROMPT};
use crate::error::{ImageGenError, Result};
use crate::models::{apply_style, AspectRatio, GeneratedImage, ImageData, ImageStyle, ReferenceImage};
use crate::provider::ImageProvider;
use futures::future::join_all;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Single,
    Bulk,
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub prompts: Vec<String>,
    pub images_per_prompt: u8,
    pub aspect_ratio: AspectRatio,
    pub style: ImageStyle,
    pub reference_image: Option<ReferenceImage>,
}

impl GenerationRequest {
    pub fn single(prompt: impl Into<String>) -> Self {
        Self::new(GenerationMode::Single, vec![prompt.into()])
    }

    pub fn bulk<I, S>(prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            GenerationMode::Bulk,
            prompts.into_iter().map(Into::into).collect(),
        )
    }

    fn new(mode: GenerationMode, prompts: Vec<String>) -> Self {
        Self {
            mode,
            prompts,
            images_per_prompt: MIN_IMAGES_PER_PROMPT,
            aspect_ratio: AspectRatio::default(),
            style: ImageStyle::default(),
            reference_image: None,
        }
    }

    pub fn with_images_per_prompt(mut self, count: u8) -> Self {
        self.images_per_prompt = count;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_style(mut self, style: ImageStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_reference_image(mut self, reference: Option<ReferenceImage>) -> Self {
        self.reference_image = reference;
        self
    }

    pub fn is_edit(&self) -> bool {
        self.reference_image.is_some()
    }

    /// Image-to-image always produces one image per prompt.
    pub fn effective_images_per_prompt(&self) -> u8 {
        if self.is_edit() {
            1
        } else {
            self.images_per_prompt
        }
    }

    pub fn total_images(&self) -> usize {
        self.prompts.len() * self.effective_images_per_prompt() as usize
    }

    pub fn styled_prompts(&self) -> Vec<String> {
        self.prompts
            .iter()
            .map(|prompt| apply_style(prompt, self.style))
            .collect()
    }

    /// Checks run before any network call is issued.
    pub fn validate(&self) -> Result<()> {
        if self.prompts.is_empty() {
            return Err(ImageGenError::Validation("at least one prompt is required".into()));
        }
        if let Some(index) = self.prompts.iter().position(|p| p.trim().is_empty()) {
            return Err(ImageGenError::Validation(format!(
                "prompt #{} is empty",
                index + 1
            )));
        }
        if !(MIN_IMAGES_PER_PROMPT..=MAX_IMAGES_PER_PROMPT).contains(&self.images_per_prompt) {
            return Err(ImageGenError::Validation(format!(
                "images per prompt must be between {} and {} (got {})",
                MIN_IMAGES_PER_PROMPT, MAX_IMAGES_PER_PROMPT, self.images_per_prompt
            )));
        }
        match self.mode {
            GenerationMode::Single if self.prompts.len() > 1 => {
                Err(ImageGenError::Validation(format!(
                    "single mode takes exactly one prompt (got {})",
                    self.prompts.len()
                )))
            }
            GenerationMode::Bulk if self.total_images() > MAX_BATCH_IMAGES => {
                Err(ImageGenError::Validation(format!(
                    "Cannot generate more than {} images at once (you requested {}). \
                     Please reduce the number of prompts or images per prompt.",
                    MAX_BATCH_IMAGES,
                    self.total_images()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Parses a bulk prompt block: one prompt per line, blank lines skipped.
pub fn parse_bulk_prompts(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone)]
pub struct BatchRequester {
    provider: Arc<dyn ImageProvider>,
}

impl BatchRequester {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        request.validate()?;
        let prompts = request.styled_prompts();

        match (&request.reference_image, request.mode) {
            (Some(reference), GenerationMode::Single) => {
                self.edit_one(&prompts[0], reference).await
            }
            (Some(reference), GenerationMode::Bulk) => self.edit_bulk(&prompts, reference).await,
            (None, GenerationMode::Single) => {
                let images = self
                    .provider
                    .generate_images(&prompts[0], request.images_per_prompt, request.aspect_ratio)
                    .await?;
                Ok(to_generated(&prompts[0], images))
            }
            (None, GenerationMode::Bulk) => {
                self.generate_bulk(&prompts, request.images_per_prompt, request.aspect_ratio)
                    .await
            }
        }
    }

    async fn edit_one(&self, prompt: &str, reference: &ReferenceImage) -> Result<Vec<GeneratedImage>> {
        match self.provider.edit_image(prompt, reference).await? {
            Some(image) => Ok(to_generated(prompt, vec![image])),
            None => Err(ImageGenError::NoImage {
                prompt: prompt.to_string(),
            }),
        }
    }

    /// Every edit call settles before the first failure, in prompt order, is returned.
    async fn edit_bulk(
        &self,
        prompts: &[String],
        reference: &ReferenceImage,
    ) -> Result<Vec<GeneratedImage>> {
        let outcomes = join_all(prompts.iter().map(|prompt| self.edit_one(prompt, reference))).await;

        let mut generated = Vec::new();
        for outcome in outcomes {
            generated.extend(outcome?);
        }
        Ok(generated)
    }

    async fn generate_bulk(
        &self,
        prompts: &[String],
        count: u8,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<GeneratedImage>> {
        let calls = prompts.iter().map(|prompt| async move {
            let outcome = self
                .provider
                .generate_images(prompt, count, aspect_ratio)
                .await;
            (prompt, outcome)
        });
        let outcomes = join_all(calls).await;

        let mut generated = Vec::new();
        let mut failed = 0;
        let mut last_error = None;
        for (prompt, outcome) in outcomes {
            match outcome {
                Ok(images) => generated.extend(to_generated(prompt, images)),
                Err(e) => {
                    log::error!("Failed to generate image for prompt \"{}\": {}", prompt, e);
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        if failed > 0 && failed == prompts.len() {
            return Err(ImageGenError::AllRequestsFailed {
                failed,
                last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
            });
        }
        if failed > 0 {
            log::warn!(
                "{} of {} prompts failed; returning {} image(s)",
                failed,
                prompts.len(),
                generated.len()
            );
        }
        Ok(generated)
    }
}

fn to_generated(prompt: &str, images: Vec<ImageData>) -> Vec<GeneratedImage> {
    images
        .into_iter()
        .map(|image| GeneratedImage {
            src: image.to_data_url(),
            prompt: prompt.to_string(),
        })
        .collect()
}
