use crate::error::{ImageGenError, Result};
use crate::gallery::GalleryStore;
use crate::generation::{BatchRequester, GenerationRequest};
use crate::models::{GeneratedImage, GeneratedImageRecord};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Ties the requester to the gallery. Only one submission may be in flight.
pub struct Session {
    requester: BatchRequester,
    gallery: Mutex<GalleryStore>,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ImageGenError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(requester: BatchRequester, gallery: GalleryStore) -> Self {
        Self {
            requester,
            gallery: Mutex::new(gallery),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn gallery(&self) -> MutexGuard<'_, GalleryStore> {
        self.gallery.lock().await
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs one submission and prepends its images to the gallery.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImageRecord>> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        request.validate()?;
        log::info!(
            "Generating {} image(s) for {} prompt(s)",
            request.total_images(),
            request.prompts.len()
        );

        let images = self.requester.generate(request).await?;
        let records = stamp_records(images, Utc::now().timestamp_millis());
        self.gallery.lock().await.append(records.clone()).await;
        Ok(records)
    }
}

/// Assigns ids and a shared creation time to a batch.
pub fn stamp_records(images: Vec<GeneratedImage>, created_at: i64) -> Vec<GeneratedImageRecord> {
    images
        .into_iter()
        .map(|image| GeneratedImageRecord {
            id: Uuid::new_v4().to_string(),
            src: image.src,
            prompt: image.prompt,
            created_at,
        })
        .collect()
}
