use crate::constants::{DOWNLOAD_NAME_MAX_CHARS, GALLERY_STORAGE_KEY};
use crate::error::{ImageGenError, Result};
use crate::models::{DateFilter, GeneratedImageRecord, ImageData};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Newest-first collection of generated images, persisted whole on every mutation.
///
/// The in-memory list is authoritative. Persistence problems are logged and
/// never surfaced, so memory and storage may diverge until the next good save.
pub struct GalleryStore {
    store: Arc<dyn KeyValueStore>,
    images: Vec<GeneratedImageRecord>,
}

impl GalleryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            images: Vec::new(),
        }
    }

    /// Replaces the in-memory collection with the stored blob, or empties it.
    pub async fn load(&mut self) {
        self.images = match self.store.get(GALLERY_STORAGE_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(images) => images,
                Err(e) => {
                    log::error!("Failed to parse stored gallery, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("Failed to load gallery, starting empty: {}", e);
                Vec::new()
            }
        };
        log::debug!("Loaded {} gallery image(s)", self.images.len());
    }

    pub fn images(&self) -> &[GeneratedImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedImageRecord> {
        self.images.iter().find(|image| image.id == id)
    }

    pub async fn append(&mut self, records: Vec<GeneratedImageRecord>) {
        if records.is_empty() {
            return;
        }
        let mut images = records;
        images.append(&mut self.images);
        self.images = images;
        self.save().await;
    }

    /// Unknown ids are a no-op. Returns whether a record was removed.
    pub async fn delete(&mut self, id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|image| image.id != id);
        let removed = self.images.len() != before;
        self.save().await;
        removed
    }

    pub fn filter(&self, search_term: &str, date_filter: DateFilter) -> Vec<&GeneratedImageRecord> {
        self.filter_at(search_term, date_filter, Local::now())
    }

    pub fn filter_at(
        &self,
        search_term: &str,
        date_filter: DateFilter,
        now: DateTime<Local>,
    ) -> Vec<&GeneratedImageRecord> {
        let term = search_term.to_lowercase();
        self.images
            .iter()
            .filter(|image| term.is_empty() || image.prompt.to_lowercase().contains(&term))
            .filter(|image| matches_date(image.created_at, date_filter, now))
            .collect()
    }

    async fn save(&self) {
        let blob = match serde_json::to_string(&self.images) {
            Ok(blob) => blob,
            Err(e) => {
                log::error!("Failed to serialize gallery: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(GALLERY_STORAGE_KEY, &blob).await {
            log::error!("Failed to save gallery: {}", e);
        }
    }
}

fn matches_date(created_at: i64, date_filter: DateFilter, now: DateTime<Local>) -> bool {
    match date_filter {
        DateFilter::All => true,
        DateFilter::Today => match Local.timestamp_millis_opt(created_at).single() {
            Some(created) => created.date_naive() == now.date_naive(),
            None => false,
        },
        DateFilter::Last7Days => {
            let cutoff = start_of_day(now.date_naive() - Duration::days(6));
            created_at >= cutoff.timestamp_millis()
        }
    }
}

/// Local midnight, or the first valid instant after it when midnight falls in a DST gap.
fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return Local::now();
    };
    (0..=2)
        .find_map(|hours| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .unwrap_or_else(|| Local.from_utc_datetime(&midnight))
}

/// File name for a downloaded image: whitespace runs become `_`, cut to 30 chars.
pub fn download_file_name(record: &GeneratedImageRecord, mime_type: &str) -> String {
    let mut stem = String::new();
    let mut in_space = false;
    for c in record.prompt.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(if c == '/' || c == '\\' { '_' } else { c });
            in_space = false;
        }
    }
    let stem: String = stem.chars().take(DOWNLOAD_NAME_MAX_CHARS).collect();
    let stem = if stem.is_empty() { record.id.clone() } else { stem };
    let ext = match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpeg",
    };
    format!("{}.{}", stem, ext)
}

/// Decodes the record's data URL and writes it into `dir`.
pub async fn download(record: &GeneratedImageRecord, dir: &Path) -> Result<PathBuf> {
    let image = ImageData::from_data_url(&record.src).ok_or_else(|| {
        ImageGenError::Validation(format!("image {} has no embedded data", record.id))
    })?;
    let bytes = base64::decode(&image.data)
        .map_err(|e| ImageGenError::Validation(format!("image {} is not valid base64: {}", record.id, e)))?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(download_file_name(record, &image.mime_type));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
