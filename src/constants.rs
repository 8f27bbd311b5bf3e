pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const IMAGEN_MODEL: &str = "imagen-4.0-generate-001";
pub const EDIT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";
pub const API_KEY_HEADER: &str = "x-goog-api-key";

pub const API_KEY_VAR: &str = "API_KEY";
pub const API_KEY_FALLBACK_VAR: &str = "GEMINI_API_KEY";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
pub const GALLERY_DIR_VAR: &str = "IMAGEGEN_GALLERY_DIR";
pub const TIMEOUT_VAR: &str = "IMAGEGEN_TIMEOUT_SECS";

pub const DEFAULT_GALLERY_DIR: &str = ".imagegen";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const GALLERY_STORAGE_KEY: &str = "generatedImagesGallery";

pub const MAX_BATCH_IMAGES: usize = 50;
pub const MIN_IMAGES_PER_PROMPT: u8 = 1;
pub const MAX_IMAGES_PER_PROMPT: u8 = 4;

pub const DOWNLOAD_NAME_MAX_CHARS: usize = 30;
