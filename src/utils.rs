use crate::error::{ImageGenError, Result};
use crate::generation::parse_bulk_prompts;
use crate::models::{GeneratedImageRecord, ReferenceImage};
use chrono::{Local, TimeZone};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncReadExt;

pub fn create_spinner(color: &str, message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template(&format!("{{spinner:.{}}} {{msg}}", color)),
    );
    spinner.enable_steady_tick(100);
    spinner.set_message(message);

    spinner
}

pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

pub async fn encode_image(image_path: &Path) -> Result<String> {
    let buffer = tokio::fs::read(image_path).await.map_err(|e| {
        ImageGenError::Validation(format!(
            "Failed to open image file {}: {}",
            image_path.display(),
            e
        ))
    })?;
    Ok(base64::encode(buffer))
}

pub async fn load_reference_image(image_path: &Path) -> Result<ReferenceImage> {
    let mime_type = mime_type_for_path(image_path).ok_or_else(|| {
        ImageGenError::Validation(format!(
            "Unsupported reference image type: {}",
            image_path.display()
        ))
    })?;
    let data = encode_image(image_path).await?;
    Ok(ReferenceImage::new(mime_type, data))
}

/// Reads bulk prompts from a file, or from stdin when `source` is `-`.
pub async fn read_prompts(source: &str) -> Result<Vec<String>> {
    let text = if source == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        text
    } else {
        tokio::fs::read_to_string(source).await?
    };
    Ok(parse_bulk_prompts(&text))
}

pub fn format_created_at(created_at: i64) -> String {
    match Local.timestamp_millis_opt(created_at).single() {
        Some(created) => created.format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown date".to_string(),
    }
}

pub fn print_records(records: &[&GeneratedImageRecord]) {
    for record in records {
        println!(
            "{}  {}  {}",
            record.id.bold().cyan(),
            format_created_at(record.created_at).dimmed(),
            record.prompt
        );
    }
}
