use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AspectRatio {
    #[default]
    #[value(name = "1:1")]
    Square,
    #[value(name = "3:4")]
    Portrait3x4,
    #[value(name = "4:3")]
    Landscape4x3,
    #[value(name = "9:16")]
    Portrait9x16,
    #[value(name = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait3x4,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape16x9,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ImageStyle {
    #[default]
    None,
    Realistic,
    Photographic,
    Anime,
    Cartoonish,
    FantasyArt,
    Cinematic,
    Minimalist,
    NeonPunk,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 9] = [
        ImageStyle::None,
        ImageStyle::Realistic,
        ImageStyle::Photographic,
        ImageStyle::Anime,
        ImageStyle::Cartoonish,
        ImageStyle::FantasyArt,
        ImageStyle::Cinematic,
        ImageStyle::Minimalist,
        ImageStyle::NeonPunk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ImageStyle::None => "None (Default)",
            ImageStyle::Realistic => "Realistic",
            ImageStyle::Photographic => "Photographic",
            ImageStyle::Anime => "Anime",
            ImageStyle::Cartoonish => "Cartoonish",
            ImageStyle::FantasyArt => "Fantasy Art",
            ImageStyle::Cinematic => "Cinematic",
            ImageStyle::Minimalist => "Minimalist",
            ImageStyle::NeonPunk => "Neon Punk",
        }
    }
}

/// Rewrites `prompt` with the style suffix clause. `None` and empty prompts pass through.
pub fn apply_style(prompt: &str, style: ImageStyle) -> String {
    if style == ImageStyle::None || prompt.is_empty() {
        return prompt.to_string();
    }
    format!("{}, in a {} style", prompt, style.label().to_lowercase())
}

/// Base64 image bytes together with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub data: String,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        Some(Self::new(mime_type, data))
    }
}

pub type ReferenceImage = ImageData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub src: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImageRecord {
    pub id: String,
    pub src: String,
    pub prompt: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    #[value(name = "last7days", alias = "7days")]
    Last7Days,
}
