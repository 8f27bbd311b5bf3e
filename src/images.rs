use crate::constants::OUTPUT_MIME_TYPE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ImagenPredictRequestBody {
    pub instances: Vec<ImagenInstance>,
    pub parameters: ImagenParameters,
}

#[derive(Debug, Serialize)]
pub struct ImagenInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenParameters {
    pub sample_count: u8,
    pub aspect_ratio: String,
    pub output_options: ImagenOutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenOutputOptions {
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenPrediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImagenPredictResponse {
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

impl ImagenPredictRequestBody {
    pub fn new(prompt: &str, sample_count: u8, aspect_ratio: &str) -> Self {
        Self {
            instances: vec![ImagenInstance {
                prompt: prompt.to_string(),
            }],
            parameters: ImagenParameters {
                sample_count,
                aspect_ratio: aspect_ratio.to_string(),
                output_options: ImagenOutputOptions {
                    mime_type: OUTPUT_MIME_TYPE.to_string(),
                },
            },
        }
    }
}
