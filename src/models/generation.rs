use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Maximum number of reference images accepted per generation request.
pub const MAX_REFERENCE_IMAGES: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "9:16")]
    Vertical,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Classic => "4:3",
            AspectRatio::Vertical => "9:16",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Basic,
    Standard,
    Hd,
}

impl Quality {
    /// Provider resolution tag for this tier.
    pub fn resolution_tag(&self) -> &'static str {
        match self {
            Quality::Basic => "1K",
            Quality::Standard => "1K",
            Quality::Hd => "2K",
        }
    }

    /// Parse a user-facing tier string. Unrecognized tiers fall back to
    /// `Standard`, which carries the "1K" resolution tag.
    pub fn from_tier(tier: &str) -> Self {
        match tier.to_lowercase().as_str() {
            "basic" => Quality::Basic,
            "standard" => Quality::Standard,
            "hd" => Quality::Hd,
            _ => Quality::Standard,
        }
    }
}

/// A user-supplied reference image, kept in memory for the duration of one
/// generation call.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub quality: Quality,
    pub images: Vec<ImageBlob>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio, quality: Quality) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio,
            quality,
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<ImageBlob>) -> Self {
        self.images = images;
        self
    }

    /// A request needs a prompt or at least one reference image, and never
    /// more than [`MAX_REFERENCE_IMAGES`] images.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() && self.images.is_empty() {
            return Err(GenError::Validation(
                "prompt is empty and no reference images were provided".into(),
            ));
        }
        if self.images.len() > MAX_REFERENCE_IMAGES {
            return Err(GenError::Validation(format!(
                "at most {} reference images are supported, got {}",
                MAX_REFERENCE_IMAGES,
                self.images.len()
            )));
        }
        Ok(())
    }
}

/// A reference image that has been pushed to the hosting service. Transient:
/// lives only until its URL is embedded into the job request.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub file_name: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub image_url: String,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_strings() {
        assert_eq!(AspectRatio::Square.as_str(), "1:1");
        assert_eq!(AspectRatio::Vertical.as_str(), "9:16");
        let json = serde_json::to_string(&AspectRatio::Widescreen).unwrap();
        assert_eq!(json, "\"16:9\"");
    }

    #[test]
    fn test_resolution_mapping() {
        assert_eq!(Quality::Basic.resolution_tag(), "1K");
        assert_eq!(Quality::Standard.resolution_tag(), "1K");
        assert_eq!(Quality::Hd.resolution_tag(), "2K");
    }

    #[test]
    fn test_unrecognized_tier_maps_to_1k() {
        assert_eq!(Quality::from_tier("hd").resolution_tag(), "2K");
        assert_eq!(Quality::from_tier("BASIC").resolution_tag(), "1K");
        assert_eq!(Quality::from_tier("ultra").resolution_tag(), "1K");
        assert_eq!(Quality::from_tier("").resolution_tag(), "1K");
    }

    #[test]
    fn test_validation_requires_prompt_or_image() {
        let empty = GenerationRequest::new("   ", AspectRatio::Square, Quality::Standard);
        assert!(matches!(empty.validate(), Err(GenError::Validation(_))));

        let with_image = GenerationRequest::new("", AspectRatio::Square, Quality::Standard)
            .with_images(vec![ImageBlob::new("ref.png", vec![1, 2, 3])]);
        assert!(with_image.validate().is_ok());

        let with_prompt = GenerationRequest::new("a cat", AspectRatio::Square, Quality::Standard);
        assert!(with_prompt.validate().is_ok());
    }

    #[test]
    fn test_validation_caps_reference_images() {
        let images = (0..9)
            .map(|i| ImageBlob::new(format!("{}.png", i), vec![0]))
            .collect();
        let request = GenerationRequest::new("a cat", AspectRatio::Square, Quality::Standard)
            .with_images(images);
        assert!(matches!(request.validate(), Err(GenError::Validation(_))));
    }
}
