//! Consultation response and its provenance

use std::fmt;

use serde::Serialize;

/// Reply used when the caller supplied no image.
pub const NO_IMAGE_SENTINEL: &str = "no image provided for analysis";

/// Reply used when an image was supplied but the vision call failed.
pub const ANALYSIS_UNAVAILABLE: &str = "unable to analyze the provided image at this time";

/// Where a response text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseProvenance {
    /// Generated by the vision-language model
    Model,
    /// No image supplied; fixed placeholder
    NoImageSentinel,
    /// Image supplied but analysis failed; fixed apology
    Degraded,
}

impl ResponseProvenance {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::NoImageSentinel => "no_image_sentinel",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for ResponseProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The text that will be spoken back, tagged with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationResponse {
    text: String,
    provenance: ResponseProvenance,
}

impl ConsultationResponse {
    pub fn from_model(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: ResponseProvenance::Model,
        }
    }

    pub fn no_image() -> Self {
        Self {
            text: NO_IMAGE_SENTINEL.to_string(),
            provenance: ResponseProvenance::NoImageSentinel,
        }
    }

    pub fn analysis_unavailable() -> Self {
        Self {
            text: ANALYSIS_UNAVAILABLE.to_string(),
            provenance: ResponseProvenance::Degraded,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn provenance(&self) -> ResponseProvenance {
        self.provenance
    }

    pub fn is_degraded(&self) -> bool {
        self.provenance == ResponseProvenance::Degraded
    }
}
