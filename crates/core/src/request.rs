//! Generation request model and directive composition.
//!
//! A [`GenerationRequest`] is built once per submission and never
//! mutated afterwards. Every parameter is drawn from a small fixed set,
//! so each one is an enum with a stable wire name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Directive constants
// ---------------------------------------------------------------------------

/// Opening of every directive sent to the synthesis API.
pub const DIRECTIVE_PREFIX: &str = "Cinematic";

/// Fixed quality qualifier appended to every directive.
pub const QUALITY_QUALIFIER: &str = "Highly detailed, 4k, fluid movement, masterwork.";

// ---------------------------------------------------------------------------
// Aspect ratio
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [Self; 2] = [Self::Landscape, Self::Portrait];

    /// Wire name understood by the synthesis API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, &Self::ALL, Self::as_str, "aspect ratio")
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Hd1080,
}

impl Resolution {
    pub const ALL: [Self; 2] = [Self::Hd720, Self::Hd1080];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
        }
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, &Self::ALL, Self::as_str, "resolution")
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Visual style applied to the directive. [`VideoStyle::None`] adds no
/// style clause at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStyle {
    #[default]
    None,
    Realistic,
    #[serde(rename = "3d")]
    ThreeD,
    Anime,
    Cyberpunk,
    Cinematic,
}

impl VideoStyle {
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Realistic,
        Self::ThreeD,
        Self::Anime,
        Self::Cyberpunk,
        Self::Cinematic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Realistic => "realistic",
            Self::ThreeD => "3d",
            Self::Anime => "anime",
            Self::Cyberpunk => "cyberpunk",
            Self::Cinematic => "cinematic",
        }
    }

    /// Inline clause inserted into the directive, if any.
    pub fn modifier(self) -> Option<String> {
        match self {
            Self::None => None,
            other => Some(format!(" in {} style", other.as_str())),
        }
    }
}

impl FromStr for VideoStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, &Self::ALL, Self::as_str, "style")
    }
}

impl fmt::Display for VideoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// Clip length in seconds. Serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VideoDuration {
    Short,
    #[default]
    Medium,
    Long,
}

impl VideoDuration {
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Long];

    pub fn secs(self) -> u8 {
        match self {
            Self::Short => 3,
            Self::Medium => 6,
            Self::Long => 10,
        }
    }
}

impl TryFrom<u8> for VideoDuration {
    type Error = CoreError;

    fn try_from(secs: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.secs() == secs)
            .ok_or_else(|| {
                CoreError::Validation(format!("Invalid duration '{secs}'. Must be one of: 3, 6, 10"))
            })
    }
}

impl From<VideoDuration> for u8 {
    fn from(d: VideoDuration) -> Self {
        d.secs()
    }
}

impl FromStr for VideoDuration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: u8 = s
            .trim()
            .trim_end_matches(['s', 'S'])
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid duration '{s}'")))?;
        Self::try_from(secs)
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs())
    }
}

/// Helper: resolve `s` against the wire names of a fixed value set.
fn parse_named<T: Copy>(
    s: &str,
    all: &[T],
    name: fn(T) -> &'static str,
    what: &str,
) -> Result<T, CoreError> {
    let s = s.trim();
    all.iter()
        .copied()
        .find(|v| name(*v).eq_ignore_ascii_case(s))
        .ok_or_else(|| {
            let valid: Vec<&str> = all.iter().map(|v| name(*v)).collect();
            CoreError::Validation(format!(
                "Invalid {what} '{s}'. Must be one of: {}",
                valid.join(", ")
            ))
        })
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// One submission to the synthesis workflow.
///
/// The prompt is trimmed on construction and must not be empty, so a
/// request that exists is always submittable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    prompt: String,
    aspect_ratio: AspectRatio,
    resolution: Resolution,
    style: VideoStyle,
    duration: VideoDuration,
}

impl GenerationRequest {
    /// Create a request with default parameters (16:9, 720p, no style, 6s).
    pub fn new(prompt: &str) -> Result<Self, CoreError> {
        let prompt = validate_prompt(prompt)?;
        Ok(Self {
            prompt,
            aspect_ratio: AspectRatio::default(),
            resolution: Resolution::default(),
            style: VideoStyle::default(),
            duration: VideoDuration::default(),
        })
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_style(mut self, style: VideoStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_duration(mut self, duration: VideoDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn style(&self) -> VideoStyle {
        self.style
    }

    pub fn duration(&self) -> VideoDuration {
        self.duration
    }

    /// Compose the full directive text sent to the synthesis API.
    pub fn directive(&self) -> String {
        let style = self.style.modifier().unwrap_or_default();
        format!(
            "{DIRECTIVE_PREFIX}{style} video of {}. {QUALITY_QUALIFIER}",
            self.prompt
        )
    }
}

/// Trim `prompt` and reject it if nothing remains.
pub fn validate_prompt(prompt: &str) -> Result<String, CoreError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
