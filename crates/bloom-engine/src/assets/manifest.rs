use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Brush manifest describing the brush heads a host has rasterized and how
/// they group into palettes. Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrushManifest {
    /// Brush heads, indexed by position. The index is the brush handle.
    pub brushes: Vec<BrushDescriptor>,
    /// Named palettes: palette name → brush names.
    #[serde(default)]
    pub palettes: HashMap<String, Vec<String>>,
}

/// Style parameters of one brush head. The engine never reads pixels; these
/// only travel back to the host painter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushDescriptor {
    /// Unique name (e.g., "red-03").
    pub name: String,
    /// Base RGBA colour, 0.0-1.0 per channel.
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    /// Width/height ratio of the bristle noise.
    #[serde(default = "default_aspect")]
    pub aspect_ratio: f32,
    /// Noise scale of the bristle texture.
    #[serde(default)]
    pub noise_scale: f32,
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_aspect() -> f32 {
    0.2
}

impl BrushManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Index of a brush by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.brushes.iter().position(|b| b.name == name)
    }
}
