use serde::{Deserialize, Serialize};

/// Opaque handle to a brush head owned by the host painter.
/// The engine only passes it through to stamp commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BrushHandle(pub u32);

/// Straight RGBA colour, 0.0-1.0 per channel.
pub type Rgba = [f32; 4];
