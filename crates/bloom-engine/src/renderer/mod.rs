pub mod painter;
pub mod strategy;
pub mod view;

// Re-export key types for convenient access
pub use painter::{Painter, Stamp, StrokeBuffer, StrokeInstance, StrokeKind};
pub use strategy::{RenderType, StrokeFrame};
pub use view::{DrawContext, ViewParams};
