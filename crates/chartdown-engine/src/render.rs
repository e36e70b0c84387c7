//! Boundaries to the rendering and storage collaborators.
//!
//! The engine never rasterizes anything itself: it hands a block and a small
//! options record to a [`BlockRenderer`] and receives an opaque buffer, then
//! hands the buffer and a destination name to an [`OutputWriter`].

use crate::models::Block;

/// Options handed to the rendering collaborator alongside each block.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Display width in logical pixels.
    pub width: u32,
    /// Pixel scale multiplier.
    pub scale: f32,
    /// Accent color as a CSS-style string.
    pub accent_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            scale: 2.0,
            accent_color: "#4a90d9".to_string(),
        }
    }
}

/// Failure reported by a rendering collaborator.
#[derive(Debug, thiserror::Error)]
#[error("render failed: {message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns a typed block into an image buffer. The engine does not know or
/// care how the buffer is produced.
pub trait BlockRenderer {
    fn render(&self, block: &Block, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}

/// Writes a rendered buffer under a destination name. Directory handling and
/// path policy belong to the implementor.
pub trait OutputWriter {
    fn write(&mut self, name: &str, data: &[u8]) -> std::io::Result<()>;
}
