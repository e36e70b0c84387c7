pub mod ast;
pub mod extract;
pub mod io;
pub mod manifest;
pub mod models;
pub mod naming;
pub mod pipeline;
pub mod render;

// Re-export key types for easier usage
pub use ast::{Node, NodeKind, Point, Position, parse_markdown};
pub use extract::{ExtractOptions, extract_blocks, extract_from_str};
pub use manifest::{Manifest, ManifestError, ManifestItem};
pub use models::{Block, BlockKind, BlockType, SourceLocation};
pub use naming::{output_stem, sanitize_title};
pub use pipeline::{PipelineError, generate, regenerate};
pub use render::{BlockRenderer, OutputWriter, RenderError, RenderOptions};
