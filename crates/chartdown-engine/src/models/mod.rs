pub mod block;

pub use block::{Block, BlockKind, BlockType, SourceLocation, UnknownBlockType};
