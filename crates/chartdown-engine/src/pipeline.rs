//! Orchestration of one full generation pass and of regeneration from a
//! previously persisted manifest.

use std::path::Path;

use crate::ast::parse_markdown;
use crate::extract::{ExtractOptions, extract_blocks};
use crate::manifest::{Manifest, ManifestError};
use crate::naming::output_stem;
use crate::render::{BlockRenderer, OutputWriter, RenderError, RenderOptions};

/// Extension given to rendered output names recorded in the manifest.
const OUTPUT_EXT: &str = "png";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Run one full pass over a document: extract blocks, render and write each
/// one through the collaborators, and return the manifest describing the
/// pass.
pub fn generate<R, W>(
    input: &Path,
    text: &str,
    options: &ExtractOptions,
    render_options: &RenderOptions,
    renderer: &R,
    writer: &mut W,
) -> Result<Manifest, PipelineError>
where
    R: BlockRenderer,
    W: OutputWriter,
{
    let tree = parse_markdown(text);
    let blocks = extract_blocks(&tree, options);
    log::debug!("extracted {} blocks from {}", blocks.len(), input.display());

    let mut outputs = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let name = format!("{}.{OUTPUT_EXT}", output_stem(block));
        let buffer = renderer.render(block, render_options)?;
        writer.write(&name, &buffer)?;
        outputs.push(name);
    }

    Ok(Manifest::encode(
        input.display().to_string(),
        &blocks,
        &outputs,
    )?)
}

/// Re-render every block described by a previously persisted manifest,
/// without re-reading the original document. Output names are reused from
/// the manifest. Returns the number of outputs written.
pub fn regenerate<R, W>(
    manifest: &Manifest,
    render_options: &RenderOptions,
    renderer: &R,
    writer: &mut W,
) -> Result<usize, PipelineError>
where
    R: BlockRenderer,
    W: OutputWriter,
{
    let blocks = manifest.to_blocks();
    for (block, item) in blocks.iter().zip(&manifest.items) {
        let buffer = renderer.render(block, render_options)?;
        writer.write(&item.output, &buffer)?;
    }
    Ok(blocks.len())
}
