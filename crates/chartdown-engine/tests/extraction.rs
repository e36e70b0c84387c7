//! End-to-end coverage: one document through extraction, rendering, manifest
//! persistence and regeneration, using in-memory collaborators.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chartdown_engine::{
    Block, BlockKind, BlockRenderer, BlockType, ExtractOptions, Manifest, OutputWriter,
    RenderError, RenderOptions, extract_from_str, generate, output_stem, regenerate,
};
use pretty_assertions::assert_eq;

const DOCUMENT: &str = "\
# Practice notes

## Mode degrees

| Mode | Degree |
| --- | --- |
| Ionian | 1 |
| Dorian | 2 |

```chord-progression
title: Turnaround
key: C
---
Dm7 → G7 → Cmaj7
```

```degree-progression
key: A minor
---
3m - 4 - 5 - 6m
```

```score
title: Walking line
---
chords: Dm7 G7 C
bass: D G C
```

Some prose that mentions a single Dm7 chord in passing.

**Bridge**

Try this: Am7 → D7 → Gmaj7
";

/// Renderer that records what it was asked to draw and returns a tiny buffer.
struct FakeRenderer;

impl BlockRenderer for FakeRenderer {
    fn render(&self, block: &Block, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let header = format!("{}:{}x{}", block.block_type(), options.width, options.scale);
        Ok(header.into_bytes())
    }
}

/// Writer that keeps outputs in memory, keyed by name.
#[derive(Default)]
struct MemoryWriter {
    outputs: BTreeMap<String, Vec<u8>>,
}

impl OutputWriter for MemoryWriter {
    fn write(&mut self, name: &str, data: &[u8]) -> std::io::Result<()> {
        self.outputs.insert(name.to_string(), data.to_vec());
        Ok(())
    }
}

fn extract_document() -> Vec<Block> {
    let opts = ExtractOptions {
        source_file: Some(PathBuf::from("practice.md")),
        ..ExtractOptions::default()
    };
    extract_from_str(DOCUMENT, &opts)
}

#[test]
fn extracts_every_block_shape_in_order() {
    let blocks = extract_document();
    let types: Vec<BlockType> = blocks.iter().map(Block::block_type).collect();
    assert_eq!(
        types,
        vec![
            BlockType::Table,
            BlockType::ChordProgression,
            BlockType::DegreeProgression,
            BlockType::Score,
            BlockType::ChordProgression,
        ]
    );
}

#[test]
fn indices_run_from_one_in_emission_order() {
    let blocks = extract_document();
    let indices: Vec<usize> = blocks.iter().map(|b| b.index).collect();
    assert_eq!(indices, (1..=blocks.len()).collect::<Vec<_>>());
}

#[test]
fn table_caption_defaults_to_preceding_heading() {
    let blocks = extract_document();
    match &blocks[0].kind {
        BlockKind::Table {
            caption, headers, ..
        } => {
            assert_eq!(caption.as_deref(), Some("Mode degrees"));
            assert_eq!(headers, &["Mode", "Degree"]);
        }
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn heuristic_block_takes_title_from_preceding_bold_run() {
    let blocks = extract_document();
    let detected = blocks.last().unwrap();
    assert_eq!(detected.title.as_deref(), Some("Bridge"));
    assert!(matches!(
        &detected.kind,
        BlockKind::ChordProgression { chords, .. } if chords == &["Am7", "D7", "Gmaj7"]
    ));
}

#[test]
fn single_chord_mention_in_prose_is_not_detected() {
    let blocks = extract_document();
    // Five blocks total: the passing "Dm7" sentence never qualifies.
    assert_eq!(blocks.len(), 5);
}

#[test]
fn blocks_carry_provenance_from_the_source_file() {
    let blocks = extract_document();
    for block in &blocks {
        let source = block
            .source
            .as_ref()
            .unwrap_or_else(|| panic!("block {} has no source", block.index));
        assert_eq!(source.file, Path::new("practice.md"));
        assert!(source.start_line >= 1);
        assert!(source.end_line >= source.start_line);
    }
}

#[test]
fn generate_writes_one_output_per_block_and_encodes_a_manifest() {
    let opts = ExtractOptions::default();
    let renderer = FakeRenderer;
    let mut writer = MemoryWriter::default();

    let manifest = generate(
        Path::new("practice.md"),
        DOCUMENT,
        &opts,
        &RenderOptions::default(),
        &renderer,
        &mut writer,
    )
    .unwrap();

    assert_eq!(manifest.input, "practice.md");
    assert_eq!(manifest.items.len(), 5);
    assert_eq!(writer.outputs.len(), 5);
    for item in &manifest.items {
        assert!(writer.outputs.contains_key(&item.output));
        assert!(item.output.ends_with(".png"));
    }
    // Names follow the suggestion scheme: tag, two-digit index, title.
    assert_eq!(
        manifest.items[1].output,
        "chord-progression-02-Turnaround.png"
    );
}

#[test]
fn manifest_roundtrip_reconstructs_all_blocks() {
    let blocks = extract_document();
    let outputs: Vec<String> = blocks
        .iter()
        .map(|b| format!("{}.png", output_stem(b)))
        .collect();

    let manifest = Manifest::encode("practice.md", &blocks, &outputs).unwrap();
    let json = manifest.to_json().unwrap();
    let decoded = Manifest::from_json(&json).unwrap();

    assert_eq!(decoded.to_blocks(), blocks);
}

#[test]
fn regenerate_renders_from_the_manifest_alone() {
    let opts = ExtractOptions::default();
    let renderer = FakeRenderer;
    let mut writer = MemoryWriter::default();
    let manifest = generate(
        Path::new("practice.md"),
        DOCUMENT,
        &opts,
        &RenderOptions::default(),
        &renderer,
        &mut writer,
    )
    .unwrap();

    // Decode from persisted JSON, then regenerate into a fresh writer with no
    // access to the original document.
    let decoded = Manifest::from_json(&manifest.to_json().unwrap()).unwrap();
    let mut second = MemoryWriter::default();
    let written = regenerate(&decoded, &RenderOptions::default(), &renderer, &mut second).unwrap();

    assert_eq!(written, 5);
    assert_eq!(writer.outputs, second.outputs);
}

#[test]
fn render_failure_propagates() {
    struct FailingRenderer;
    impl BlockRenderer for FailingRenderer {
        fn render(&self, _: &Block, _: &RenderOptions) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::new("backend unavailable"))
        }
    }

    let mut writer = MemoryWriter::default();
    let result = generate(
        Path::new("practice.md"),
        DOCUMENT,
        &ExtractOptions::default(),
        &RenderOptions::default(),
        &FailingRenderer,
        &mut writer,
    );
    assert!(result.is_err());
    assert!(writer.outputs.is_empty());
}
