use anyhow::{bail, Context as AnyhowContext, Result};
use mdchunk_core::{ChunkedDocument, MarkdownChunker, TokenCounter};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One entry of a document's `chunks` list
#[derive(Debug, Serialize)]
pub struct ChunkRecord<'a> {
    pub tokens: usize,
    pub chunk: &'a str,
}

/// Annotation written onto each successfully chunked document
#[derive(Debug, Serialize)]
pub struct ChunkAnnotation<'a> {
    pub total_chunks: usize,
    pub chunks: Vec<ChunkRecord<'a>>,
    pub total_tokens: usize,
    pub taille_contenu: usize,
}

impl<'a> ChunkAnnotation<'a> {
    pub fn from_document(doc: &'a ChunkedDocument) -> Self {
        Self {
            total_chunks: doc.total_chunks(),
            chunks: doc
                .chunks
                .iter()
                .map(|unit| ChunkRecord {
                    tokens: unit.tokens,
                    chunk: &unit.text,
                })
                .collect(),
            total_tokens: doc.total_tokens,
            taille_contenu: doc.content_tokens,
        }
    }
}

/// Field names used to read documents
#[derive(Debug, Clone)]
pub struct FieldNames {
    pub content: String,
    pub title: String,
}

/// Batch outcome
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub documents: usize,
    pub chunked: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_chunks: usize,
}

/// Read a JSON array of documents
pub fn load_collection(path: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read collection {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Collection {} is not valid JSON", path.display()))?;
    match value {
        Value::Array(documents) => Ok(documents),
        other => bail!(
            "Collection {} must be a JSON array of documents, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

/// Write the annotated collection with 4-space indentation
pub fn write_collection(path: &Path, documents: &[Value]) -> Result<()> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    documents
        .serialize(&mut serializer)
        .context("Failed to serialize collection")?;
    out.push(b'\n');
    std::fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))
}

/// `docs/data.json` -> `docs/data-chunked.json`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "collection".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}-chunked.json"))
}

/// Chunk every document in place. Failures are logged and do not stop the batch.
pub fn annotate_collection<C: TokenCounter>(
    chunker: &MarkdownChunker<C>,
    documents: &mut [Value],
    fields: &FieldNames,
) -> BatchSummary {
    let mut summary = BatchSummary {
        documents: documents.len(),
        ..BatchSummary::default()
    };

    for (idx, document) in documents.iter_mut().enumerate() {
        let Some(object) = document.as_object_mut() else {
            log::warn!("Document {idx} is not a JSON object, skipping");
            summary.skipped += 1;
            continue;
        };
        let title = object
            .get(&fields.title)
            .and_then(Value::as_str)
            .unwrap_or("<untitled>")
            .to_string();
        let Some(content) = object.get(&fields.content).and_then(Value::as_str) else {
            log::warn!(
                "Document {idx} ({title}) has no string field '{}', skipping",
                fields.content
            );
            summary.skipped += 1;
            continue;
        };

        log::debug!("Document {idx} {title}");
        match chunker.chunk_str(content) {
            Ok(chunked) => {
                if chunked.lost_tokens() {
                    log::warn!(
                        "Document {idx} ({title}): total tokens {} vs. content size {}",
                        chunked.total_tokens,
                        chunked.content_tokens
                    );
                }
                match annotate(object, &chunked) {
                    Ok(()) => {
                        summary.chunked += 1;
                        summary.total_chunks += chunked.total_chunks();
                    }
                    Err(err) => {
                        log::warn!("Document {idx} ({title}): {err:#}");
                        summary.failed += 1;
                    }
                }
            }
            Err(err) => {
                log::warn!("Document {idx} ({title}) could not be chunked: {err}");
                summary.failed += 1;
            }
        }
    }

    summary
}

fn annotate(object: &mut Map<String, Value>, chunked: &ChunkedDocument) -> Result<()> {
    let annotation = serde_json::to_value(ChunkAnnotation::from_document(chunked))
        .context("Failed to serialize chunk annotation")?;
    if let Value::Object(fields) = annotation {
        object.extend(fields);
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
