// ============================================================
// Layer 4 — Corpus Loaders
// ============================================================
// Two ways to get documents into memory:
//
//   JsonlCorpusLoader → a directory (or single file) of tokenized
//                       .jsonl records, one document per line:
//                       {"input_ids": [...], "attention_mask": [...]}
//
//   TextCorpusLoader  → a directory of raw .txt / .docx files,
//                       each file tokenized into one document.
//                       Used for the noise corpus.
//
// Files are visited in sorted path order so a corpus always
// loads in the same order on every rank.
//
// .docx files are ZIP archives of XML; docx-rs parses them and we
// walk Document → Paragraph → Run → Text collecting the strings.

use anyhow::{bail, Context, Result};
use docx_rs::read_docx;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::document::TokenizedDocument;
use crate::domain::traits::{DocumentSource, TextEncoder};

/// Sorted list of files under `dir` whose extension is in `exts`.
fn list_files(dir: &Path, exts: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| exts.contains(&e));
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ─── JsonlCorpusLoader ────────────────────────────────────────────────────────
pub struct JsonlCorpusLoader {
    path: PathBuf,
}

impl JsonlCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_file(path: &Path, docs: &mut Vec<TokenizedDocument>) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        let name = path.display().to_string();

        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let doc: TokenizedDocument = serde_json::from_str(line)
                .with_context(|| format!("Bad JSON at {}:{}", name, n + 1))?;
            doc.check(&name, n + 1)?;
            docs.push(doc);
        }
        Ok(())
    }
}

impl DocumentSource for JsonlCorpusLoader {
    fn load_all(&self) -> Result<Vec<TokenizedDocument>> {
        if !self.path.exists() {
            bail!("Tokenized corpus '{}' does not exist", self.path.display());
        }

        let files = if self.path.is_dir() {
            list_files(&self.path, &["jsonl"])?
        } else {
            vec![self.path.clone()]
        };

        let mut docs = Vec::new();
        for file in &files {
            Self::load_file(file, &mut docs)?;
            tracing::debug!("Loaded {} (running total {} documents)", file.display(), docs.len());
        }

        let empty = docs.iter().filter(|d| d.is_empty()).count();
        if empty > 0 {
            tracing::warn!("{} of {} documents in '{}' are empty", empty, docs.len(), self.path.display());
        }

        tracing::info!(
            "Loaded {} tokenized documents from {} file(s) in '{}'",
            docs.len(),
            files.len(),
            self.path.display()
        );
        Ok(docs)
    }
}

// ─── TextCorpusLoader ─────────────────────────────────────────────────────────
pub struct TextCorpusLoader<'a, E: TextEncoder> {
    dir:     PathBuf,
    encoder: &'a E,
}

impl<'a, E: TextEncoder> TextCorpusLoader<'a, E> {
    pub fn new(dir: impl Into<PathBuf>, encoder: &'a E) -> Self {
        Self { dir: dir.into(), encoder }
    }
}

impl<E: TextEncoder> DocumentSource for TextCorpusLoader<'_, E> {
    fn load_all(&self) -> Result<Vec<TokenizedDocument>> {
        // A missing directory is an empty corpus, not a crash
        if !self.dir.exists() {
            tracing::warn!(
                "Text directory '{}' does not exist, returning empty corpus",
                self.dir.display()
            );
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for path in list_files(&self.dir, &["txt", "docx"])? {
            let text = match read_text(&path) {
                Ok(t) => t,
                // Skip unreadable files, keep the rest of the corpus
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", path.display(), e);
                    continue;
                }
            };
            if text.trim().is_empty() {
                continue;
            }
            let ids = self
                .encoder
                .encode(&text)
                .with_context(|| format!("Cannot tokenize '{}'", path.display()))?;
            docs.push(TokenizedDocument::from_ids(ids));
        }

        tracing::info!("Tokenized {} text documents from '{}'", docs.len(), self.dir.display());
        Ok(docs)
    }
}

fn read_text(path: &Path) -> Result<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("docx") => load_docx_text(path),
        _ => fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display())),
    }
}

/// All non-empty paragraphs of a .docx file, joined with newlines.
fn load_docx_text(path: &Path) -> Result<String> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    let docx = read_docx(&bytes).map_err(|e| {
        anyhow::anyhow!("docx-rs parse error in '{}': {:?}", path.display(), e)
    })?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        let DocumentChild::Paragraph(para) = child else { continue };

        let mut text = String::new();
        for pc in &para.children {
            if let ParagraphChild::Run(run) = pc {
                for rc in &run.children {
                    if let RunChild::Text(t) = rc {
                        text.push_str(&t.text);
                    }
                }
            }
        }
        if !text.trim().is_empty() {
            paragraphs.push(text);
        }
    }
    Ok(paragraphs.join("\n"))
}
