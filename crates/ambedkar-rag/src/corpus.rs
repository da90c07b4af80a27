//! In-memory corpus store
//!
//! The corpus is a JSON array of `{text, source}` objects produced offline.
//! It is loaded once at startup and read-only afterwards, which makes it safe
//! to share across concurrent requests without synchronization.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::types::Chunk;

/// The immutable collection of ingested text chunks.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chunks: Vec<Chunk>,
}

impl Corpus {
    /// Wrap an already-loaded chunk list.
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Load the corpus from a JSON file of `{text, source}` objects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let chunks: Vec<Chunk> = serde_json::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), chunks = chunks.len(), "Corpus loaded");
        Ok(Self { chunks })
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
