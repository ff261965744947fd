use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::errors::DomainError;

/// A unit of retrievable knowledge, as stored in the chunk files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
}

impl Chunk {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// Joins the matched texts in rank order, separated by a blank line.
pub fn join_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn ensure_unique_ids(chunks: &[Chunk]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(chunks.len());
    for chunk in chunks {
        if !seen.insert(chunk.id.as_str()) {
            return Err(DomainError::validation(format!(
                "duplicate chunk id: {}",
                chunk.id
            )));
        }
    }
    Ok(())
}
