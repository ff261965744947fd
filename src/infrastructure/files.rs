use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

use crate::domain::{Chunk, DomainError};

/// Reads a file holding a single JSON array.
pub async fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DomainError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::not_found(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| DomainError::validation(format!("{}: {e}", path.display())))
}

/// Loads every chunk file in order and concatenates their records.
pub async fn load_chunk_files(paths: &[impl AsRef<Path>]) -> Result<Vec<Chunk>, DomainError> {
    let mut all = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let chunks: Vec<Chunk> = read_json_array(path).await?;
        tracing::info!(file = %path.display(), count = chunks.len(), "loaded chunks");
        all.extend(chunks);
    }
    Ok(all)
}

pub async fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<(), DomainError> {
    let mut out = String::new();
    for item in items {
        out.push_str(&serde_json::to_string(item)?);
        out.push('\n');
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, out).await?;
    Ok(())
}

/// Parses one JSON value per non-blank line.
pub async fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DomainError> {
    let raw = tokio::fs::read_to_string(path).await?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| {
                DomainError::validation(format!("{} line {}: {e}", path.display(), n + 1))
            })
        })
        .collect()
}

pub async fn write_job_id(path: &Path, job_id: &str) -> Result<(), DomainError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, job_id).await?;
    Ok(())
}

pub async fn read_job_id(path: &Path) -> Result<String, DomainError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::not_found(format!("{}: {e}", path.display())))?;
    let job_id = raw.trim();
    if job_id.is_empty() {
        return Err(DomainError::validation(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(job_id.to_string())
}
