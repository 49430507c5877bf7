//! Saving the reassembled file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use qrbeam_core::CompletedFile;

/// Name used when the broadcaster's file name has nothing usable left.
pub const FALLBACK_FILE_NAME: &str = "file";

/// Reduce an announced file name to a single safe path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Parse an expected SHA-256 given as hex.
pub fn parse_digest(s: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = hex::decode(s.trim()).context("expected digest is not hex")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("expected digest is {} bytes, need 32", b.len()))
}

/// Write `file` into `dir` under its sanitized name. Returns the path written.
pub async fn save(dir: &Path, file: &CompletedFile) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(sanitize_file_name(&file.file_name));
    tokio::fs::write(&path, &file.data)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
