//! Disk cache of generated combination images.

use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{codepoint_id, combination_key};

/// Disk cache of generated combinations, keyed by canonical combination key.
///
/// Layout: `{cache_dir}/{first emoji id}/{combination key}.png`. There is no
/// index; presence and validity are checked against the filesystem.
#[derive(Debug, Clone)]
pub struct EmojiCache {
    cache_dir: PathBuf,
    min_bytes: u64,
    placeholder_digests: Vec<String>,
}

impl EmojiCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            min_bytes: 1024,
            placeholder_digests: Vec::new(),
        }
    }

    /// Artifacts smaller than `min_bytes` fail validation.
    pub fn with_min_bytes(mut self, min_bytes: u64) -> Self {
        self.min_bytes = min_bytes;
        self
    }

    /// SHA-256 digests (hex) of images the service returns for unknown pairs.
    pub fn with_placeholder_digests(mut self, digests: Vec<String>) -> Self {
        self.placeholder_digests = digests.into_iter().map(|d| d.to_lowercase()).collect();
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// File name used for a pair, both in the cache and in sidecar directories.
    pub fn file_name(emoji1: &str, emoji2: &str) -> String {
        format!("{}.png", combination_key(emoji1, emoji2))
    }

    pub fn path_for(&self, emoji1: &str, emoji2: &str) -> PathBuf {
        self.cache_dir
            .join(codepoint_id(emoji1))
            .join(Self::file_name(emoji1, emoji2))
    }

    /// Cached artifact for the pair, if present and valid.
    pub async fn lookup(&self, emoji1: &str, emoji2: &str) -> Option<PathBuf> {
        let path = self.path_for(emoji1, emoji2);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }
        if self.is_valid_file(&path).await {
            Some(path)
        } else {
            debug!("Ignoring invalid cache entry {}", path.display());
            None
        }
    }

    /// Size and placeholder check on raw image bytes.
    pub fn is_valid_bytes(&self, bytes: &[u8]) -> bool {
        if (bytes.len() as u64) < self.min_bytes {
            return false;
        }
        if self.placeholder_digests.is_empty() {
            return true;
        }
        let digest = sha256_hex(bytes);
        !self.placeholder_digests.contains(&digest)
    }

    pub async fn is_valid_file(&self, path: &Path) -> bool {
        match tokio::fs::read(path).await {
            Ok(bytes) => self.is_valid_bytes(&bytes),
            Err(_) => false,
        }
    }

    /// Write an artifact atomically: temp file in the target directory, then rename.
    pub async fn store(&self, emoji1: &str, emoji2: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(emoji1, emoji2);
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cache_dir.clone());
        let len = bytes.len();

        let target = path.clone();
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_atomic(&parent, &target, &bytes))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        debug!("Cached {} ({} bytes)", path.display(), len);
        Ok(path)
    }

    /// Remove every cached artifact. Eviction is whole-cache only.
    pub fn clear(&self) -> io::Result<()> {
        if self.cache_dir.exists() {
            info!("Clearing emoji cache: {}", self.cache_dir.display());
            fs::remove_dir_all(&self.cache_dir)?;
        }
        fs::create_dir_all(&self.cache_dir)
    }
}

fn write_atomic(parent: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
