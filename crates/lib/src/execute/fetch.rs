//! Fetching source archives and patches with SHA-256 verification.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::execute::types::FetchError;
use crate::util::hash::{hash_bytes, hash_file};

/// A downloadable file: primary URL, fallback mirrors and its checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
  pub url: String,
  pub mirrors: Vec<String>,
  pub sha256: String,
}

impl Resource {
  pub fn new(url: impl Into<String>, sha256: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      mirrors: Vec::new(),
      sha256: sha256.into(),
    }
  }

  pub fn mirror(mut self, url: impl Into<String>) -> Self {
    self.mirrors.push(url.into());
    self
  }

  /// Primary URL followed by the mirrors.
  pub fn urls(&self) -> impl Iterator<Item = &str> {
    std::iter::once(self.url.as_str()).chain(self.mirrors.iter().map(String::as_str))
  }

  /// Cache file name: a checksum prefix keeps two resources with the same
  /// basename apart.
  pub fn cache_name(&self) -> String {
    let prefix: String = self.sha256.chars().take(12).collect();
    format!("{}--{}", prefix, url_to_filename(&self.url))
  }
}

/// Downloads resources into a cache directory.
#[derive(Debug, Clone)]
pub struct Fetcher {
  downloads_dir: PathBuf,
  client: reqwest::Client,
}

impl Fetcher {
  pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
    Self {
      downloads_dir: downloads_dir.into(),
      client: reqwest::Client::new(),
    }
  }

  /// Fetch a resource and return the path of the verified file.
  ///
  /// A cached file with the right checksum is reused. Otherwise each URL is
  /// tried in order until one downloads. A checksum mismatch is returned
  /// immediately without trying further mirrors.
  pub async fn fetch(&self, resource: &Resource) -> Result<PathBuf, FetchError> {
    fs::create_dir_all(&self.downloads_dir).await?;
    let dest_path = self.downloads_dir.join(resource.cache_name());

    if dest_path.exists() {
      debug!(path = ?dest_path, "checking cached file");
      let cached = dest_path.clone();
      let hashed = tokio::task::spawn_blocking(move || hash_file(&cached))
        .await
        .map_err(std::io::Error::other)?;
      match hashed {
        Ok(actual) if actual.matches(&resource.sha256) => {
          info!(path = ?dest_path, "using cached file");
          return Ok(dest_path);
        }
        Ok(actual) => {
          debug!(expected = %resource.sha256, actual = %actual, "cached file hash mismatch, re-downloading")
        }
        Err(e) => debug!(error = %e, "cached file unreadable, re-downloading"),
      }
    }

    let mut last_error = None;
    for url in resource.urls() {
      info!(url = %url, "fetching URL");

      let bytes = match self.download(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
          warn!(url = %url, error = %e, "download failed");
          last_error = Some(e);
          continue;
        }
      };

      let actual = hash_bytes(&bytes);
      if !actual.matches(&resource.sha256) {
        return Err(FetchError::Integrity {
          url: url.to_string(),
          expected: resource.sha256.clone(),
          actual: actual.0,
        });
      }

      let mut file = fs::File::create(&dest_path).await?;
      file.write_all(&bytes).await?;
      file.flush().await?;

      info!(path = ?dest_path, size = bytes.len(), "download complete");
      return Ok(dest_path);
    }

    Err(last_error.unwrap_or_else(|| FetchError::Download {
      url: resource.url.clone(),
      message: "no URLs to try".to_string(),
    }))
  }

  async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    if let Some(path) = url.strip_prefix("file://") {
      return fs::read(Path::new(path)).await.map_err(|e| FetchError::Download {
        url: url.to_string(),
        message: e.to_string(),
      });
    }

    let failed = |message: String| FetchError::Download {
      url: url.to_string(),
      message,
    };

    let response = self.client.get(url).send().await.map_err(|e| failed(e.to_string()))?;
    if !response.status().is_success() {
      return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    Ok(bytes.to_vec())
  }
}

/// Convert a URL to a safe filename.
///
/// Takes the last path component and sanitizes it, falling back to
/// `download` when nothing usable remains.
fn url_to_filename(url: &str) -> String {
  let last = url.rsplit('/').next().unwrap_or(url);
  let last = last.split('?').next().unwrap_or(last);

  let sanitized: String = last
    .chars()
    .map(|c| {
      if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
        c
      } else {
        '_'
      }
    })
    .collect();

  if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
    "download".to_string()
  } else {
    sanitized
  }
}
