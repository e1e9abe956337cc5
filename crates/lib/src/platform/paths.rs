use std::path::PathBuf;

use crate::consts::{APP_NAME, CACHE_ENV, ROOT_ENV};

/// Returns the user's home directory, or the system temp directory when
/// `HOME` is not set.
pub fn home_dir() -> PathBuf {
  std::env::var_os("HOME")
    .map(PathBuf::from)
    .unwrap_or_else(std::env::temp_dir)
}

/// Returns the directory for data files for the application
pub fn data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Returns the directory for cache files for the application
pub fn cache_dir() -> PathBuf {
  let cache_home = std::env::var("XDG_CACHE_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".cache"));
  cache_home.join(APP_NAME)
}

/// Root holding `Cellar/` and `opt/`. `CELLAR_ROOT` takes precedence over the
/// data directory.
pub fn root_dir() -> PathBuf {
  std::env::var_os(ROOT_ENV)
    .map(PathBuf::from)
    .unwrap_or_else(data_dir)
}

/// Download cache. `CELLAR_CACHE` takes precedence over the cache directory.
pub fn downloads_dir() -> PathBuf {
  std::env::var_os(CACHE_ENV)
    .map(PathBuf::from)
    .unwrap_or_else(cache_dir)
    .join("downloads")
}
