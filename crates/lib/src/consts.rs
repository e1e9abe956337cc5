/// Application name, used for default data and cache directories.
pub const APP_NAME: &str = "cellar";

/// Overrides the root directory holding the `Cellar/` and `opt/` trees.
pub const ROOT_ENV: &str = "CELLAR_ROOT";

/// Overrides the download cache directory.
pub const CACHE_ENV: &str = "CELLAR_CACHE";

/// Vendor SDK location required by the Oracle OCI SQL plugin.
pub const ORACLE_HOME_ENV: &str = "ORACLE_HOME";

/// Directory under the root holding installed kegs (`Cellar/<name>/<version>`).
pub const CELLAR_DIR: &str = "Cellar";

/// Directory under the root holding stable `opt/<name>` links to kegs.
pub const OPT_DIR: &str = "opt";

/// Value for SOURCE_DATE_EPOCH: 315532800 = January 1, 1980 00:00:00 UTC (ZIP epoch).
pub const SOURCE_DATE_EPOCH: &str = "315532800";
