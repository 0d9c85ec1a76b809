//! Configuration loading for Tubescout.
//!
//! Values are layered: built-in defaults, then `tubescout.toml` (or the file
//! named by `TUBESCOUT_CONFIG_PATH`), then environment variables, with a
//! `.env` file read first when present. Out-of-range values are pulled back
//! into range and reported as [`ConfigWarnings`].
#![allow(missing_docs)]

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{ApiConfig, Config, ConfigMetadata, SearchDefaults};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
