pub mod error;

use once_cell::sync::Lazy;
use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use tracing::debug;
use tubescout_core::enrichment::DetailFetchSettings;
use tubescout_core::providers::youtube::DEFAULT_API_BASE;
use tubescout_core::{PartialResultPolicy, RetryPolicy};
use tubescout_model::{SafeSearch, SearchOrder};
use url::Url;

use crate::constants::{
    DEFAULT_DETAIL_CONCURRENCY, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT_SECS,
    MAX_RESULTS_LIMIT,
};
use crate::models::{
    ApiConfig, Config, ConfigMetadata, SearchDefaults,
    sources::{EnvConfig, FileConfig},
};
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("tubescout.toml"),
        PathBuf::from("config/tubescout.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Use these values instead of reading the process environment. No
    /// `.env` file is loaded in that case.
    pub env: Option<EnvConfig>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.options.env = Some(env);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env_config, env_file_loaded) = match &self.options.env {
            Some(env) => (env.clone(), false),
            None => {
                let loaded = self.load_env_file()?;
                (EnvConfig::gather(), loaded)
            }
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let mut config = compose_config(
            file_config.unwrap_or_default(),
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;
        let warnings = validation::apply_guard_rails(&mut config)?;

        Ok(ConfigLoad { config, warnings })
    }

    /// An explicitly named env file must exist; the implicit `./.env` is
    /// optional.
    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let result = match &self.options.env_file {
            Some(path) if !path.is_file() => {
                return Err(ConfigLoadError::MissingEnvFile { path: path.clone() });
            }
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        match result {
            Ok(()) => Ok(true),
            Err(dotenvy::Error::Io(_)) if self.options.env_file.is_none() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = if let Some(path) = &self.options.config_path {
            (path.clone(), true)
        } else if let Some(path) = &env_config.config_path {
            (path.clone(), true)
        } else if let Some(path) = DEFAULT_CONFIG_LOCATIONS
            .iter()
            .find(|candidate| candidate.exists())
        {
            (path.clone(), false)
        } else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|source| {
            ConfigLoadError::ParseJson {
                path: path.to_path_buf(),
                source,
            }
        }),
        _ => toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_setting<T>(
    setting: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigLoadError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map(|value| {
        value.parse::<T>().map_err(|err| ConfigLoadError::InvalidValue {
            setting,
            reason: err.to_string(),
            value,
        })
    })
    .transpose()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Layer environment over file over defaults.
fn compose_config(
    file: FileConfig,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<Config, ConfigLoadError> {
    let FileConfig {
        api: file_api,
        search: file_search,
        detail: file_detail,
        retry: file_retry,
    } = file;

    let base_url = non_blank(env.api_base_url)
        .or(non_blank(file_api.base_url))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    Url::parse(&base_url).map_err(|source| ConfigLoadError::InvalidBaseUrl {
        value: base_url.clone(),
        source,
    })?;

    let api = ApiConfig {
        api_key: non_blank(env.api_key).or(non_blank(file_api.api_key)),
        base_url,
        timeout: Duration::from_secs(
            env.request_timeout_secs
                .or(file_api.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
    };

    let search = SearchDefaults {
        max_results: env
            .max_results
            .or(file_search.default_max_results)
            .unwrap_or(DEFAULT_MAX_RESULTS),
        max_results_limit: file_search.max_results_limit.unwrap_or(MAX_RESULTS_LIMIT),
        order: parse_setting::<SearchOrder>("search.order", non_blank(file_search.order))?
            .unwrap_or_default(),
        safe_search: parse_setting::<SafeSearch>(
            "safe_search",
            non_blank(env.safe_search).or(non_blank(file_search.safe_search)),
        )?
        .unwrap_or_default(),
        region: non_blank(env.region).or(non_blank(file_search.region)),
        language: non_blank(env.language).or(non_blank(file_search.language)),
    };

    let defaults = DetailFetchSettings::default();
    let retry_defaults = RetryPolicy::default();
    let detail = DetailFetchSettings {
        batch_size: env
            .detail_batch_size
            .or(file_detail.batch_size)
            .unwrap_or(defaults.batch_size),
        max_concurrency: env
            .detail_concurrency
            .or(file_detail.max_concurrency)
            .unwrap_or(DEFAULT_DETAIL_CONCURRENCY),
        retry: RetryPolicy {
            max_attempts: env
                .retry_max_attempts
                .or(file_retry.max_attempts)
                .unwrap_or(retry_defaults.max_attempts),
            backoff_base_ms: file_retry
                .backoff_base_ms
                .unwrap_or(retry_defaults.backoff_base_ms),
            backoff_max_ms: file_retry
                .backoff_max_ms
                .unwrap_or(retry_defaults.backoff_max_ms),
        },
    };

    let partial_results = parse_setting::<PartialResultPolicy>(
        "partial_results",
        non_blank(env.partial_results).or(non_blank(file_detail.partial_results)),
    )?
    .unwrap_or_default();

    Ok(Config {
        api,
        search,
        detail,
        partial_results,
        metadata,
    })
}
