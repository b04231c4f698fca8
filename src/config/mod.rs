mod types;

pub use types::*;

use crate::{Error, Result};
use std::{collections::HashMap, env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub const DOTENV_PATH: &str = ".env";

/// Reads `KEY=value` pairs from a dotenv file. A missing file is `Ok(None)`.
///
/// The process environment is left untouched; combine the result with
/// [`with_dotenv`] or pass it to [`load`].
pub fn read_dotenv(path: impl AsRef<Path>) -> Result<Option<HashMap<String, String>>> {
    let iter = match dotenvy::from_path_iter(path.as_ref()) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let vars = iter.collect::<std::result::Result<HashMap<_, _>, _>>()?;
    Ok(Some(vars))
}

/// Layers dotenv values under `lookup`: a variable set in `lookup`, even to
/// an empty string, is never replaced.
pub fn with_dotenv<'a, F>(
    lookup: F,
    dotenv: &'a HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + 'a
where
    F: Fn(&str) -> Option<String> + 'a,
{
    move |key: &str| lookup(key).or_else(|| dotenv.get(key).cloned())
}

/// Resolves configuration from the process environment, falling back to
/// `dotenv` for variables the process does not set.
pub async fn load(dotenv: Option<&HashMap<String, String>>) -> Result<Config> {
    let process = |key: &str| env::var(key).ok();
    match dotenv {
        Some(vars) => load_with(with_dotenv(process, vars)).await,
        None => load_with(process).await,
    }
}

/// Resolves configuration against `lookup` instead of the real environment.
///
/// Defaults, then the optional YAML file, then environment variables. Empty
/// variables count as unset.
pub async fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

    let mut config = match var("CONFIG_PATH") {
        Some(path) => read_file(&path).await?,
        None if tokio::fs::try_exists(DEFAULT_CONFIG_PATH).await? => {
            read_file(DEFAULT_CONFIG_PATH).await?
        }
        None => Config::default(),
    };

    if let Some(port) = var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("invalid PORT value '{}'", port)))?;
    }
    if let Some(api_key) = var("OPENAI_API_KEY") {
        config.llm.api_key = api_key;
    }
    if let Some(model) = var("OPENAI_MODEL") {
        config.llm.model = model;
    }
    if let Some(base_url) = var("OPENAI_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(timeout) = var("REQUEST_TIMEOUT_SECS") {
        config.server.request_timeout_secs = timeout.parse().map_err(|_| {
            Error::config(format!("invalid REQUEST_TIMEOUT_SECS value '{}'", timeout))
        })?;
    }

    validate(&config)?;
    Ok(config)
}

async fn read_file(path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", path);

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.llm.api_key.is_empty() {
        return Err(Error::config("OPENAI_API_KEY is not set in environment"));
    }
    if config.llm.provider != "openai" {
        return Err(Error::config(format!(
            "unsupported LLM provider '{}'",
            config.llm.provider
        )));
    }
    if config.llm.model.is_empty() {
        return Err(Error::config("LLM model must not be empty"));
    }
    if config.server.request_timeout_secs == 0 {
        return Err(Error::config("request_timeout_secs must be greater than zero"));
    }
    Ok(())
}
