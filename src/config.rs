use std::{env, path::PathBuf, time::Duration};

use crate::error::AppError;

const DEFAULT_TREE_API_BASE: &str = "https://api.github.com/repos";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub tree_api_url: String,
    pub github_token: Option<String>,
    pub persistence_url: String,
    pub tree_timeout: Duration,
    pub create_timeout: Duration,
    pub fallback_catalog: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_port(env::var("SERVER_PORT").ok().as_deref())?;

        let github_user = env::var("GITHUB_USER").unwrap_or_else(|_| "sc-systems".into());
        let github_repo = env::var("GITHUB_REPO").unwrap_or_else(|_| "dsa-journey".into());
        let tree_api_url = env::var("TREE_API_URL")
            .unwrap_or_else(|_| format!("{DEFAULT_TREE_API_BASE}/{github_user}/{github_repo}"));

        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let persistence_url = env::var("PERSISTENCE_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".into());

        let tree_timeout = parse_seconds(
            "TREE_TIMEOUT_SECS",
            env::var("TREE_TIMEOUT_SECS").ok().as_deref(),
            10,
        )?;
        let create_timeout = parse_seconds(
            "CREATE_TIMEOUT_SECS",
            env::var("CREATE_TIMEOUT_SECS").ok().as_deref(),
            30,
        )?;

        let fallback_catalog = env::var("FALLBACK_CATALOG_PATH").ok().map(PathBuf::from);

        let log_dir = PathBuf::from(env::var("GATEWAY_LOG_DIR").unwrap_or_else(|_| "./log".into()));

        Ok(Self {
            host,
            port,
            tree_api_url,
            github_token,
            persistence_url,
            tree_timeout,
            create_timeout,
            fallback_catalog,
            log_dir,
        })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, AppError> {
    raw.unwrap_or("3001")
        .parse()
        .map_err(|err| AppError::Config(format!("invalid SERVER_PORT: {err}")))
}

fn parse_seconds(key: &str, raw: Option<&str>, default: u64) -> Result<Duration, AppError> {
    let seconds = match raw {
        Some(value) => value
            .parse::<u64>()
            .map_err(|err| AppError::Config(format!("invalid {key}: {err}")))?,
        None => default,
    };
    if seconds == 0 {
        return Err(AppError::Config(format!("{key} must be greater than zero")));
    }
    Ok(Duration::from_secs(seconds))
}
