use anyhow::{anyhow, Context, Result};
use env_logger::Builder;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db";
const DEFAULT_MAX_RESULTS: u32 = 10;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;
const DEFAULT_PORT: u16 = 5000;

/// Server configuration, read once at startup and handed to [`crate::AppState`].
#[derive(Clone)]
pub struct Config {
    pub youtube_api_key: String,
    pub youtube_api_base_url: Url,
    pub max_results: u32,
    pub region_code: Option<String>,
    pub relevance_language: Option<String>,
    pub upstream_timeout: Duration,
    pub database_url: String,
    pub address: IpAddr,
    pub port: u16,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("youtube_api_key", &"<redacted>")
            .field("youtube_api_base_url", &self.youtube_api_base_url.as_str())
            .field("max_results", &self.max_results)
            .field("region_code", &self.region_code)
            .field("relevance_language", &self.relevance_language)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("database_url", &self.database_url)
            .field("address", &self.address)
            .field("port", &self.port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let youtube_api_key = get("YOUTUBE_API_KEY")
            .ok_or_else(|| anyhow!("YOUTUBE_API_KEY environment variable must be set"))?;

        let base_url = get("YOUTUBE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string());
        let youtube_api_base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid YOUTUBE_API_BASE_URL: {base_url}"))?;

        let max_results = parse_or(
            get("YOUTUBE_MAX_RESULTS"),
            "YOUTUBE_MAX_RESULTS",
            DEFAULT_MAX_RESULTS,
        )?
        .clamp(1, 50);
        let timeout_secs = parse_or(
            get("UPSTREAM_TIMEOUT_SECS"),
            "UPSTREAM_TIMEOUT_SECS",
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(anyhow!("UPSTREAM_TIMEOUT_SECS must be greater than zero"));
        }

        let address = parse_or(
            get("SERVER_ADDRESS"),
            "SERVER_ADDRESS",
            IpAddr::from([127, 0, 0, 1]),
        )?;
        let port = parse_or(get("SERVER_PORT"), "SERVER_PORT", DEFAULT_PORT)?;

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            youtube_api_key,
            youtube_api_base_url,
            max_results,
            region_code: get("YOUTUBE_REGION_CODE"),
            relevance_language: get("YOUTUBE_RELEVANCE_LANGUAGE"),
            upstream_timeout: Duration::from_secs(timeout_secs),
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            address,
            port,
            cors_allowed_origins,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}")),
        None => Ok(default),
    }
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting Rocket backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_cors(config: &Config) -> Result<rocket_cors::Cors> {
    let allowed_origins = if config.cors_allowed_origins.is_empty() {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&config.cors_allowed_origins)
    };

    let cors = CorsOptions::default()
        .allowed_origins(allowed_origins)
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&[
            "Authorization",
            "Accept",
            "Content-Type",
        ]))
        .allow_credentials(!config.cors_allowed_origins.is_empty())
        .to_cors()
        .map_err(|e| anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
