use std::env;
use url::Url;

use crate::docs::{DocProvider, DocStructure};

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

/// Which directory implementation backs the console
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryBackend {
    /// SCIM 2.0 endpoint plus the server management API
    Scim {
        scim_base_url: Url,
        server_api_url: Url,
        api_token: Option<String>,
    },
    /// Seeded in-process directory (local development)
    Memory,
}

/// Documentation help panel configuration
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// Raw content endpoint; no endpoint means no help panel content
    pub content_url: Option<Url>,
    pub provider: DocProvider,
    pub branch: String,
    pub image_prefix_url: Option<String>,
    pub structure: DocStructure,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Environment configuration
    pub environment: Environment,

    // Server configuration
    pub server_host: String,
    pub server_port: u16,

    // Directory configuration
    pub directory: DirectoryBackend,

    // HTTP client timeout configuration (in seconds)
    pub http_connect_timeout_secs: u64,
    pub http_request_timeout_secs: u64,

    // Help panel configuration
    pub docs: DocsConfig,
}

fn parse_url(name: &str, value: &str) -> anyhow::Result<Url> {
    Url::parse(value).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables using std::env::var
    pub fn load() -> anyhow::Result<Self> {
        // Parse environment type
        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        // Directory backend: SCIM unless explicitly asked for the in-memory one
        let directory = match env::var("DIRECTORY_BACKEND")
            .unwrap_or_else(|_| "scim".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => DirectoryBackend::Memory,
            "scim" => {
                let scim_base = env::var("SCIM_BASE_URL").map_err(|_| {
                    anyhow::anyhow!("SCIM_BASE_URL environment variable is required")
                })?;
                let scim_base_url = parse_url("SCIM_BASE_URL", &scim_base)?;

                // Management API defaults to the SCIM host when not set separately
                let server_api_url = match non_empty_var("SERVER_API_URL") {
                    Some(url) => parse_url("SERVER_API_URL", &url)?,
                    None => scim_base_url.clone(),
                };

                DirectoryBackend::Scim {
                    scim_base_url,
                    server_api_url,
                    api_token: non_empty_var("SCIM_API_TOKEN"),
                }
            }
            other => {
                return Err(anyhow::anyhow!(
                    "DIRECTORY_BACKEND must be 'scim' or 'memory', got '{}'",
                    other
                ))
            }
        };

        // Optional variables with defaults
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let http_connect_timeout_secs = env::var("HTTP_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let http_request_timeout_secs = env::var("HTTP_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        // Documentation structure (primary: JSON env var, fallback: file path)
        let structure = if let Some(json) = non_empty_var("DOCS_STRUCTURE_JSON") {
            DocStructure::parse(&json)
                .map_err(|e| anyhow::anyhow!("DOCS_STRUCTURE_JSON is not valid JSON: {}", e))?
        } else if let Some(path) = non_empty_var("DOCS_STRUCTURE_PATH") {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
            DocStructure::parse(&json)
                .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path, e))?
        } else {
            DocStructure::default()
        };

        let content_url = match non_empty_var("DOCS_CONTENT_URL") {
            Some(url) => Some(parse_url("DOCS_CONTENT_URL", &url)?),
            None => None,
        };

        let docs = DocsConfig {
            content_url,
            provider: DocProvider::parse(&env::var("DOCS_PROVIDER").unwrap_or_default()),
            branch: non_empty_var("DOCS_BRANCH").unwrap_or_else(|| "master".to_string()),
            image_prefix_url: non_empty_var("DOCS_IMAGE_PREFIX_URL"),
            structure,
        };

        Ok(Config {
            environment,
            server_host,
            server_port,
            directory,
            http_connect_timeout_secs,
            http_request_timeout_secs,
            docs,
        })
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get bind address for server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
