/*
[INPUT]:  Built-in defaults, optional YAML file, JOBMON__* environment variables
[OUTPUT]: Resolved viewer configuration and adapter client settings
[POS]:    Configuration layer - service connection and cache setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File, FileFormat};
use jobmon_adapter::{ClientConfig, RetryPolicy};
use serde::{Deserialize, Serialize};

/// Environment prefix, e.g. `JOBMON__HTTP__SERVICE_URL`
pub const ENV_PREFIX: &str = "JOBMON";
const ENV_SEPARATOR: &str = "__";

/// Top-level configuration for the clustered errors viewer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewerConfig {
    pub http: HttpConfig,
    #[serde(default)]
    pub gui: GuiConfig,
}

/// Connection settings for the Jobmon service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Service root, e.g. "http://jobmon.example.org:5000"
    #[serde(default)]
    pub service_url: String,
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Total time budget for retries in seconds
    #[serde(default = "default_retries_timeout")]
    pub retries_timeout: u64,
    #[serde(default = "default_retries_attempts")]
    pub retries_attempts: u32,
}

/// Panel behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuiConfig {
    /// Lifetime of cached clustered-error results in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            cache_ttl: default_cache_ttl(),
        }
    }
}

fn default_route_prefix() -> String {
    "/api/v2".to_string()
}

fn default_request_timeout() -> u64 {
    20
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_retries_timeout() -> u64 {
    300
}

fn default_retries_attempts() -> u32 {
    3
}

fn default_cache_ttl() -> u64 {
    300
}

/// `<config_dir>/jobmon/jobmon.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jobmon").join("jobmon.yaml"))
}

impl ViewerConfig {
    /// Resolve configuration from defaults, the YAML file (if present), and
    /// the environment, in increasing priority.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("http.service_url", "")?
            .set_default("http.route_prefix", default_route_prefix())?
            .set_default("http.request_timeout", default_request_timeout() as i64)?
            .set_default("http.connect_timeout", default_connect_timeout() as i64)?
            .set_default("http.retries_timeout", default_retries_timeout() as i64)?
            .set_default("http.retries_attempts", default_retries_attempts() as i64)?
            .set_default("gui.cache_ttl", default_cache_ttl() as i64)?;

        match path {
            Some(path) => {
                let path_str = path.to_str().context("config path must be valid utf-8")?;
                builder = builder.add_source(File::new(path_str, FileFormat::Yaml).required(true));
            }
            None => {
                if let Some(default_path) = default_config_path() {
                    if let Some(path_str) = default_path.to_str() {
                        builder = builder
                            .add_source(File::new(path_str, FileFormat::Yaml).required(false));
                    }
                }
            }
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("build configuration")?
            .try_deserialize()
            .context("deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot reach a server
    pub fn validate(&self) -> Result<()> {
        if self.http.service_url.trim().is_empty() {
            bail!(
                "http.service_url is not set; use --config or {}__HTTP__SERVICE_URL",
                ENV_PREFIX
            );
        }
        if self.http.retries_attempts == 0 {
            bail!("http.retries_attempts must be at least 1");
        }
        Ok(())
    }

    /// Adapter client settings derived from the `http` section
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.http.request_timeout),
            connect_timeout: Duration::from_secs(self.http.connect_timeout),
            route_prefix: self.http.route_prefix.clone(),
            retry: RetryPolicy {
                max_attempts: self.http.retries_attempts,
                max_elapsed: Duration::from_secs(self.http.retries_timeout),
                ..RetryPolicy::default()
            },
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.gui.cache_ttl)
    }

    /// Render the resolved configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(contents: &str) -> (PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!(
            "jobmon-clustered-errors-{}-{}.yaml",
            std::process::id(),
            contents.len()
        ));
        let mut file = std::fs::File::create(&path).expect("create temp config");
        file.write_all(contents.as_bytes()).expect("write temp config");
        (path, file)
    }

    #[test]
    fn test_load_yaml_with_defaults() {
        let (path, _file) = write_yaml(
            "http:\n  service_url: http://jobmon.test:5000\n  retries_attempts: 5\n",
        );
        let config = ViewerConfig::load(Some(&path)).expect("load config");
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.http.service_url, "http://jobmon.test:5000");
        assert_eq!(config.http.route_prefix, "/api/v2");
        assert_eq!(config.http.retries_attempts, 5);
        assert_eq!(config.gui.cache_ttl, 300);

        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(20));
        assert_eq!(client.retry.max_attempts, 5);
        assert_eq!(client.retry.max_elapsed, Duration::from_secs(300));
    }

    #[test]
    fn test_missing_service_url_is_rejected() {
        let config = ViewerConfig {
            http: HttpConfig {
                service_url: "   ".to_string(),
                route_prefix: default_route_prefix(),
                request_timeout: 1,
                connect_timeout: 1,
                retries_timeout: 1,
                retries_attempts: 1,
            },
            gui: GuiConfig::default(),
        };
        let err = config.validate().expect_err("empty url");
        assert!(err.to_string().contains("service_url"));
    }

    #[test]
    fn test_yaml_output_round_trips_keys() {
        let (path, _file) = write_yaml("http:\n  service_url: http://a:1\ngui:\n  cache_ttl: 9\n");
        let config = ViewerConfig::load(Some(&path)).expect("load config");
        let _ = std::fs::remove_file(&path);

        let yaml = config.to_yaml().expect("yaml");
        assert!(yaml.contains("service_url: http://a:1"));
        assert!(yaml.contains("cache_ttl: 9"));
    }
}
