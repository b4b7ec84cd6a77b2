// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{MirrorError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub remote: RemoteConfig,
    pub content: ContentConfig,
    pub mirror: MirrorConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub subdirectory: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    pub excerpt_max_chars: usize,
    pub markdown_extensions: Vec<String>,
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,
    pub max_file_size_kb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MirrorConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    pub interval_secs: u64,
    pub fetch_concurrency: usize,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_image_prefix() -> String {
    "/images/".to_string()
}

impl RemoteConfig {
    /// `owner/repo@branch`, used in logs and as the manifest's repository label.
    pub fn label(&self) -> String {
        format!("{}/{}@{}", self.owner, self.repo, self.branch)
    }

    /// The configured token, ignoring blank values.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Subdirectory without surrounding slashes.
    pub fn content_root(&self) -> &str {
        self.subdirectory.trim_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("BLOG_MIRROR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| MirrorError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| MirrorError::Config(e.to_string()))?;

        config.apply_token_fallback(std::env::var("GITHUB_TOKEN").ok());
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            remote: RemoteConfig {
                api_base: default_api_base(),
                owner: "user".to_string(),
                repo: "blog".to_string(),
                branch: "main".to_string(),
                subdirectory: "data".to_string(),
                token: None,
                request_timeout_secs: default_request_timeout(),
            },
            content: ContentConfig {
                excerpt_max_chars: 140,
                markdown_extensions: vec!["md".to_string(), "markdown".to_string()],
                image_prefix: default_image_prefix(),
                max_file_size_kb: 1024,
            },
            mirror: MirrorConfig {
                enabled: true,
                dir: PathBuf::from("./data/mirror"),
            },
            scheduler: SchedulerConfig {
                interval_secs: 600,
                fetch_concurrency: 4,
            },
        }
    }

    fn apply_token_fallback(&mut self, env_token: Option<String>) {
        if self.remote.bearer_token().is_none() {
            self.remote.token = env_token.filter(|token| !token.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.remote.api_base)?;

        for (name, value) in [
            ("remote.owner", &self.remote.owner),
            ("remote.repo", &self.remote.repo),
            ("remote.branch", &self.remote.branch),
        ] {
            if value.trim().is_empty() {
                return Err(MirrorError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.scheduler.interval_secs == 0 {
            return Err(MirrorError::Config(
                "interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.scheduler.fetch_concurrency == 0 {
            return Err(MirrorError::Config(
                "fetch_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.content.excerpt_max_chars == 0 {
            return Err(MirrorError::Config(
                "excerpt_max_chars must be greater than 0".to_string(),
            ));
        }

        if self.content.markdown_extensions.is_empty() {
            return Err(MirrorError::Config(
                "markdown_extensions must list at least one extension".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.remote.label(), "user/blog@main");
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default_config();
        config.scheduler.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_api_base() {
        let mut config = Config::default_config();
        config.remote.api_base = "api.github.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let mut config = Config::default_config();
        config.remote.token = Some("   ".to_string());
        assert_eq!(config.remote.bearer_token(), None);

        config.apply_token_fallback(Some("ghp_env".to_string()));
        assert_eq!(config.remote.bearer_token(), Some("ghp_env"));
    }

    #[test]
    fn test_configured_token_wins_over_env() {
        let mut config = Config::default_config();
        config.remote.token = Some("ghp_file".to_string());
        config.apply_token_fallback(Some("ghp_env".to_string()));
        assert_eq!(config.remote.bearer_token(), Some("ghp_file"));
    }

    #[test]
    fn test_content_root_strips_slashes() {
        let mut config = Config::default_config();
        config.remote.subdirectory = "/posts/".to_string();
        assert_eq!(config.remote.content_root(), "posts");
    }

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mirror.toml");
        fs::write(
            &path,
            r#"
[remote]
owner = "lipcoder"
repo = "notes"
branch = "main"
subdirectory = "data"

[content]
excerpt_max_chars = 140
markdown_extensions = ["md"]
max_file_size_kb = 512

[mirror]
enabled = true
dir = "./mirror"

[scheduler]
interval_secs = 300
fetch_concurrency = 2
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.remote.api_base, "https://api.github.com");
        assert_eq!(config.remote.repo, "notes");
        assert_eq!(config.content.image_prefix, "/images/");
        assert_eq!(config.scheduler.interval(), Duration::from_secs(300));
    }
}
