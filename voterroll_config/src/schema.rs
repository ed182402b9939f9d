use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use voterroll_core::{ExtractionConfig, StoreSettings};

/// Environment variable that overrides `database.url`.
pub const DATABASE_URL_ENV: &str = "VOTERROLL_DATABASE_URL";

const CONFIG_DIR: &str = "voterroll";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: Self::default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    const fn default_max_connections() -> u32 {
        10
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'voterroll init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Database URL, with the environment override applied.
    ///
    /// # Errors
    /// Fails when neither the environment nor the config file supplies one.
    pub fn database_url(&self) -> anyhow::Result<String> {
        self.resolve_database_url(std::env::var(DATABASE_URL_ENV).ok())
    }

    fn resolve_database_url(&self, env_url: Option<String>) -> anyhow::Result<String> {
        env_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                self.database
                    .url
                    .clone()
                    .filter(|url| !url.trim().is_empty())
            })
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No database URL configured. Set database.url in {CONFIG_FILE} or {DATABASE_URL_ENV}."
                )
            })
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, Self::template())?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point database.url at your database (or set {DATABASE_URL_ENV})");
        println!("   2. Run 'voterroll info' to check the connection");
        println!("   3. Run 'voterroll import <file>' to load a voter roll");
        println!();
        println!("🔧 Configuration options:");
        println!("   - store.batch_size: Records written per transaction");
        println!("   - store.retry: Attempts and base delay for transient failures");
        println!("   - extraction.policy: lenient keeps partial entries, strict drops them");
        println!();
        Ok(())
    }

    const fn template() -> &'static str {
        r#"{
  "database": {
    "url": "sqlite://voterroll.db?mode=rwc",
    "max_connections": 10
  },
  "store": {
    "batch_size": 100,
    "file_list_ttl_secs": 60,
    "retry": {
      "max_attempts": 3,
      "base_delay_ms": 1000
    }
  },
  "extraction": {
    "policy": "lenient"
  }
}"#
    }
}
