use tracing::info;
use voterroll_config::{Config, DATABASE_URL_ENV};

/// Strategy for displaying configuration information.
///
/// Outputs the database URL (masked) and connection status, the store
/// settings and the extraction settings.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== voterroll Configuration ===\n");

        println!("Database:");
        match config.database_url() {
            Ok(url) => {
                println!("  URL: {}", mask_database_url(&url));
                if std::env::var(DATABASE_URL_ENV).is_ok() {
                    println!("  Source: {DATABASE_URL_ENV}");
                }
                println!("  Max Connections: {}", config.database.max_connections);

                info!("Testing database connection");
                match super::open_store(&config).await {
                    Ok(store) => {
                        println!("  Status: Connected");
                        match store.count_records().await {
                            Ok(count) => println!("  Records: {count}"),
                            Err(e) => println!("  Records: unavailable ({e})"),
                        }
                        store.close().await?;
                    }
                    Err(e) => {
                        println!("  Status: Connection failed");
                        println!("  Error: {e}");
                    }
                }
            }
            Err(e) => println!("  URL: (not set) {e}"),
        }
        println!();

        println!("Store:");
        println!("  Batch Size: {}", config.store.batch_size);
        println!("  File List TTL: {}s", config.store.file_list_ttl_secs);
        println!("  Retry:");
        println!("    Max Attempts: {}", config.store.retry.max_attempts);
        println!("    Base Delay: {}ms", config.store.retry.base_delay_ms);
        println!();

        println!("Extraction:");
        println!("  Policy: {:?}", config.extraction.policy);
        println!("  Patterns: {}", config.extraction.patterns.len());
        for pattern in &config.extraction.patterns {
            println!("    {}: {}", pattern.field, truncate(&pattern.label, 60));
        }

        Ok(())
    }
}

fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let Some((credentials, after_at)) = rest.split_once('@') else {
        return url.to_string();
    };

    let Some((username, _password)) = credentials.split_once(':') else {
        return url.to_string();
    };

    format!("{scheme}://{username}:***@{after_at}")
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
