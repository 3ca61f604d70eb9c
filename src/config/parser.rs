use crate::config::types::{Config, StartLinks};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// When `input.start-links` is set, the JSON seed file is read as well. A
/// relative path is resolved against the folder holding the configuration.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docs_harvest::config::load_config;
///
/// let config = load_config(Path::new("docs-harvest.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    if let Some(links_path) = &config.input.start_links {
        let resolved = match path.parent() {
            Some(dir) if links_path.is_relative() => dir.join(links_path),
            _ => links_path.clone(),
        };
        config.start_links = load_start_links(&resolved)?;
    }

    validate(&config)?;

    Ok(config)
}

/// Reads a start-links JSON file: an array of `{"product": .., "urls": [..]}`
pub fn load_start_links(path: &Path) -> Result<Vec<StartLinks>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<StartLinks> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a corpus can be traced back to the configuration
/// that produced it.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderKind;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const VALID_CONFIG: &str = r#"
[crawler]
max-depth = 3
max-pages-per-product = 100
loader = "http"

[output]
base-folder = "./corpus"

[filter]
allowed-domains = ["https://help.salesforce.com", "https://developer.salesforce.com"]

[[product]]
name = "Sales_Cloud"
prefixes = ["id=sales", "/products/sales", "/content/learn/"]
seeds = ["https://help.salesforce.com/s/articleView?id=sales.leads.htm"]

[[product]]
name = "Agentforce"
prefixes = ["id=ai"]
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_pages_per_product, 100);
        assert_eq!(config.crawler.loader, LoaderKind::Http);
        assert_eq!(config.crawler.element_timeout_ms, 10_000);
        assert_eq!(config.crawler.legacy_settle_ms, 3_000);
        assert_eq!(config.crawler.trailhead_settle_ms, 5_000);
        assert_eq!(config.crawler.min_content_length, 500);
        assert_eq!(config.output.skipped_404_file, "skipped_404.log");
        assert_eq!(config.products.len(), 2);
        assert_eq!(
            config.filter.universal_prefixes,
            vec!["/content/learn/".to_string(), "/en/content/learn/".to_string()]
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = VALID_CONFIG.replace("max-pages-per-product = 100", "max-pages-per-product = 0");
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_prefixes_for_appends_universal_without_duplicates() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(
            config.prefixes_for("Sales_Cloud"),
            vec![
                "id=sales".to_string(),
                "/products/sales".to_string(),
                "/content/learn/".to_string(),
                "/en/content/learn/".to_string(),
            ]
        );
        assert_eq!(
            config.prefixes_for("Unknown"),
            vec!["/content/learn/".to_string(), "/en/content/learn/".to_string()]
        );
    }

    #[test]
    fn test_targets_merge_start_links() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("start_links.json"),
            r#"[
                {"product": "Agentforce", "urls": ["https://help.salesforce.com/s/articleView?id=ai.overview.htm"]},
                {"product": "Sales_Cloud", "urls": ["https://help.salesforce.com/s/articleView?id=sales.opps.htm"]}
            ]"#,
        )
        .unwrap();
        let config_path = dir.path().join("docs-harvest.toml");
        std::fs::write(
            &config_path,
            format!("{}\n[input]\nstart-links = \"start_links.json\"\n", VALID_CONFIG),
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        let targets = config.targets();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].product, "Sales_Cloud");
        assert_eq!(
            targets[0].seed_urls,
            vec![
                "https://help.salesforce.com/s/articleView?id=sales.leads.htm".to_string(),
                "https://help.salesforce.com/s/articleView?id=sales.opps.htm".to_string(),
            ]
        );
        assert_eq!(targets[1].product, "Agentforce");
        assert_eq!(targets[1].seed_urls.len(), 1);
    }

    #[test]
    fn test_start_links_for_unknown_product_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("links.json"),
            r#"[{"product": "Nonexistent", "urls": []}]"#,
        )
        .unwrap();
        let config_path = dir.path().join("docs-harvest.toml");
        std::fs::write(
            &config_path,
            format!("{}\n[input]\nstart-links = \"links.json\"\n", VALID_CONFIG),
        )
        .unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_example_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("docs-harvest.example.toml");
        let config = load_config(&path).unwrap();

        assert_eq!(config.crawler.loader, LoaderKind::Browser);
        assert_eq!(config.products.len(), 9);
        assert!(config
            .prefixes_for("Agentforce")
            .contains(&"/en/content/learn/".to_string()));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
