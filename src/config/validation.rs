use crate::config::types::{Config, CrawlerConfig, FilterConfig, OutputConfig, ProductEntry, StartLinks};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_filter_config(&config.filter)?;
    validate_products(&config.products)?;
    validate_start_links(&config.start_links, &config.products)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth = 0 is allowed: only the seeds are processed

    if config.max_pages_per_product < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_product must be >= 1, got {}",
            config.max_pages_per_product
        )));
    }

    if config.page_load_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "page_load_timeout_ms must be >= 100ms, got {}ms",
            config.page_load_timeout_ms
        )));
    }

    if config.element_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "element_timeout_ms must be >= 100ms, got {}ms",
            config.element_timeout_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_folder.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "base_folder cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("skipped_404_file", &config.skipped_404_file),
        ("summary_file", &config.summary_file),
        ("graph_file", &config.graph_file),
        ("log_file", &config.log_file),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates the allowed domain origins
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_domains must list at least one origin".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        validate_http_url(domain, "allowed domain")?;
    }

    Ok(())
}

/// Validates product entries
fn validate_products(products: &[ProductEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in products {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "product '{}' is configured more than once",
                entry.name
            )));
        }

        if entry.prefixes.is_empty() {
            return Err(ConfigError::Validation(format!(
                "product '{}' must have at least one prefix",
                entry.name
            )));
        }

        for seed in &entry.seeds {
            validate_http_url(seed, "seed URL")?;
        }
    }

    Ok(())
}

/// Start-links records must name a configured product
fn validate_start_links(records: &[StartLinks], products: &[ProductEntry]) -> Result<(), ConfigError> {
    for record in records {
        if !products.iter().any(|p| p.name == record.product) {
            return Err(ConfigError::Validation(format!(
                "start links name unconfigured product '{}'",
                record.product
            )));
        }

        for url in &record.urls {
            validate_http_url(url, "seed URL")?;
        }
    }

    Ok(())
}

/// Validates an absolute http(s) URL
fn validate_http_url(value: &str, what: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", what, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            what, value
        )));
    }

    Ok(())
}
