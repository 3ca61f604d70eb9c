use crate::config::Config;
use std::collections::HashMap;

/// Decides which discovered links a product may enqueue
///
/// A link is eligible only if it contains at least one of the product's
/// prefixes AND starts with one of the allowed domain origins. Both are
/// plain substring/prefix checks on the raw URL string, evaluated in that
/// order.
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    prefixes: HashMap<String, Vec<String>>,
    allowed_domains: Vec<String>,
}

impl LinkFilter {
    /// Creates an empty filter that only admits the given origins
    pub fn new(allowed_domains: Vec<String>) -> Self {
        Self {
            prefixes: HashMap::new(),
            allowed_domains,
        }
    }

    /// Builds the filter for every configured product, universal prefixes included
    pub fn from_config(config: &Config) -> Self {
        let mut filter = Self::new(config.filter.allowed_domains.clone());
        for entry in &config.products {
            filter = filter.with_product(&entry.name, config.prefixes_for(&entry.name));
        }
        filter
    }

    /// Sets the allow-list for one product, replacing any previous one
    pub fn with_product(mut self, product: &str, prefixes: Vec<String>) -> Self {
        self.prefixes.insert(product.to_string(), prefixes);
        self
    }

    /// Returns true if `product` may follow `href`
    ///
    /// Products without a configured allow-list never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_harvest::url::LinkFilter;
    ///
    /// let filter = LinkFilter::new(vec!["https://help.salesforce.com".to_string()])
    ///     .with_product("Sales_Cloud", vec!["id=sales".to_string()]);
    ///
    /// assert!(filter.is_eligible("Sales_Cloud", "https://help.salesforce.com/s/articleView?id=sales.foo"));
    /// assert!(!filter.is_eligible("Sales_Cloud", "https://evil.com/id=sales"));
    /// ```
    pub fn is_eligible(&self, product: &str, href: &str) -> bool {
        self.matches_prefix(product, href) && self.matches_domain(href)
    }

    fn matches_prefix(&self, product: &str, href: &str) -> bool {
        self.prefixes
            .get(product)
            .map(|prefixes| prefixes.iter().any(|prefix| href.contains(prefix.as_str())))
            .unwrap_or(false)
    }

    fn matches_domain(&self, href: &str) -> bool {
        self.allowed_domains
            .iter()
            .any(|domain| href.starts_with(domain.as_str()))
    }
}
