/// Longest sanitized URL kept in a filename
pub const MAX_SANITIZED_LEN: usize = 200;

/// Turns a URL into a filesystem-safe name
///
/// Strips a leading `http://` or `https://`, replaces every character outside
/// `[A-Za-z0-9-_.]` with `_`, and truncates to [`MAX_SANITIZED_LEN`]
/// characters. Applying it twice gives the same result as applying it once.
///
/// # Examples
///
/// ```
/// use docs_harvest::url::sanitize_filename;
///
/// assert_eq!(
///     sanitize_filename("https://help.salesforce.com/s/articleView?id=sales.foo"),
///     "help.salesforce.com_s_articleView_id_sales.foo"
/// );
/// ```
pub fn sanitize_filename(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SANITIZED_LEN)
        .collect()
}

/// Output filename for a page: `output_<sanitized-url>.md`
pub fn output_filename(url: &str) -> String {
    format!("output_{}.md", sanitize_filename(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scheme_and_punctuation() {
        assert_eq!(
            sanitize_filename("https://help.salesforce.com/s/articleView?id=sales.foo&type=5"),
            "help.salesforce.com_s_articleView_id_sales.foo_type_5"
        );
        assert_eq!(
            sanitize_filename("http://docs.mulesoft.com/general/"),
            "docs.mulesoft.com_general_"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize_filename("https://help.salesforce.com/s/articleView?id=sales.foo");
        assert_eq!(sanitize_filename(&once), once);
    }

    #[test]
    fn test_non_ascii_replaced() {
        assert_eq!(sanitize_filename("https://example.com/é"), "example.com__");
    }

    #[test]
    fn test_truncates() {
        let long = format!("https://example.com/{}", "a".repeat(500));
        assert_eq!(sanitize_filename(&long).len(), MAX_SANITIZED_LEN);
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(
            output_filename("https://docs.mulesoft.com/general"),
            "output_docs.mulesoft.com_general.md"
        );
    }
}
