use url::Url;

/// Reduce a locator or link to its comparable path form.
///
/// Absolute URLs lose scheme and host; query, fragment, and trailing slash
/// are dropped. Example: `"https://site.com/fighters/12-x/?tab=1"` → `"/fighters/12-x"`
pub fn normalize_locator(raw: &str) -> String {
    let raw = raw.trim();
    let path = match Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locator() {
        assert_eq!(normalize_locator("/fighters/1-a"), "/fighters/1-a");
        assert_eq!(normalize_locator("/fighters/1-a/"), "/fighters/1-a");
        assert_eq!(
            normalize_locator("https://www.example.com/fighters/1-a?x=1#bouts"),
            "/fighters/1-a"
        );
        assert_eq!(normalize_locator("fighters/1-a"), "/fighters/1-a");
        assert_eq!(normalize_locator("  /fighters/1-a#top "), "/fighters/1-a");
    }
}
