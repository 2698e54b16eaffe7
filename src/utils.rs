// src/utils.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Collapse whitespace runs (including newlines) into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Treat empty or whitespace-only input as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Escape text for safe inclusion in HTML bodies and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Turn a snake_case check name into a display label ("linkedin_presence" -> "Linkedin presence")
pub fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.map(|c| c.to_ascii_lowercase())).collect(),
        None => String::new(),
    }
}

/// Resolve a possibly relative path against the current working directory
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Senior \n\n  Engineer\t "), "Senior Engineer");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  Acme ".to_string())), Some("Acme".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("linkedin_presence"), "Linkedin presence");
        assert_eq!(humanize_key("X_presence"), "X presence");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn test_resolve_path_keeps_absolute() {
        let absolute = PathBuf::from("/opt/models");
        assert_eq!(resolve_path(&absolute).unwrap(), absolute);
        assert!(resolve_path(Path::new("models")).unwrap().is_absolute());
    }
}
