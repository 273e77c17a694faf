//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::helpers::parse_date_string;

/// Front-matter data from a post
///
/// Every key is kept exactly as the author wrote it, in source order, with
/// its original YAML type. Nothing is validated or normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    pub fields: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let trimmed = content.trim_start();

        // YAML front-matter (---)
        if trimmed.starts_with("---") {
            return Self::parse_yaml(content, trimmed);
        }

        // JSON front-matter (;;;)
        if let Some(rest) = trimmed.strip_prefix(";;;") {
            return Self::parse_json(rest);
        }

        // No front-matter found
        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml<'a>(original: &'a str, content: &'a str) -> Result<(Self, &'a str)> {
        let rest = &content[3..]; // Skip opening ---
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, the dashes are a markdown rule
            return Ok((FrontMatter::default(), original));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..]; // Skip \n---
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // Horizontal rules around prose are not front-matter
        if !looks_like_yaml(yaml_content) {
            return Ok((FrontMatter::default(), original));
        }

        let fields = serde_yaml::from_str::<IndexMap<String, Value>>(yaml_content)
            .map_err(|e| Error::parse("YAML front-matter", e))?;
        Ok((FrontMatter { fields }, remaining))
    }

    /// Body of a `;;; ... ;;;` block: JSON object members, braces optional
    fn parse_json(rest: &str) -> Result<(Self, &str)> {
        let end_pos = rest
            .find(";;;")
            .ok_or_else(|| Error::parse("JSON front-matter", "missing closing ;;;"))?;
        let json_content = &rest[..end_pos];
        let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

        let fields: IndexMap<String, Value> =
            serde_json::from_str(&format!("{{{}}}", json_content.trim()))
                .or_else(|_| serde_json::from_str(json_content))
                .map_err(|e| Error::parse("JSON front-matter", e))?;
        Ok((FrontMatter { fields }, remaining))
    }

    /// A raw value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The title as text, if it is a scalar
    pub fn title(&self) -> Option<String> {
        self.get("title").and_then(scalar_text)
    }

    /// The title, or `fallback` when the post has none
    pub fn title_or(&self, fallback: &str) -> String {
        self.title().unwrap_or_else(|| fallback.to_string())
    }

    /// The date exactly as written, if it is a scalar
    pub fn date(&self) -> Option<String> {
        self.get("date").and_then(scalar_text)
    }

    /// Categories, whatever shape the author gave them
    pub fn categories(&self) -> Option<&Value> {
        self.get("categories").filter(|v| !v.is_null())
    }

    /// Parse the raw date value
    pub fn parse_date(&self) -> Result<chrono::NaiveDateTime> {
        let raw = self
            .date()
            .ok_or_else(|| Error::parse("front-matter", "missing `date`"))?;
        parse_date_string(&raw)
            .ok_or_else(|| Error::parse("front-matter", format!("unrecognized date {:?}", raw)))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Valid YAML front-matter has at least one `key: value` line
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
categories:
  - programming
  - rust
cover: /img/cover.png
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title().as_deref(), Some("Hello World"));
        assert_eq!(fm.date().as_deref(), Some("2024-01-15 10:30:00"));
        let categories: Vec<_> = fm
            .categories()
            .and_then(Value::as_sequence)
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(categories, vec!["programming", "rust"]);
        assert_eq!(fm.get("cover"), Some(&Value::String("/img/cover.png".into())));
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_keys_keep_source_order() {
        let content = "---\nzeta: 1\ntitle: t\nalpha: 2\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let keys: Vec<_> = fm.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "title", "alpha"]);
    }

    #[test]
    fn test_single_string_category_kept_verbatim() {
        let content = "---\ntitle: Notes\ndate: 2024-01-15\ncategories: Blog\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();

        let json = serde_json::to_value(&fm).unwrap();
        assert_eq!(json["categories"], "Blog");
        assert_eq!(json["date"], "2024-01-15");
    }

    #[test]
    fn test_non_string_values_pass_through() {
        let content = "---\ntitle: 1984\ndate: 2023-05-01\ncategories: [2023, rust]\ndraft: false\nmeta: {rating: 4.5}\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(remaining, "body");
        assert_eq!(fm.title_or("fallback"), "1984");

        let json = serde_json::to_value(&fm).unwrap();
        assert_eq!(json["title"], 1984);
        assert_eq!(json["categories"], serde_json::json!([2023, "rust"]));
        assert_eq!(json["draft"], false);
        assert_eq!(json["meta"]["rating"], 4.5);
    }

    #[test]
    fn test_parse_semicolon_json_frontmatter() {
        let content = ";;;\n\"title\": \"Fenced\",\n\"date\": \"2023-05-01\"\n;;;\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title().as_deref(), Some("Fenced"));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_body_starting_with_brace_is_not_frontmatter() {
        let content = "{x} is a set.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, content);

        let content = "{\"title\": \"looks like json\"}\n\nBody\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.fields.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just markdown\n").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, "# Just markdown\n");
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\ndate: 2024-01-15\n---\nBody\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(FrontMatter::parse(";;;\n\"title\": \n;;;\nBody").is_err());
        assert!(FrontMatter::parse(";;;\n\"title\": \"x\"\nBody").is_err());
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Some random text with markdown lists:
- Item 1
- Item 2

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), None);
        assert!(remaining.contains("Some random text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), None);
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_parse_date() {
        let (fm, _) = FrontMatter::parse("---\ndate: 2024-01-15 10:30:00\n---\n").unwrap();
        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");

        let missing = FrontMatter::default();
        assert!(missing.parse_date().is_err());
    }
}
