//! Syntax highlighting with syntect

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::Events;
use crate::config::HighlightConfig;
use crate::error::{Error, Result};
use crate::helpers::html_escape;

/// Code block highlighter
///
/// The theme is resolved once, when the highlighter is built, and shared by
/// every render afterwards.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

impl Highlighter {
    /// Build from configuration. `theme_file` is resolved against `base_dir`.
    pub fn new(config: &HighlightConfig, base_dir: &Path) -> Result<Self> {
        let theme = match &config.theme_file {
            Some(file) => {
                let path = base_dir.join(file);
                tracing::debug!("Loading highlight theme from {:?}", path);
                ThemeSet::get_theme(&path).map_err(|e| Error::Theme {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            None => {
                let mut defaults = ThemeSet::load_defaults();
                defaults
                    .themes
                    .remove(&config.theme)
                    .ok_or_else(|| Error::Theme {
                        path: config.theme.clone(),
                        message: "no built-in theme with this name".to_string(),
                    })?
            }
        };

        Ok(Self::with_theme(theme, config.line_number))
    }

    /// Build around an already loaded theme
    pub fn with_theme(theme: Theme, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
        }
    }

    /// Replace every code block in the stream with highlighted HTML
    pub fn highlight<'a>(&self, events: Events<'a>) -> Result<Events<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code_block: Option<(String, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        // Info strings may carry attributes after the language
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or("").to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, &lang)?;
                        result.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                other => result.push(other),
            }
        }

        Ok(result)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> Result<String> {
        let lang = if lang.is_empty() { "text" } else { lang };

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let regions = highlighter
                .highlight_line(line, &self.syntax_set)
                .map_err(|e| Error::transform("highlight", e))?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                .map_err(|e| Error::transform("highlight", e))?;
            lines.push(html);
        }

        let lang = html_escape(lang);
        let style = self.background_style();

        if self.line_numbers {
            Ok(add_line_numbers(&lines, &lang, &style))
        } else {
            Ok(format!(
                r#"<figure class="highlight {}"><pre{}><code class="language-{}">{}</code></pre></figure>"#,
                lang,
                style,
                lang,
                lines.concat()
            ))
        }
    }

    fn background_style(&self) -> String {
        match self.theme.settings.background {
            Some(c) => format!(
                r#" style="background-color:#{:02x}{:02x}{:02x};""#,
                c.r, c.g, c.b
            ),
            None => String::new(),
        }
    }
}

/// Lay out highlighted lines next to a line-number gutter
fn add_line_numbers(lines: &[String], lang: &str, style: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");
    let code = lines
        .iter()
        .map(|line| line.trim_end_matches('\n'))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre{}>{}</pre></td></tr></table></figure>"#,
        lang, gutter, style, code
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter(line_numbers: bool) -> Highlighter {
        let config = HighlightConfig {
            line_number: line_numbers,
            ..Default::default()
        };
        Highlighter::new(&config, Path::new(".")).unwrap()
    }

    fn code_block(lang: &str, code: &str) -> Events<'static> {
        vec![
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                lang.to_string().into(),
            ))),
            Event::Text(code.to_string().into()),
            Event::End(TagEnd::CodeBlock),
        ]
    }

    fn only_html(events: Events<'_>) -> String {
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Html(html) => html.to_string(),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_highlight_rust_block() {
        let html = only_html(
            highlighter(false)
                .highlight(code_block("rust", "fn main() {}\n"))
                .unwrap(),
        );
        assert!(html.starts_with(r#"<figure class="highlight rust">"#));
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("<span style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let html = only_html(
            highlighter(false)
                .highlight(code_block("nosuchlang", "a < b\n"))
                .unwrap(),
        );
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn test_info_string_attributes_ignored() {
        let html = only_html(
            highlighter(false)
                .highlight(code_block("python title=\"x.py\"", "pass\n"))
                .unwrap(),
        );
        assert!(html.contains(r#"class="highlight python""#));
    }

    #[test]
    fn test_line_numbers() {
        let html = only_html(
            highlighter(true)
                .highlight(code_block("rust", "let a = 1;\nlet b = 2;\n"))
                .unwrap(),
        );
        assert!(html.contains(r#"<span class="line-number">1</span>"#));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
        assert!(!html.contains(r#"<span class="line-number">3</span>"#));
    }

    #[test]
    fn test_unknown_builtin_theme_is_an_error() {
        let config = HighlightConfig {
            theme: "no-such-theme".to_string(),
            ..Default::default()
        };
        let err = Highlighter::new(&config, Path::new(".")).err().unwrap();
        assert!(matches!(err, Error::Theme { .. }));
    }

    #[test]
    fn test_missing_theme_file_is_an_error() {
        let config = HighlightConfig {
            theme_file: Some("styles/missing.tmTheme".to_string()),
            ..Default::default()
        };
        assert!(Highlighter::new(&config, Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_non_code_events_untouched() {
        let events = vec![Event::Text("plain".into())];
        assert_eq!(highlighter(false).highlight(events.clone()).unwrap(), events);
    }
}
