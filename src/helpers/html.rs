//! HTML text helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"(?s)<h[1-6]\b[^>]*>.*?</h[1-6]>").unwrap();
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decode the entities produced by `html_escape` and by the markdown renderer
pub fn html_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Strip HTML tags from a string
///
/// An unterminated `<` swallows the rest of the input, so a cut-off tag
/// never leaks into the text.
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Keep the first `words` whitespace-delimited words of `s`
///
/// When words are dropped, `ending` is glued to the last kept word so the
/// word count never grows.
pub fn truncate_words(s: &str, words: usize, ending: &str) -> String {
    let mut iter = s.split_whitespace();
    let kept: Vec<&str> = iter.by_ref().take(words).collect();
    let mut result = kept.join(" ");

    if iter.next().is_some() && !kept.is_empty() {
        result.push_str(ending);
    }

    result
}

/// Plain-text excerpt of rendered HTML
///
/// Headings are left out: the listing already shows the title. `&lt;` and
/// `&gt;` stay encoded so the excerpt can never contain a tag.
pub fn excerpt(html: &str, words: usize, ending: &str) -> String {
    let body = HEADING_RE.replace_all(html, " ");
    let text = strip_html(&body)
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    truncate_words(&text, words, ending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip_of_specials() {
        let s = r#"<a href="x">Tom & 'Jerry'</a>"#;
        assert_eq!(html_unescape(&html_escape(s)), s);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<h1>Hi</h1>\n<p>Wor<em>ld</em></p>\n"),
            "Hi\nWorld\n"
        );
    }

    #[test]
    fn test_strip_partial_tag() {
        assert_eq!(strip_html("text <span class=").trim(), "text");
    }

    #[test]
    fn test_truncate_words_short() {
        assert_eq!(truncate_words("  one two  ", 25, "..."), "one two");
    }

    #[test]
    fn test_truncate_words_long() {
        let text = (1..=30).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let result = truncate_words(&text, 25, "...");
        assert_eq!(result.split_whitespace().count(), 25);
        assert!(result.ends_with("25..."));
    }

    #[test]
    fn test_truncate_zero_words() {
        assert_eq!(truncate_words("a b c", 0, "..."), "");
    }

    #[test]
    fn test_excerpt_has_no_tags() {
        let html = "<p>Fish &amp; chips with <em>vinegar</em></p>\n<pre><code>x &lt; y</code></pre>";
        let desc = excerpt(html, 25, "...");
        assert_eq!(desc, "Fish & chips with vinegar x &lt; y");
        assert!(!desc.contains('<'));
    }

    #[test]
    fn test_excerpt_skips_headings() {
        let html = "<h1>Hi</h1>\n<p>World</p>\n<h2 id=\"more\">More</h2>\n<p>Again</p>\n";
        assert_eq!(excerpt(html, 25, "..."), "World Again");
    }
}
