//! Raw HTML handling
//!
//! `apply_policy` decides whether HTML written by the author is kept.
//! `reparse` runs later and turns author-written code blocks back into code
//! block events, so highlighting treats them like fenced code.

use lazy_static::lazy_static;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use regex::Regex;

use super::Events;
use crate::helpers::html_unescape;

lazy_static! {
    static ref PRE_CODE_RE: Regex = Regex::new(
        r#"(?s)\A\s*<pre>\s*<code(?:\s+class="(?:language|lang)-([\w+#.-]+)")?\s*>(.*?)</code>\s*</pre>\s*\z"#
    )
    .unwrap();
}

/// Keep raw HTML, or turn it into text so the serializer escapes it
pub fn apply_policy(events: Events<'_>, allow_raw_html: bool) -> Events<'_> {
    if allow_raw_html {
        return events;
    }

    events
        .into_iter()
        .map(|event| match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            other => other,
        })
        .collect()
}

/// Coalesce raw HTML blocks and lift `<pre><code>` fragments into code blocks
pub fn reparse(events: Events<'_>) -> Events<'_> {
    let mut result = Vec::with_capacity(events.len());
    let mut fragment: Option<String> = None;

    for event in events {
        match event {
            // The parser emits one event per line of an HTML block
            Event::Html(html) => fragment.get_or_insert_with(String::new).push_str(&html),
            other => {
                if let Some(html) = fragment.take() {
                    push_fragment(&mut result, html);
                }
                result.push(other);
            }
        }
    }

    if let Some(html) = fragment.take() {
        push_fragment(&mut result, html);
    }

    result
}

fn push_fragment(result: &mut Events<'_>, html: String) {
    let lifted = PRE_CODE_RE.captures(&html).map(|caps| {
        let lang = caps.get(1).map(|m| m.as_str()).unwrap_or("").to_string();
        (lang, html_unescape(&caps[2]))
    });

    let Some((lang, code)) = lifted else {
        result.push(Event::Html(CowStr::from(html)));
        return;
    };

    result.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::from(lang)))));
    result.push(Event::Text(CowStr::from(code)));
    result.push(Event::End(TagEnd::CodeBlock));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_keeps_html() {
        let events = vec![Event::InlineHtml("<b>".into())];
        assert_eq!(apply_policy(events.clone(), true), events);
    }

    #[test]
    fn test_policy_escapes_html() {
        let events = apply_policy(vec![Event::Html("<div>\n".into())], false);
        assert_eq!(events, vec![Event::Text("<div>\n".into())]);
    }

    #[test]
    fn test_reparse_merges_block_lines() {
        let events = reparse(vec![
            Event::Html("<div>\n".into()),
            Event::Html("hi\n".into()),
            Event::Html("</div>\n".into()),
            Event::Rule,
        ]);
        assert_eq!(
            events,
            vec![Event::Html("<div>\nhi\n</div>\n".into()), Event::Rule]
        );
    }

    #[test]
    fn test_reparse_lifts_code_block() {
        let events = reparse(vec![
            Event::Html("<pre><code class=\"language-python\">\n".into()),
            Event::Html("if a &lt; b:\n    pass\n".into()),
            Event::Html("</code></pre>\n".into()),
        ]);
        assert_eq!(
            events,
            vec![
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced("python".into()))),
                Event::Text("\nif a < b:\n    pass\n".into()),
                Event::End(TagEnd::CodeBlock),
            ]
        );
    }

    #[test]
    fn test_reparse_keeps_other_pre() {
        let html = "<pre class=\"ascii-art\">x</pre>\n";
        let events = reparse(vec![Event::Html(html.into())]);
        assert_eq!(events, vec![Event::Html(html.into())]);
    }
}
