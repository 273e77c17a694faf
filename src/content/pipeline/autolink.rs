//! Bare URL autolinking

use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

use super::{merge_text, Events};

lazy_static! {
    // Trailing punctuation belongs to the sentence, not the URL
    static ref URL_RE: Regex =
        Regex::new(r#"https?://[^\s<>"]*[^\s<>".,;:!?)\]'*_~]"#).unwrap();
    // Opening or closing tag of a raw HTML anchor
    static ref ANCHOR_RE: Regex = Regex::new(r"(?i)^<(/?)a(?:\s|>|/>)").unwrap();
}

/// Turn bare `http(s)://` URLs in text into links
///
/// Text inside links (markdown or raw `<a>` tags), images and code blocks is
/// left alone.
pub fn link_bare_urls(events: Events<'_>) -> Events<'_> {
    let events = merge_text(events);
    let mut result = Vec::with_capacity(events.len());
    let mut link_depth = 0usize;
    let mut in_code_block = false;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                link_depth += 1;
                result.push(event);
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
                result.push(event);
            }
            Event::InlineHtml(ref html) => {
                match raw_anchor(html) {
                    Some(true) => link_depth += 1,
                    Some(false) => link_depth = link_depth.saturating_sub(1),
                    None => {}
                }
                result.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                result.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                result.push(event);
            }
            Event::Text(text) if link_depth == 0 && !in_code_block && URL_RE.is_match(&text) => {
                push_linked(&mut result, &text);
            }
            other => result.push(other),
        }
    }

    result
}

/// `Some(true)` for `<a ...>`, `Some(false)` for `</a>`
fn raw_anchor(html: &str) -> Option<bool> {
    let caps = ANCHOR_RE.captures(html.trim_start())?;
    if html.trim_end().ends_with("/>") {
        return None;
    }
    Some(caps[1].is_empty())
}

fn push_linked<'a>(result: &mut Events<'a>, text: &str) {
    let mut last = 0;

    for found in URL_RE.find_iter(text) {
        if found.start() > last {
            result.push(Event::Text(CowStr::from(text[last..found.start()].to_string())));
        }
        let url = found.as_str().to_string();
        result.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(url.clone()),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        result.push(Event::Text(CowStr::from(url)));
        result.push(Event::End(TagEnd::Link));
        last = found.end();
    }

    if last < text.len() {
        result.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}
