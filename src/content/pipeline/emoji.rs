//! Emoji shortcode substitution

use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::{Captures, Regex};

use super::{merge_text, Events};

lazy_static! {
    static ref SHORTCODE_RE: Regex = Regex::new(r":([a-z0-9_+\-]+):").unwrap();
}

/// Replace known `:shortcode:` tokens in text with their glyph
pub fn replace_shortcodes(events: Events<'_>) -> Events<'_> {
    let mut in_code_block = false;

    merge_text(events)
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                event
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                event
            }
            Event::Text(text) if !in_code_block && SHORTCODE_RE.is_match(&text) => {
                Event::Text(CowStr::from(replace_in(&text)))
            }
            other => other,
        })
        .collect()
}

fn replace_in(text: &str) -> String {
    SHORTCODE_RE
        .replace_all(text, |caps: &Captures| match emojis::get_by_shortcode(&caps[1]) {
            Some(emoji) => emoji.as_str().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shortcodes() {
        assert_eq!(replace_in("Ship it :rocket: :tada:"), "Ship it 🚀 🎉");
    }

    #[test]
    fn test_unknown_shortcode_kept() {
        assert_eq!(replace_in("at 10:30:00 :not-an-emoji:"), "at 10:30:00 :not-an-emoji:");
    }

    #[test]
    fn test_code_block_untouched() {
        let events = vec![
            Event::Start(Tag::CodeBlock(pulldown_cmark::CodeBlockKind::Indented)),
            Event::Text(":rocket:".into()),
            Event::End(TagEnd::CodeBlock),
            Event::Text(":rocket:".into()),
        ];
        let events = replace_shortcodes(events);
        assert_eq!(events[1], Event::Text(":rocket:".into()));
        assert_eq!(events[3], Event::Text("🚀".into()));
    }
}
