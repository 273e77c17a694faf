//! Event stages between markdown parsing and HTML serialization
//!
//! The parser produces a flat vector of pulldown-cmark events. Each stage
//! takes that vector and returns a new one; [`STAGES`] fixes their order and
//! [`run`] drives them. Ordering matters:
//!
//! - `autolink` and `emoji` work on markdown text and must see it before
//!   anything turns into raw HTML.
//! - `raw_html` decides whether author HTML survives, so it runs before any
//!   stage that emits HTML of its own (math, highlighting).
//! - `reparse_html` lifts author-written `<pre><code>` blocks into code
//!   block events, so it runs before `highlight`.

mod autolink;
mod emoji;
mod footnotes;
mod highlight;
mod math;
mod raw_html;

use pulldown_cmark::{CowStr, Event};

use crate::error::Result;

pub use footnotes::expand_inline_notes;
pub use highlight::Highlighter;

/// The document tree as a flat event stream
pub type Events<'a> = Vec<Event<'a>>;

/// A single transformation over the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Bare URLs in text become links (GFM autolinks)
    Autolink,
    /// `:shortcode:` becomes the emoji glyph
    Emoji,
    /// Keep or escape raw HTML written by the author
    RawHtml,
    /// Math events become MathML
    Math,
    /// Raw HTML code blocks become code block events
    ReparseHtml,
    /// Code blocks become highlighted HTML
    Highlight,
}

/// Stages in the order they run
pub const STAGES: [Stage; 6] = [
    Stage::Autolink,
    Stage::Emoji,
    Stage::RawHtml,
    Stage::Math,
    Stage::ReparseHtml,
    Stage::Highlight,
];

/// Read-only settings shared by all stages of one render
pub struct StageContext<'r> {
    pub raw_html: bool,
    pub highlighter: &'r Highlighter,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Autolink => "autolink",
            Stage::Emoji => "emoji",
            Stage::RawHtml => "raw_html",
            Stage::Math => "math",
            Stage::ReparseHtml => "reparse_html",
            Stage::Highlight => "highlight",
        }
    }

    /// Apply this stage to the event stream
    pub fn apply<'a>(self, events: Events<'a>, ctx: &StageContext<'_>) -> Result<Events<'a>> {
        match self {
            Stage::Autolink => Ok(autolink::link_bare_urls(events)),
            Stage::Emoji => Ok(emoji::replace_shortcodes(events)),
            Stage::RawHtml => Ok(raw_html::apply_policy(events, ctx.raw_html)),
            Stage::Math => math::render_math(events),
            Stage::ReparseHtml => Ok(raw_html::reparse(events)),
            Stage::Highlight => ctx.highlighter.highlight(events),
        }
    }
}

/// Run `stages` in order, stopping at the first failure
pub fn run<'a>(events: Events<'a>, stages: &[Stage], ctx: &StageContext<'_>) -> Result<Events<'a>> {
    stages.iter().try_fold(events, |events, stage| {
        tracing::trace!("Running {} stage over {} events", stage.name(), events.len());
        stage.apply(events, ctx)
    })
}

/// Join adjacent text events
///
/// The parser splits text at every potential inline marker, so a URL or a
/// shortcode may arrive in several pieces.
fn merge_text(events: Events<'_>) -> Events<'_> {
    let mut result: Events<'_> = Vec::with_capacity(events.len());

    for event in events {
        if let Event::Text(text) = &event {
            if let Some(Event::Text(prev)) = result.last_mut() {
                let joined = format!("{}{}", &**prev, &**text);
                *prev = CowStr::from(joined);
                continue;
            }
        }
        result.push(event);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{html, Options, Parser};

    fn test_highlighter() -> Highlighter {
        Highlighter::new(&Default::default(), std::path::Path::new(".")).unwrap()
    }

    fn render(markdown: &str, raw_html: bool) -> Result<String> {
        let highlighter = test_highlighter();
        let ctx = StageContext {
            raw_html,
            highlighter: &highlighter,
        };
        let options = Options::ENABLE_MATH | Options::ENABLE_GFM | Options::ENABLE_TABLES;
        let events: Events = Parser::new_ext(markdown, options).collect();
        let events = run(events, &STAGES, &ctx)?;
        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }

    #[test]
    fn test_merge_text_joins_runs() {
        let events = vec![
            Event::Text("a".into()),
            Event::Text("b".into()),
            Event::SoftBreak,
            Event::Text("c".into()),
        ];
        let merged = merge_text(events);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], Event::Text("ab".into()));
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let names: Vec<_> = STAGES.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["autolink", "emoji", "raw_html", "math", "reparse_html", "highlight"]
        );
    }

    #[test]
    fn test_math_survives_raw_html_escaping() {
        // Math is rendered after the raw HTML policy, so its markup is kept
        let html = render("<b>bold</b> and $x^2$", false).unwrap();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("<math"));
    }

    #[test]
    fn test_raw_code_block_is_highlighted() {
        let html = render(
            "<pre><code class=\"language-rust\">fn main() {}</code></pre>\n",
            true,
        )
        .unwrap();
        assert!(html.contains("class=\"highlight rust\""));
        assert!(html.contains("<span style="));
    }

    #[test]
    fn test_first_failure_aborts() {
        let err = render("broken $\\left( x$ math", true).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Transform { stage: "math", .. }
        ));
    }
}
