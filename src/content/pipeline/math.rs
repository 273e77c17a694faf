//! Math rendering
//!
//! `$..$` and `$$..$$` arrive as math events from the parser and leave as
//! MathML wrapped in a span the stylesheet can target.

use latex2mathml::{latex_to_mathml, DisplayStyle};
use pulldown_cmark::{CowStr, Event};

use super::Events;
use crate::error::{Error, Result};

/// Render every math event into MathML
pub fn render_math(events: Events<'_>) -> Result<Events<'_>> {
    events
        .into_iter()
        .map(|event| match event {
            Event::InlineMath(tex) => Ok(Event::InlineHtml(CowStr::from(render_inline(&tex)?))),
            Event::DisplayMath(tex) => Ok(Event::InlineHtml(CowStr::from(render_display(&tex)?))),
            other => Ok(other),
        })
        .collect()
}

fn render_inline(tex: &str) -> Result<String> {
    check_balanced(tex)?;
    let mathml =
        latex_to_mathml(tex, DisplayStyle::Inline).map_err(|e| Error::transform("math", e))?;
    Ok(format!(r#"<span class="math math-inline">{}</span>"#, mathml))
}

fn render_display(tex: &str) -> Result<String> {
    check_balanced(tex)?;
    let mathml =
        latex_to_mathml(tex, DisplayStyle::Block).map_err(|e| Error::transform("math", e))?;
    Ok(format!(r#"<span class="math math-display">{}</span>"#, mathml))
}

/// Reject unbalanced groups before conversion, with a message that says why
fn check_balanced(tex: &str) -> Result<()> {
    let mut depth = 0i32;
    let mut chars = tex.chars();

    while let Some(c) = chars.next() {
        match c {
            // \{ and \} are literal braces
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(Error::transform(
                        "math",
                        format!("unexpected `}}` in {:?}", tex),
                    ));
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(Error::transform("math", format!("unclosed `{{` in {:?}", tex)));
    }

    let lefts = count_command(tex, "\\left");
    let rights = count_command(tex, "\\right");
    if lefts != rights {
        return Err(Error::transform(
            "math",
            format!("{} \\left but {} \\right in {:?}", lefts, rights, tex),
        ));
    }

    Ok(())
}

/// Occurrences of a control word, so `\left` does not count `\leftarrow`
fn count_command(tex: &str, command: &str) -> usize {
    tex.match_indices(command)
        .filter(|(i, _)| {
            !tex[i + command.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
        })
        .count()
}
