//! Inline footnotes
//!
//! `^[a note]` is shorthand for a numbered footnote. The parser only knows
//! `[^label]` references, so inline notes are rewritten into that form, with
//! their definitions appended to the end of the document, before parsing.

use std::borrow::Cow;

/// Rewrite `^[note]` into footnote references plus definitions
///
/// Fenced code, inline code spans, `$..$` and `$$..$$` math, and `\^[` are
/// left untouched. A note must open and close on the same line.
pub fn expand_inline_notes(source: &str) -> Cow<'_, str> {
    if !source.contains("^[") {
        return Cow::Borrowed(source);
    }

    let mut output = String::with_capacity(source.len());
    let mut notes: Vec<&str> = Vec::new();
    let mut fence: Option<(char, usize)> = None;
    let mut display_math = false;

    for line in source.split_inclusive('\n') {
        if let Some(marker) = fence_marker(line) {
            match fence {
                None => fence = Some(marker),
                Some((ch, len)) if marker.0 == ch && marker.1 >= len => fence = None,
                Some(_) => {}
            }
            output.push_str(line);
            continue;
        }

        if fence.is_some() {
            output.push_str(line);
        } else {
            rewrite_line(line, &mut output, &mut notes, &mut display_math);
        }
    }

    if notes.is_empty() {
        return Cow::Borrowed(source);
    }

    if !output.ends_with('\n') {
        output.push('\n');
    }
    for (i, note) in notes.iter().enumerate() {
        output.push_str(&format!("\n[^inline-{}]: {}\n", i + 1, note));
    }

    Cow::Owned(output)
}

/// The fence character and run length if `line` opens or closes a code fence
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = rest.chars().take_while(|c| *c == ch).count();
    (run >= 3).then_some((ch, run))
}

/// `display_math` carries an open `$$` block from one line to the next
fn rewrite_line<'s>(
    line: &'s str,
    output: &mut String,
    notes: &mut Vec<&'s str>,
    display_math: &mut bool,
) {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut copied = 0;

    while i < bytes.len() {
        if *display_math {
            match bytes[i] {
                b'\\' => i += 2,
                b'$' if bytes.get(i + 1) == Some(&b'$') => {
                    *display_math = false;
                    i += 2;
                }
                _ => i += 1,
            }
            continue;
        }

        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                // Skip a whole code span; an unmatched run is literal
                let run = bytes[i..].iter().take_while(|b| **b == b'`').count();
                i += run;
                if let Some(end) = find_backtick_run(&bytes[i..], run) {
                    i += end + run;
                }
            }
            b'$' if bytes.get(i + 1) == Some(&b'$') => {
                *display_math = true;
                i += 2;
            }
            b'$' => {
                i += 1;
                if let Some(end) = find_closing_dollar(&bytes[i..]) {
                    i += end + 1;
                }
            }
            b'^' if bytes.get(i + 1) == Some(&b'[') => match find_closing_bracket(&line[i + 2..]) {
                Some(len) => {
                    output.push_str(&line[copied..i]);
                    notes.push(&line[i + 2..i + 2 + len]);
                    output.push_str(&format!("[^inline-{}]", notes.len()));
                    i += 2 + len + 1;
                    copied = i;
                }
                None => i += 2,
            },
            _ => i += 1,
        }
    }

    output.push_str(&line[copied.min(line.len())..]);
}

/// Offset of a backtick run of exactly `run` characters
fn find_backtick_run(bytes: &[u8], run: usize) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let len = bytes[i..].iter().take_while(|b| **b == b'`').count();
            if len == run {
                return Some(i);
            }
            i += len;
        } else {
            i += 1;
        }
    }
    None
}

/// Offset of the `$` closing inline math opened just before `bytes`
///
/// Like the parser, math cannot open on whitespace and the closing `$` cannot
/// follow whitespace; otherwise the `$` is literal.
fn find_closing_dollar(bytes: &[u8]) -> Option<usize> {
    if bytes.first().map_or(true, |b| b.is_ascii_whitespace()) {
        return None;
    }

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if i > 0 && !bytes[i - 1].is_ascii_whitespace() => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Length of the note text up to its matching `]`
fn find_closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\n' => return None,
            '[' => depth += 1,
            ']' if depth == 0 => return Some(i),
            ']' => depth -= 1,
            _ => {}
        }
    }

    None
}
