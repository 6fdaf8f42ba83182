//! Inline slide markup.
//!
//! Three delimiters are recognized inside a line:
//!
//! - `**text**` accent emphasis (bold, accent color)
//! - `*text*` underline emphasis
//! - `==text==` marker-pen highlight
//!
//! Newlines become hard breaks before any inline markup is considered, so a
//! span never crosses a line. Spans do not nest; at each scan position the
//! first delimiter that closes wins, otherwise the character is literal.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Accent(String),
    Underline(String),
    Highlight(String),
    LineBreak,
}

impl Fragment {
    pub fn text(&self) -> &str {
        match self {
            Fragment::Text(s)
            | Fragment::Accent(s)
            | Fragment::Underline(s)
            | Fragment::Highlight(s) => s,
            Fragment::LineBreak => "\n",
        }
    }
}

pub fn parse(input: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for (i, line) in input.split('\n').enumerate() {
        if i > 0 {
            fragments.push(Fragment::LineBreak);
        }
        parse_line(line, &mut fragments);
    }
    fragments
}

/// Concatenate fragment text with delimiters removed.
pub fn plain_text(fragments: &[Fragment]) -> String {
    fragments.iter().map(Fragment::text).collect()
}

fn parse_line(line: &str, out: &mut Vec<Fragment>) {
    let mut literal = String::new();
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        if let Some((fragment, consumed)) = match_span(rest) {
            if !literal.is_empty() {
                out.push(Fragment::Text(std::mem::take(&mut literal)));
            }
            out.push(fragment);
            pos += consumed;
            continue;
        }
        let ch = rest.chars().next().unwrap_or_default();
        literal.push(ch);
        pos += ch.len_utf8();
    }

    if !literal.is_empty() {
        out.push(Fragment::Text(literal));
    }
}

/// Try each delimiter at the start of `rest`. Returns the fragment and the
/// number of bytes it consumed.
fn match_span(rest: &str) -> Option<(Fragment, usize)> {
    if let Some(inner) = delimited(rest, "**", '*') {
        return Some((Fragment::Accent(inner.to_string()), inner.len() + 4));
    }
    if let Some(inner) = delimited(rest, "*", '*') {
        return Some((Fragment::Underline(inner.to_string()), inner.len() + 2));
    }
    if let Some(inner) = delimited(rest, "==", '=') {
        return Some((Fragment::Highlight(inner.to_string()), inner.len() + 4));
    }
    None
}

/// `rest` starts with `delim`, followed by non-empty content free of
/// `forbidden`, followed by `delim` again.
fn delimited<'a>(rest: &'a str, delim: &str, forbidden: char) -> Option<&'a str> {
    let after = rest.strip_prefix(delim)?;
    let end = after.find(forbidden)?;
    if end == 0 {
        return None;
    }
    after[end..].starts_with(delim).then(|| &after[..end])
}
