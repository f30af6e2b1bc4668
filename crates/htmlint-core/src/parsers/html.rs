//! HTML tokenizer
//!
//! Splits source text into tags, text, comments and doctypes. Tags are
//! recognised with anchored regexes; a `<` that does not start a well-formed
//! tag is kept as text, so the tokenizer never fails.

use crate::dom::{Attribute, Location};
use crate::regex_util::static_regex;
use regex::Regex;

/// Elements whose content is raw text up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

static_regex!(
    fn start_tag_regex,
    r#"^<([a-zA-Z][a-zA-Z0-9:-]*)((?:\s*[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#
);
static_regex!(fn end_tag_regex, r"^</([a-zA-Z][a-zA-Z0-9:-]*)\s*>");
static_regex!(
    fn attribute_regex,
    r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
);
static_regex!(
    fn entity_regex,
    r"&(?:#[xX]([0-9a-fA-F]{1,6});?|#([0-9]{1,7});?|(nbsp|lt|gt|quot|apos|amp);)"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
    pub end_byte: usize,
}

/// Tokenize HTML source
pub fn tokenize(content: &str) -> Vec<Token> {
    let line_starts = compute_line_starts(content);
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut text_start = 0usize;

    while let Some(rel) = content[pos..].find('<') {
        let lt = pos + rel;
        let Some((kind, len)) = scan_markup(&content[lt..], lt, &line_starts) else {
            pos = lt + 1;
            continue;
        };

        push_text(content, text_start, lt, &line_starts, &mut tokens);
        let end = lt + len;
        let raw_text_name = match &kind {
            TokenKind::StartTag {
                name,
                self_closing: false,
                ..
            } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => Some(name.clone()),
            _ => None,
        };
        tokens.push(Token {
            kind,
            location: location_at(lt, &line_starts),
            end_byte: end,
        });
        pos = end;
        text_start = end;

        if let Some(name) = raw_text_name {
            let close = find_raw_text_end(content, end, &name);
            push_text(content, end, close, &line_starts, &mut tokens);
            pos = close;
            text_start = close;
        }
    }

    push_text(content, text_start, content.len(), &line_starts, &mut tokens);
    tokens
}

/// Try to read one piece of markup at the start of `rest`
fn scan_markup(rest: &str, base: usize, line_starts: &[usize]) -> Option<(TokenKind, usize)> {
    if let Some(body) = rest.strip_prefix("<!--") {
        return Some(match body.find("-->") {
            Some(idx) => (TokenKind::Comment(body[..idx].to_string()), 4 + idx + 3),
            None => (TokenKind::Comment(body.to_string()), rest.len()),
        });
    }

    if let Some(body) = rest.strip_prefix("<!") {
        // Without a closing `>` the markup runs to end of input, like an
        // unterminated comment
        return Some(match body.find('>') {
            Some(idx) => (TokenKind::Doctype(body[..idx].trim().to_string()), 2 + idx + 1),
            None => (TokenKind::Comment(body.to_string()), rest.len()),
        });
    }

    if rest.starts_with("</") {
        let cap = end_tag_regex().captures(rest)?;
        let name = cap[1].to_ascii_lowercase();
        return Some((TokenKind::EndTag { name }, cap[0].len()));
    }

    let cap = start_tag_regex().captures(rest)?;
    let name = cap[1].to_ascii_lowercase();
    let attributes = cap
        .get(2)
        .map(|m| parse_attributes(m.as_str(), base + m.start(), line_starts))
        .unwrap_or_default();
    let self_closing = cap.get(3).is_some_and(|m| m.as_str() == "/");

    Some((
        TokenKind::StartTag {
            name,
            attributes,
            self_closing,
        },
        cap[0].len(),
    ))
}

fn parse_attributes(source: &str, base: usize, line_starts: &[usize]) -> Vec<Attribute> {
    attribute_regex()
        .captures_iter(source)
        .filter_map(|cap| {
            let name_match = cap.get(1)?;
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|m| decode_entities(m.as_str()));
            Some(Attribute {
                name: name_match.as_str().to_ascii_lowercase(),
                value,
                location: location_at(base + name_match.start(), line_starts),
            })
        })
        .collect()
}

/// Byte offset of the `</name` that ends a raw text element, or end of input
fn find_raw_text_end(content: &str, from: usize, name: &str) -> usize {
    let bytes = content.as_bytes();
    let mut search = from;
    while let Some(rel) = content[search..].find("</") {
        let at = search + rel;
        let name_start = at + 2;
        let name_end = name_start + name.len();
        if name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(name_end)
                .map_or(true, |&b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
        {
            return at;
        }
        search = at + 2;
    }
    content.len()
}

fn push_text(content: &str, start: usize, end: usize, line_starts: &[usize], tokens: &mut Vec<Token>) {
    if start >= end {
        return;
    }
    tokens.push(Token {
        kind: TokenKind::Text(decode_entities(&content[start..end])),
        location: location_at(start, line_starts),
        end_byte: end,
    });
}

/// Decode the character references that matter for length and blank checks
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    // One pass, so the output of one reference is never decoded again
    entity_regex()
        .replace_all(text, |cap: &regex::Captures| {
            let decoded = match (cap.get(1), cap.get(2), cap.get(3)) {
                (Some(hex), _, _) => u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32),
                (_, Some(dec), _) => dec.as_str().parse::<u32>().ok().and_then(char::from_u32),
                (_, _, Some(named)) => match named.as_str() {
                    "nbsp" => Some('\u{a0}'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "amp" => Some('&'),
                    _ => None,
                },
                _ => None,
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| cap[0].to_string())
        })
        .into_owned()
}

fn compute_line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, ch) in content.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

fn location_at(offset: usize, line_starts: &[usize]) -> Location {
    let line_idx = match line_starts.binary_search(&offset) {
        Ok(idx) => idx,
        Err(idx) => idx - 1,
    };
    Location {
        line: line_idx + 1,
        column: offset - line_starts[line_idx] + 1,
        offset,
    }
}
