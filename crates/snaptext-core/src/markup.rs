//! Minimal markup rendering for the language API answer.
//!
//! Inline tags become span styles, block tags become line breaks, every other
//! tag is dropped while its text is kept. Script and style bodies are skipped.

use snaptext_types::{StyledSpan, TextStyle};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMarkup {
    pub spans: Vec<StyledSpan>,
}

impl RenderedMarkup {
    /// Text as a reader sees it, used as the copy target
    pub fn plain_text(&self) -> String {
        let text: String = self.spans.iter().map(|s| s.text.as_str()).collect();
        text.trim_matches('\n').to_string()
    }
}

#[derive(Default)]
struct StyleDepth {
    bold: u32,
    italic: u32,
    underline: u32,
    code: u32,
}

impl StyleDepth {
    fn current(&self) -> TextStyle {
        TextStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
            code: self.code > 0,
        }
    }

    fn counter(&mut self, tag: &str) -> Option<&mut u32> {
        match tag {
            "b" | "strong" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => Some(&mut self.bold),
            "i" | "em" | "cite" => Some(&mut self.italic),
            "u" | "ins" => Some(&mut self.underline),
            "code" | "pre" | "kbd" | "samp" => Some(&mut self.code),
            _ => None,
        }
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "tr"
            | "table"
            | "pre"
            | "blockquote"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "hr"
    )
}

struct Builder {
    spans: Vec<StyledSpan>,
}

impl Builder {
    fn push(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut()
            && last.style == style
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(StyledSpan {
            text: text.to_string(),
            style,
        });
    }

    fn ends_with_newline(&self) -> bool {
        self.spans
            .last()
            .map(|s| s.text.ends_with('\n'))
            .unwrap_or(true)
    }

    fn line_break(&mut self, style: TextStyle) {
        self.push("\n", style);
    }

    fn block_break(&mut self, style: TextStyle) {
        if !self.ends_with_newline() {
            self.line_break(style);
        }
    }
}

/// Render markup into styled spans
pub fn render(input: &str) -> RenderedMarkup {
    let mut builder = Builder { spans: Vec::new() };
    let mut depth = StyleDepth::default();
    let mut skip_until: Option<&'static str> = None;
    let mut rest = input;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            if skip_until.is_none() {
                builder.push(&decode_entities(rest), depth.current());
            }
            break;
        };

        if open > 0 && skip_until.is_none() {
            builder.push(&decode_entities(&rest[..open]), depth.current());
        }
        rest = &rest[open..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(tag) = parse_tag(rest) else {
            // A lone '<' is text
            if skip_until.is_none() {
                builder.push("<", depth.current());
            }
            rest = &rest[1..];
            continue;
        };
        rest = &rest[tag.len..];

        if let Some(skipped) = skip_until {
            if tag.closing && tag.name == skipped {
                skip_until = None;
            }
            continue;
        }

        match tag.name.as_str() {
            "script" if !tag.closing => skip_until = Some("script"),
            "style" if !tag.closing => skip_until = Some("style"),
            "br" => builder.line_break(depth.current()),
            name => {
                if is_block(name) {
                    builder.block_break(depth.current());
                }
                if tag.self_closing {
                    continue;
                }
                if let Some(counter) = depth.counter(name) {
                    if tag.closing {
                        *counter = counter.saturating_sub(1);
                    } else {
                        *counter += 1;
                    }
                }
            }
        }
    }

    RenderedMarkup {
        spans: builder.spans,
    }
}

struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
    /// Bytes consumed including the angle brackets
    len: usize,
}

fn parse_tag(input: &str) -> Option<Tag> {
    let end = input.find('>')?;
    let inner = &input[1..end];
    let (closing, body) = match inner.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, inner),
    };

    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    if name.is_empty() || !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(Tag {
        name,
        closing,
        self_closing: body.trim_end().ends_with('/'),
        len: end + 1,
    })
}

pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
