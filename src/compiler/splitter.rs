//! Block splitting and tagged-field extraction.
//!
//! The input document is a sequence of blocks separated by lines consisting
//! solely of `---` (surrounding whitespace tolerated). Inside a block, a line
//! is exactly one of:
//!
//! - a **control marker** (`#rp`-prefixed), e.g. a weighting annotation;
//! - a **tag line** (`#name: inline`), which opens a new field;
//! - plain **content**, belonging to the most recently opened field.
//!
//! Classification order matters: `#rp`-prefixed lines are markers even when
//! they carry a colon, so they can never open a field.
//!
//! Extraction is an explicit line-scanning state machine rather than a set of
//! multiline lookahead regexes: a field's content runs from its tag line until
//! the next tag line or end of block, which makes "stop at the next recognized
//! tag" unambiguous. Downstream consumers decide how markers inside a field
//! are treated (filtered for example lists, stripped or terminating per
//! response-pair side).

/// A contiguous text segment between delimiter lines. Ephemeral: consumed by
/// [`parse_block`] and discarded.
#[derive(Debug, Clone)]
pub(crate) struct RawBlock {
    /// 1-based position among the document's non-blank blocks.
    pub index: usize,
    pub text: String,
}

impl RawBlock {
    /// Short single-line preview used in "block ignored" warnings.
    pub fn preview(&self) -> String {
        let flat: String = self.text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();
        flat.trim().chars().take(120).collect()
    }
}

/// One extracted tagged field: everything between its tag line and the next
/// tag line (or end of block), in source order.
#[derive(Debug, Clone)]
pub(crate) struct Field {
    /// Lowercased tag name without the leading `#`.
    pub tag: String,
    /// Text after the `:` on the tag line itself, trimmed.
    pub inline: String,
    pub lines: Vec<FieldLine>,
}

#[derive(Debug, Clone)]
pub(crate) enum FieldLine {
    Text(String),
    Marker,
}

impl Field {
    /// The field's text up to (not including) the first control marker:
    /// the inline remainder of the tag line plus subsequent content lines,
    /// joined by newlines and trimmed.
    pub fn text_until_marker(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.inline.is_empty() {
            parts.push(&self.inline);
        }
        for line in &self.lines {
            match line {
                FieldLine::Text(text) => parts.push(text),
                FieldLine::Marker => break,
            }
        }
        parts.join("\n").trim().to_string()
    }

    /// The field's full text with control-marker lines removed: content after
    /// a marker is kept, only the marker line itself disappears.
    pub fn text_stripping_markers(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.inline.is_empty() {
            parts.push(&self.inline);
        }
        for line in &self.lines {
            if let FieldLine::Text(text) = line {
                parts.push(text);
            }
        }
        parts.join("\n").trim().to_string()
    }
}

/// A block that carried the mandatory identifier tag.
#[derive(Debug, Clone)]
pub(crate) struct TaggedBlock {
    pub index: usize,
    /// Raw value of the `#intent:` tag (unnormalized).
    pub intent_path: String,
    /// Tagged fields in source order. The identifier tag itself is not a field.
    pub fields: Vec<Field>,
}

impl TaggedBlock {
    /// First field carrying `tag`, if any. Repeated occurrences of a list or
    /// limit tag beyond the first are ignored.
    pub fn first_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}

// --- Line classification -----------------------------------------------------

#[derive(Debug)]
enum ScanLine<'a> {
    Marker,
    Tag { name: String, inline: &'a str },
    Content(&'a str),
}

fn classify(line: &str) -> ScanLine<'_> {
    if regex!(r"(?i)^\s*#rp").is_match(line) {
        return ScanLine::Marker;
    }
    if let Some(caps) = regex!(r"^\s*#([A-Za-z][A-Za-z0-9_]*)\s*:(.*)$").captures(line) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or("").to_ascii_lowercase();
        let inline = caps.get(2).map(|m| m.as_str()).unwrap_or("").trim();
        return ScanLine::Tag { name, inline };
    }
    ScanLine::Content(line)
}

fn is_delimiter(line: &str) -> bool {
    regex!(r"^\s*---\s*$").is_match(line)
}

// --- Splitting ---------------------------------------------------------------

/// Split raw text into blocks on `---` delimiter lines, dropping blank
/// segments. Indices are 1-based over the kept blocks.
pub(crate) fn split_blocks(text: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String, blocks: &mut Vec<RawBlock>| {
        if !current.trim().is_empty() {
            blocks.push(RawBlock { index: blocks.len() + 1, text: std::mem::take(current) });
        } else {
            current.clear();
        }
    };

    for line in text.lines() {
        if is_delimiter(line) {
            flush(&mut current, &mut blocks);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    flush(&mut current, &mut blocks);

    blocks
}

// --- Field extraction --------------------------------------------------------

/// Parse one raw block into its tagged fields.
///
/// Returns `None` when the mandatory `#intent:` tag is missing or empty; the
/// caller records the warning and the ignored-block count. Content that
/// appears before the first tag line is dropped.
pub(crate) fn parse_block(raw: &RawBlock) -> Option<TaggedBlock> {
    let mut intent_path: Option<String> = None;
    let mut fields: Vec<Field> = Vec::new();
    let mut current: Option<Field> = None;

    for line in raw.text.lines() {
        match classify(line) {
            ScanLine::Marker => {
                if let Some(field) = current.as_mut() {
                    field.lines.push(FieldLine::Marker);
                }
            }
            ScanLine::Tag { name, inline } => {
                if let Some(field) = current.take() {
                    fields.push(field);
                }
                if name == "intent" {
                    if intent_path.is_none() && !inline.is_empty() {
                        intent_path = Some(inline.to_string());
                    }
                } else {
                    current = Some(Field { tag: name, inline: inline.to_string(), lines: Vec::new() });
                }
            }
            ScanLine::Content(text) => {
                if let Some(field) = current.as_mut() {
                    field.lines.push(FieldLine::Text(text.to_string()));
                }
            }
        }
    }
    if let Some(field) = current.take() {
        fields.push(field);
    }

    intent_path.map(|intent_path| TaggedBlock { index: raw.index, intent_path, fields })
}

/// Extract a newline-delimited list field (`#pt:` / `#en:`): bullet prefixes
/// stripped, blank lines dropped, control-marker lines filtered out.
pub(crate) fn list_field(block: &TaggedBlock, tag: &str) -> Vec<String> {
    let Some(field) = block.first_field(tag) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut push = |raw: &str| {
        let cleaned = raw.trim().trim_start_matches('-').trim();
        if !cleaned.is_empty() {
            out.push(cleaned.to_string());
        }
    };

    push(&field.inline);
    for line in &field.lines {
        if let FieldLine::Text(text) = line {
            push(text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> TaggedBlock {
        parse_block(&RawBlock { index: 1, text: text.to_string() }).expect("block should parse")
    }

    #[test]
    fn splits_on_delimiter_lines_with_whitespace() {
        let blocks = split_blocks("a\n  ---  \nb\n---\n\n---\nc");
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.trim()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(blocks[2].index, 3);
    }

    #[test]
    fn dashes_inside_content_are_not_delimiters() {
        let blocks = split_blocks("#intent: x\n- some --- inline dashes\n");
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn block_without_intent_tag_is_rejected() {
        let raw = RawBlock { index: 1, text: "#pt:\n- oi\n".to_string() };
        assert!(parse_block(&raw).is_none());

        let raw = RawBlock { index: 1, text: "#intent:\n#pt:\n- oi\n".to_string() };
        assert!(parse_block(&raw).is_none(), "empty identifier value is treated as missing");
    }

    #[test]
    fn tags_are_case_insensitive_and_whitespace_tolerant() {
        let b = block("  #Intent :  greet  \n  #PT:\n- oi\n");
        assert_eq!(b.intent_path, "greet");
        assert_eq!(list_field(&b, "pt"), vec!["oi"]);
    }

    #[test]
    fn list_field_stops_at_next_tag() {
        let b = block("#intent: x\n#pt:\n- um\n- dois\n#en:\n- one\n");
        assert_eq!(list_field(&b, "pt"), vec!["um", "dois"]);
        assert_eq!(list_field(&b, "en"), vec!["one"]);
    }

    #[test]
    fn list_field_filters_markers_and_blanks_and_bullets() {
        let b = block("#intent: x\n#pt: inline um\n\n#rp_1\n- dois\n#rp\n-  três \n");
        assert_eq!(list_field(&b, "pt"), vec!["inline um", "dois", "três"]);
    }

    #[test]
    fn text_until_marker_terminates_at_control_line() {
        let b = block("#intent: x\n#vr_pt: first\nsecond\n#rp weight=2\nhidden\n#vr_en: ok\n");
        let field = b.first_field("vr_pt").unwrap();
        assert_eq!(field.text_until_marker(), "first\nsecond");
    }

    #[test]
    fn text_stripping_markers_keeps_content_after_control_line() {
        let b = block("#intent: x\n#vr_pt: first\nsecond\n#rp weight=2\nthird\n#vr_en: ok\n");
        let field = b.first_field("vr_pt").unwrap();
        assert_eq!(field.text_stripping_markers(), "first\nsecond\nthird");
    }

    #[test]
    fn preview_is_single_line_and_bounded() {
        let raw = RawBlock { index: 1, text: format!("a\nb\n{}", "x".repeat(200)) };
        let preview = raw.preview();
        assert!(!preview.contains('\n'));
        assert_eq!(preview.chars().count(), 120);
    }
}
