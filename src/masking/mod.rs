//! Pattern masking for spans that must survive translation untouched.
//!
//! Callers name spans to protect with Unicode property names (for example
//! `Extended_Pictographic`) or regular expressions. Each pattern becomes a
//! [`MaskRule`]; patterns that fail to compile are reported as
//! [`MaskDiagnostic`]s and the call carries on with the rules that did
//! compile. Matched spans are wrapped in markup the provider knows to leave
//! alone, and [`strip_markup`] removes it again on the way back.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::metrics;
use crate::models::IgnorePatterns;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Tag name used by the XML markup style. Providers using XML tag handling
/// must be told not to translate its content.
pub const XML_IGNORE_TAG: &str = "ignore";

/// Which markup vocabulary to wrap protected spans in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupStyle {
    /// `<ignore>…</ignore>`
    Xml,
    /// `<span class="notranslate">…</span>`
    Html,
}

impl MarkupStyle {
    pub fn open(&self) -> &'static str {
        match self {
            MarkupStyle::Xml => "<ignore>",
            MarkupStyle::Html => "<span class=\"notranslate\">",
        }
    }

    pub fn close(&self) -> &'static str {
        match self {
            MarkupStyle::Xml => "</ignore>",
            MarkupStyle::Html => "</span>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Unicode,
    Regex,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Unicode => "unicode",
            RuleKind::Regex => "regex",
        }
    }
}

/// A compiled ignore pattern.
#[derive(Debug, Clone)]
pub struct MaskRule {
    pub kind: RuleKind,
    pub pattern: String,
    regex: Regex,
}

impl MaskRule {
    /// Compile one ignore pattern, or explain why it cannot be used.
    pub fn compile(kind: RuleKind, pattern: &str) -> Result<Self, MaskDiagnostic> {
        let source = match kind {
            RuleKind::Unicode => {
                if pattern.is_empty() || pattern.contains(['{', '}', '\\']) {
                    return Err(MaskDiagnostic::new(kind, pattern, "not a Unicode property name"));
                }
                format!(r"\p{{{}}}", pattern)
            }
            RuleKind::Regex => pattern.to_string(),
        };

        Regex::new(&source)
            .map(|regex| Self {
                kind,
                pattern: pattern.to_string(),
                regex,
            })
            .map_err(|e| MaskDiagnostic::new(kind, pattern, e.to_string()))
    }

    fn spans<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.regex
            .find_iter(text)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| (m.start(), m.end()))
    }
}

/// An ignore pattern that was dropped because it failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskDiagnostic {
    pub kind: RuleKind,
    pub pattern: String,
    pub reason: String,
}

impl MaskDiagnostic {
    fn new(kind: RuleKind, pattern: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// One input segment, before and after masking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedSegment {
    /// Whitespace-normalized input. Never contains masking markup.
    pub plain: String,
    /// What gets sent to the provider.
    pub masked: String,
}

/// Output of [`mask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    pub segments: Vec<MaskedSegment>,
    pub diagnostics: Vec<MaskDiagnostic>,
    /// Set when ignore patterns were supplied; the provider must then be
    /// told to expect markup.
    pub markup: Option<MarkupStyle>,
}

impl Masked {
    pub fn is_active(&self) -> bool {
        self.markup.is_some()
    }

    pub fn masked_texts(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.masked.clone()).collect()
    }

    pub fn originals(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.plain.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Collapse every run of whitespace to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compile ignore patterns into rules, deduplicating by name first.
pub fn compile_rules(patterns: &IgnorePatterns) -> (Vec<MaskRule>, Vec<MaskDiagnostic>) {
    let mut seen = HashSet::new();
    let mut rules = Vec::new();
    let mut diagnostics = Vec::new();

    let requested = patterns
        .unicode
        .iter()
        .map(|p| (RuleKind::Unicode, p.as_str()))
        .chain(patterns.regex.iter().map(|p| (RuleKind::Regex, p.as_str())));

    for (kind, pattern) in requested {
        if !seen.insert((kind, pattern)) {
            continue;
        }
        match MaskRule::compile(kind, pattern) {
            Ok(rule) => rules.push(rule),
            Err(diagnostic) => {
                warn!(
                    "Dropping {} ignore pattern {:?}: {}",
                    kind.as_str(),
                    pattern,
                    diagnostic.reason
                );
                metrics::record_mask_rule_dropped(kind.as_str());
                diagnostics.push(diagnostic);
            }
        }
    }

    (rules, diagnostics)
}

/// Normalize every segment and wrap the spans matched by `ignore` in
/// `style` markup.
///
/// With no ignore patterns the output equals the normalized input. When
/// patterns are supplied, markup-significant characters outside the
/// wrapped spans are escaped so the provider parses the text as markup.
pub fn mask(segments: &[String], ignore: &IgnorePatterns, style: MarkupStyle) -> Masked {
    if ignore.is_empty() {
        return Masked {
            segments: segments
                .iter()
                .map(|s| {
                    let plain = normalize_whitespace(s);
                    MaskedSegment {
                        masked: plain.clone(),
                        plain,
                    }
                })
                .collect(),
            diagnostics: Vec::new(),
            markup: None,
        };
    }

    let (rules, diagnostics) = compile_rules(ignore);
    debug!(
        "Masking {} segments with {} rules ({} dropped)",
        segments.len(),
        rules.len(),
        diagnostics.len()
    );

    let segments = segments
        .iter()
        .map(|s| {
            let plain = normalize_whitespace(s);
            MaskedSegment {
                masked: mask_segment(&plain, &rules, style),
                plain,
            }
        })
        .collect();

    Masked {
        segments,
        diagnostics,
        markup: Some(style),
    }
}

/// Wrap every matched span of `text` once. Overlapping or touching matches
/// from any rule are merged so markup is never nested.
fn mask_segment(text: &str, rules: &[MaskRule], style: MarkupStyle) -> String {
    let mut spans: Vec<(usize, usize)> = rules.iter().flat_map(|r| r.spans(text)).collect();
    spans.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut out = String::with_capacity(text.len() + merged.len() * 32);
    let mut cursor = 0;
    for (start, end) in merged {
        out.push_str(&escape_markup(&text[cursor..start]));
        out.push_str(style.open());
        out.push_str(&escape_markup(&text[start..end]));
        out.push_str(style.close());
        cursor = end;
    }
    out.push_str(&escape_markup(&text[cursor..]));
    out
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("Invalid regex pattern"))
}

fn entity_regex() -> &'static Regex {
    ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(?:#[xX]([0-9a-fA-F]+)|#([0-9]+)|(amp|lt|gt|quot|apos));")
            .expect("Invalid regex pattern")
    })
}

/// Remove every inline tag and collapse the whitespace left behind.
pub fn strip_markup(text: &str) -> String {
    normalize_whitespace(&tag_regex().replace_all(text, ""))
}

/// Decode the character references providers emit in markup mode.
pub fn decode_entities(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(unicode: &[&str], regex: &[&str]) -> IgnorePatterns {
        IgnorePatterns {
            unicode: unicode.iter().map(|s| s.to_string()).collect(),
            regex: regex.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_whitespace_normalization() {
        assert_eq!(normalize_whitespace("  Hello \n\t world  "), "Hello world");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_no_patterns_is_identity_after_normalization() {
        let masked = mask(&texts(&["a   b", " c "]), &IgnorePatterns::default(), MarkupStyle::Xml);
        assert_eq!(masked.masked_texts(), vec!["a b", "c"]);
        assert_eq!(masked.originals(), vec!["a b", "c"]);
        assert!(!masked.is_active());
    }

    #[test]
    fn test_unicode_class_xml_style() {
        let masked = mask(
            &texts(&["a 🙂 b"]),
            &patterns(&["Extended_Pictographic"], &[]),
            MarkupStyle::Xml,
        );
        assert_eq!(masked.segments[0].masked, "a <ignore>🙂</ignore> b");
        assert_eq!(masked.segments[0].plain, "a 🙂 b");
        assert!(masked.diagnostics.is_empty());
    }

    #[test]
    fn test_regex_html_style() {
        let masked = mask(
            &texts(&["Ping @alice and @bob"]),
            &patterns(&[], &[r"@\w+"]),
            MarkupStyle::Html,
        );
        assert_eq!(
            masked.segments[0].masked,
            "Ping <span class=\"notranslate\">@alice</span> and <span class=\"notranslate\">@bob</span>"
        );
    }

    #[test]
    fn test_repeated_match_wrapped_once_per_occurrence() {
        let masked = mask(&texts(&["x foo foo"]), &patterns(&[], &["foo"]), MarkupStyle::Xml);
        assert_eq!(
            masked.segments[0].masked,
            "x <ignore>foo</ignore> <ignore>foo</ignore>"
        );
    }

    #[test]
    fn test_overlapping_rules_do_not_nest() {
        let masked = mask(
            &texts(&["call 555-1234 now"]),
            &patterns(&[], &[r"\d+-\d+", r"\d+"]),
            MarkupStyle::Xml,
        );
        assert_eq!(masked.segments[0].masked, "call <ignore>555-1234</ignore> now");
    }

    #[test]
    fn test_invalid_regex_is_dropped_valid_one_still_masks() {
        let masked = mask(
            &texts(&["keep #tag here"]),
            &patterns(&[], &["(unclosed", r"#\w+"]),
            MarkupStyle::Xml,
        );
        assert_eq!(masked.segments[0].masked, "keep <ignore>#tag</ignore> here");
        assert_eq!(masked.diagnostics.len(), 1);
        assert_eq!(masked.diagnostics[0].kind, RuleKind::Regex);
        assert_eq!(masked.diagnostics[0].pattern, "(unclosed");
    }

    #[test]
    fn test_invalid_unicode_class_is_dropped() {
        let (rules, diagnostics) = compile_rules(&patterns(&["Not_A_Property", "L}|x{"], &[]));
        assert!(rules.is_empty());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.kind == RuleKind::Unicode));
    }

    #[test]
    fn test_duplicate_patterns_compile_once() {
        let (rules, _) = compile_rules(&patterns(
            &["Extended_Pictographic", "Extended_Pictographic"],
            &["x", "x"],
        ));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_markup_characters_are_escaped_when_masking() {
        let masked = mask(&texts(&["1 < 2 & 🙂"]), &patterns(&["Extended_Pictographic"], &[]), MarkupStyle::Xml);
        assert_eq!(masked.segments[0].masked, "1 &lt; 2 &amp; <ignore>🙂</ignore>");
        assert_eq!(masked.segments[0].plain, "1 < 2 & 🙂");
    }

    #[test]
    fn test_strip_markup_removes_tags_and_extra_spaces() {
        assert_eq!(strip_markup("a <ignore>🙂</ignore> b"), "a 🙂 b");
        assert_eq!(
            strip_markup("Hola <span class=\"notranslate\">@alice</span>!"),
            "Hola @alice!"
        );
        assert_eq!(strip_markup("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("It&#39;s &lt;b&gt; &amp;amp;"), "It's <b> &amp;");
        assert_eq!(decode_entities("&#x1F642;"), "🙂");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }
}
