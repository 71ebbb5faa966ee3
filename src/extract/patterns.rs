//! Markup patterns that locate the embedded puzzle payload.
//!
//! Each [`Pattern`] is a pure locator from page HTML to the raw JSON text of
//! a candidate payload. Locators only find text; parsing and validation happen
//! in the engine so a bad candidate never stops the cascade.

use regex::Regex;
use std::sync::OnceLock;

use super::entities::decode_html_entities;

/// One way the publisher has embedded puzzle JSON in its pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// `<gu-island name="CrosswordComponent" props='…'>`
    IslandNameFirst,
    /// `<gu-island props='…' name="CrosswordComponent">`
    IslandPropsFirst,
    /// `<gu-island name="CrosswordComponent" props="…">`, entity-encoded
    EncodedIslandNameFirst,
    /// `<gu-island props="…" name="CrosswordComponent">`, entity-encoded
    EncodedIslandPropsFirst,
    /// Any `gu-island` whose single-quoted props mention `"entries"`
    IslandWithEntries,
    /// Any `gu-island` whose double-quoted props mention `entries`, encoded
    EncodedIslandWithEntries,
    /// Legacy `data-crossword-data='…'`
    LegacyDataAttr,
    /// Legacy `data-crossword-data="…"`, entity-encoded
    EncodedLegacyDataAttr,
    /// Bare `{"id":"crosswords/…", …, "entries":[…]}` object in the page
    RawJsonBlob,
}

/// Patterns in the order they are tried, most specific first
pub const CASCADE: [Pattern; 9] = [
    Pattern::IslandNameFirst,
    Pattern::IslandPropsFirst,
    Pattern::EncodedIslandNameFirst,
    Pattern::EncodedIslandPropsFirst,
    Pattern::IslandWithEntries,
    Pattern::EncodedIslandWithEntries,
    Pattern::LegacyDataAttr,
    Pattern::EncodedLegacyDataAttr,
    Pattern::RawJsonBlob,
];

static REGEXES: [OnceLock<Regex>; CASCADE.len()] = [const { OnceLock::new() }; CASCADE.len()];

impl Pattern {
    /// Short name used in logs
    pub fn name(self) -> &'static str {
        match self {
            Pattern::IslandNameFirst => "island-name-first",
            Pattern::IslandPropsFirst => "island-props-first",
            Pattern::EncodedIslandNameFirst => "encoded-island-name-first",
            Pattern::EncodedIslandPropsFirst => "encoded-island-props-first",
            Pattern::IslandWithEntries => "island-with-entries",
            Pattern::EncodedIslandWithEntries => "encoded-island-with-entries",
            Pattern::LegacyDataAttr => "legacy-data-attr",
            Pattern::EncodedLegacyDataAttr => "encoded-legacy-data-attr",
            Pattern::RawJsonBlob => "raw-json-blob",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Pattern::IslandNameFirst => {
                r#"<gu-island[^>]*name="CrosswordComponent"[^>]*props='([^']+)'"#
            }
            Pattern::IslandPropsFirst => {
                r#"<gu-island[^>]*props='([^']+)'[^>]*name="CrosswordComponent""#
            }
            Pattern::EncodedIslandNameFirst => {
                r#"<gu-island[^>]*name=(?:"|&quot;)CrosswordComponent(?:"|&quot;)[^>]*props="([^"]+)""#
            }
            Pattern::EncodedIslandPropsFirst => {
                r#"<gu-island[^>]*props="([^"]+)"[^>]*name=(?:"|&quot;)CrosswordComponent"#
            }
            Pattern::IslandWithEntries => {
                r#"<gu-island[^>]*props='(\{[^']*"entries"[^']*\})'"#
            }
            Pattern::EncodedIslandWithEntries => {
                r#"<gu-island[^>]*props="([^"]*entries[^"]*)"[^>]*>"#
            }
            Pattern::LegacyDataAttr => r#"data-crossword-data='([^']+)'"#,
            Pattern::EncodedLegacyDataAttr => r#"data-crossword-data="([^"]+)""#,
            Pattern::RawJsonBlob => {
                r#"(\{"id"\s*:\s*"crosswords[^"]*"[\s\S]*?"entries"\s*:\s*\[[\s\S]*?\]\s*\})"#
            }
        }
    }

    fn regex(self) -> &'static Regex {
        REGEXES[self as usize]
            .get_or_init(|| Regex::new(self.source()).expect("extraction pattern is valid"))
    }

    /// Whether the captured text is an entity-encoded attribute value
    fn is_encoded(self) -> bool {
        matches!(
            self,
            Pattern::EncodedIslandNameFirst
                | Pattern::EncodedIslandPropsFirst
                | Pattern::EncodedIslandWithEntries
                | Pattern::EncodedLegacyDataAttr
        )
    }

    /// Find this pattern's payload in `html` and return it as JSON text
    pub fn locate(self, html: &str) -> Option<String> {
        let caps = self.regex().captures(html)?;
        let captured = caps.get(1)?;

        if self == Pattern::RawJsonBlob {
            let text = leading_json_value(&html[captured.start()..]).unwrap_or(captured.as_str());
            return Some(text.to_string());
        }

        let text = captured.as_str();
        if self.is_encoded() {
            Some(decode_html_entities(text).into_owned())
        } else {
            Some(text.to_string())
        }
    }
}

/// The complete JSON value at the start of `text`, if one parses.
///
/// Bounds the raw blob by the object's own braces rather than by the first
/// `]}` the lazy regex happens to reach.
fn leading_json_value(text: &str) -> Option<&str> {
    let mut stream =
        serde_json::Deserializer::from_str(text).into_iter::<serde::de::IgnoredAny>();
    match stream.next() {
        Some(Ok(_)) => Some(&text[..stream.byte_offset()]),
        _ => None,
    }
}
