//! HTML character reference decoding for attribute values.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

static ENTITY_RE: OnceLock<Regex> = OnceLock::new();

fn entity_regex() -> &'static Regex {
    ENTITY_RE.get_or_init(|| {
        Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|([a-zA-Z]+));")
            .expect("entity pattern is valid")
    })
}

/// Decode named (`&quot; &amp; &lt; &gt; &apos;`) and numeric character
/// references in a single pass.
///
/// Each reference is decoded once, so `&amp;quot;` yields `&quot;`.
/// Unknown names and invalid code points are left as written.
pub fn decode_html_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    entity_regex().replace_all(input, |caps: &Captures| {
        let decoded = if let Some(hex) = caps.get(1) {
            u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
        } else if let Some(dec) = caps.get(2) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else {
            caps.get(3).and_then(|name| named_entity(name.as_str()))
        };

        match decoded {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entities() {
        assert_eq!(
            decode_html_entities("&quot;a&quot; &amp; &lt;b&gt; &apos;c&apos;"),
            "\"a\" & <b> 'c'"
        );
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_html_entities("&#39;&#x27;&#x2F;"), "''/");
        assert_eq!(decode_html_entities("&#x2f;&#X2F;"), "//");
        assert_eq!(decode_html_entities("caf&#233; &#x1F600;"), "café 😀");
    }

    #[test]
    fn test_single_pass() {
        assert_eq!(decode_html_entities("&amp;quot;"), "&quot;");
        assert_eq!(decode_html_entities("&amp;#39;"), "&#39;");
    }

    #[test]
    fn test_unknown_and_invalid_left_alone() {
        assert_eq!(decode_html_entities("&bogus; &#xD800; & x"), "&bogus; &#xD800; & x");
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
    }

    #[test]
    fn test_no_entities_borrows() {
        assert!(matches!(decode_html_entities("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decoded_json() {
        let encoded = "{&quot;clue&quot;:&quot;Fish &amp; chips (4)&quot;}";
        let value: serde_json::Value =
            serde_json::from_str(&decode_html_entities(encoded)).unwrap();
        assert_eq!(value["clue"], "Fish & chips (4)");
    }
}
