//! Embed references: the `[hotspot id="N"]` tags editors paste into content.

use crate::models::EntryId;
use crate::sanitize::intval;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[(\[?)hotspot(\s[^\]]*?)?\s*/?\](\]?)").expect("embed tag pattern is valid")
    })
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)([a-z_][a-z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#)
            .expect("attribute pattern is valid")
    })
}

/// Formats the embed reference for an entry.
pub fn embed_reference(id: EntryId) -> String {
    format!("[hotspot id=\"{}\"]", id)
}

/// Resolves the `id` attribute of an attribute list to a positive entry id.
fn id_from_attrs(attrs: &str) -> Option<EntryId> {
    let raw = attr_re().captures_iter(attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case("id") {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
    })?;

    let id = intval(raw);
    EntryId::try_from(id).ok().filter(|id| *id > 0)
}

/// Parses a single embed reference, with or without the surrounding brackets.
///
/// Returns `None` for anything that is not a `hotspot` tag and for ids that
/// are missing, non-numeric, zero or negative.
pub fn parse_embed_reference(tag: &str) -> Option<EntryId> {
    let inner = tag.trim();
    let inner = inner
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(inner)
        .trim();
    let inner = inner.strip_suffix('/').unwrap_or(inner);

    let attrs = inner.strip_prefix("hotspot")?;
    if !attrs.is_empty() && !attrs.starts_with(char::is_whitespace) {
        return None;
    }
    id_from_attrs(attrs)
}

/// Replaces every embed reference in `content` with the markup `resolve`
/// returns for its entry.
///
/// Tags with an invalid id expand to nothing. A doubled tag such as
/// `[[hotspot id="1"]]` is an escaped literal and comes out as
/// `[hotspot id="1"]`.
pub fn expand_embeds<F>(content: &str, mut resolve: F) -> String
where
    F: FnMut(EntryId) -> String,
{
    tag_re()
        .replace_all(content, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let open = &caps[1];
            let close = &caps[3];

            if !open.is_empty() && !close.is_empty() {
                return whole[1..whole.len() - 1].to_string();
            }

            let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let markup = id_from_attrs(attrs).map(&mut resolve).unwrap_or_default();
            format!("{}{}{}", open, markup, close)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reference_for_entry() {
        assert_eq!(embed_reference(42), "[hotspot id=\"42\"]");
        assert_eq!(parse_embed_reference(&embed_reference(42)), Some(42));
    }

    #[test]
    fn parses_quoting_variants() {
        assert_eq!(parse_embed_reference("hotspot id=\"7\""), Some(7));
        assert_eq!(parse_embed_reference("[hotspot id='7']"), Some(7));
        assert_eq!(parse_embed_reference("[hotspot id=7]"), Some(7));
        assert_eq!(parse_embed_reference("[hotspot ID=\"7\" /]"), Some(7));
        assert_eq!(parse_embed_reference("[hotspot class=\"x\" id=\"12abc\"]"), Some(12));
    }

    #[test]
    fn rejects_invalid_ids() {
        assert_eq!(parse_embed_reference("[hotspot id=\"0\"]"), None);
        assert_eq!(parse_embed_reference("[hotspot id=\"abc\"]"), None);
        assert_eq!(parse_embed_reference("[hotspot id=\"-3\"]"), None);
        assert_eq!(parse_embed_reference("[hotspot id=\"\"]"), None);
        assert_eq!(parse_embed_reference("[hotspot]"), None);
    }

    #[test]
    fn rejects_other_tags() {
        assert_eq!(parse_embed_reference("[hotspots id=\"1\"]"), None);
        assert_eq!(parse_embed_reference("[gallery id=\"1\"]"), None);
    }

    #[test]
    fn expands_every_tag_in_content() {
        let content = "Intro [hotspot id=\"1\"] middle [hotspot id='2'] end";
        let out = expand_embeds(content, |id| format!("<section {}>", id));
        assert_eq!(out, "Intro <section 1> middle <section 2> end");
    }

    #[test]
    fn invalid_tags_expand_to_nothing_without_resolving() {
        let mut calls = 0;
        let out = expand_embeds("a[hotspot id=\"0\"]b[hotspot id=\"abc\"]c", |_| {
            calls += 1;
            "x".to_string()
        });
        assert_eq!(out, "abc");
        assert_eq!(calls, 0);
    }

    #[test]
    fn doubled_brackets_escape_a_tag() {
        let out = expand_embeds("see [[hotspot id=\"1\"]] here", |_| "x".to_string());
        assert_eq!(out, "see [hotspot id=\"1\"] here");
    }

    #[test]
    fn leaves_unrelated_brackets_alone() {
        let content = "[note] and [hotspots id=\"1\"]";
        assert_eq!(expand_embeds(content, |_| "x".to_string()), content);
    }
}
