//! Input sanitizers and output escapers.
//!
//! Sanitizers run when a form is saved and neutralize unsafe input instead of
//! rejecting it. Escapers run when markup is emitted; stored values are never
//! trusted to be safe for HTML.

use regex::Regex;
use std::sync::OnceLock;

/// URL schemes accepted by [`sanitize_url`].
pub const ALLOWED_PROTOCOLS: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "irc6", "ircs", "gopher", "nntp",
    "feed", "telnet", "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

fn script_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")
            .expect("script/style pattern is valid")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Unterminated tags at the end of the input are stripped as well.
    RE.get_or_init(|| Regex::new(r"<[a-zA-Z/!?][^>]*(?:>|$)").expect("tag pattern is valid"))
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n\t ]+").expect("whitespace pattern is valid"))
}

fn octet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)%[a-f0-9]{2}").expect("octet pattern is valid"))
}

fn spaces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" +").expect("space pattern is valid"))
}

fn encoded_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)%0[0ad]").expect("encoded break pattern is valid"))
}

fn php_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[a-z0-9-]+?\.php").expect("php file pattern is valid"))
}

fn sanitize_text_once(input: &str) -> String {
    let without_blocks = script_style_re().replace_all(input, "");
    let without_tags = tag_re().replace_all(&without_blocks, "");

    let printable: String = without_tags
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();

    let collapsed = line_break_re().replace_all(&printable, " ");
    let mut filtered = collapsed.trim_matches(' ').to_string();

    let mut found = false;
    while octet_re().is_match(&filtered) {
        filtered = octet_re().replace_all(&filtered, "").into_owned();
        found = true;
    }
    if found {
        filtered = spaces_re()
            .replace_all(&filtered, " ")
            .trim_matches(' ')
            .to_string();
    }

    filtered
}

/// Reduces user input to a single line of plain text.
///
/// Removes `<script>`/`<style>` elements including their content, strips all
/// remaining tags and control characters, collapses whitespace runs into one
/// space, drops percent-encoded octets and trims the result. Passes repeat
/// until nothing changes, so the function is idempotent.
pub fn sanitize_text_field(input: &str) -> String {
    let mut current = sanitize_text_once(input);
    loop {
        let next = sanitize_text_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || !c.is_ascii() || "-~+_.?#=!&;,/:%@$|*'()[]".contains(c)
}

/// Returns true when the text before the first `:` looks like a scheme that
/// is not in [`ALLOWED_PROTOCOLS`].
fn has_disallowed_protocol(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    if !scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    let scheme = scheme.to_ascii_lowercase();
    !ALLOWED_PROTOCOLS.contains(&scheme.as_str())
}

/// Surrounding characters removed from URLs. Only ASCII: non-ASCII
/// whitespace is a legal URL character and must survive a second pass.
const URL_TRIM_CHARS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0b'];

/// Cleans a URL for storage.
///
/// Anything not shaped like a URL is dropped: characters outside the URL-safe
/// set, encoded CR/LF/NUL sequences and schemes outside
/// [`ALLOWED_PROTOCOLS`] (the whole URL becomes empty). Bare hosts such as
/// `example.com/a.png` get an `http://` prefix.
pub fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim_matches(URL_TRIM_CHARS);
    if trimmed.is_empty() {
        return String::new();
    }

    let mut url: String = trimmed
        .replace(' ', "%20")
        .chars()
        .filter(|c| is_url_char(*c))
        .collect();

    while encoded_break_re().is_match(&url) {
        url = encoded_break_re().replace_all(&url, "").into_owned();
    }

    if url.is_empty() {
        return String::new();
    }

    if !url.contains(':')
        && !url.starts_with(['/', '#', '?'])
        && !php_file_re().is_match(&url)
    {
        url = format!("http://{url}");
    }

    if !url.starts_with('/') && has_disallowed_protocol(&url) {
        return String::new();
    }

    url
}

/// Best-effort integer coercion that never fails.
///
/// Skips leading whitespace, accepts one optional sign and reads the longest
/// digit prefix. Input without a digit prefix yields `0`; overflow saturates.
pub fn intval(input: &str) -> i64 {
    let s = input.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Escapes text for use between HTML tags.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a value for a quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    escape_html(value)
}

/// Sanitizes a URL and escapes it for an attribute such as `src`.
pub fn escape_url(value: &str) -> String {
    escape_attr(&sanitize_url(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn text_field_strips_markup_and_scripts() {
        assert_eq!(sanitize_text_field("<b>Lamp</b>"), "Lamp");
        assert_eq!(
            sanitize_text_field("Hi<script>alert(1)</script> there"),
            "Hi there"
        );
        assert_eq!(sanitize_text_field("<style>p{}</style>x"), "x");
        assert_eq!(sanitize_text_field("<script>alert(1)</script>"), "");
    }

    #[test]
    fn text_field_collapses_whitespace_and_trims() {
        assert_eq!(sanitize_text_field("  a\n\n b\t c  "), "a b c");
        assert_eq!(sanitize_text_field("a\u{0007}b"), "ab");
    }

    #[test]
    fn text_field_removes_encoded_octets() {
        assert_eq!(sanitize_text_field("50%20off"), "50off");
        assert_eq!(sanitize_text_field("a %3C b"), "a b");
    }

    #[test]
    fn text_field_keeps_plain_less_than() {
        assert_eq!(sanitize_text_field("3 < 4"), "3 < 4");
    }

    #[test]
    fn text_field_strips_tags_revealed_by_earlier_pass() {
        assert_eq!(sanitize_text_field("<<b>a>x"), "x");
    }

    #[test]
    fn url_keeps_ordinary_urls() {
        assert_eq!(
            sanitize_url("https://example.com/floor.jpg"),
            "https://example.com/floor.jpg"
        );
        assert_eq!(sanitize_url("/uploads/pin.png"), "/uploads/pin.png");
        assert_eq!(
            sanitize_url("  https://example.com/a b.png "),
            "https://example.com/a%20b.png"
        );
    }

    #[test]
    fn url_prefixes_bare_hosts() {
        assert_eq!(
            sanitize_url("example.com/pin.png"),
            "http://example.com/pin.png"
        );
    }

    #[test]
    fn url_rejects_unknown_schemes() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("JavaScript:alert(1)"), "");
        assert_eq!(sanitize_url("data:image/png;base64,AAAA"), "");
        assert_eq!(sanitize_url(":nothing"), "");
    }

    #[test]
    fn url_drops_unsafe_characters() {
        assert_eq!(
            sanitize_url("https://example.com/\"><script>"),
            "https://example.com/script"
        );
        assert_eq!(sanitize_url("https://a.com/%0d%0aSet"), "https://a.com/Set");
        assert_eq!(sanitize_url("   "), "");
    }

    #[test]
    fn url_keeps_unicode_whitespace() {
        let once = sanitize_url("A\u{2000}\\");
        assert_eq!(once, "http://A\u{2000}");
        assert_eq!(sanitize_url(&once), once);
        assert_eq!(sanitize_url("\u{3000}x.png\u{3000}"), "http://\u{3000}x.png\u{3000}");
    }

    #[test]
    fn intval_follows_best_effort_coercion() {
        assert_eq!(intval("42"), 42);
        assert_eq!(intval("  17px"), 17);
        assert_eq!(intval("12.7"), 12);
        assert_eq!(intval("-5"), -5);
        assert_eq!(intval("+8"), 8);
        assert_eq!(intval("abc"), 0);
        assert_eq!(intval(""), 0);
        assert_eq!(intval("99999999999999999999999"), i64::MAX);
        assert_eq!(intval("-99999999999999999999999"), i64::MIN);
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_url_escapes_ampersands() {
        assert_eq!(
            escape_url("https://example.com/?a=1&b=2"),
            "https://example.com/?a=1&amp;b=2"
        );
        assert_eq!(escape_url("javascript:alert(1)"), "");
    }

    proptest! {
        #[test]
        fn text_field_is_idempotent(input in "\\PC{0,40}") {
            let once = sanitize_text_field(&input);
            prop_assert_eq!(sanitize_text_field(&once), once);
        }

        #[test]
        fn text_field_never_leaves_tags(input in "[<>a-z/ %0-9]{0,30}") {
            let out = sanitize_text_field(&input);
            prop_assert!(!tag_re().is_match(&out));
        }

        #[test]
        fn url_is_idempotent(input in "\\PC{0,40}") {
            let once = sanitize_url(&input);
            prop_assert_eq!(sanitize_url(&once), once);
        }
    }
}
