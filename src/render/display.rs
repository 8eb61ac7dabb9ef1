use crate::models::{Hotspot, Marker};
use crate::sanitize::{escape_html, escape_url};

/// Shown inside a marker that has no icon image.
pub const DEFAULT_MARKER_GLYPH: &str = "+";

/// Builds one positioned marker element with its tooltip.
fn build_marker(marker: &Marker<'_>) -> String {
    let mut html = String::new();

    // Coordinates are integers, so they need no escaping.
    html.push_str(&format!(
        "<div class=\"hotspot-item\" style=\"top:{}%;left:{}%;\">\n",
        marker.y, marker.x
    ));

    match marker.icon.map(escape_url).filter(|src| !src.is_empty()) {
        Some(src) => html.push_str(&format!(
            "<img src=\"{}\" class=\"hotspot-icon-img\" alt=\"\">\n",
            src
        )),
        None => html.push_str(&format!(
            "<span class=\"hotspot-icon\">{}</span>\n",
            DEFAULT_MARKER_GLYPH
        )),
    }

    html.push_str("<div class=\"hotspot-tooltip\">\n");
    html.push_str(&format!("<strong>{}</strong>\n", escape_html(marker.title)));
    html.push_str(&format!("<p>{}</p>\n", escape_html(marker.text)));
    html.push_str("</div>\n");
    html.push_str("</div>\n");

    html
}

/// Renders an embeddable hotspot section.
///
/// Returns an empty string, without even a container, when the image is
/// missing (or sanitizes to nothing) or the hotspot list is empty.
/// Hotspots missing `x`, `y`, `title` or `text` are skipped, so a list of
/// only incomplete hotspots renders the bare image.
pub fn render_display(image_url: &str, spots: &[Hotspot]) -> String {
    if image_url.trim().is_empty() || spots.is_empty() {
        return String::new();
    }

    let image_src = escape_url(image_url);
    if image_src.is_empty() {
        log::debug!(
            "image reference {:?} is not a usable URL, rendering nothing",
            image_url
        );
        return String::new();
    }

    let mut html = String::new();
    html.push_str("<div class=\"hotspot-wrapper\">\n");
    html.push_str(&format!(
        "<img src=\"{}\" class=\"hotspot-bg\" alt=\"Hotspot Image\">\n",
        image_src
    ));
    for marker in spots.iter().filter_map(Hotspot::marker) {
        html.push_str(&build_marker(&marker));
    }
    html.push_str("</div>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: &str = "https://example.com/floor.jpg";

    fn lamp() -> Hotspot {
        Hotspot::new(10, 20, "Lamp", "A reading lamp", "")
    }

    #[test]
    fn empty_image_or_spots_render_nothing() {
        assert_eq!(render_display("", &[lamp()]), "");
        assert_eq!(render_display("   ", &[lamp()]), "");
        assert_eq!(render_display(FLOOR, &[]), "");
        assert_eq!(render_display("javascript:alert(1)", &[lamp()]), "");
    }

    #[test]
    fn only_incomplete_spots_render_bare_image() {
        let html = render_display(FLOOR, &[Hotspot::default()]);

        assert_eq!(
            html,
            "<div class=\"hotspot-wrapper\">\n\
             <img src=\"https://example.com/floor.jpg\" class=\"hotspot-bg\" alt=\"Hotspot Image\">\n\
             </div>\n"
        );
    }

    #[test]
    fn renders_image_and_positioned_marker() {
        let html = render_display(FLOOR, &[lamp()]);

        assert!(html.starts_with("<div class=\"hotspot-wrapper\">"));
        assert!(html.contains("<img src=\"https://example.com/floor.jpg\" class=\"hotspot-bg\""));
        assert_eq!(html.matches("class=\"hotspot-item\"").count(), 1);
        assert!(html.contains("top:20%;left:10%;"));
        assert!(html.contains("<strong>Lamp</strong>"));
        assert!(html.contains("<p>A reading lamp</p>"));
        assert!(html.contains("<span class=\"hotspot-icon\">+</span>"));
    }

    #[test]
    fn icon_replaces_default_glyph() {
        let spot = Hotspot::new(1, 2, "a", "b", "https://example.com/pin.png?v=1&s=2");
        let html = render_display(FLOOR, &[spot]);

        assert!(html.contains(
            "<img src=\"https://example.com/pin.png?v=1&amp;s=2\" class=\"hotspot-icon-img\""
        ));
        assert!(!html.contains("hotspot-icon\">+"));
    }

    #[test]
    fn unsafe_icon_falls_back_to_glyph() {
        let spot = Hotspot::new(1, 2, "a", "b", "javascript:alert(1)");
        let html = render_display(FLOOR, &[spot]);

        assert!(!html.contains("javascript"));
        assert!(html.contains("<span class=\"hotspot-icon\">+</span>"));
    }

    #[test]
    fn incomplete_spots_are_skipped_others_kept() {
        let spots = vec![
            lamp(),
            Hotspot {
                title: None,
                ..Hotspot::new(30, 40, "gone", "gone", "")
            },
            Hotspot {
                y: None,
                ..Hotspot::new(50, 60, "gone", "gone", "")
            },
            Hotspot::new(70, 80, "Desk", "Oak", ""),
        ];
        let html = render_display(FLOOR, &spots);

        assert_eq!(html.matches("class=\"hotspot-item\"").count(), 2);
        assert!(html.contains("top:20%;left:10%;"));
        assert!(html.contains("top:80%;left:70%;"));
        assert!(!html.contains("gone"));
    }

    #[test]
    fn markers_follow_sequence_order() {
        let spots = vec![
            Hotspot::new(1, 1, "first", "a", ""),
            Hotspot::new(2, 2, "second", "b", ""),
        ];
        let html = render_display(FLOOR, &spots);

        let first = html.find("first").expect("first marker");
        let second = html.find("second").expect("second marker");
        assert!(first < second);
    }

    #[test]
    fn text_fields_are_html_escaped() {
        let spot = Hotspot::new(1, 2, "<script>alert(1)</script>", "Tom & \"Jerry\"", "");
        let html = render_display(FLOOR, &[spot]);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; &quot;Jerry&quot;"));
    }

    #[test]
    fn image_url_is_escaped() {
        let html = render_display("https://example.com/a.jpg?x=\"><script>", &[lamp()]);

        assert!(!html.contains("<script>"));
        assert!(html.contains("src=\"https://example.com/a.jpg?x=script\""));
    }
}
