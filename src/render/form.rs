use crate::models::{HotspotSection, SpotRows};
use crate::sanitize::{escape_attr, escape_url};

/// Client-side row editing: clone the first row on "Add", refuse to remove the last one.
const ROW_SCRIPT: &str = r#"<script>
(function () {
    var container = document.getElementById('hotspot-container');
    document.getElementById('add-hotspot').addEventListener('click', function () {
        var row = container.querySelector('.hotspot-row').cloneNode(true);
        row.querySelectorAll('input').forEach(function (input) { input.value = ''; });
        container.appendChild(row);
    });
    container.addEventListener('click', function (event) {
        if (!event.target.classList.contains('remove-hotspot')) {
            return;
        }
        if (container.querySelectorAll('.hotspot-row').length > 1) {
            event.target.closest('.hotspot-row').remove();
        } else {
            alert('At least one hotspot is required.');
        }
    });
})();
</script>
"#;

/// Builds one editable row of the form.
fn build_row(x: &str, y: &str, title: &str, text: &str, icon: &str) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"hotspot-row\">\n");
    html.push_str(&format!(
        "<input type=\"number\" name=\"hotspot_x[]\" value=\"{}\" placeholder=\"X (%)\">\n",
        escape_attr(x)
    ));
    html.push_str(&format!(
        "<input type=\"number\" name=\"hotspot_y[]\" value=\"{}\" placeholder=\"Y (%)\">\n",
        escape_attr(y)
    ));
    html.push_str(&format!(
        "<input type=\"text\" name=\"hotspot_title[]\" value=\"{}\" placeholder=\"Title\">\n",
        escape_attr(title)
    ));
    html.push_str(&format!(
        "<input type=\"text\" name=\"hotspot_text[]\" value=\"{}\" placeholder=\"Description\">\n",
        escape_attr(text)
    ));
    html.push_str(&format!(
        "<input type=\"text\" name=\"hotspot_icon[]\" value=\"{}\" placeholder=\"Icon Image URL\">\n",
        escape_attr(icon)
    ));
    html.push_str("<button type=\"button\" class=\"button remove-hotspot\">Remove</button>\n");
    html.push_str("</div>\n");
    html
}

/// Renders the authoring form fields for a section.
///
/// Every stored hotspot becomes one pre-filled row, in order. A section
/// without hotspots gets a single blank row so the form is never empty.
pub fn render_authoring_form(section: &HotspotSection) -> String {
    let mut html = String::new();

    html.push_str("<p><strong>Background Image URL</strong></p>\n");
    html.push_str(&format!(
        "<input type=\"text\" name=\"hotspot_image\" value=\"{}\" placeholder=\"Paste image URL\">\n",
        escape_attr(&section.image_url)
    ));

    let preview = escape_url(&section.image_url);
    if !preview.is_empty() {
        html.push_str("<p><strong>Preview:</strong></p>\n");
        html.push_str(&format!(
            "<img src=\"{}\" class=\"hotspot-preview\" alt=\"Preview\">\n",
            preview
        ));
    }

    html.push_str("<h3>Hotspots</h3>\n");
    html.push_str("<div id=\"hotspot-container\">\n");

    let rows = SpotRows::from_spots(&section.spots);
    let icons = rows.icon.unwrap_or_default();
    for i in 0..rows.x.len() {
        html.push_str(&build_row(
            &rows.x[i],
            &rows.y[i],
            &rows.title[i],
            &rows.text[i],
            icons.get(i).map(String::as_str).unwrap_or(""),
        ));
    }
    if rows.x.is_empty() {
        html.push_str(&build_row("", "", "", "", ""));
    }

    html.push_str("</div>\n");
    html.push_str("<button type=\"button\" class=\"button\" id=\"add-hotspot\">Add Hotspot</button>\n");
    html.push_str(
        "<p><small>X and Y values should be between 0-100 (percentage based positioning).</small></p>\n",
    );
    html.push_str(ROW_SCRIPT);

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hotspot;

    fn section(spots: Vec<Hotspot>) -> HotspotSection {
        HotspotSection {
            id: 3,
            title: "Floor".to_string(),
            image_url: "https://example.com/floor.jpg".to_string(),
            spots,
        }
    }

    #[test]
    fn empty_section_has_exactly_one_blank_row() {
        let html = render_authoring_form(&HotspotSection::default());

        assert_eq!(html.matches("class=\"hotspot-row\"").count(), 1);
        assert!(html.contains("name=\"hotspot_x[]\" value=\"\""));
        assert!(!html.contains("Preview:"));
    }

    #[test]
    fn each_spot_becomes_a_prefilled_row() {
        let html = render_authoring_form(&section(vec![
            Hotspot::new(10, 20, "Lamp", "A reading lamp", "https://example.com/pin.png"),
            Hotspot::new(30, 40, "Desk", "Oak", ""),
        ]));

        assert_eq!(html.matches("class=\"hotspot-row\"").count(), 2);
        assert!(html.contains("name=\"hotspot_x[]\" value=\"10\""));
        assert!(html.contains("name=\"hotspot_y[]\" value=\"40\""));
        assert!(html.contains("name=\"hotspot_title[]\" value=\"Lamp\""));
        assert!(html.contains("name=\"hotspot_icon[]\" value=\"https://example.com/pin.png\""));
        assert!(html.find("Lamp") < html.find("Desk"));
    }

    #[test]
    fn shows_preview_and_row_controls() {
        let html = render_authoring_form(&section(vec![]));

        assert!(html.contains("<img src=\"https://example.com/floor.jpg\" class=\"hotspot-preview\""));
        assert!(html.contains("id=\"add-hotspot\""));
        assert!(html.contains("At least one hotspot is required."));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut s = section(vec![Hotspot::new(1, 2, "\"><script>x</script>", "t", "")]);
        s.image_url = "\" onerror=\"alert(1)".to_string();
        let html = render_authoring_form(&s);

        assert!(!html.contains("<script>x"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;x&lt;/script&gt;\""));
        assert!(html.contains("value=\"&quot; onerror=&quot;alert(1)\""));
    }
}
