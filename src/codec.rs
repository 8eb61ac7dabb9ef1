//! Conversion between the stored hotspot blob and [`Hotspot`] lists.
//!
//! The blob is a JSON array of `{ "x", "y", "title", "text", "icon" }`
//! objects. Reads are tolerant: anything that is not a JSON array decodes to
//! an empty list so a corrupt record degrades to "no hotspots".

use crate::models::{Hotspot, SpotRows};
use crate::sanitize::{intval, sanitize_text_field, sanitize_url};

/// Decodes a stored blob. Never fails.
pub fn decode(raw: Option<&str>) -> Vec<Hotspot> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };

    let items = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            log::debug!("hotspot blob is not a list, treating as empty");
            return Vec::new();
        }
        Err(e) => {
            log::debug!("hotspot blob is not valid JSON ({}), treating as empty", e);
            return Vec::new();
        }
    };

    // Elements that are not objects keep their slot but are not renderable.
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect()
}

fn cell(column: &[String], i: usize) -> &str {
    column.get(i).map(String::as_str).unwrap_or("")
}

/// Normalizes submitted form rows into hotspots.
///
/// Rows whose `x` cell is empty are dropped. Coordinates are coerced to
/// integers, title and text are reduced to plain text and the icon is
/// URL-sanitized. Missing cells in the other columns count as empty.
pub fn encode_rows(rows: &SpotRows) -> Vec<Hotspot> {
    let icons = rows.icon.as_deref().unwrap_or(&[]);

    rows.x
        .iter()
        .enumerate()
        .filter(|(_, x)| !x.is_empty())
        .map(|(i, x)| Hotspot {
            x: Some(intval(x)),
            y: Some(intval(cell(&rows.y, i))),
            title: Some(sanitize_text_field(cell(&rows.title, i))),
            text: Some(sanitize_text_field(cell(&rows.text, i))),
            icon: Some(sanitize_url(cell(icons, i))),
        })
        .collect()
}

/// Serializes hotspots into the stored blob format.
pub fn to_blob(spots: &[Hotspot]) -> String {
    // A list of plain structs always serializes.
    serde_json::to_string(spots).unwrap_or_else(|_| "[]".to_string())
}

/// Normalizes submitted rows and serializes them into the stored blob format.
pub fn encode(rows: &SpotRows) -> String {
    to_blob(&encode_rows(rows))
}
