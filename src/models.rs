use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a hotspot section entry. Always positive.
pub type EntryId = u64;

/// A single positioned, labeled point of interest on a section's image.
///
/// Stored data may be incomplete, so every field is optional here. Use
/// [`Hotspot::marker`] to get the fields required for display.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Hotspot {
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub x: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub y: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon: Option<String>,
}

/// Borrowed view of a hotspot that has every field needed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    pub x: i64,
    pub y: i64,
    pub title: &'a str,
    pub text: &'a str,
    /// `None` when no icon is set; the default glyph is shown instead.
    pub icon: Option<&'a str>,
}

impl Hotspot {
    /// Builds a complete hotspot. An empty `icon` means "no icon".
    pub fn new(x: i64, y: i64, title: &str, text: &str, icon: &str) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            title: Some(title.to_string()),
            text: Some(text.to_string()),
            icon: Some(icon.to_string()),
        }
    }

    /// Returns the display view if `x`, `y`, `title` and `text` are all present.
    pub fn marker(&self) -> Option<Marker<'_>> {
        Some(Marker {
            x: self.x?,
            y: self.y?,
            title: self.title.as_deref()?,
            text: self.text.as_deref()?,
            icon: self.icon.as_deref().filter(|icon| !icon.is_empty()),
        })
    }

    pub fn is_renderable(&self) -> bool {
        self.marker().is_some()
    }
}

/// Accepts integers, floats (truncated) and numeric strings; anything else is absent.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    })
}

/// Accepts strings and numbers; anything else is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// The per-entry record pairing a background image with its hotspots.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HotspotSection {
    pub id: EntryId,
    pub title: String,
    pub image_url: String,
    pub spots: Vec<Hotspot>,
}

impl HotspotSection {
    /// A section is renderable when it has an image and at least one renderable hotspot.
    pub fn is_renderable(&self) -> bool {
        !self.image_url.is_empty() && self.spots.iter().any(Hotspot::is_renderable)
    }
}

/// One line of the section list shown to editors.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub id: EntryId,
    pub title: String,
    /// Embed reference to paste into content, e.g. `[hotspot id="7"]`.
    pub embed: String,
    /// Milliseconds since the Unix epoch.
    pub updated_at: Option<i64>,
}

/// Hotspot rows as submitted by the authoring form: one column per field,
/// index `i` across the columns describes row `i`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpotRows {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub title: Vec<String>,
    pub text: Vec<String>,

    #[serde(default)]
    pub icon: Option<Vec<String>>,
}

impl SpotRows {
    /// Rebuilds form rows from stored hotspots, e.g. to pre-fill the authoring form.
    pub fn from_spots(spots: &[Hotspot]) -> Self {
        let mut rows = Self {
            icon: Some(Vec::with_capacity(spots.len())),
            ..Self::default()
        };
        for spot in spots {
            rows.x.push(spot.x.map(|x| x.to_string()).unwrap_or_default());
            rows.y.push(spot.y.map(|y| y.to_string()).unwrap_or_default());
            rows.title.push(spot.title.clone().unwrap_or_default());
            rows.text.push(spot.text.clone().unwrap_or_default());
            if let Some(icons) = rows.icon.as_mut() {
                icons.push(spot.icon.clone().unwrap_or_default());
            }
        }
        rows
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Everything one save of the authoring form delivers.
///
/// `image` is `None` when the form carried no image field; `rows` is `None`
/// unless all four required columns were submitted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionSubmission {
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub rows: Option<SpotRows>,
}

impl SectionSubmission {
    /// Parses an `application/x-www-form-urlencoded` body posted by the
    /// authoring form (`hotspot_image`, `hotspot_x[]`, `hotspot_y[]`, ...).
    pub fn from_form_body(body: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(body.as_bytes()))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut image = None;
        let mut x = None;
        let mut y = None;
        let mut title = None;
        let mut text = None;
        let mut icon = None;

        for (key, value) in pairs {
            let column = match key.as_ref() {
                "hotspot_image" => {
                    image = Some(value.into());
                    continue;
                }
                "hotspot_x[]" => &mut x,
                "hotspot_y[]" => &mut y,
                "hotspot_title[]" => &mut title,
                "hotspot_text[]" => &mut text,
                "hotspot_icon[]" => &mut icon,
                _ => continue,
            };
            column.get_or_insert_with(Vec::new).push(value.into());
        }

        let rows = match (x, y, title, text) {
            (Some(x), Some(y), Some(title), Some(text)) => Some(SpotRows {
                x,
                y,
                title,
                text,
                icon,
            }),
            _ => None,
        };

        Self { image, rows }
    }
}

/// Host-provided context for a save request.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveContext {
    /// Result of the host's single authorization check for this entry.
    pub authorized: bool,

    /// Autosaves never overwrite hotspot data.
    #[serde(default)]
    pub autosave: bool,
}

impl SaveContext {
    pub fn authorized() -> Self {
        Self {
            authorized: true,
            autosave: false,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SaveOutcome {
    Saved,
    Unauthorized,
    Autosave,
}
