//! HTML output for embedded hotspot sections and the authoring form.

mod display;
mod form;

pub use display::{render_display, DEFAULT_MARKER_GLYPH};
pub use form::render_authoring_form;
