//! Serialized view state.

use farmview_core::Result;

use crate::view::SectionView;

/// Serializes a section view as pretty-printed JSON.
pub fn render_section(view: &SectionView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}
