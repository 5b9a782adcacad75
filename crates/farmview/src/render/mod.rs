//! Output renderers for section views.
//!
//! - [`text`] - Grid tables for terminals
//! - [`html`] - Page fragments with the dashboard's element ids
//! - [`json`] - Serialized view state

pub mod html;
pub mod json;
pub mod text;

use std::fmt;
use std::str::FromStr;

use farmview_core::FarmError;

/// Message shown in place of an empty table.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Output format of a rendered section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Grid table.
    #[default]
    Text,
    /// HTML fragment.
    Html,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(FarmError::InvalidParameter(format!(
                "unknown output format: {other}"
            ))),
        }
    }
}

/// Renders a section view in `format`.
pub fn render_section(
    view: &crate::view::SectionView,
    format: OutputFormat,
) -> farmview_core::Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_section(view)),
        OutputFormat::Html => Ok(html::render_section(view)),
        OutputFormat::Json => json::render_section(view),
    }
}
