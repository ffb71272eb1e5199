//! Opaque cell descriptors and column/row configuration handed in by the host.
//!
//! The engine never interprets cell values beyond picking a renderer; the
//! host's `get_cell_content` lookup produces these descriptors synchronously
//! for every visible cell on every redraw.

use serde::{Deserialize, Serialize};

/// A chosen option in a select-type cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectChoice {
    pub label: String,
    /// CSS color for the option chip background; `None` uses the theme default.
    pub color: Option<String>,
}

/// What a single cell contains, as declared by the host.
///
/// Unknown descriptor types degrade to a blank rectangle at render time so a
/// single malformed cell cannot abort a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellDescriptor {
    Text {
        value: String,
    },
    Number {
        value: f64,
        /// Pre-formatted display string (formatting is host business logic).
        display: String,
    },
    Boolean {
        checked: bool,
    },
    Select {
        choices: Vec<SelectChoice>,
    },
    Image {
        urls: Vec<String>,
    },
    /// Placeholder while the host is still fetching the value.
    Loading,
    /// Catch-all for descriptor types this engine version does not know.
    #[serde(other)]
    Unknown,
}

/// Host-declared column configuration (read-only to the engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub id: String,
    pub name: String,
    pub width: f32,
    /// Sprite id drawn left of the column name.
    pub icon: Option<String>,
    /// Whether the header shows a dropdown menu icon.
    pub has_menu: bool,
}

impl ColumnDescriptor {
    /// A plain column with no icon or menu.
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            icon: None,
            has_menu: false,
        }
    }
}

/// Affordances shown in the row-header gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowControlType {
    Checkbox,
    Drag,
    Expand,
}
