//! Theme configuration for the grid (read-only to the engine).
//!
//! Colors are CSS strings so the Canvas 2D surface can use them directly.

use serde::{Deserialize, Serialize};

/// Visual configuration consumed by the render pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridTheme {
    pub cell_bg: String,
    pub cell_bg_selected: String,
    pub cell_bg_loading: String,
    pub cell_line_color: String,
    pub cell_text_color: String,
    pub active_cell_border_color: String,

    pub header_bg: String,
    pub header_bg_selected: String,
    pub header_text_color: String,
    pub header_line_color: String,

    pub append_bg: String,
    pub freeze_divider_color: String,
    pub freeze_shadow_color: String,
    pub drag_placeholder_color: String,
    pub drag_insert_line_color: String,
    pub resize_indicator_color: String,
    pub option_chip_bg: String,

    pub font_family: String,
    pub font_size: f32,
    pub icon_size: f32,
    pub checkbox_size: f32,
    pub cell_padding: f32,
}

impl Default for GridTheme {
    fn default() -> Self {
        Self {
            cell_bg: "#FFFFFF".to_string(),
            cell_bg_selected: "#EBF2FD".to_string(),
            cell_bg_loading: "#F5F5F5".to_string(),
            cell_line_color: "#E0E0E0".to_string(),
            cell_text_color: "#262626".to_string(),
            active_cell_border_color: "#2684FF".to_string(),

            header_bg: "#F3F3F3".to_string(),
            header_bg_selected: "#CFD8E8".to_string(),
            header_text_color: "#595959".to_string(),
            header_line_color: "#CCCCCC".to_string(),

            append_bg: "#FAFAFA".to_string(),
            freeze_divider_color: "#BABABA".to_string(),
            freeze_shadow_color: "rgba(0, 0, 0, 0.12)".to_string(),
            drag_placeholder_color: "rgba(38, 132, 255, 0.25)".to_string(),
            drag_insert_line_color: "#2684FF".to_string(),
            resize_indicator_color: "#2684FF".to_string(),
            option_chip_bg: "#E8EAED".to_string(),

            font_family: "-apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif".to_string(),
            font_size: 13.0,
            icon_size: 16.0,
            checkbox_size: 14.0,
            cell_padding: 8.0,
        }
    }
}

impl GridTheme {
    /// CSS font string for cell text.
    pub fn cell_font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }

    /// CSS font string for header text (same size, medium weight).
    pub fn header_font(&self) -> String {
        format!("500 {}px {}", self.font_size, self.font_family)
    }
}
