//! Interaction state records and tuning configuration.
//!
//! These are the small value types threaded between the region classifier,
//! the interaction controllers, and the render pipeline.

use serde::{Deserialize, Serialize};

/// Sentinel row/column index: pointer is over the header strip/gutter.
pub const HEADER_INDEX: i64 = -1;

/// Sentinel row/column index: pointer is over the append pseudo row/column.
pub const APPEND_INDEX: i64 = -2;

/// Symbolic classification of what sits under the pointer.
///
/// Produced once per pointer event by the region classifier; the variant
/// order here is unrelated to classification priority (see `regions.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionType {
    #[default]
    Blank,
    Cell,
    RowHeader,
    RowHeaderCheckbox,
    RowHeaderDragHandler,
    RowHeaderExpandHandler,
    AllCheckbox,
    ColumnHeader,
    ColumnHeaderMenu,
    ColumnResizeHandler,
    AppendRow,
    AppendColumn,
    FillHandler,
}

/// Pointer state derived from the latest mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseState {
    /// Pointer x in container-local logical pixels.
    pub x: f32,
    /// Pointer y in container-local logical pixels.
    pub y: f32,
    /// Derived row index, or `HEADER_INDEX` / `APPEND_INDEX`.
    pub row_index: i64,
    /// Derived column index, or `HEADER_INDEX` / `APPEND_INDEX`.
    pub column_index: i64,
    pub region: RegionType,
    pub is_out_of_bounds: bool,
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            row_index: HEADER_INDEX,
            column_index: HEADER_INDEX,
            region: RegionType::Blank,
            is_out_of_bounds: true,
        }
    }
}

/// Which axis a reorder drag moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragType {
    #[default]
    None,
    Row,
    Column,
}

/// State of an in-flight row/column reorder drag.
///
/// `is_dragging` only flips true once pointer travel exceeds the arming
/// threshold, so simple clicks never register as drags.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragState {
    pub drag_type: DragType,
    pub source_index: usize,
    /// Pixel delta between the pointer and the dragged item's origin.
    pub delta: f32,
    pub is_dragging: bool,
}

impl DragState {
    /// Whether a drag is armed or active.
    pub fn is_active(&self) -> bool {
        self.drag_type != DragType::None
    }
}

/// State of an in-flight column resize.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResizeState {
    /// Target column, `None` while inactive.
    pub column_index: Option<usize>,
    /// Live width reported to the host on every move.
    pub width: f32,
    /// Pointer x at the moment the drag was armed.
    pub anchor_x: f32,
}

impl ColumnResizeState {
    /// Whether a resize drag is in progress.
    pub fn is_active(&self) -> bool {
        self.column_index.is_some()
    }
}

/// Interaction tuning values.
///
/// These are defaults, not contracts: hosts may override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionConfig {
    /// Pointer travel (px) before a drag arms / a click is suppressed.
    pub drag_threshold: f32,
    /// Window (ms) in which a second click becomes a double click.
    pub double_click_window_ms: f64,
    /// Radius (px) within which two clicks count as the same spot.
    pub double_click_radius: f32,
    /// Edge band (px) that activates autoscroll during a selection drag.
    pub auto_scroll_edge: f32,
    /// Dwell time (ms) over which autoscroll ramps from 0 to full speed.
    pub auto_scroll_ramp_ms: f64,
    /// Autoscroll speed cap in px/ms.
    pub auto_scroll_max_speed: f32,
    /// Minimum column width (px) enforced during resize.
    pub min_column_width: f32,
    /// Clickable margin (px) around a column boundary for the resize handle.
    pub resize_handle_margin: f32,
    /// Half-extent (px) of the fill-handle hit box.
    pub fill_handle_size: f32,
    /// Delay (ms) after scroll stops before a settle render.
    pub scroll_settle_delay_ms: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            double_click_window_ms: 300.0,
            double_click_radius: 5.0,
            auto_scroll_edge: 30.0,
            auto_scroll_ramp_ms: 1200.0,
            auto_scroll_max_speed: 1.5,
            min_column_width: 100.0,
            resize_handle_margin: 4.0,
            fill_handle_size: 4.0,
            scroll_settle_delay_ms: 100.0,
        }
    }
}
