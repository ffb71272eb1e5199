//! Frame orchestration.
//!
//! A frame is drawn back-to-front in a fixed layer order; every layer reads
//! the same immutable [`RenderFrame`] snapshot, so nothing a layer does can
//! change what a later layer sees. The order is the contract:
//!
//! 1. cells, scrollable pane (clipped)
//! 2. cells, frozen pane (clipped)
//! 3. freeze divider and scroll shadow
//! 4. active-cell outline
//! 5. column-resize indicator
//! 6. drag placeholder and insertion line
//! 7. headers (gutter, corner, column strip)
//! 8. append affordances

use crate::layout::CoordinateManager;
use crate::render::surface::DrawSurface;
use crate::render::{cells, headers, indicators};
use crate::selection::CombinedSelection;
use crate::types::{
    CellDescriptor, ColumnDescriptor, ColumnResizeState, DragState, GridTheme, InteractionConfig,
    RowControlType, VisibleRegion,
};

/// Synchronous cell lookup supplied by the host, `(column, row)` order.
pub type CellSource<'a> = &'a dyn Fn(usize, usize) -> CellDescriptor;

/// Immutable snapshot of everything one frame needs.
pub struct RenderFrame<'a> {
    pub coord: &'a CoordinateManager,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub selection: &'a CombinedSelection,
    pub columns: &'a [ColumnDescriptor],
    pub row_controls: &'a [RowControlType],
    pub theme: &'a GridTheme,
    pub config: &'a InteractionConfig,
    pub drag: &'a DragState,
    /// Insertion index for the drag indicator, resolved by the viewer.
    pub drag_insert_index: Option<usize>,
    pub resize: &'a ColumnResizeState,
    pub has_append_row: bool,
    pub has_append_column: bool,
    pub cells: CellSource<'a>,
}

impl RenderFrame<'_> {
    /// Screen x for a content x belonging to column `col` (frozen columns
    /// ignore horizontal scroll).
    pub(crate) fn screen_x(&self, content_x: f32, col: usize) -> f32 {
        if col < self.coord.freeze_column_count() {
            content_x
        } else {
            content_x - self.scroll_left
        }
    }

    pub(crate) fn screen_y(&self, content_y: f32) -> f32 {
        content_y - self.scroll_top
    }
}

/// Draw one complete frame.
pub fn render(frame: &RenderFrame, surface: &mut dyn DrawSurface) {
    let region = frame
        .coord
        .visible_region(frame.scroll_left, frame.scroll_top);

    cells::draw_scrollable_pane(frame, &region, surface);
    cells::draw_frozen_pane(frame, &region, surface);
    indicators::draw_freeze_divider(frame, surface);
    indicators::draw_active_cell(frame, surface);
    indicators::draw_resize_indicator(frame, surface);
    indicators::draw_drag_indicator(frame, surface);
    headers::draw_headers(frame, &region, surface);
    indicators::draw_append_affordances(frame, surface);
}

/// The visible window a frame would materialize (exposed for the viewer's
/// region-change notifications).
pub fn frame_region(frame: &RenderFrame) -> VisibleRegion {
    frame
        .coord
        .visible_region(frame.scroll_left, frame.scroll_top)
}
