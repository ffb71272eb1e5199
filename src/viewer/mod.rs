//! The engine facade.
//!
//! `GridView` composes the geometry oracle, the selection value, the
//! interaction controllers, the scroll state and the render pipeline, and
//! routes classified pointer events between them. Everything here is plain
//! Rust so the whole interaction surface is testable natively; the browser
//! wiring lives in `web.rs` behind the wasm target gate.

mod events;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::callbacks::GridCallbacks;
use crate::error::{GridError, Result};
use crate::interaction::{
    AutoScrollController, ColumnResizeController, DragReorderController, SelectionController,
    SmartClickDisambiguator,
};
use crate::layout::{CoordinateManager, CoordinateOptions};
use crate::regions::{self, RegionData, RegionQuery};
use crate::render::{self, DrawSurface, RenderFrame};
use crate::scroll::ScrollVirtualizer;
use crate::selection::{CombinedSelection, SelectionKind};
use crate::types::{
    CellCoord, CellDescriptor, ColumnDescriptor, DragType, GridTheme, InteractionConfig,
    MouseState, Rect, RegionType, RowControlType, VisibleRegion,
};

type CellLookup = Box<dyn Fn(usize, usize) -> CellDescriptor>;

fn unknown_cell(_col: usize, _row: usize) -> CellDescriptor {
    CellDescriptor::Unknown
}

/// Construction parameters for [`GridView`].
pub struct GridOptions {
    pub row_count: usize,
    pub columns: Vec<ColumnDescriptor>,
    pub row_controls: Vec<RowControlType>,
    pub container_width: f32,
    pub container_height: f32,
    pub row_height: f32,
    /// Height of the column-header strip.
    pub header_height: f32,
    /// Width of the row-header gutter.
    pub gutter_width: f32,
    pub freeze_column_count: usize,
    pub has_append_row: bool,
    pub has_append_column: bool,
    pub theme: GridTheme,
    pub config: InteractionConfig,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_count: 0,
            columns: Vec::new(),
            row_controls: vec![RowControlType::Checkbox],
            container_width: 800.0,
            container_height: 600.0,
            row_height: crate::layout::DEFAULT_ROW_HEIGHT,
            header_height: 40.0,
            gutter_width: 60.0,
            freeze_column_count: 0,
            has_append_row: false,
            has_append_column: false,
            theme: GridTheme::default(),
            config: InteractionConfig::default(),
        }
    }
}

/// The composed grid engine.
pub struct GridView {
    pub(crate) coord: CoordinateManager,
    pub(crate) scroll: ScrollVirtualizer,
    pub(crate) selection: CombinedSelection,
    pub(crate) mouse: MouseState,
    pub(crate) selection_ctl: SelectionController,
    pub(crate) drag_ctl: DragReorderController,
    pub(crate) resize_ctl: ColumnResizeController,
    pub(crate) auto_scroll: AutoScrollController,
    pub(crate) clicks: SmartClickDisambiguator,
    pub(crate) columns: Vec<ColumnDescriptor>,
    pub(crate) row_controls: Vec<RowControlType>,
    pub(crate) theme: GridTheme,
    pub(crate) config: InteractionConfig,
    pub callbacks: GridCallbacks,
    pub(crate) has_append_row: bool,
    pub(crate) has_append_column: bool,
    pub(crate) last_region: VisibleRegion,
    pub(crate) needs_render: bool,
    cell_source: Option<CellLookup>,
}

impl GridView {
    pub fn new(options: GridOptions) -> Self {
        let mut coord_options = CoordinateOptions {
            row_count: options.row_count,
            column_count: options.columns.len(),
            container_width: options.container_width,
            container_height: options.container_height,
            row_height: options.row_height,
            row_initial_size: options.header_height,
            column_initial_size: options.gutter_width,
            freeze_column_count: options.freeze_column_count,
            ..CoordinateOptions::default()
        };
        for (i, column) in options.columns.iter().enumerate() {
            coord_options.column_width_map.insert(i, column.width);
        }
        let coord = CoordinateManager::new(coord_options);
        let last_region = coord.visible_region(0.0, 0.0);
        Self {
            coord,
            scroll: ScrollVirtualizer::new(),
            selection: CombinedSelection::none(),
            mouse: MouseState::default(),
            selection_ctl: SelectionController::new(),
            drag_ctl: DragReorderController::new(),
            resize_ctl: ColumnResizeController::new(),
            auto_scroll: AutoScrollController::new(),
            clicks: SmartClickDisambiguator::new(),
            columns: options.columns,
            row_controls: options.row_controls,
            theme: options.theme,
            config: options.config,
            callbacks: GridCallbacks::new(),
            has_append_row: options.has_append_row,
            has_append_column: options.has_append_column,
            last_region,
            needs_render: true,
            cell_source: None,
        }
    }

    /// Install the host's synchronous cell lookup, `(column, row)` order.
    pub fn set_cell_source(&mut self, source: CellLookup) {
        self.cell_source = Some(source);
        self.needs_render = true;
    }

    pub fn selection(&self) -> &CombinedSelection {
        &self.selection
    }

    pub fn mouse(&self) -> MouseState {
        self.mouse
    }

    pub fn coord(&self) -> &CoordinateManager {
        &self.coord
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll.scroll_left()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll.scroll_top()
    }

    pub fn visible_region(&self) -> VisibleRegion {
        self.coord
            .visible_region(self.scroll.scroll_left(), self.scroll.scroll_top())
    }

    /// Replace the selection from the host side. Range bounds are validated
    /// against the current grid shape.
    pub fn set_selection(&mut self, selection: CombinedSelection) -> Result<()> {
        let limit = match selection.kind {
            SelectionKind::Rows => Some(self.coord.row_count()),
            SelectionKind::Columns => Some(self.coord.column_count()),
            SelectionKind::Cells | SelectionKind::None => None,
        };
        if let Some(limit) = limit {
            if selection.ranges.iter().any(|r| r[1] >= limit) {
                return Err(GridError::Selection(format!(
                    "selection range exceeds grid bounds ({limit} items)"
                )));
            }
        }
        if selection.is_cells() {
            let bad = selection.cell_bounds().is_none_or(|[_, _, c, r]| {
                c >= self.coord.column_count() || r >= self.coord.row_count()
            });
            if bad {
                return Err(GridError::Selection(
                    "cell selection exceeds grid bounds".to_string(),
                ));
            }
        }
        self.selection = selection;
        self.selection_ctl.reset();
        self.callbacks.emit_selection_changed(&self.selection);
        self.needs_render = true;
        Ok(())
    }

    pub fn set_row_count(&mut self, count: usize) {
        self.coord.set_row_count(count);
        self.needs_render = true;
        self.sync_region();
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor>) {
        self.coord.set_column_count(columns.len());
        for (i, column) in columns.iter().enumerate() {
            self.coord.set_column_width(i, column.width);
        }
        self.columns = columns;
        self.needs_render = true;
        self.sync_region();
    }

    pub fn set_column_width(&mut self, column: usize, width: f32) {
        let width = width.max(self.config.min_column_width);
        self.coord.set_column_width(column, width);
        if let Some(descriptor) = self.columns.get_mut(column) {
            descriptor.width = width;
        }
        self.needs_render = true;
        self.sync_region();
    }

    pub fn resize_container(&mut self, width: f32, height: f32) {
        self.coord.set_container_size(width, height);
        // Re-clamp in case the content just got shorter than the viewport.
        self.scroll
            .set_scroll(&self.coord, self.scroll.scroll_left(), self.scroll.scroll_top());
        self.needs_render = true;
        self.sync_region();
    }

    /// Minimal scroll to bring a cell fully into view.
    pub fn scroll_to_item(&mut self, item: CellCoord) {
        if self.scroll.scroll_to_item(&self.coord, item) {
            self.needs_render = true;
            self.sync_region();
        }
    }

    pub fn set_scroll(&mut self, left: f32, top: f32, now_ms: f64) {
        if self.scroll.set_scroll(&self.coord, left, top) {
            self.scroll.note_scroll(now_ms);
            self.needs_render = true;
            self.sync_region();
        }
    }

    /// Screen-space bounds of a cell (for positioning host editors).
    pub fn cell_bounds(&self, cell: CellCoord) -> Rect {
        let [col, row] = cell;
        let content = self.coord.cell_rect(col, row);
        let x = if col < self.coord.freeze_column_count() {
            content.x
        } else {
            content.x - self.scroll.scroll_left()
        };
        Rect::new(
            x,
            content.y - self.scroll.scroll_top(),
            content.width,
            content.height,
        )
    }

    /// CSS cursor for the region currently under the pointer.
    pub fn cursor(&self) -> &'static str {
        match self.mouse.region {
            RegionType::ColumnResizeHandler => "col-resize",
            RegionType::RowHeaderDragHandler => "grab",
            RegionType::RowHeaderCheckbox
            | RegionType::RowHeaderExpandHandler
            | RegionType::AllCheckbox
            | RegionType::ColumnHeaderMenu
            | RegionType::AppendRow
            | RegionType::AppendColumn => "pointer",
            RegionType::FillHandler => "crosshair",
            RegionType::Cell => "cell",
            _ => "default",
        }
    }

    /// Request a redraw on the next frame.
    pub fn force_update(&mut self) {
        self.needs_render = true;
    }

    /// Whether a redraw is pending; cleared by [`Self::render`].
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Emit the copy/paste/delete callbacks with the current selection.
    pub fn copy(&self) {
        self.callbacks.emit_copy(&self.selection);
    }

    pub fn paste(&self) {
        self.callbacks.emit_paste(&self.selection);
    }

    pub fn delete(&self) {
        self.callbacks.emit_delete(&self.selection);
    }

    /// Draw one frame and clear the pending-render flag.
    pub fn render(&mut self, surface: &mut dyn DrawSurface) {
        let fallback: &dyn Fn(usize, usize) -> CellDescriptor = &unknown_cell;
        let cells = self.cell_source.as_deref().unwrap_or(fallback);
        let drag = self.drag_ctl.state();
        let resize = self.resize_ctl.state();
        let frame = RenderFrame {
            coord: &self.coord,
            scroll_left: self.scroll.scroll_left(),
            scroll_top: self.scroll.scroll_top(),
            selection: &self.selection,
            columns: &self.columns,
            row_controls: &self.row_controls,
            theme: &self.theme,
            config: &self.config,
            drag: &drag,
            drag_insert_index: self.drag_insert_index(),
            resize: &resize,
            has_append_row: self.has_append_row,
            has_append_column: self.has_append_column,
            cells,
        };
        render::render(&frame, surface);
        self.needs_render = false;
    }

    /// URLs referenced by image cells in the materialized window, paired
    /// with the cell that references them. Frozen columns are always
    /// materialized.
    pub fn visible_images(&self) -> Vec<(String, CellCoord)> {
        let Some(source) = self.cell_source.as_deref() else {
            return Vec::new();
        };
        if self.coord.row_count() == 0 || self.coord.column_count() == 0 {
            return Vec::new();
        }
        let region = self.visible_region();
        let freeze = self.coord.freeze_column_count();
        let mut out = Vec::new();
        for row in region.start_row_index..=region.stop_row_index {
            let frozen = 0..freeze.min(self.coord.column_count());
            let scrolled = region.start_column_index.max(freeze)..=region.stop_column_index;
            for col in frozen.chain(scrolled) {
                if let CellDescriptor::Image { urls } = source(col, row) {
                    for url in urls {
                        out.push((url, [col, row]));
                    }
                }
            }
        }
        out
    }

    /// Drop target for the in-flight reorder drag, if any.
    pub(crate) fn drag_insert_index(&self) -> Option<usize> {
        let state = self.drag_ctl.state();
        if !state.is_dragging {
            return None;
        }
        let content_offset = match state.drag_type {
            DragType::Column => {
                let x = self.mouse.x;
                if x < self.coord.freeze_region_width() {
                    x
                } else {
                    x + self.scroll.scroll_left()
                }
            }
            _ => self.mouse.y + self.scroll.scroll_top(),
        };
        self.drag_ctl.drop_index(&self.coord, content_offset)
    }

    /// Classify a pointer position against the current state.
    pub(crate) fn classify(&self, x: f32, y: f32) -> (MouseState, RegionData) {
        let position = regions::pointer_position(
            &self.coord,
            self.scroll.scroll_left(),
            self.scroll.scroll_top(),
            x,
            y,
            self.has_append_row,
            self.has_append_column,
        );
        let drag = self.drag_ctl.state();
        let resize = self.resize_ctl.state();
        let query = RegionQuery {
            x,
            y,
            row_index: position.row_index,
            column_index: position.column_index,
            is_out_of_bounds: position.is_out_of_bounds,
            coord: &self.coord,
            scroll_left: self.scroll.scroll_left(),
            scroll_top: self.scroll.scroll_top(),
            selection: &self.selection,
            is_selecting: self.selection_ctl.is_selecting(),
            drag: &drag,
            resize: &resize,
            columns: &self.columns,
            row_controls: &self.row_controls,
            theme: &self.theme,
            config: &self.config,
            has_append_row: self.has_append_row,
            has_append_column: self.has_append_column,
        };
        let data = regions::classify(&query);
        let mouse = MouseState {
            x,
            y,
            row_index: position.row_index,
            column_index: position.column_index,
            region: data.kind,
            is_out_of_bounds: position.is_out_of_bounds,
        };
        (mouse, data)
    }

    /// Notify the host when the materialized window moved.
    pub(crate) fn sync_region(&mut self) {
        let region = self.visible_region();
        if region != self.last_region {
            self.last_region = region;
            self.callbacks.emit_visible_region_changed(&region);
        }
    }
}
