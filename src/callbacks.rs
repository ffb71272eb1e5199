//! Outbound notifications to the host.
//!
//! Every callback is optional; an absent callback is a no-op. The engine
//! emits fully-serialized values (normalized selections, concrete indices)
//! so the host never has to reach back in to interpret engine state.

use crate::selection::CombinedSelection;
use crate::types::{CellCoord, VisibleRegion};

type SelectionFn = Box<dyn Fn(&CombinedSelection)>;
type CellFn = Box<dyn Fn(CellCoord)>;
type RegionFn = Box<dyn Fn(&VisibleRegion)>;
type IndexFn = Box<dyn Fn(usize)>;
type ResizeFn = Box<dyn Fn(usize, f32)>;
type ReorderFn = Box<dyn Fn(usize, usize)>;
type UnitFn = Box<dyn Fn()>;
type PointFn = Box<dyn Fn(f32, f32)>;

/// The host's subscription set.
#[derive(Default)]
pub struct GridCallbacks {
    pub on_selection_changed: Option<SelectionFn>,
    pub on_cell_activated: Option<CellFn>,
    pub on_visible_region_changed: Option<RegionFn>,
    pub on_column_resized: Option<ResizeFn>,
    pub on_column_reordered: Option<ReorderFn>,
    pub on_row_reordered: Option<ReorderFn>,
    pub on_column_header_clicked: Option<IndexFn>,
    pub on_column_menu_clicked: Option<IndexFn>,
    pub on_row_expanded: Option<IndexFn>,
    pub on_row_appended: Option<UnitFn>,
    pub on_column_appended: Option<UnitFn>,
    pub on_context_menu: Option<PointFn>,
    pub on_copy: Option<SelectionFn>,
    pub on_paste: Option<SelectionFn>,
    pub on_delete: Option<SelectionFn>,
}

impl GridCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_selection_changed(&self, selection: &CombinedSelection) {
        if let Some(callback) = &self.on_selection_changed {
            callback(&selection.serialize());
        }
    }

    pub fn emit_cell_activated(&self, cell: CellCoord) {
        if let Some(callback) = &self.on_cell_activated {
            callback(cell);
        }
    }

    pub fn emit_visible_region_changed(&self, region: &VisibleRegion) {
        if let Some(callback) = &self.on_visible_region_changed {
            callback(region);
        }
    }

    pub fn emit_column_resized(&self, column: usize, width: f32) {
        if let Some(callback) = &self.on_column_resized {
            callback(column, width);
        }
    }

    pub fn emit_column_reordered(&self, source: usize, insert: usize) {
        if let Some(callback) = &self.on_column_reordered {
            callback(source, insert);
        }
    }

    pub fn emit_row_reordered(&self, source: usize, insert: usize) {
        if let Some(callback) = &self.on_row_reordered {
            callback(source, insert);
        }
    }

    pub fn emit_column_header_clicked(&self, column: usize) {
        if let Some(callback) = &self.on_column_header_clicked {
            callback(column);
        }
    }

    pub fn emit_column_menu_clicked(&self, column: usize) {
        if let Some(callback) = &self.on_column_menu_clicked {
            callback(column);
        }
    }

    pub fn emit_row_expanded(&self, row: usize) {
        if let Some(callback) = &self.on_row_expanded {
            callback(row);
        }
    }

    pub fn emit_row_appended(&self) {
        if let Some(callback) = &self.on_row_appended {
            callback();
        }
    }

    pub fn emit_column_appended(&self) {
        if let Some(callback) = &self.on_column_appended {
            callback();
        }
    }

    pub fn emit_context_menu(&self, x: f32, y: f32) {
        if let Some(callback) = &self.on_context_menu {
            callback(x, y);
        }
    }

    pub fn emit_copy(&self, selection: &CombinedSelection) {
        if let Some(callback) = &self.on_copy {
            callback(&selection.serialize());
        }
    }

    pub fn emit_paste(&self, selection: &CombinedSelection) {
        if let Some(callback) = &self.on_paste {
            callback(&selection.serialize());
        }
    }

    pub fn emit_delete(&self, selection: &CombinedSelection) {
        if let Some(callback) = &self.on_delete {
            callback(&selection.serialize());
        }
    }
}
