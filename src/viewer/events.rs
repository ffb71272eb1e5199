//! Pointer, wheel and frame-tick routing.
//!
//! Every entry point takes the event payload plus an explicit `now_ms`
//! timestamp, so the whole gesture surface runs under a manual clock in
//! tests. Routing order on pointer-down matters: the click disambiguator
//! sees the press first (it may release a buffered click), then the region
//! decides which controller owns the gesture.

use crate::interaction::{ClickModifiers, ClickOutcome};
use crate::scroll::ScrollMode;
use crate::selection::CombinedSelection;
use crate::types::{DragType, RegionType};

use super::GridView;

impl GridView {
    pub fn pointer_down(&mut self, x: f32, y: f32, modifiers: ClickModifiers, now_ms: f64) {
        let (mouse, data) = self.classify(x, y);
        self.mouse = mouse;
        if let Some(outcome) = self.clicks.on_pointer_down(&self.config, x, y, now_ms) {
            self.handle_click(outcome);
        }

        match data.kind {
            RegionType::ColumnResizeHandler => {
                if let Some(col) = data.target {
                    self.resize_ctl
                        .begin(col, self.coord.column_width_at(col), x);
                }
            }
            RegionType::ColumnHeader => {
                if let Some(col) = data.target {
                    let origin = if col < self.coord.freeze_column_count() {
                        self.coord.column_offset(col)
                    } else {
                        self.coord.column_offset(col) - self.scroll.scroll_left()
                    };
                    self.drag_ctl.arm(DragType::Column, col, x, y, origin);
                    self.route_selection(RegionType::ColumnHeader, 0, col, modifiers);
                }
            }
            RegionType::RowHeaderDragHandler => {
                if let Some(row) = data.target {
                    let origin = self.coord.row_offset(row) - self.scroll.scroll_top();
                    self.drag_ctl.arm(DragType::Row, row, x, y, origin);
                }
            }
            RegionType::Cell => {
                let (row, col) = self.pointer_cell(x, y);
                self.route_selection(RegionType::Cell, row, col, modifiers);
            }
            RegionType::RowHeader | RegionType::RowHeaderCheckbox => {
                if let Some(row) = data.target {
                    self.route_selection(data.kind, row, 0, modifiers);
                }
            }
            RegionType::AllCheckbox => self.toggle_all_rows(),
            RegionType::ColumnHeaderMenu => {
                if let Some(col) = data.target {
                    self.callbacks.emit_column_menu_clicked(col);
                }
            }
            RegionType::RowHeaderExpandHandler => {
                if let Some(row) = data.target {
                    self.callbacks.emit_row_expanded(row);
                }
            }
            RegionType::AppendRow => self.callbacks.emit_row_appended(),
            RegionType::AppendColumn => self.callbacks.emit_column_appended(),
            RegionType::FillHandler | RegionType::Blank => {}
        }
        self.needs_render = true;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) {
        self.clicks.on_pointer_move(&self.config, x, y);

        if self.resize_ctl.is_active() {
            if self.resize_ctl.on_pointer_move(x, &self.config).is_some() {
                self.needs_render = true;
            }
        } else if self.drag_ctl.state().is_active() {
            if self.drag_ctl.on_pointer_move(x, y, self.config.drag_threshold) {
                self.needs_render = true;
            }
        } else if self.selection_ctl.is_selecting() {
            let (row, col) = self.pointer_cell(x, y);
            if let Some(next) = self.selection_ctl.on_pointer_move(row, col, &self.selection) {
                self.selection = next;
                self.callbacks.emit_selection_changed(&self.selection);
                self.needs_render = true;
            }
            self.auto_scroll
                .set_pointer(&self.coord, &self.config, x, y, now_ms);
        }

        let (mouse, _) = self.classify(x, y);
        if mouse.region != self.mouse.region {
            self.needs_render = true;
        }
        self.mouse = mouse;
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, now_ms: f64) {
        if let Some((col, width)) = self.resize_ctl.finish() {
            self.set_column_width(col, width);
            self.callbacks
                .emit_column_resized(col, self.coord.column_width_at(col));
        }

        let drag_type = self.drag_ctl.state().drag_type;
        let content_offset = match drag_type {
            DragType::Column => {
                if x < self.coord.freeze_region_width() {
                    x
                } else {
                    x + self.scroll.scroll_left()
                }
            }
            _ => y + self.scroll.scroll_top(),
        };
        if let Some((source, insert)) = self.drag_ctl.finish(&self.coord, content_offset) {
            match drag_type {
                DragType::Column => self.callbacks.emit_column_reordered(source, insert),
                DragType::Row => self.callbacks.emit_row_reordered(source, insert),
                DragType::None => {}
            }
        }

        if let Some(cell) = self.selection_ctl.on_pointer_up(&self.selection) {
            self.callbacks.emit_cell_activated(cell);
        }
        if let Some(outcome) = self.clicks.on_pointer_up(x, y, now_ms) {
            self.handle_click(outcome);
        }
        self.auto_scroll.reset();
        self.needs_render = true;
    }

    pub fn wheel(&mut self, delta_x: f32, delta_y: f32, mode: ScrollMode, now_ms: f64) {
        let dx = self.scroll.wheel_delta(&self.coord, delta_x, mode);
        let dy = self.scroll.wheel_delta(&self.coord, delta_y, mode);
        if self.scroll.scroll_by(&self.coord, dx, dy) {
            self.scroll.note_scroll(now_ms);
            self.needs_render = true;
            self.sync_region();
        }
    }

    pub fn context_menu(&mut self, x: f32, y: f32) {
        let (mouse, _) = self.classify(x, y);
        self.mouse = mouse;
        self.callbacks.emit_context_menu(x, y);
    }

    /// Per-frame tick: autoscroll, click disambiguation, scroll settling.
    pub fn on_frame(&mut self, now_ms: f64) {
        if self.auto_scroll.is_active() {
            let (dx, dy) = self.auto_scroll.on_frame(&self.config, now_ms);
            if (dx != 0.0 || dy != 0.0) && self.scroll.scroll_by(&self.coord, dx, dy) {
                self.scroll.note_scroll(now_ms);
                // Keep the selection glued to the pointer while the view moves.
                let (row, col) = self.pointer_cell(self.mouse.x, self.mouse.y);
                if let Some(next) = self.selection_ctl.on_pointer_move(row, col, &self.selection) {
                    self.selection = next;
                    self.callbacks.emit_selection_changed(&self.selection);
                }
                self.needs_render = true;
                self.sync_region();
            }
        }
        if let Some(outcome) = self.clicks.poll(&self.config, now_ms) {
            self.handle_click(outcome);
        }
        if self
            .scroll
            .take_settled(now_ms, self.config.scroll_settle_delay_ms)
        {
            // Settle repaint at full quality (images, overscan fill).
            self.needs_render = true;
        }
    }

    /// Blur or focus loss: abandon every in-flight gesture.
    pub fn cancel_interactions(&mut self) {
        self.selection_ctl.reset();
        self.drag_ctl.reset();
        self.resize_ctl.reset();
        self.auto_scroll.reset();
        self.clicks.reset();
        self.needs_render = true;
    }

    fn handle_click(&mut self, outcome: ClickOutcome) {
        match outcome {
            ClickOutcome::Double { x, y } => {
                let (_, data) = self.classify(x, y);
                if data.kind == RegionType::Cell {
                    let (row, col) = self.pointer_cell(x, y);
                    self.callbacks.emit_cell_activated([col, row]);
                }
            }
            ClickOutcome::Single { x, y } => {
                let (_, data) = self.classify(x, y);
                if data.kind == RegionType::ColumnHeader {
                    if let Some(col) = data.target {
                        self.callbacks.emit_column_header_clicked(col);
                    }
                }
            }
        }
    }

    fn route_selection(
        &mut self,
        region: RegionType,
        row: usize,
        col: usize,
        modifiers: ClickModifiers,
    ) {
        if let Some(next) =
            self.selection_ctl
                .on_pointer_down(region, row, col, modifiers, &self.selection)
        {
            self.selection = next;
            self.callbacks.emit_selection_changed(&self.selection);
        }
    }

    fn toggle_all_rows(&mut self) {
        let count = self.coord.row_count();
        if count == 0 {
            return;
        }
        let all = [0, count - 1];
        let next = if self.selection.includes(all) {
            CombinedSelection::none()
        } else {
            CombinedSelection::rows(vec![all]).unwrap_or_else(|_| CombinedSelection::none())
        };
        self.selection = next;
        self.selection_ctl.reset();
        self.callbacks.emit_selection_changed(&self.selection);
    }

    /// Clamped cell under a pointer position (for selection extension).
    fn pointer_cell(&self, x: f32, y: f32) -> (usize, usize) {
        let row = self.coord.row_index_at(y + self.scroll.scroll_top());
        let content_x = if x < self.coord.freeze_region_width() {
            x
        } else {
            x + self.scroll.scroll_left()
        };
        let col = self.coord.column_index_at(content_x);
        (row, col)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::selection::SelectionKind;
    use crate::types::ColumnDescriptor;
    use crate::viewer::GridOptions;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view() -> GridView {
        GridView::new(GridOptions {
            row_count: 100,
            columns: (0..10)
                .map(|i| ColumnDescriptor::new(format!("c{i}"), format!("Col {i}"), 150.0))
                .collect(),
            header_height: 40.0,
            gutter_width: 60.0,
            has_append_row: true,
            has_append_column: true,
            ..GridOptions::default()
        })
    }

    #[test]
    fn test_cell_click_selects_and_notifies() {
        let mut view = view();
        let emitted: Rc<RefCell<Vec<CombinedSelection>>> = Rc::default();
        let sink = Rc::clone(&emitted);
        view.callbacks.on_selection_changed = Some(Box::new(move |sel| {
            sink.borrow_mut().push(sel.clone());
        }));

        // Column 1 spans x 210..360, row 2 spans y 104..136.
        view.pointer_down(250.0, 110.0, ClickModifiers::default(), 0.0);
        view.pointer_up(250.0, 110.0, 10.0);

        assert_eq!(view.selection().kind, SelectionKind::Cells);
        assert_eq!(view.selection().anchor(), Some([1, 2]));
        assert_eq!(emitted.borrow().len(), 1);
    }

    #[test]
    fn test_drag_extends_selection() {
        let mut view = view();
        view.pointer_down(250.0, 110.0, ClickModifiers::default(), 0.0);
        view.pointer_move(500.0, 200.0, 16.0);
        view.pointer_up(500.0, 200.0, 32.0);
        // x 500 is in column 2 (360..510), y 200 in row 5 (200..232).
        assert_eq!(view.selection().anchor(), Some([1, 2]));
        assert_eq!(view.selection().focus(), Some([2, 5]));
    }

    #[test]
    fn test_resize_gesture_commits_width() {
        let mut view = view();
        let resized: Rc<RefCell<Vec<(usize, f32)>>> = Rc::default();
        let sink = Rc::clone(&resized);
        view.callbacks.on_column_resized = Some(Box::new(move |col, width| {
            sink.borrow_mut().push((col, width));
        }));

        // Column 0 right edge at x = 60 + 150 = 210.
        view.pointer_down(210.0, 10.0, ClickModifiers::default(), 0.0);
        view.pointer_move(260.0, 12.0, 16.0);
        view.pointer_up(260.0, 12.0, 32.0);

        assert_eq!(resized.borrow().as_slice(), &[(0, 200.0)]);
        assert_eq!(view.coord().column_width_at(0), 200.0);
    }

    #[test]
    fn test_header_drag_reorders_column() {
        let mut view = view();
        let moved: Rc<RefCell<Vec<(usize, usize)>>> = Rc::default();
        let sink = Rc::clone(&moved);
        view.callbacks.on_column_reordered = Some(Box::new(move |from, to| {
            sink.borrow_mut().push((from, to));
        }));

        // Press in column 0's header, drag into column 3's far half.
        view.pointer_down(100.0, 10.0, ClickModifiers::default(), 0.0);
        view.pointer_move(580.0, 10.0, 16.0);
        view.pointer_up(580.0, 10.0, 32.0);
        // Column 3 spans content x 510..660; 580 is its near half → insert 3.
        assert_eq!(moved.borrow().as_slice(), &[(0, 3)]);
    }

    #[test]
    fn test_append_row_click_notifies() {
        let mut view = view();
        let appended = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&appended);
        view.callbacks.on_row_appended = Some(Box::new(move || {
            *sink.borrow_mut() += 1;
        }));
        // Rows end at content y = 40 + 100 * 32 = 3240; the strip sits just
        // below them.
        view.pointer_down(200.0, 3250.0, ClickModifiers::default(), 10.0);
        view.pointer_up(200.0, 3250.0, 20.0);
        assert_eq!(*appended.borrow(), 1);
    }

    #[test]
    fn test_double_click_activates_cell() {
        let mut view = view();
        let activated: Rc<RefCell<Vec<[usize; 2]>>> = Rc::default();
        let sink = Rc::clone(&activated);
        view.callbacks.on_cell_activated = Some(Box::new(move |cell| {
            sink.borrow_mut().push(cell);
        }));

        let mods = ClickModifiers::default();
        view.pointer_down(250.0, 110.0, mods, 0.0);
        view.pointer_up(250.0, 110.0, 10.0);
        view.pointer_down(250.0, 110.0, mods, 100.0);
        view.pointer_up(250.0, 110.0, 110.0);

        // Second press on the already-active cell activates (via the
        // selection controller), and the double click resolves to the same
        // cell (via the disambiguator).
        assert!(activated.borrow().contains(&[1, 2]));
    }

    #[test]
    fn test_wheel_scroll_emits_region_change() {
        let mut view = view();
        let regions = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&regions);
        view.callbacks.on_visible_region_changed = Some(Box::new(move |_| {
            *sink.borrow_mut() += 1;
        }));
        view.wheel(0.0, 640.0, ScrollMode::Pixel, 0.0);
        assert_eq!(view.scroll_top(), 640.0);
        assert_eq!(*regions.borrow(), 1);
        // Settle fires a repaint after the quiet window.
        view.render(&mut crate::render::RecordingSurface::new());
        assert!(!view.needs_render());
        view.on_frame(200.0);
        assert!(view.needs_render());
    }

    #[test]
    fn test_all_checkbox_toggles() {
        let mut view = view();
        // Corner checkbox: gutter 60px wide, header 40px tall, centered.
        view.pointer_down(30.0, 20.0, ClickModifiers::default(), 0.0);
        view.pointer_up(30.0, 20.0, 10.0);
        assert_eq!(view.selection().kind, SelectionKind::Rows);
        assert_eq!(view.selection().ranges, vec![[0, 99]]);

        view.pointer_down(30.0, 20.0, ClickModifiers::default(), 500.0);
        view.pointer_up(30.0, 20.0, 510.0);
        assert!(view.selection().is_none());
    }
}
