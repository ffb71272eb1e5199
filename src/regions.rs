//! Pointer-to-region classification.
//!
//! `classify` runs an ordered cascade of independent, side-effect-free
//! predicates and returns the first match. The order of the `CHECKS` table
//! encodes priority, not spatial truth: an active drag outranks whatever
//! happens to sit under the pointer, and the fill handle outranks the cell
//! beneath it. Reordering the table changes behavior, so it is the one place
//! reviewers look when region precedence is in question.

use crate::layout::CoordinateManager;
use crate::selection::CombinedSelection;
use crate::types::{
    ColumnDescriptor, ColumnResizeState, DragState, GridTheme, InteractionConfig, MouseState,
    Rect, RegionType, RowControlType, APPEND_INDEX, HEADER_INDEX,
};

/// Width of the append-column button, drawn after the last column header.
pub const APPEND_COLUMN_WIDTH: f32 = 40.0;

/// Everything a predicate may inspect. Built once per pointer event.
pub struct RegionQuery<'a> {
    /// Pointer x in container-local logical pixels.
    pub x: f32,
    /// Pointer y in container-local logical pixels.
    pub y: f32,
    /// Derived row index (or `HEADER_INDEX` / `APPEND_INDEX`).
    pub row_index: i64,
    /// Derived column index (or `HEADER_INDEX` / `APPEND_INDEX`).
    pub column_index: i64,
    pub is_out_of_bounds: bool,
    pub coord: &'a CoordinateManager,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub selection: &'a CombinedSelection,
    /// A cell-selection drag is in progress.
    pub is_selecting: bool,
    pub drag: &'a DragState,
    pub resize: &'a ColumnResizeState,
    pub columns: &'a [ColumnDescriptor],
    pub row_controls: &'a [RowControlType],
    pub theme: &'a GridTheme,
    pub config: &'a InteractionConfig,
    pub has_append_row: bool,
    pub has_append_column: bool,
}

/// Classification result: the symbolic tag, the hit rectangle for handle-like
/// regions (in container-local screen pixels), and the target index where the
/// tag alone is ambiguous (a resize handle near a boundary belongs to the
/// column left of it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionData {
    pub kind: RegionType,
    pub bounds: Option<Rect>,
    pub target: Option<usize>,
}

impl RegionData {
    fn tag(kind: RegionType) -> Self {
        Self {
            kind,
            bounds: None,
            target: None,
        }
    }

    fn blank() -> Self {
        Self::tag(RegionType::Blank)
    }
}

/// Pointer-derived indices plus the out-of-bounds flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPosition {
    pub row_index: i64,
    pub column_index: i64,
    pub is_out_of_bounds: bool,
}

fn to_index(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Map a container-local pointer position to logical indices, honoring the
/// frozen columns (which ignore horizontal scroll) and the header strips.
pub fn pointer_position(
    coord: &CoordinateManager,
    scroll_left: f32,
    scroll_top: f32,
    x: f32,
    y: f32,
    has_append_row: bool,
    has_append_column: bool,
) -> PointerPosition {
    let mut out_of_bounds = x < 0.0 || y < 0.0;

    // Vertical: the header strip never scrolls; everything below does.
    let row_index = if y < coord.row_initial_size() {
        HEADER_INDEX
    } else {
        let content_y = y + scroll_top;
        let total = coord.total_height();
        if coord.row_count() == 0 || content_y >= total {
            if has_append_row && content_y < total + coord.row_height_at(0).max(DEFAULT_APPEND_ROW) {
                APPEND_INDEX
            } else {
                out_of_bounds = true;
                HEADER_INDEX
            }
        } else {
            to_index(coord.row_index_at(content_y))
        }
    };

    // Horizontal: the gutter and frozen columns ignore scroll_left.
    let freeze_width = coord.freeze_region_width();
    let column_index = if x < coord.column_initial_size() {
        HEADER_INDEX
    } else {
        let content_x = if x < freeze_width { x } else { x + scroll_left };
        let total = coord.total_width();
        if coord.column_count() == 0 || content_x >= total {
            if has_append_column && content_x < total + APPEND_COLUMN_WIDTH {
                APPEND_INDEX
            } else {
                out_of_bounds = true;
                HEADER_INDEX
            }
        } else {
            to_index(coord.column_index_at(content_x))
        }
    };

    PointerPosition {
        row_index,
        column_index,
        is_out_of_bounds: out_of_bounds,
    }
}

const DEFAULT_APPEND_ROW: f32 = 32.0;

impl RegionQuery<'_> {
    /// Screen x of a content x that belongs to column `col`.
    fn screen_x(&self, content_x: f32, col: usize) -> f32 {
        if col < self.coord.freeze_column_count() {
            content_x
        } else {
            content_x - self.scroll_left
        }
    }

    fn screen_y(&self, content_y: f32) -> f32 {
        content_y - self.scroll_top
    }

    fn row(&self) -> Option<usize> {
        usize::try_from(self.row_index).ok()
    }

    fn column(&self) -> Option<usize> {
        usize::try_from(self.column_index).ok()
    }
}

type Check = fn(&RegionQuery) -> Option<RegionData>;

/// The priority cascade. First match wins; order is the contract.
const CHECKS: &[Check] = &[
    check_out_of_bounds,
    check_active_cell_drag,
    check_active_resize_drag,
    check_active_reorder_drag,
    check_append_column,
    check_append_row,
    check_row_header_gutter,
    check_fill_handle,
    check_cell,
    check_column_header,
];

/// Classify the pointer. Always returns a value; the fallback is `Blank`.
pub fn classify(query: &RegionQuery) -> RegionData {
    CHECKS
        .iter()
        .find_map(|check| check(query))
        .unwrap_or_else(RegionData::blank)
}

/// Convenience: fold a classification into a fresh [`MouseState`].
pub fn mouse_state(query: &RegionQuery) -> MouseState {
    let data = classify(query);
    MouseState {
        x: query.x,
        y: query.y,
        row_index: query.row_index,
        column_index: query.column_index,
        region: data.kind,
        is_out_of_bounds: query.is_out_of_bounds,
    }
}

fn check_out_of_bounds(q: &RegionQuery) -> Option<RegionData> {
    q.is_out_of_bounds.then(RegionData::blank)
}

fn check_active_cell_drag(q: &RegionQuery) -> Option<RegionData> {
    q.is_selecting.then(|| RegionData::tag(RegionType::Cell))
}

fn check_active_resize_drag(q: &RegionQuery) -> Option<RegionData> {
    q.resize.column_index.map(|col| RegionData {
        kind: RegionType::ColumnResizeHandler,
        bounds: None,
        target: Some(col),
    })
}

fn check_active_reorder_drag(q: &RegionQuery) -> Option<RegionData> {
    q.drag
        .is_dragging
        .then(|| RegionData::tag(RegionType::ColumnHeader))
}

fn check_append_column(q: &RegionQuery) -> Option<RegionData> {
    if !q.has_append_column
        || q.column_index != APPEND_INDEX
        || q.row_index != HEADER_INDEX
    {
        return None;
    }
    let last = q.coord.column_count();
    let sx = q.screen_x(q.coord.total_width(), last);
    Some(RegionData {
        kind: RegionType::AppendColumn,
        bounds: Some(Rect::new(
            sx,
            0.0,
            APPEND_COLUMN_WIDTH,
            q.coord.row_initial_size(),
        )),
        target: None,
    })
}

fn check_append_row(q: &RegionQuery) -> Option<RegionData> {
    if !q.has_append_row || q.row_index != APPEND_INDEX {
        return None;
    }
    Some(RegionData {
        kind: RegionType::AppendRow,
        bounds: Some(Rect::new(
            0.0,
            q.screen_y(q.coord.total_height()),
            q.coord.container_width(),
            DEFAULT_APPEND_ROW,
        )),
        target: None,
    })
}

/// Layout of one control slot inside the row-header gutter: equal-width slots
/// in `row_controls` order, each with a centered square hit box.
fn gutter_control_box(q: &RegionQuery, control: RowControlType, top: f32, height: f32) -> Option<Rect> {
    let count = q.row_controls.len();
    if count == 0 {
        return None;
    }
    let slot = q.coord.column_initial_size() / count as f32;
    let position = q.row_controls.iter().position(|c| *c == control)?;
    let size = q.theme.checkbox_size.min(slot);
    let x = slot * position as f32 + (slot - size) / 2.0;
    let y = top + (height - size) / 2.0;
    Some(Rect::new(x, y, size, size))
}

fn check_row_header_gutter(q: &RegionQuery) -> Option<RegionData> {
    if q.x >= q.coord.column_initial_size() {
        return None;
    }
    if q.row_index == HEADER_INDEX {
        // Corner: only the all-rows checkbox is interactive.
        let hit = gutter_control_box(q, RowControlType::Checkbox, 0.0, q.coord.row_initial_size())?;
        return hit.contains(q.x, q.y).then_some(RegionData {
            kind: RegionType::AllCheckbox,
            bounds: Some(hit),
            target: None,
        });
    }
    let row = q.row()?;
    let top = q.screen_y(q.coord.row_offset(row));
    let height = q.coord.row_height_at(row);
    for (control, kind) in [
        (RowControlType::Checkbox, RegionType::RowHeaderCheckbox),
        (RowControlType::Drag, RegionType::RowHeaderDragHandler),
        (RowControlType::Expand, RegionType::RowHeaderExpandHandler),
    ] {
        if let Some(hit) = gutter_control_box(q, control, top, height) {
            if hit.contains(q.x, q.y) {
                return Some(RegionData {
                    kind,
                    bounds: Some(hit),
                    target: Some(row),
                });
            }
        }
    }
    Some(RegionData {
        kind: RegionType::RowHeader,
        bounds: None,
        target: Some(row),
    })
}

fn check_fill_handle(q: &RegionQuery) -> Option<RegionData> {
    let [_, _, max_col, max_row] = q.selection.cell_bounds()?;
    let corner_x = q.screen_x(
        q.coord.column_offset(max_col) + q.coord.column_width_at(max_col),
        max_col,
    );
    let corner_y = q.screen_y(q.coord.row_offset(max_row) + q.coord.row_height_at(max_row));
    let half = q.config.fill_handle_size + 2.0;
    let hit = Rect::new(corner_x - half, corner_y - half, half * 2.0, half * 2.0);
    hit.contains(q.x, q.y).then_some(RegionData {
        kind: RegionType::FillHandler,
        bounds: Some(hit),
        target: None,
    })
}

fn check_cell(q: &RegionQuery) -> Option<RegionData> {
    let row = q.row()?;
    let col = q.column()?;
    let rect = q.coord.cell_rect(col, row);
    Some(RegionData {
        kind: RegionType::Cell,
        bounds: Some(Rect::new(
            q.screen_x(rect.x, col),
            q.screen_y(rect.y),
            rect.width,
            rect.height,
        )),
        target: None,
    })
}

fn check_column_header(q: &RegionQuery) -> Option<RegionData> {
    if q.row_index != HEADER_INDEX {
        return None;
    }
    let col = q.column()?;
    let left = q.screen_x(q.coord.column_offset(col), col);
    let width = q.coord.column_width_at(col);
    let right = left + width;
    let margin = q.config.resize_handle_margin;

    // Boundary margins: near the right edge resizes this column, near the
    // left edge resizes the previous one.
    if (q.x - right).abs() <= margin {
        return Some(RegionData {
            kind: RegionType::ColumnResizeHandler,
            bounds: Some(Rect::new(
                right - margin,
                0.0,
                margin * 2.0,
                q.coord.row_initial_size(),
            )),
            target: Some(col),
        });
    }
    if col > 0 && (q.x - left).abs() <= margin {
        return Some(RegionData {
            kind: RegionType::ColumnResizeHandler,
            bounds: Some(Rect::new(
                left - margin,
                0.0,
                margin * 2.0,
                q.coord.row_initial_size(),
            )),
            target: Some(col - 1),
        });
    }

    if q.columns.get(col).is_some_and(|c| c.has_menu) {
        let size = q.theme.icon_size;
        let pad = q.theme.cell_padding;
        let hit = Rect::new(
            right - pad - size,
            (q.coord.row_initial_size() - size) / 2.0,
            size,
            size,
        );
        if hit.contains(q.x, q.y) {
            return Some(RegionData {
                kind: RegionType::ColumnHeaderMenu,
                bounds: Some(hit),
                target: Some(col),
            });
        }
    }

    Some(RegionData {
        kind: RegionType::ColumnHeader,
        bounds: None,
        target: Some(col),
    })
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
    use crate::layout::CoordinateOptions;

    struct Fixture {
        coord: CoordinateManager,
        selection: CombinedSelection,
        drag: DragState,
        resize: ColumnResizeState,
        columns: Vec<ColumnDescriptor>,
        row_controls: Vec<RowControlType>,
        theme: GridTheme,
        config: InteractionConfig,
        is_selecting: bool,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                coord: CoordinateManager::new(CoordinateOptions {
                    row_count: 100,
                    column_count: 10,
                    row_initial_size: 40.0,
                    column_initial_size: 60.0,
                    ..CoordinateOptions::default()
                }),
                selection: CombinedSelection::none(),
                drag: DragState::default(),
                resize: ColumnResizeState::default(),
                columns: (0..10)
                    .map(|i| ColumnDescriptor::new(format!("c{i}"), format!("Col {i}"), 150.0))
                    .collect(),
                row_controls: vec![RowControlType::Checkbox],
                theme: GridTheme::default(),
                config: InteractionConfig::default(),
                is_selecting: false,
            }
        }

        fn classify_at(&self, x: f32, y: f32) -> RegionData {
            let pos = pointer_position(&self.coord, 0.0, 0.0, x, y, true, true);
            let query = RegionQuery {
                x,
                y,
                row_index: pos.row_index,
                column_index: pos.column_index,
                is_out_of_bounds: pos.is_out_of_bounds,
                coord: &self.coord,
                scroll_left: 0.0,
                scroll_top: 0.0,
                selection: &self.selection,
                is_selecting: self.is_selecting,
                drag: &self.drag,
                resize: &self.resize,
                columns: &self.columns,
                row_controls: &self.row_controls,
                theme: &self.theme,
                config: &self.config,
                has_append_row: true,
                has_append_column: true,
            };
            classify(&query)
        }
    }

    #[test]
    fn test_cell_hit() {
        let fx = Fixture::new();
        // Column 1 spans x 210..360, row 2 spans y 104..136.
        let data = fx.classify_at(250.0, 110.0);
        assert_eq!(data.kind, RegionType::Cell);
    }

    #[test]
    fn test_header_hit() {
        let fx = Fixture::new();
        let data = fx.classify_at(100.0, 10.0);
        assert_eq!(data.kind, RegionType::ColumnHeader);
        assert_eq!(data.target, Some(0));
    }

    #[test]
    fn test_resize_margin_beats_header() {
        let fx = Fixture::new();
        // Column 0 right edge at x = 60 + 150 = 210.
        let data = fx.classify_at(211.0, 10.0);
        assert_eq!(data.kind, RegionType::ColumnResizeHandler);
        assert_eq!(data.target, Some(0));
    }

    #[test]
    fn test_left_margin_targets_previous_column() {
        let fx = Fixture::new();
        // x = 363 is just right of column 1's right edge (360): within the
        // margin on the left side of column 2.
        let data = fx.classify_at(363.0, 10.0);
        assert_eq!(data.kind, RegionType::ColumnResizeHandler);
        assert_eq!(data.target, Some(1));
    }

    #[test]
    fn test_active_resize_beats_fill_handle() {
        let mut fx = Fixture::new();
        fx.selection = CombinedSelection::cells([0, 0], [1, 1]);
        fx.resize = ColumnResizeState {
            column_index: Some(1),
            width: 150.0,
            anchor_x: 360.0,
        };
        // Pointer exactly on the fill handle (bottom-right of selection:
        // x = 60 + 300, y = 40 + 64); the active resize drag still wins.
        let data = fx.classify_at(360.0, 104.0);
        assert_eq!(data.kind, RegionType::ColumnResizeHandler);
    }

    #[test]
    fn test_fill_handle_beats_cell() {
        let mut fx = Fixture::new();
        fx.selection = CombinedSelection::cells([0, 0], [1, 1]);
        let data = fx.classify_at(360.0, 104.0);
        assert_eq!(data.kind, RegionType::FillHandler);
    }

    #[test]
    fn test_selecting_drag_reports_cell_everywhere() {
        let mut fx = Fixture::new();
        fx.is_selecting = true;
        let data = fx.classify_at(100.0, 10.0);
        assert_eq!(data.kind, RegionType::Cell);
    }

    #[test]
    fn test_out_of_bounds_is_blank() {
        let fx = Fixture::new();
        let data = fx.classify_at(-5.0, 100.0);
        assert_eq!(data.kind, RegionType::Blank);
    }

    #[test]
    fn test_gutter_checkbox() {
        let fx = Fixture::new();
        // Single checkbox control centered in the 60px gutter; row 0 spans
        // y 40..72. Center is (30, 56).
        let data = fx.classify_at(30.0, 56.0);
        assert_eq!(data.kind, RegionType::RowHeaderCheckbox);
        assert_eq!(data.target, Some(0));

        // Gutter but outside the checkbox box: plain row header.
        let data = fx.classify_at(4.0, 56.0);
        assert_eq!(data.kind, RegionType::RowHeader);
    }

    #[test]
    fn test_corner_all_checkbox() {
        let fx = Fixture::new();
        let data = fx.classify_at(30.0, 20.0);
        assert_eq!(data.kind, RegionType::AllCheckbox);
    }

    #[test]
    fn test_append_row_strip() {
        let fx = Fixture::new();
        // Rows end at content y = 40 + 100 * 32 = 3240.
        let data = fx.classify_at(200.0, 3250.0);
        assert_eq!(data.kind, RegionType::AppendRow);
    }

    #[test]
    fn test_append_column_button() {
        let fx = Fixture::new();
        // Columns end at content x = 60 + 10 * 150 = 1560.
        let data = fx.classify_at(1570.0, 10.0);
        assert_eq!(data.kind, RegionType::AppendColumn);
    }
}
