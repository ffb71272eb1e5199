//! Header layer: row-header gutter, corner, and column-header strip.
//!
//! Headers draw above every cell-layer indicator so dragging content never
//! bleeds over them. Selected rows and columns tint their headers; the gutter
//! control slots use the same layout math as the pointer classifier, so what
//! you can click is exactly what you see.

use crate::render::pipeline::RenderFrame;
use crate::render::surface::{DrawSurface, TextAlign};
use crate::selection::SelectionKind;
use crate::types::{Rect, RowControlType, VisibleRegion};

pub fn draw_headers(frame: &RenderFrame, region: &VisibleRegion, surface: &mut dyn DrawSurface) {
    draw_gutter(frame, region, surface);
    draw_column_strip(frame, region, surface);
    draw_corner(frame, surface);
}

/// Centered square hit/draw box for one gutter control slot.
fn control_box(frame: &RenderFrame, control: RowControlType, top: f32, height: f32) -> Option<Rect> {
    let count = frame.row_controls.len();
    if count == 0 {
        return None;
    }
    let slot = frame.coord.column_initial_size() / count as f32;
    let position = frame.row_controls.iter().position(|c| *c == control)?;
    let size = frame.theme.checkbox_size.min(slot);
    Some(Rect::new(
        slot * position as f32 + (slot - size) / 2.0,
        top + (height - size) / 2.0,
        size,
        size,
    ))
}

fn draw_gutter(frame: &RenderFrame, region: &VisibleRegion, surface: &mut dyn DrawSurface) {
    let coord = frame.coord;
    let gutter = coord.column_initial_size();
    if gutter <= 0.0 || coord.row_count() == 0 {
        return;
    }
    surface.save();
    surface.clip_rect(Rect::new(
        0.0,
        coord.row_initial_size(),
        gutter,
        coord.container_height() - coord.row_initial_size(),
    ));
    let theme = frame.theme;
    let rows_selected = frame.selection.kind == SelectionKind::Rows;
    for row in region.start_row_index..=region.stop_row_index {
        let top = frame.screen_y(coord.row_offset(row));
        let height = coord.row_height_at(row);
        let selected = rows_selected && frame.selection.includes([row, row]);
        let bg = if selected {
            &theme.header_bg_selected
        } else {
            &theme.header_bg
        };
        surface.fill_rect(Rect::new(0.0, top, gutter, height), bg);
        surface.line(
            0.0,
            top + height,
            gutter,
            top + height,
            &theme.header_line_color,
            1.0,
        );
        for control in frame.row_controls {
            if let Some(hit) = control_box(frame, *control, top, height) {
                let id = match control {
                    RowControlType::Checkbox if selected => "checkbox-on",
                    RowControlType::Checkbox => "checkbox-off",
                    RowControlType::Drag => "drag-handle",
                    RowControlType::Expand => "expand",
                };
                surface.draw_sprite(id, hit, &theme.header_text_color);
            }
        }
    }
    surface.restore();
    surface.line(
        gutter,
        0.0,
        gutter,
        coord.container_height(),
        &frame.theme.header_line_color,
        1.0,
    );
}

fn draw_column_strip(frame: &RenderFrame, region: &VisibleRegion, surface: &mut dyn DrawSurface) {
    let coord = frame.coord;
    let strip_height = coord.row_initial_size();
    if strip_height <= 0.0 || coord.column_count() == 0 {
        return;
    }
    // Backdrop across the full strip, under both panes.
    surface.fill_rect(
        Rect::new(0.0, 0.0, coord.container_width(), strip_height),
        &frame.theme.header_bg,
    );

    // Scrollable headers, clipped right of the freeze line.
    let freeze_width = coord.freeze_region_width();
    surface.save();
    surface.clip_rect(Rect::new(
        freeze_width,
        0.0,
        coord.container_width() - freeze_width,
        strip_height,
    ));
    let first = region.start_column_index.max(coord.freeze_column_count());
    for col in first..=region.stop_column_index {
        draw_one_header(frame, surface, col, strip_height);
    }
    surface.restore();

    for col in 0..coord.freeze_column_count() {
        draw_one_header(frame, surface, col, strip_height);
    }

    surface.line(
        0.0,
        strip_height,
        coord.container_width(),
        strip_height,
        &frame.theme.header_line_color,
        1.0,
    );
}

fn draw_one_header(frame: &RenderFrame, surface: &mut dyn DrawSurface, col: usize, height: f32) {
    let coord = frame.coord;
    let theme = frame.theme;
    let left = frame.screen_x(coord.column_offset(col), col);
    let width = coord.column_width_at(col);
    let rect = Rect::new(left, 0.0, width, height);

    let selected = frame.selection.kind == SelectionKind::Columns
        && frame.selection.includes([col, col]);
    let bg = if selected {
        &theme.header_bg_selected
    } else {
        &theme.header_bg
    };
    surface.fill_rect(rect, bg);
    surface.line(
        rect.right(),
        0.0,
        rect.right(),
        height,
        &theme.header_line_color,
        1.0,
    );

    let Some(column) = frame.columns.get(col) else {
        return;
    };
    let pad = theme.cell_padding;
    let mut text_x = rect.x + pad;
    if let Some(icon) = &column.icon {
        let size = theme.icon_size;
        surface.draw_sprite(
            icon,
            Rect::new(text_x, (height - size) / 2.0, size, size),
            &theme.header_text_color,
        );
        text_x += size + 4.0;
    }
    let mut text_right = rect.right() - pad;
    if column.has_menu {
        let size = theme.icon_size;
        surface.draw_sprite(
            "chevron-down",
            Rect::new(rect.right() - pad - size, (height - size) / 2.0, size, size),
            &theme.header_text_color,
        );
        text_right -= size + 4.0;
    }
    surface.fill_text(
        &column.name,
        text_x,
        height / 2.0 + theme.font_size / 3.0,
        &theme.header_font(),
        &theme.header_text_color,
        TextAlign::Left,
        (text_right - text_x).max(0.0),
    );
}

fn draw_corner(frame: &RenderFrame, surface: &mut dyn DrawSurface) {
    let coord = frame.coord;
    let gutter = coord.column_initial_size();
    let strip_height = coord.row_initial_size();
    if gutter <= 0.0 || strip_height <= 0.0 {
        return;
    }
    surface.fill_rect(
        Rect::new(0.0, 0.0, gutter, strip_height),
        &frame.theme.header_bg,
    );
    if let Some(hit) = control_box(frame, RowControlType::Checkbox, 0.0, strip_height) {
        // Checked only when the selection literally spans every row.
        let all_selected = frame.selection.kind == SelectionKind::Rows
            && coord.row_count() > 0
            && frame.selection.includes([0, coord.row_count() - 1]);
        let id = if all_selected { "checkbox-on" } else { "checkbox-off" };
        surface.draw_sprite(id, hit, &frame.theme.header_text_color);
    }
}
