//! Overlay layer: freeze divider, active-cell outline, resize and drag
//! indicators, append affordances.

use crate::regions::APPEND_COLUMN_WIDTH;
use crate::render::pipeline::RenderFrame;
use crate::render::surface::{DrawSurface, TextAlign};
use crate::types::{DragType, Rect};

/// Width of the scroll shadow cast by the frozen pane.
const FREEZE_SHADOW_WIDTH: f32 = 6.0;

/// Height of the append-row strip when the grid has no rows to copy it from.
const DEFAULT_APPEND_ROW: f32 = 32.0;

pub fn draw_freeze_divider(frame: &RenderFrame, surface: &mut dyn DrawSurface) {
    let coord = frame.coord;
    if coord.freeze_column_count() == 0 {
        return;
    }
    let x = coord.freeze_region_width();
    // The shadow only appears once scrolled content actually slides under.
    if frame.scroll_left > 0.0 {
        surface.fill_rect(
            Rect::new(x, 0.0, FREEZE_SHADOW_WIDTH, coord.container_height()),
            &frame.theme.freeze_shadow_color,
        );
    }
    surface.line(
        x,
        0.0,
        x,
        coord.container_height(),
        &frame.theme.freeze_divider_color,
        1.0,
    );
}

pub fn draw_active_cell(frame: &RenderFrame, surface: &mut dyn DrawSurface) {
    let Some([col, row]) = frame.selection.anchor() else {
        return;
    };
    let content = frame.coord.cell_rect(col, row);
    let rect = Rect::new(
        frame.screen_x(content.x, col),
        frame.screen_y(content.y),
        content.width,
        content.height,
    );
    surface.stroke_rect(rect, &frame.theme.active_cell_border_color, 2.0);
}

pub fn draw_resize_indicator(frame: &RenderFrame, surface: &mut dyn DrawSurface) {
    let Some(col) = frame.resize.column_index else {
        return;
    };
    // Live edge: column origin plus the in-flight width.
    let x = frame.screen_x(frame.coord.column_offset(col), col) + frame.resize.width;
    surface.line(
        x,
        0.0,
        x,
        frame.coord.container_height(),
        &frame.theme.resize_indicator_color,
        1.0,
    );
}

pub fn draw_drag_indicator(frame: &RenderFrame, surface: &mut dyn DrawSurface) {
    if !frame.drag.is_dragging {
        return;
    }
    let coord = frame.coord;
    let theme = frame.theme;
    let source = frame.drag.source_index;
    match frame.drag.drag_type {
        DragType::Column => {
            let width = coord.column_width_at(source);
            let x = frame.screen_x(coord.column_offset(source), source) + frame.drag.delta;
            surface.fill_rect(
                Rect::new(x, 0.0, width, coord.container_height()),
                &theme.drag_placeholder_color,
            );
            if let Some(insert) = frame.drag_insert_index {
                let line_x = if insert >= coord.column_count() {
                    frame.screen_x(coord.total_width(), insert)
                } else {
                    frame.screen_x(coord.column_offset(insert), insert)
                };
                surface.line(
                    line_x,
                    0.0,
                    line_x,
                    coord.container_height(),
                    &theme.drag_insert_line_color,
                    2.0,
                );
            }
        }
        DragType::Row => {
            let height = coord.row_height_at(source);
            let y = frame.screen_y(coord.row_offset(source)) + frame.drag.delta;
            surface.fill_rect(
                Rect::new(0.0, y, coord.container_width(), height),
                &theme.drag_placeholder_color,
            );
            if let Some(insert) = frame.drag_insert_index {
                let line_y = if insert >= coord.row_count() {
                    frame.screen_y(coord.total_height())
                } else {
                    frame.screen_y(coord.row_offset(insert))
                };
                surface.line(
                    0.0,
                    line_y,
                    coord.container_width(),
                    line_y,
                    &theme.drag_insert_line_color,
                    2.0,
                );
            }
        }
        DragType::None => {}
    }
}

pub fn draw_append_affordances(frame: &RenderFrame, surface: &mut dyn DrawSurface) {
    let coord = frame.coord;
    let theme = frame.theme;
    if frame.has_append_row {
        let height = if coord.row_count() > 0 {
            coord.row_height_at(0)
        } else {
            DEFAULT_APPEND_ROW
        };
        let y = frame.screen_y(coord.total_height());
        if y < coord.container_height() {
            let rect = Rect::new(0.0, y, coord.container_width(), height);
            surface.fill_rect(rect, &theme.append_bg);
            surface.line(
                0.0,
                rect.bottom(),
                rect.right(),
                rect.bottom(),
                &theme.cell_line_color,
                1.0,
            );
            surface.fill_text(
                "+",
                coord.column_initial_size() + theme.cell_padding,
                y + height / 2.0 + theme.font_size / 3.0,
                &theme.cell_font(),
                &theme.header_text_color,
                TextAlign::Left,
                height,
            );
        }
    }
    if frame.has_append_column {
        let last = coord.column_count();
        let x = frame.screen_x(coord.total_width(), last);
        if x < coord.container_width() {
            let rect = Rect::new(x, 0.0, APPEND_COLUMN_WIDTH, coord.row_initial_size());
            surface.fill_rect(rect, &theme.append_bg);
            surface.fill_text(
                "+",
                x + APPEND_COLUMN_WIDTH / 2.0,
                coord.row_initial_size() / 2.0 + theme.font_size / 3.0,
                &theme.header_font(),
                &theme.header_text_color,
                TextAlign::Center,
                APPEND_COLUMN_WIDTH,
            );
        }
    }
}
