//! Cell layer: backgrounds, grid lines and per-type content.
//!
//! Two passes share the same per-cell routine: the scrollable pane clipped to
//! the region right of the freeze line, then the frozen pane clipped to the
//! freeze region. Content dispatch is by descriptor variant; `Unknown` keeps
//! the background and grid lines and draws no content, so a malformed cell
//! degrades to a blank rectangle instead of aborting the frame.

use crate::render::pipeline::RenderFrame;
use crate::render::surface::{DrawSurface, TextAlign};
use crate::types::{CellDescriptor, Rect, VisibleRegion};

/// Rough per-character advance for chip sizing; real measurement happens on
/// the canvas, this only has to be stable for layout.
const CHAR_WIDTH_FACTOR: f32 = 0.62;

pub fn draw_scrollable_pane(frame: &RenderFrame, region: &VisibleRegion, surface: &mut dyn DrawSurface) {
    let coord = frame.coord;
    if coord.row_count() == 0 || coord.column_count() == 0 {
        return;
    }
    let freeze_width = coord.freeze_region_width();
    surface.save();
    surface.clip_rect(Rect::new(
        freeze_width,
        coord.row_initial_size(),
        coord.container_width() - freeze_width,
        coord.container_height() - coord.row_initial_size(),
    ));
    let first_col = region.start_column_index.max(coord.freeze_column_count());
    for row in region.start_row_index..=region.stop_row_index {
        for col in first_col..=region.stop_column_index {
            draw_cell(frame, surface, col, row);
        }
    }
    surface.restore();
}

pub fn draw_frozen_pane(frame: &RenderFrame, region: &VisibleRegion, surface: &mut dyn DrawSurface) {
    let coord = frame.coord;
    if coord.freeze_column_count() == 0 || coord.row_count() == 0 {
        return;
    }
    surface.save();
    surface.clip_rect(Rect::new(
        coord.column_initial_size(),
        coord.row_initial_size(),
        coord.freeze_region_width() - coord.column_initial_size(),
        coord.container_height() - coord.row_initial_size(),
    ));
    for row in region.start_row_index..=region.stop_row_index {
        for col in 0..coord.freeze_column_count() {
            draw_cell(frame, surface, col, row);
        }
    }
    surface.restore();
}

fn draw_cell(frame: &RenderFrame, surface: &mut dyn DrawSurface, col: usize, row: usize) {
    let theme = frame.theme;
    let content = frame.coord.cell_rect(col, row);
    let rect = Rect::new(
        frame.screen_x(content.x, col),
        frame.screen_y(content.y),
        content.width,
        content.height,
    );

    let bg = if frame.selection.includes_cell(col, row) {
        &theme.cell_bg_selected
    } else {
        &theme.cell_bg
    };
    surface.fill_rect(rect, bg);
    surface.line(
        rect.right(),
        rect.y,
        rect.right(),
        rect.bottom(),
        &theme.cell_line_color,
        1.0,
    );
    surface.line(
        rect.x,
        rect.bottom(),
        rect.right(),
        rect.bottom(),
        &theme.cell_line_color,
        1.0,
    );

    let descriptor = (frame.cells)(col, row);
    draw_content(frame, surface, &rect, &descriptor);
}

fn text_baseline(rect: &Rect, font_size: f32) -> f32 {
    rect.y + rect.height / 2.0 + font_size / 3.0
}

fn draw_content(
    frame: &RenderFrame,
    surface: &mut dyn DrawSurface,
    rect: &Rect,
    descriptor: &CellDescriptor,
) {
    let theme = frame.theme;
    let pad = theme.cell_padding;
    let inner_width = (rect.width - pad * 2.0).max(0.0);
    match descriptor {
        CellDescriptor::Text { value } => {
            surface.fill_text(
                value,
                rect.x + pad,
                text_baseline(rect, theme.font_size),
                &theme.cell_font(),
                &theme.cell_text_color,
                TextAlign::Left,
                inner_width,
            );
        }
        CellDescriptor::Number { display, .. } => {
            surface.fill_text(
                display,
                rect.right() - pad,
                text_baseline(rect, theme.font_size),
                &theme.cell_font(),
                &theme.cell_text_color,
                TextAlign::Right,
                inner_width,
            );
        }
        CellDescriptor::Boolean { checked } => {
            let size = theme.checkbox_size.min(rect.height - 4.0);
            let box_rect = Rect::new(
                rect.x + pad,
                rect.y + (rect.height - size) / 2.0,
                size,
                size,
            );
            let id = if *checked { "checkbox-on" } else { "checkbox-off" };
            surface.draw_sprite(id, box_rect, &theme.cell_text_color);
        }
        CellDescriptor::Select { choices } => {
            let mut x = rect.x + pad;
            let chip_height = (rect.height - pad).min(theme.font_size + 8.0);
            let chip_y = rect.y + (rect.height - chip_height) / 2.0;
            for choice in choices {
                let chip_width =
                    choice.label.len() as f32 * theme.font_size * CHAR_WIDTH_FACTOR + pad * 2.0;
                if x + chip_width > rect.right() - pad {
                    break;
                }
                let chip = Rect::new(x, chip_y, chip_width, chip_height);
                let chip_bg = choice.color.as_deref().unwrap_or(&theme.option_chip_bg);
                surface.fill_round_rect(chip, chip_height / 2.0, chip_bg);
                surface.fill_text(
                    &choice.label,
                    x + chip_width / 2.0,
                    text_baseline(&chip, theme.font_size),
                    &theme.cell_font(),
                    &theme.cell_text_color,
                    TextAlign::Center,
                    chip_width - pad,
                );
                x += chip_width + 4.0;
            }
        }
        CellDescriptor::Image { urls } => {
            let size = (rect.height - pad).max(0.0);
            let mut x = rect.x + pad / 2.0;
            for url in urls {
                if x + size > rect.right() {
                    break;
                }
                let thumb = Rect::new(x, rect.y + pad / 2.0, size, size);
                if !surface.draw_image(url, thumb) {
                    surface.fill_rect(thumb, &theme.cell_bg_loading);
                }
                x += size + 4.0;
            }
        }
        CellDescriptor::Loading => {
            let inset = Rect::new(
                rect.x + pad,
                rect.y + pad / 2.0,
                inner_width * 0.6,
                (rect.height - pad).max(0.0),
            );
            surface.fill_rect(inset, &theme.cell_bg_loading);
        }
        CellDescriptor::Unknown => {}
    }
}
