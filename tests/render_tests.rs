//! Frame assertions against the recording surface: layer order, clip
//! nesting, per-descriptor cell content and the overlay indicators.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{frozen_grid, grid};
use gridview::interaction::ClickModifiers;
use gridview::render::{DrawOp, RecordingSurface, TextAlign};
use gridview::types::{CellDescriptor, Rect, SelectChoice};
use gridview::CombinedSelection;

fn is_fill(op: &DrawOp, wanted: &str) -> bool {
    matches!(op, DrawOp::FillRect { color, .. } if color == wanted)
}

#[test]
fn test_layer_order_is_back_to_front() {
    let mut view = grid(5, 3);
    view.set_selection(CombinedSelection::cells([1, 1], [1, 1]))
        .unwrap();
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);

    // The frame opens by clipping the scrollable pane below the header strip
    // and right of the gutter, and every save is balanced.
    assert_eq!(surface.ops()[0], DrawOp::Save);
    assert_eq!(
        surface.ops()[1],
        DrawOp::Clip(Rect::new(60.0, 40.0, 740.0, 560.0))
    );
    assert_eq!(surface.final_depth(), 0);

    let cell_fills =
        surface.find_indices(|op| is_fill(op, "#FFFFFF") || is_fill(op, "#EBF2FD"));
    let active = surface.find_indices(
        |op| matches!(op, DrawOp::StrokeRect { color, .. } if color == "#2684FF"),
    );
    let header_fills = surface.find_indices(|op| is_fill(op, "#F3F3F3"));
    let append = surface
        .find_indices(|op| matches!(op, DrawOp::Text { text, .. } if text == "+"));

    // Cells, then the active-cell outline, then headers, then append strips.
    assert!(*cell_fills.last().unwrap() < active[0]);
    assert!(active[0] < header_fills[0]);
    assert!(header_fills[0] < append[0]);

    // The selected cell tints; the anchor cell carries the outline.
    let selected = surface.find_indices(|op| is_fill(op, "#EBF2FD"));
    assert_eq!(selected.len(), 1);
    assert_eq!(
        surface.ops()[active[0]],
        DrawOp::StrokeRect {
            rect: Rect::new(210.0, 72.0, 150.0, 32.0),
            color: "#2684FF".to_owned(),
        }
    );

    // Both append affordances draw inside this small grid.
    assert!(surface
        .ops()
        .contains(&DrawOp::FillRect {
            rect: Rect::new(0.0, 200.0, 800.0, 32.0),
            color: "#FAFAFA".to_owned(),
        }));
    assert!(surface
        .ops()
        .contains(&DrawOp::FillRect {
            rect: Rect::new(510.0, 0.0, 40.0, 40.0),
            color: "#FAFAFA".to_owned(),
        }));
}

#[test]
fn test_append_affordances_skip_offscreen_strips() {
    let mut view = grid(100, 10);
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);
    // Rows end at 3240 and columns at 1560, both past the viewport.
    assert!(surface.find_indices(|op| is_fill(op, "#FAFAFA")).is_empty());
}

#[test]
fn test_cell_content_dispatch() {
    let mut view = frozen_grid(2, 3, 0);
    view.set_cell_source(Box::new(|col, row| match (col, row) {
        (0, 0) => CellDescriptor::Text {
            value: "alpha".to_owned(),
        },
        (0, 1) => CellDescriptor::Unknown,
        (1, _) => CellDescriptor::Number {
            value: 42.0,
            display: "42".to_owned(),
        },
        _ => CellDescriptor::Boolean { checked: row == 0 },
    }));
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);

    // Text is left-anchored inside the cell padding.
    assert!(surface.ops().contains(&DrawOp::Text {
        text: "alpha".to_owned(),
        x: 68.0,
        y: 40.0 + 16.0 + 13.0 / 3.0,
        align: TextAlign::Left,
    }));
    // Numbers right-align against the cell's inner edge.
    let numbers = surface.find_indices(|op| {
        matches!(op, DrawOp::Text { text, x, align, .. }
            if text == "42" && *x == 352.0 && *align == TextAlign::Right)
    });
    assert_eq!(numbers.len(), 2);
    // Booleans draw checkbox sprites in the cell, beside the gutter's own.
    let cell_boxes = surface.find_indices(|op| {
        matches!(op, DrawOp::Sprite { id, rect } if id.starts_with("checkbox") && rect.x == 368.0)
    });
    assert_eq!(cell_boxes.len(), 2);
    assert!(matches!(
        &surface.ops()[cell_boxes[0]],
        DrawOp::Sprite { id, .. } if id == "checkbox-on"
    ));
    // Three header names, one text cell, two number cells; the unknown cell
    // degrades to background only.
    let texts = surface.find_indices(|op| matches!(op, DrawOp::Text { .. }));
    assert_eq!(texts.len(), 6);
}

#[test]
fn test_select_chips_and_loading_shimmer() {
    let mut view = frozen_grid(1, 2, 0);
    view.set_cell_source(Box::new(|col, _| {
        if col == 0 {
            CellDescriptor::Select {
                choices: vec![
                    SelectChoice {
                        label: "A".to_owned(),
                        color: Some("#FFEEDD".to_owned()),
                    },
                    SelectChoice {
                        label: "B".to_owned(),
                        color: None,
                    },
                ],
            }
        } else {
            CellDescriptor::Loading
        }
    }));
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);

    let chips = surface.find_indices(|op| matches!(op, DrawOp::RoundRect { .. }));
    assert_eq!(chips.len(), 2);
    assert!(matches!(
        &surface.ops()[chips[0]],
        DrawOp::RoundRect { color, .. } if color == "#FFEEDD"
    ));
    // The uncolored chip falls back to the theme chip background.
    assert!(matches!(
        &surface.ops()[chips[1]],
        DrawOp::RoundRect { color, .. } if color == "#E8EAED"
    ));
    // The loading cell draws a shimmer block.
    assert!(!surface.find_indices(|op| is_fill(op, "#F5F5F5")).is_empty());
}

#[test]
fn test_image_placeholder_until_decoded() {
    let mut view = frozen_grid(1, 1, 0);
    view.set_cell_source(Box::new(|_, _| CellDescriptor::Image {
        urls: vec!["img://a".to_owned()],
    }));

    let mut surface = RecordingSurface::new();
    view.render(&mut surface);
    let thumb = Rect::new(64.0, 44.0, 24.0, 24.0);
    assert!(surface.ops().contains(&DrawOp::Image {
        url: "img://a".to_owned(),
        rect: thumb,
    }));
    assert!(surface.ops().contains(&DrawOp::FillRect {
        rect: thumb,
        color: "#F5F5F5".to_owned(),
    }));

    // Once the cache reports the image ready the placeholder disappears.
    let mut surface = RecordingSurface::new();
    surface.ready_images.insert("img://a".to_owned());
    view.force_update();
    view.render(&mut surface);
    assert!(!surface.ops().iter().any(|op| matches!(
        op,
        DrawOp::FillRect { color, .. } if color == "#F5F5F5"
    )));
}

#[test]
fn test_frozen_pane_clips_and_divider() {
    let mut view = frozen_grid(5, 8, 2);
    view.set_scroll(100.0, 0.0, 0.0);
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);

    let clips = surface.find_indices(|op| matches!(op, DrawOp::Clip(_)));
    // Scrollable pane, frozen pane, gutter, column strip.
    assert_eq!(clips.len(), 4);
    assert_eq!(
        surface.ops()[clips[0]],
        DrawOp::Clip(Rect::new(360.0, 40.0, 440.0, 560.0))
    );
    assert_eq!(
        surface.ops()[clips[1]],
        DrawOp::Clip(Rect::new(60.0, 40.0, 300.0, 560.0))
    );

    // Scrolled content slides under the frozen pane: shadow plus divider.
    assert!(surface.ops().contains(&DrawOp::FillRect {
        rect: Rect::new(360.0, 0.0, 6.0, 600.0),
        color: "rgba(0, 0, 0, 0.12)".to_owned(),
    }));
    assert!(surface.ops().iter().any(|op| matches!(
        op,
        DrawOp::Line { x1, color, .. } if *x1 == 360.0 && color == "#BABABA"
    )));

    // At rest the divider stays but the shadow goes.
    let mut view = frozen_grid(5, 8, 2);
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);
    assert!(!surface.ops().iter().any(|op| matches!(
        op,
        DrawOp::FillRect { color, .. } if color == "rgba(0, 0, 0, 0.12)"
    )));
}

#[test]
fn test_drag_overlay_tracks_pointer() {
    let mut view = grid(5, 3);
    view.pointer_down(100.0, 10.0, ClickModifiers::default(), 0.0);
    view.pointer_move(400.0, 12.0, 16.0);

    let mut surface = RecordingSurface::new();
    view.render(&mut surface);
    // Placeholder rides with the pointer: column 0 dragged 340px right.
    assert!(surface.ops().contains(&DrawOp::FillRect {
        rect: Rect::new(400.0, 0.0, 150.0, 600.0),
        color: "rgba(38, 132, 255, 0.25)".to_owned(),
    }));
    // Insertion line at column 2's leading edge.
    assert!(surface.ops().iter().any(|op| matches!(
        op,
        DrawOp::Line { x1, color, .. } if *x1 == 360.0 && color == "#2684FF"
    )));
}

#[test]
fn test_headers_reflect_selection() {
    let mut view = grid(5, 3);
    view.set_selection(CombinedSelection::rows(vec![[1, 1]]).unwrap())
        .unwrap();
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);

    // Row 1's gutter strip tints and its checkbox fills in.
    assert!(surface.ops().contains(&DrawOp::FillRect {
        rect: Rect::new(0.0, 72.0, 60.0, 32.0),
        color: "#CFD8E8".to_owned(),
    }));
    assert!(surface.ops().contains(&DrawOp::Sprite {
        id: "checkbox-on".to_owned(),
        rect: Rect::new(23.0, 81.0, 14.0, 14.0),
    }));
    // The corner checkbox only fills when every row is selected.
    assert!(surface.ops().contains(&DrawOp::Sprite {
        id: "checkbox-off".to_owned(),
        rect: Rect::new(23.0, 13.0, 14.0, 14.0),
    }));

    view.set_selection(CombinedSelection::rows(vec![[0, 4]]).unwrap())
        .unwrap();
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);
    assert!(surface.ops().contains(&DrawOp::Sprite {
        id: "checkbox-on".to_owned(),
        rect: Rect::new(23.0, 13.0, 14.0, 14.0),
    }));

    // Column selection tints the matching header.
    view.set_selection(CombinedSelection::columns(vec![[2, 2]]).unwrap())
        .unwrap();
    let mut surface = RecordingSurface::new();
    view.render(&mut surface);
    assert!(surface.ops().contains(&DrawOp::FillRect {
        rect: Rect::new(360.0, 0.0, 150.0, 40.0),
        color: "#CFD8E8".to_owned(),
    }));
}
