//! Drawing abstraction between the pipeline and the platform canvas.
//!
//! The pipeline emits primitive calls against [`DrawSurface`]; the wasm build
//! implements it over `CanvasRenderingContext2d`, native tests over a
//! [`RecordingSurface`] that captures the call stream so layer order and clip
//! nesting are assertable without a browser.

use crate::types::Rect;

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Primitive drawing operations, in pipeline order.
///
/// Colors are CSS strings throughout; `save`/`restore` bracket clip scopes
/// exactly like the Canvas 2D state stack.
pub trait DrawSurface {
    fn save(&mut self);
    fn restore(&mut self);
    /// Intersect the current clip with `rect`.
    fn clip_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32);
    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: &str);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &str, line_width: f32);
    /// Baseline-anchored single-line text, truncated to `max_width`.
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &str,
        color: &str,
        align: TextAlign,
        max_width: f32,
    );
    /// Tinted glyph from the sprite cache (checkboxes, icons, chevrons).
    fn draw_sprite(&mut self, id: &str, rect: Rect, color: &str);
    /// Decoded image by URL. Returns false when the image is not ready, so
    /// the caller can draw a placeholder instead.
    fn draw_image(&mut self, url: &str, rect: Rect) -> bool;
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Clip(Rect),
    FillRect { rect: Rect, color: String },
    StrokeRect { rect: Rect, color: String },
    RoundRect { rect: Rect, color: String },
    Line { x1: f32, y1: f32, x2: f32, y2: f32, color: String },
    Text { text: String, x: f32, y: f32, align: TextAlign },
    Sprite { id: String, rect: Rect },
    Image { url: String, rect: Rect },
}

/// Capture-only surface for native tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    /// URLs `draw_image` reports as ready.
    pub ready_images: std::collections::HashSet<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Indices of ops matching `predicate`, for order assertions.
    pub fn find_indices(&self, predicate: impl Fn(&DrawOp) -> bool) -> Vec<usize> {
        self.ops
            .iter()
            .enumerate()
            .filter_map(|(i, op)| predicate(op).then_some(i))
            .collect()
    }

    /// Save/restore depth after replaying all recorded ops. A balanced
    /// pipeline ends at zero.
    pub fn final_depth(&self) -> i32 {
        self.ops.iter().fold(0, |depth, op| match op {
            DrawOp::Save => depth + 1,
            DrawOp::Restore => depth - 1,
            _ => depth,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clip(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: color.to_owned(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, _line_width: f32) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color: color.to_owned(),
        });
    }

    fn fill_round_rect(&mut self, rect: Rect, _radius: f32, color: &str) {
        self.ops.push(DrawOp::RoundRect {
            rect,
            color: color.to_owned(),
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &str, _line_width: f32) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: color.to_owned(),
        });
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        _font: &str,
        _color: &str,
        align: TextAlign,
        _max_width: f32,
    ) {
        self.ops.push(DrawOp::Text {
            text: text.to_owned(),
            x,
            y,
            align,
        });
    }

    fn draw_sprite(&mut self, id: &str, rect: Rect, _color: &str) {
        self.ops.push(DrawOp::Sprite {
            id: id.to_owned(),
            rect,
        });
    }

    fn draw_image(&mut self, url: &str, rect: Rect) -> bool {
        self.ops.push(DrawOp::Image {
            url: url.to_owned(),
            rect,
        });
        self.ready_images.contains(url)
    }
}
