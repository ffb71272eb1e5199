//! Browser integration (wasm32 only).
//!
//! Exports [`WebGridView`] to JavaScript, wires DOM events into the engine,
//! implements [`DrawSurface`] over `CanvasRenderingContext2d`, and drives the
//! animation-frame loop. All engine logic stays in the target-independent
//! core; this module only translates.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent,
    WheelEvent,
};

use crate::cache::{ImageCache, ImageLoader, SpriteCache, SpriteKey};
use crate::error::GridError;
use crate::interaction::ClickModifiers;
use crate::render::{DrawSurface, TextAlign};
use crate::scheduler::{Scheduler, Task, TaskId};
use crate::scroll::ScrollMode;
use crate::selection::CombinedSelection;
use crate::types::{CellDescriptor, ColumnDescriptor, Rect};
use crate::viewer::{GridOptions, GridView};

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

/// One queued load instruction for the deferred image loader.
enum LoadInstruction {
    Begin { url: String, generation: u64 },
    Cancel { url: String },
}

/// Queues loads instead of starting them inline; the frame tick drains the
/// queue, so `src` assignment always happens on the next animation frame.
#[derive(Default, Clone)]
struct DeferredLoader {
    queue: Rc<RefCell<Vec<LoadInstruction>>>,
}

impl ImageLoader<HtmlImageElement> for DeferredLoader {
    fn begin(&mut self, url: &str, generation: u64) {
        self.queue.borrow_mut().push(LoadInstruction::Begin {
            url: url.to_owned(),
            generation,
        });
    }

    fn cancel(&mut self, url: &str) {
        self.queue
            .borrow_mut()
            .push(LoadInstruction::Cancel { url: url.to_owned() });
    }
}

/// `requestAnimationFrame`/`setTimeout` backed [`Scheduler`].
pub struct FrameScheduler {
    next_id: u64,
    active: Rc<RefCell<std::collections::HashSet<TaskId>>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            active: Rc::default(),
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for FrameScheduler {
    #[allow(clippy::cast_possible_truncation)]
    fn schedule_once(&mut self, delay_ms: f64, mut task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId::from_raw(self.next_id);
        self.active.borrow_mut().insert(id);
        let active = Rc::clone(&self.active);
        let closure = Closure::once_into_js(move || {
            if active.borrow_mut().remove(&id) {
                task(now_ms());
            }
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.unchecked_ref(),
                delay_ms as i32,
            );
        }
        id
    }

    fn schedule_repeating(&mut self, mut task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId::from_raw(self.next_id);
        self.active.borrow_mut().insert(id);
        let active = Rc::clone(&self.active);

        // Self-rescheduling rAF loop; dropping the id from `active` stops it.
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::default();
        let callback_handle = Rc::clone(&callback);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            if !active.borrow().contains(&id) {
                callback_handle.borrow_mut().take();
                return;
            }
            task(timestamp);
            if let (Some(window), Some(closure)) =
                (web_sys::window(), callback_handle.borrow().as_ref())
            {
                let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
            }
        }) as Box<dyn FnMut(f64)>));
        if let (Some(window), Some(closure)) = (web_sys::window(), callback.borrow().as_ref()) {
            let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        }
        id
    }

    fn cancel(&mut self, id: TaskId) {
        self.active.borrow_mut().remove(&id);
    }
}

struct WebState {
    view: GridView,
    context: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    dpr: f32,
    sprites: SpriteCache<HtmlCanvasElement>,
    images: ImageCache<HtmlImageElement>,
    loader: DeferredLoader,
    inflight: std::collections::HashMap<String, HtmlImageElement>,
}

/// Canvas 2D implementation of the draw surface.
struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    images: &'a ImageCache<HtmlImageElement>,
    sprites: &'a mut SpriteCache<HtmlCanvasElement>,
    dpr: f32,
}

impl CanvasSurface<'_> {
    fn px(&self, v: f32) -> f64 {
        f64::from(v * self.dpr)
    }
}

impl DrawSurface for CanvasSurface<'_> {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ctx.begin_path();
        self.ctx.rect(
            self.px(rect.x),
            self.px(rect.y),
            self.px(rect.width),
            self.px(rect.height),
        );
        self.ctx.clip();
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            self.px(rect.x),
            self.px(rect.y),
            self.px(rect.width),
            self.px(rect.height),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(self.px(line_width));
        self.ctx.stroke_rect(
            self.px(rect.x),
            self.px(rect.y),
            self.px(rect.width),
            self.px(rect.height),
        );
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: &str) {
        let r = self.px(radius.min(rect.height / 2.0).min(rect.width / 2.0));
        let (x, y) = (self.px(rect.x), self.px(rect.y));
        let (w, h) = (self.px(rect.width), self.px(rect.height));
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(x + r, y);
        let _ = self.ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = self.ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = self.ctx.arc_to(x, y + h, x, y, r);
        let _ = self.ctx.arc_to(x, y, x + w, y, r);
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &str, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(self.px(line_width));
        self.ctx.begin_path();
        self.ctx.move_to(self.px(x1), self.px(y1));
        self.ctx.line_to(self.px(x2), self.px(y2));
        self.ctx.stroke();
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &str,
        color: &str,
        align: TextAlign,
        max_width: f32,
    ) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        let _ = self
            .ctx
            .fill_text_with_max_width(text, self.px(x), self.px(y), self.px(max_width));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_sprite(&mut self, id: &str, rect: Rect, color: &str) {
        let size = (rect.width * self.dpr).round().max(1.0) as u32;
        let key = SpriteKey::new(id, size, color);
        let id_owned = id.to_owned();
        let color_owned = color.to_owned();
        let sprite = self
            .sprites
            .get_or_insert_with(&key, || rasterize_sprite(&id_owned, size, &color_owned));
        let _ = self
            .ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                sprite,
                self.px(rect.x),
                self.px(rect.y),
                self.px(rect.width),
                self.px(rect.height),
            );
    }

    fn draw_image(&mut self, url: &str, rect: Rect) -> bool {
        let Some(image) = self.images.get(url) else {
            return false;
        };
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                self.px(rect.x),
                self.px(rect.y),
                self.px(rect.width),
                self.px(rect.height),
            )
            .is_ok()
    }
}

/// Rasterize a vector glyph onto an offscreen canvas.
fn rasterize_sprite(id: &str, size: u32, color: &str) -> HtmlCanvasElement {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .unwrap_or_else(|| wasm_bindgen::throw_str("no document"));
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .ok()
        .and_then(|e| e.dyn_into().ok())
        .unwrap_or_else(|| wasm_bindgen::throw_str("canvas creation failed"));
    canvas.set_width(size);
    canvas.set_height(size);
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return canvas;
    };
    let s = f64::from(size);
    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);
    ctx.set_line_width((s / 8.0).max(1.0));
    match id {
        "checkbox-on" => {
            ctx.stroke_rect(0.5, 0.5, s - 1.0, s - 1.0);
            ctx.begin_path();
            ctx.move_to(s * 0.22, s * 0.55);
            ctx.line_to(s * 0.42, s * 0.75);
            ctx.line_to(s * 0.78, s * 0.3);
            ctx.stroke();
        }
        "checkbox-off" => {
            ctx.stroke_rect(0.5, 0.5, s - 1.0, s - 1.0);
        }
        "chevron-down" => {
            ctx.begin_path();
            ctx.move_to(s * 0.25, s * 0.4);
            ctx.line_to(s * 0.5, s * 0.65);
            ctx.line_to(s * 0.75, s * 0.4);
            ctx.stroke();
        }
        "drag-handle" => {
            for row in 0..3 {
                for col in 0..2 {
                    ctx.begin_path();
                    let x = s * (0.35 + 0.3 * f64::from(col));
                    let y = s * (0.25 + 0.25 * f64::from(row));
                    let _ = ctx.arc(x, y, s * 0.06, 0.0, std::f64::consts::TAU);
                    ctx.fill();
                }
            }
        }
        "expand" => {
            ctx.begin_path();
            ctx.move_to(s * 0.35, s * 0.25);
            ctx.line_to(s * 0.65, s * 0.5);
            ctx.line_to(s * 0.35, s * 0.75);
            ctx.stroke();
        }
        // Unknown glyph ids draw as a neutral dot.
        _ => {
            ctx.begin_path();
            let _ = ctx.arc(s / 2.0, s / 2.0, s * 0.15, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }
    canvas
}

fn modifiers_of(event: &MouseEvent) -> ClickModifiers {
    ClickModifiers {
        shift: event.shift_key(),
        meta: event.meta_key() || event.ctrl_key(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn event_position(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    (
        event.client_x() as f32 - rect.left() as f32,
        event.client_y() as f32 - rect.top() as f32,
    )
}

/// The JS-facing grid handle.
#[wasm_bindgen]
pub struct WebGridView {
    state: Rc<RefCell<WebState>>,
    scheduler: FrameScheduler,
}

#[wasm_bindgen]
impl WebGridView {
    /// Create a grid bound to a canvas. `options` is a JSON-compatible
    /// object: `{ rowCount, columns, frozenColumnCount, ... }`.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(canvas: HtmlCanvasElement, options: JsValue) -> Result<WebGridView, JsValue> {
        console_error_panic_hook::set_once();

        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        struct JsOptions {
            row_count: usize,
            columns: Vec<ColumnDescriptor>,
            freeze_column_count: usize,
            header_height: f32,
            gutter_width: f32,
            row_height: f32,
            has_append_row: bool,
            has_append_column: bool,
        }
        impl Default for JsOptions {
            fn default() -> Self {
                Self {
                    row_count: 0,
                    columns: Vec::new(),
                    freeze_column_count: 0,
                    header_height: 40.0,
                    gutter_width: 60.0,
                    row_height: crate::layout::DEFAULT_ROW_HEIGHT,
                    has_append_row: false,
                    has_append_column: false,
                }
            }
        }
        let parsed: JsOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| GridError::Other(e.to_string()))?;

        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()) as f32;
        let rect = canvas.get_bounding_client_rect();
        let (width, height) = (rect.width() as f32, rect.height() as f32);
        canvas.set_width((width * dpr) as u32);
        canvas.set_height((height * dpr) as u32);

        let context = canvas
            .get_context("2d")
            .map_err(|_| GridError::Render("2d context unavailable".to_string()))?
            .ok_or_else(|| GridError::Render("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Render("2d context unavailable".to_string()))?;

        let view = GridView::new(GridOptions {
            row_count: parsed.row_count,
            columns: parsed.columns,
            container_width: width,
            container_height: height,
            row_height: parsed.row_height,
            header_height: parsed.header_height,
            gutter_width: parsed.gutter_width,
            freeze_column_count: parsed.freeze_column_count,
            has_append_row: parsed.has_append_row,
            has_append_column: parsed.has_append_column,
            ..GridOptions::default()
        });

        let state = Rc::new(RefCell::new(WebState {
            view,
            context,
            canvas: canvas.clone(),
            dpr,
            sprites: SpriteCache::default(),
            images: ImageCache::default(),
            loader: DeferredLoader::default(),
            inflight: std::collections::HashMap::new(),
        }));

        let mut grid = WebGridView {
            state,
            scheduler: FrameScheduler::new(),
        };
        grid.attach_listeners(&canvas);
        grid.start_frame_loop();
        Ok(grid)
    }

    /// Install the synchronous JS cell lookup `(column, row) -> descriptor`.
    #[wasm_bindgen(js_name = setCellSource)]
    pub fn set_cell_source(&self, lookup: Function) {
        let mut state = self.state.borrow_mut();
        state.view.set_cell_source(Box::new(move |col, row| {
            let result = lookup.call2(
                &JsValue::NULL,
                &JsValue::from_f64(col as f64),
                &JsValue::from_f64(row as f64),
            );
            result
                .ok()
                .and_then(|value| serde_wasm_bindgen::from_value(value).ok())
                .unwrap_or(CellDescriptor::Unknown)
        }));
    }

    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&self, selection: JsValue) -> Result<(), JsValue> {
        let parsed: CombinedSelection = serde_wasm_bindgen::from_value(selection)
            .map_err(|e| GridError::Selection(e.to_string()))?;
        self.state.borrow_mut().view.set_selection(parsed)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        serde_wasm_bindgen::to_value(&state.view.selection().serialize())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = scrollToItem)]
    pub fn scroll_to_item(&self, column: usize, row: usize) {
        self.state.borrow_mut().view.scroll_to_item([column, row]);
    }

    #[wasm_bindgen(js_name = getCellBounds)]
    pub fn get_cell_bounds(&self, column: usize, row: usize) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        serde_wasm_bindgen::to_value(&state.view.cell_bounds([column, row]))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setRowCount)]
    pub fn set_row_count(&self, count: usize) {
        self.state.borrow_mut().view.set_row_count(count);
    }

    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&self, columns: JsValue) -> Result<(), JsValue> {
        let parsed: Vec<ColumnDescriptor> = serde_wasm_bindgen::from_value(columns)
            .map_err(|e| GridError::Other(e.to_string()))?;
        self.state.borrow_mut().view.set_columns(parsed);
        Ok(())
    }

    #[wasm_bindgen(js_name = forceUpdate)]
    pub fn force_update(&self) {
        self.state.borrow_mut().view.force_update();
    }

    /// Subscribe a JS callback by event name.
    #[wasm_bindgen(js_name = on)]
    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        let callbacks = &mut state.view.callbacks;
        match event {
            "selectionChanged" => {
                callbacks.on_selection_changed = Some(Box::new(move |selection| {
                    if let Ok(value) = serde_wasm_bindgen::to_value(selection) {
                        let _ = callback.call1(&JsValue::NULL, &value);
                    }
                }));
            }
            "cellActivated" => {
                callbacks.on_cell_activated = Some(Box::new(move |cell| {
                    if let Ok(value) = serde_wasm_bindgen::to_value(&cell) {
                        let _ = callback.call1(&JsValue::NULL, &value);
                    }
                }));
            }
            "visibleRegionChanged" => {
                callbacks.on_visible_region_changed = Some(Box::new(move |region| {
                    if let Ok(value) = serde_wasm_bindgen::to_value(region) {
                        let _ = callback.call1(&JsValue::NULL, &value);
                    }
                }));
            }
            "columnResized" => {
                callbacks.on_column_resized = Some(Box::new(move |col, width| {
                    let _ = callback.call2(
                        &JsValue::NULL,
                        &JsValue::from_f64(col as f64),
                        &JsValue::from_f64(f64::from(width)),
                    );
                }));
            }
            "columnReordered" => {
                callbacks.on_column_reordered = Some(Box::new(move |from, to| {
                    let _ = callback.call2(
                        &JsValue::NULL,
                        &JsValue::from_f64(from as f64),
                        &JsValue::from_f64(to as f64),
                    );
                }));
            }
            "rowReordered" => {
                callbacks.on_row_reordered = Some(Box::new(move |from, to| {
                    let _ = callback.call2(
                        &JsValue::NULL,
                        &JsValue::from_f64(from as f64),
                        &JsValue::from_f64(to as f64),
                    );
                }));
            }
            "columnHeaderClicked" => {
                callbacks.on_column_header_clicked = Some(index_callback(callback));
            }
            "columnMenuClicked" => {
                callbacks.on_column_menu_clicked = Some(index_callback(callback));
            }
            "rowExpanded" => {
                callbacks.on_row_expanded = Some(index_callback(callback));
            }
            "rowAppended" => {
                callbacks.on_row_appended = Some(Box::new(move || {
                    let _ = callback.call0(&JsValue::NULL);
                }));
            }
            "columnAppended" => {
                callbacks.on_column_appended = Some(Box::new(move || {
                    let _ = callback.call0(&JsValue::NULL);
                }));
            }
            "contextMenu" => {
                callbacks.on_context_menu = Some(Box::new(move |x, y| {
                    let _ = callback.call2(
                        &JsValue::NULL,
                        &JsValue::from_f64(f64::from(x)),
                        &JsValue::from_f64(f64::from(y)),
                    );
                }));
            }
            "copy" | "paste" | "delete" => {
                let slot = Some(selection_callback(callback));
                match event {
                    "copy" => callbacks.on_copy = slot,
                    "paste" => callbacks.on_paste = slot,
                    _ => callbacks.on_delete = slot,
                }
            }
            _ => {
                return Err(JsValue::from_str(&format!("unknown event: {event}")));
            }
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn attach_listeners(&mut self, canvas: &HtmlCanvasElement) {
        let target: &web_sys::EventTarget = canvas.as_ref();

        {
            let state = Rc::clone(&self.state);
            let canvas = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                event.prevent_default();
                let (x, y) = event_position(&canvas, &event);
                state
                    .borrow_mut()
                    .view
                    .pointer_down(x, y, modifiers_of(&event), now_ms());
            }) as Box<dyn FnMut(_)>);
            let _ = target
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let state = Rc::clone(&self.state);
            let canvas = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = event_position(&canvas, &event);
                let mut state = state.borrow_mut();
                state.view.pointer_move(x, y, now_ms());
                let cursor = state.view.cursor();
                let _ = state
                    .canvas
                    .style()
                    .set_property("cursor", cursor);
            }) as Box<dyn FnMut(_)>);
            let _ = target
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let state = Rc::clone(&self.state);
            let canvas = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = event_position(&canvas, &event);
                state.borrow_mut().view.pointer_up(x, y, now_ms());
            }) as Box<dyn FnMut(_)>);
            let _ = target
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let state = Rc::clone(&self.state);
            let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
                event.prevent_default();
                let mode = match event.delta_mode() {
                    WheelEvent::DOM_DELTA_LINE => ScrollMode::Line,
                    WheelEvent::DOM_DELTA_PAGE => ScrollMode::Page,
                    _ => ScrollMode::Pixel,
                };
                state.borrow_mut().view.wheel(
                    event.delta_x() as f32,
                    event.delta_y() as f32,
                    mode,
                    now_ms(),
                );
            }) as Box<dyn FnMut(_)>);
            let _ = target
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let state = Rc::clone(&self.state);
            let canvas = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                event.prevent_default();
                let (x, y) = event_position(&canvas, &event);
                state.borrow_mut().view.context_menu(x, y);
            }) as Box<dyn FnMut(_)>);
            let _ = target.add_event_listener_with_callback(
                "contextmenu",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
        {
            let state = Rc::clone(&self.state);
            let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                state.borrow_mut().view.cancel_interactions();
            }) as Box<dyn FnMut(_)>);
            let _ = target
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let state = Rc::clone(&self.state);
            let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                let state = state.borrow();
                let meta = event.meta_key() || event.ctrl_key();
                match (meta, event.key().as_str()) {
                    (true, "c") => state.view.copy(),
                    (true, "v") => state.view.paste(),
                    (false, "Delete" | "Backspace") => state.view.delete(),
                    _ => {}
                }
            }) as Box<dyn FnMut(_)>);
            if let Some(window) = web_sys::window() {
                let _ = window.add_event_listener_with_callback(
                    "keydown",
                    closure.as_ref().unchecked_ref(),
                );
            }
            closure.forget();
        }
    }

    fn start_frame_loop(&mut self) {
        let state = Rc::clone(&self.state);
        self.scheduler.schedule_repeating(Box::new(move |timestamp| {
            tick(&state, timestamp);
        }));
    }
}

fn index_callback(callback: Function) -> Box<dyn Fn(usize)> {
    Box::new(move |index| {
        let _ = callback.call1(&JsValue::NULL, &JsValue::from_f64(index as f64));
    })
}

fn selection_callback(callback: Function) -> Box<dyn Fn(&CombinedSelection)> {
    Box::new(move |selection| {
        if let Ok(value) = serde_wasm_bindgen::to_value(selection) {
            let _ = callback.call1(&JsValue::NULL, &value);
        }
    })
}

/// One animation frame: controllers, image plumbing, then paint.
fn tick(shared: &Rc<RefCell<WebState>>, timestamp: f64) {
    let mut state = shared.borrow_mut();
    state.view.on_frame(timestamp);

    // Track the visible window in the image cache and request what's new.
    let region = state.view.visible_region();
    let freeze = state.view.coord().freeze_column_count();
    let wanted = state.view.visible_images();
    {
        let state = &mut *state;
        for (url, cell) in &wanted {
            state.images.request(url, *cell, &mut state.loader);
        }
        state.images.set_window(&region, freeze, &mut state.loader);
    }
    drain_loader(shared, &mut state);
    if state.images.take_dirty_cells(timestamp).is_some() {
        state.view.force_update();
    }

    if state.view.needs_render() {
        let state = &mut *state;
        state.context.set_fill_style_str("#FFFFFF");
        state.context.fill_rect(
            0.0,
            0.0,
            f64::from(state.canvas.width()),
            f64::from(state.canvas.height()),
        );
        let mut surface = CanvasSurface {
            ctx: &state.context,
            images: &state.images,
            sprites: &mut state.sprites,
            dpr: state.dpr,
        };
        state.view.render(&mut surface);
    }
}

/// Start queued loads and drop cancelled ones. Runs inside the frame tick,
/// so `src` assignment is always a frame behind the request.
fn drain_loader(shared: &Rc<RefCell<WebState>>, state: &mut WebState) {
    let instructions: Vec<LoadInstruction> = state.loader.queue.borrow_mut().drain(..).collect();
    for instruction in instructions {
        match instruction {
            LoadInstruction::Begin { url, generation } => {
                let image = state
                    .images
                    .recycled()
                    .or_else(|| HtmlImageElement::new().ok());
                let Some(image) = image else { continue };

                let onload_shared = Rc::clone(shared);
                let onload_url = url.clone();
                let onload_image = image.clone();
                let onload = Closure::once_into_js(move || {
                    let mut state = onload_shared.borrow_mut();
                    state.inflight.remove(&onload_url);
                    state.images.complete(&onload_url, generation, onload_image);
                });
                image.set_onload(Some(onload.unchecked_ref()));

                let onerror_shared = Rc::clone(shared);
                let onerror_url = url.clone();
                let onerror = Closure::once_into_js(move || {
                    let mut state = onerror_shared.borrow_mut();
                    state.inflight.remove(&onerror_url);
                    state.images.fail(&onerror_url, generation);
                });
                image.set_onerror(Some(onerror.unchecked_ref()));

                image.set_src(&url);
                state.inflight.insert(url, image);
            }
            LoadInstruction::Cancel { url } => {
                if let Some(image) = state.inflight.remove(&url) {
                    image.set_onload(None);
                    image.set_onerror(None);
                    image.set_src("");
                }
            }
        }
    }
}
