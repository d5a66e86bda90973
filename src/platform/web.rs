//! Browser bindings
//!
//! [`WebArcade`] is the JavaScript-facing wrapper around [`Arcade`]. The page
//! calls `frame(time)` from `requestAnimationFrame` and forwards keyboard and
//! mouse events; frames are painted onto a 2D canvas context.

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use crate::error::ArcadeError;
use crate::games::GameId;
use crate::host::Arcade;
use crate::renderer::shapes::as_bytes;
use crate::renderer::{Color, Surface};
use crate::settings::Settings;

/// Longest frame fed to the clock after a stall (tab switch, debugger)
const MAX_FRAME: Duration = Duration::from_millis(100);

fn js_error(err: ArcadeError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// 2D canvas context as a draw target
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `canvas_id`, size it and grab its 2D context
    pub fn attach(canvas_id: &str, width: f32, height: f32) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Convert client coordinates to canvas pixels, undoing CSS scaling
    fn canvas_point(&self, event: &MouseEvent) -> (f32, f32) {
        let rect = self.canvas.get_bounding_client_rect();
        let sx = if rect.width() > 0.0 {
            self.canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let sy = if rect.height() > 0.0 {
            self.canvas.height() as f64 / rect.height()
        } else {
            1.0
        };
        (
            ((event.client_x() as f64 - rect.left()) * sx) as f32,
            ((event.client_y() as f64 - rect.top()) * sy) as f32,
        )
    }
}

impl Surface for CanvasSurface {
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn line(&mut self, points: &[[f32; 2]], color: Color, width: f32) {
        let Some(([x0, y0], rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(*x0 as f64, *y0 as f64);
        for [x, y] in rest {
            self.ctx.line_to(*x as f64, *y as f64);
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn text(&mut self, text: &str, x: f32, y: f32, font: &str, color: Color) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(&color.to_css());
        if let Err(err) = self.ctx.fill_text(text, x as f64, y as f64) {
            log::warn!("fill_text failed: {err:?}");
        }
    }
}

#[wasm_bindgen]
pub struct WebArcade {
    arcade: Arcade,
    surface: Option<CanvasSurface>,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebArcade {
    /// Optional settings JSON; missing fields use defaults
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WebArcade, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(js_error)?,
            None => Settings::default(),
        };
        Ok(Self {
            arcade: Arcade::new(settings),
            surface: None,
            last_time: None,
        })
    }

    /// Ids of every available game
    pub fn games() -> js_sys::Array {
        GameId::ALL
            .iter()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }

    /// Mount `game` onto the canvas element with id `canvas_id`
    pub fn mount(&mut self, game: &str, canvas_id: &str) -> Result<(), JsValue> {
        let id = self.arcade.mount(game).map_err(js_error)?;
        let spec = id.spec();
        self.surface = Some(CanvasSurface::attach(canvas_id, spec.width, spec.height)?);
        self.last_time = None;
        self.paint();
        Ok(())
    }

    pub fn unmount(&mut self) {
        self.arcade.unmount();
        self.surface = None;
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.arcade.start().map_err(js_error)?;
        self.paint();
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.arcade.stop().map_err(js_error)?;
        self.paint();
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.arcade.reset().map_err(js_error)?;
        self.paint();
        Ok(())
    }

    /// `requestAnimationFrame` timestamp in ms; returns ticks run
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let elapsed = match self.last_time.replace(time_ms) {
            Some(last) => Duration::from_secs_f64(((time_ms - last) / 1000.0).max(0.0)),
            None => Duration::ZERO,
        };
        let ran = self.arcade.frame(elapsed.min(MAX_FRAME));
        if ran > 0 {
            self.paint();
        }
        ran
    }

    /// Returns true if the key belongs to the arcade (default was prevented)
    pub fn key_down(&mut self, event: &KeyboardEvent) -> bool {
        let used = self.arcade.key_down(&event.key());
        if used {
            event.prevent_default();
        }
        used
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) -> bool {
        self.arcade.key_up(&event.key())
    }

    pub fn pointer_move(&mut self, event: &MouseEvent) {
        let Some((x, y)) = self.surface.as_ref().map(|s| s.canvas_point(event)) else {
            return;
        };
        if self.arcade.pointer_move(x, y) {
            self.paint();
        }
    }

    pub fn click(&mut self, event: &MouseEvent) {
        if let Some((x, y)) = self.surface.as_ref().map(|s| s.canvas_point(event)) {
            self.arcade.click(x, y);
        }
    }

    /// Session summary as JSON
    pub fn hud(&self) -> Result<String, JsValue> {
        self.arcade.hud_json().map_err(js_error)
    }

    /// Last frame as a JSON command list
    pub fn frame_json(&self) -> Result<String, JsValue> {
        self.arcade.frame_json().map_err(js_error)
    }

    /// Last frame as packed `[x, y, r, g, b, a]` f32 vertices for a WebGL buffer
    pub fn vertex_bytes(&self) -> Option<Vec<u8>> {
        self.arcade.vertices().map(|v| as_bytes(&v).to_vec())
    }
}

impl WebArcade {
    fn paint(&mut self) {
        let surface = self.surface.as_mut().map(|s| s as &mut dyn Surface);
        self.arcade.paint(surface);
    }
}

#[wasm_bindgen(start)]
pub fn boot() {
    super::init_logging();
    log::info!("Pixel arcade ready: {} games", GameId::ALL.len());
}
