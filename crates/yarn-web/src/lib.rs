//! `#[wasm_bindgen]` exports for the yarn menu.
//!
//! The host calls `menu_init` once with its JSON config and viewport, then
//! `menu_tick` from `requestAnimationFrame`, forwarding pointer and key
//! events in between. After each tick it reads the header, strand, glyph,
//! vector, and event sections straight out of wasm memory.

pub mod runner;

pub use runner::MenuRunner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use yarn_engine::{InputEvent, MenuConfig, Viewport};

thread_local! {
    static RUNNER: RefCell<Option<MenuRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner, or return `fallback` before `menu_init`.
fn with_runner<R>(fallback: R, f: impl FnOnce(&mut MenuRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            web_sys::console::warn_1(&"yarn: menu not initialized, call menu_init() first".into());
            fallback
        }
    })
}

fn push(event: InputEvent) {
    with_runner((), |r| r.push_input(event));
}

fn viewport(width: f32, height: f32, device_pixel_ratio: f32) -> Result<Viewport, JsValue> {
    Viewport::new(width, height, device_pixel_ratio).map_err(|e| {
        log::error!("yarn: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

/// Build the menu. An empty `config_json` uses the built-in strands.
#[wasm_bindgen]
pub fn menu_init(config_json: &str, width: f32, height: f32, device_pixel_ratio: f32) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let viewport = viewport(width, height, device_pixel_ratio)?;
    let built = if config_json.trim().is_empty() {
        MenuRunner::new(MenuConfig::default(), viewport)
    } else {
        MenuRunner::from_json(config_json, viewport)
    };
    let runner = built.map_err(|e| {
        log::error!("yarn: {}", e);
        JsValue::from_str(&e.to_string())
    })?;

    log::info!("yarn: initialized with {} strands", runner.strand_count());
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    Ok(())
}

#[wasm_bindgen]
pub fn menu_tick(dt: f32) {
    with_runner((), |r| r.tick(dt));
}

#[wasm_bindgen]
pub fn menu_resize(width: f32, height: f32, device_pixel_ratio: f32) -> Result<(), JsValue> {
    let viewport = viewport(width, height, device_pixel_ratio)?;
    with_runner((), |r| r.resize(viewport));
    Ok(())
}

#[wasm_bindgen]
pub fn menu_set_tessellate(on: bool) {
    with_runner((), |r| r.set_tessellate(on));
}

// ---- Input ----

#[wasm_bindgen]
pub fn menu_pointer_move(x: f32, y: f32) {
    push(InputEvent::PointerMove { x, y });
}

#[wasm_bindgen]
pub fn menu_pointer_down(x: f32, y: f32) {
    push(InputEvent::PointerDown { x, y });
}

#[wasm_bindgen]
pub fn menu_pointer_up(x: f32, y: f32) {
    push(InputEvent::PointerUp { x, y });
}

#[wasm_bindgen]
pub fn menu_click(x: f32, y: f32) {
    push(InputEvent::Click { x, y });
}

#[wasm_bindgen]
pub fn menu_strand_enter(strand: u32, x: f32) {
    push(InputEvent::StrandEnter { strand, x });
}

#[wasm_bindgen]
pub fn menu_strand_move(strand: u32, x: f32) {
    push(InputEvent::StrandMove { strand, x });
}

#[wasm_bindgen]
pub fn menu_strand_leave(strand: u32) {
    push(InputEvent::StrandLeave { strand });
}

#[wasm_bindgen]
pub fn menu_strand_click(strand: u32) {
    push(InputEvent::StrandClick { strand });
}

#[wasm_bindgen]
pub fn menu_close() {
    push(InputEvent::Close);
}

#[wasm_bindgen]
pub fn menu_key_down(key_code: u32) {
    push(InputEvent::KeyDown { key_code });
}

/// Call once the user has granted device-orientation access.
#[wasm_bindgen]
pub fn menu_grant_motion() {
    with_runner((), |r| r.grant_motion());
}

#[wasm_bindgen]
pub fn menu_tilt(gamma: f32) {
    push(InputEvent::Tilt { gamma });
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.header_ptr())
}

/// Header copy for hosts that don't map wasm memory.
#[wasm_bindgen]
pub fn get_header() -> js_sys::Float32Array {
    with_runner(js_sys::Float32Array::new_with_length(0), |r| {
        js_sys::Float32Array::from(r.header())
    })
}

#[wasm_bindgen]
pub fn get_strands_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.strands_ptr())
}

#[wasm_bindgen]
pub fn get_strand_count() -> u32 {
    with_runner(0, |r| r.strand_count())
}

#[wasm_bindgen]
pub fn get_glyphs_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.glyphs_ptr())
}

#[wasm_bindgen]
pub fn get_glyph_count() -> u32 {
    with_runner(0, |r| r.glyph_count())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.events_ptr())
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(0, |r| r.event_count())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.vector_vertices_ptr())
}

#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(0, |r| r.vector_vertex_count())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(0, |r| r.buffer_total_floats())
}

// ---- Per-strand queries ----

#[wasm_bindgen]
pub fn get_svg_path(strand: u32) -> Option<String> {
    with_runner(None, |r| r.svg_path(strand))
}

#[wasm_bindgen]
pub fn get_strand_target(strand: u32) -> Option<String> {
    with_runner(None, |r| r.target(strand))
}

#[wasm_bindgen]
pub fn get_strand_label(strand: u32) -> Option<String> {
    with_runner(None, |r| r.label(strand))
}

#[wasm_bindgen]
pub fn get_strand_color(strand: u32) -> Option<String> {
    with_runner(None, |r| r.color_hex(strand))
}
