//! Browser front end: canvas setup, arrow-key hops, the animation-frame loop
//! and drawing of the pyramid.
//!
//! All game state lives in a thread-local `GameState`; the level core is
//! driven with the elapsed time between animation frames.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::character::{Direction, Hopper, HopperPhase};
use crate::config::GameConfig;
use crate::level::{Block, BlockKind, Face, GridCoord, LevelController, levels};

const CANVAS_W: u32 = 512;
const CANVAS_H: u32 = 420;
// Pixels per grid unit; layout columns/rows are two units apart.
const COLUMN_PX: f64 = 16.0;
const ROW_PX: f64 = 12.0;
const CUBE_HALF_W: f64 = 16.0;
const TOP_HALF_H: f64 = 8.0;
const SIDE_H: f64 = 16.0;
const BOARD_OFFSET_Y: f64 = 20.0;
// Largest frame step fed to the core (tab switches produce huge gaps).
const MAX_FRAME_MS: f64 = 100.0;

struct GameState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    config: GameConfig,
    level_index: usize,
    controller: LevelController<Hopper>,
    advance_requested: Rc<Cell<bool>>,
    last_frame_ms: Option<f64>,
}

thread_local! {
    static GAME_STATE: RefCell<Option<GameState>> = const { RefCell::new(None) };
}

fn build_level(
    index: usize,
    config: &GameConfig,
    advance_requested: &Rc<Cell<bool>>,
) -> Result<LevelController<Hopper>, JsValue> {
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let spec = &levels()[index % levels().len()];
    let hopper = Hopper::new(config.level.spawn, &config.level, &config.character);
    let mut controller = LevelController::new(spec, &config.level, hopper)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let flag = advance_requested.clone();
    controller.on_level_cleared(move |cleared| {
        log::info!("'{}' cleared ({} blocks)", cleared.name, cleared.blocks);
        flag.set(true);
    });
    Ok(controller)
}

#[wasm_bindgen]
pub fn start_game_mode() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("bh-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("bh-canvas");
        c.set_width(CANVAS_W);
        c.set_height(CANVAS_H);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border-radius:12px; border:2px solid #222; background:#101018;").ok();
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_font("16px 'Fira Code', monospace");

    let config = GameConfig::default();
    let advance_requested = Rc::new(Cell::new(false));
    let controller = build_level(0, &config, &advance_requested)?;
    let state = GameState {
        canvas,
        ctx,
        config,
        level_index: 0,
        controller,
        advance_requested,
        last_frame_ms: None,
    };
    GAME_STATE.with(|s| s.replace(Some(state)));

    // Arrow keys (or Q/E/A/D) hop diagonally.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let Some(direction) = Direction::from_key(&evt.key()) else {
                return;
            };
            evt.prevent_default();
            GAME_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    state.controller.character_mut().jump(direction);
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_game_loop();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_game_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        GAME_STATE.with(|state_cell| {
            if let Some(state) = state_cell.borrow_mut().as_mut() {
                game_tick(state, ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), callback.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn game_tick(state: &mut GameState, now: f64) {
    let dt = state
        .last_frame_ms
        .map(|last| (now - last).clamp(0.0, MAX_FRAME_MS))
        .unwrap_or(0.0);
    state.last_frame_ms = Some(now);

    if let Err(e) = state.controller.update(dt) {
        log::error!("level update failed: {e}");
    }

    // Next level once the win sequence has played out.
    if state.advance_requested.get()
        && state.controller.character().phase() == HopperPhase::Idle
    {
        state.advance_requested.set(false);
        state.controller.teardown();
        let next = (state.level_index + 1) % levels().len();
        match build_level(next, &state.config, &state.advance_requested) {
            Ok(controller) => {
                state.controller = controller;
                state.level_index = next;
            }
            Err(e) => log::error!("could not build level {next}: {e:?}"),
        }
    }

    render_game(state, now);
}

// --- Drawing -----------------------------------------------------------------

fn face_color(kind: &BlockKind) -> &'static str {
    match kind.as_str() {
        "blue" => "#3a6ff0",
        "yellow" => "#f0d43a",
        "green" => "#3ac46f",
        "grey" => "#8a8a8a",
        "red" => "#e04848",
        "purple" => "#9a4ad8",
        _ => "#cccccc",
    }
}

fn to_screen(row: f64, column: f64, canvas_w: f64) -> (f64, f64) {
    // Centre the 13-column pyramid (grid columns 3..=27) horizontally.
    let x = canvas_w / 2.0 + (column - 15.0) * COLUMN_PX;
    let y = BOARD_OFFSET_Y + row * ROW_PX;
    (x, y)
}

fn render_game(state: &GameState, now: f64) {
    let ctx = &state.ctx;
    let w = state.canvas.width() as f64;
    let h = state.canvas.height() as f64;
    ctx.set_fill_style_str("#101018");
    ctx.fill_rect(0.0, 0.0, w, h);

    let grid = state.controller.grid();
    for coord in grid.coords() {
        if let Some(block) = grid.at(coord) {
            draw_block(ctx, block, coord, w);
        }
    }

    draw_hopper(ctx, state.controller.character(), w, now);

    // Reference face swatch
    ctx.set_fill_style_str("#ddd");
    ctx.set_text_align("left");
    ctx.fill_text("Target", 12.0, 24.0).ok();
    draw_rhombus(
        ctx,
        92.0,
        18.0,
        CUBE_HALF_W,
        TOP_HALF_H,
        face_color(state.controller.target_face()),
    );
    ctx.set_text_align("right");
    ctx.fill_text(state.controller.name(), w - 12.0, 24.0).ok();
    if state.controller.is_cleared() {
        ctx.set_text_align("center");
        ctx.set_fill_style_str("#ffd166");
        ctx.fill_text("CLEARED!", w / 2.0, h - 20.0).ok();
    }
}

fn draw_block(ctx: &CanvasRenderingContext2d, block: &Block, coord: GridCoord, canvas_w: f64) {
    let (x, y) = to_screen(coord.row as f64, coord.column as f64, canvas_w);
    // Sides
    ctx.set_fill_style_str("#5a4a3a");
    polygon(
        ctx,
        &[
            (x - CUBE_HALF_W, y),
            (x, y + TOP_HALF_H),
            (x, y + TOP_HALF_H + SIDE_H),
            (x - CUBE_HALF_W, y + SIDE_H),
        ],
    );
    ctx.set_fill_style_str("#2e3a4a");
    polygon(
        ctx,
        &[
            (x + CUBE_HALF_W, y),
            (x, y + TOP_HALF_H),
            (x, y + TOP_HALF_H + SIDE_H),
            (x + CUBE_HALF_W, y + SIDE_H),
        ],
    );

    // Top face squashes through the rotation, showing the old face for the
    // first half of it.
    let (color, half_w, shift) = match block.rotation() {
        Some((direction, t)) => {
            let shown = if t < 0.5 {
                match block.face() {
                    Face::Base => Face::Target,
                    Face::Target => Face::Base,
                }
            } else {
                block.face()
            };
            let squash = (std::f64::consts::PI * t).cos().abs().max(0.08);
            let lean = direction.step().1 as f64 * (1.0 - squash) * 4.0;
            (face_color(block.face_kind(shown)), CUBE_HALF_W * squash, lean)
        }
        None => (face_color(block.current_face()), CUBE_HALF_W, 0.0),
    };
    draw_rhombus(ctx, x + shift, y, half_w, TOP_HALF_H, color);
}

fn draw_hopper(ctx: &CanvasRenderingContext2d, hopper: &Hopper, canvas_w: f64, now: f64) {
    let s = hopper.render_state();
    let (x, mut y) = to_screen(s.row, s.column, canvas_w);
    y -= 10.0 + s.lift * ROW_PX;
    let mut alpha = 1.0;
    match s.phase {
        HopperPhase::Dying => {
            y += s.phase_progress * 240.0;
            alpha = 1.0 - s.phase_progress;
        }
        HopperPhase::Spawning => y -= (1.0 - s.phase_progress) * 120.0,
        HopperPhase::Celebrating => y -= ((now / 90.0).sin().abs()) * 8.0,
        HopperPhase::Idle | HopperPhase::Jumping => {}
    }
    ctx.set_global_alpha(alpha);
    ctx.set_fill_style_str("#ff8c1a");
    ctx.begin_path();
    ctx.arc(x, y, 9.0, 0.0, std::f64::consts::TAU).ok();
    ctx.fill();
    ctx.set_global_alpha(1.0);
}

fn draw_rhombus(ctx: &CanvasRenderingContext2d, x: f64, y: f64, half_w: f64, half_h: f64, color: &str) {
    ctx.set_fill_style_str(color);
    polygon(
        ctx,
        &[(x, y - half_h), (x + half_w, y), (x, y + half_h), (x - half_w, y)],
    );
}

fn polygon(ctx: &CanvasRenderingContext2d, points: &[(f64, f64)]) {
    let Some(((x0, y0), rest)) = points.split_first() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(*x0, *y0);
    for (x, y) in rest {
        ctx.line_to(*x, *y);
    }
    ctx.close_path();
    ctx.fill();
}
