use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Path2d};

use map_puzzle_core::constants::{
    FILL_BASE_REGION, LABEL_COLOR, STROKE_BASE_REGION, STROKE_PIECE,
};
use map_puzzle_core::{FrameRect, Piece};

use crate::state::State;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

/// Parse cached SVG path data once; the canvas reuses the `Path2d`s every frame.
pub fn build_paths<'a>(paths: impl Iterator<Item = &'a str>) -> Result<Vec<Path2d>, JsValue> {
    paths.map(Path2d::new_with_path_string).collect()
}

/// Repaint the whole scene at `now`.
pub fn draw(state: &State, now: f64) -> Result<(), JsValue> {
    let ctx = &state.ctx;
    let cfg = state.puzzle.config();
    ctx.clear_rect(0.0, 0.0, cfg.width, cfg.height);

    // base map
    ctx.set_line_width(1.0);
    set_fill_style(ctx, FILL_BASE_REGION);
    set_stroke_style(ctx, STROKE_BASE_REGION);
    for path in &state.region_paths {
        ctx.fill_with_path_2d(path);
        ctx.stroke_with_path(path);
    }

    ctx.set_font("9px sans-serif");
    ctx.set_text_align("center");
    set_fill_style(ctx, LABEL_COLOR);
    for (name, at) in state.puzzle.background_labels() {
        ctx.fill_text(name, at.x, at.y)?;
    }

    draw_frame(ctx, &cfg.frame());

    for piece in state.puzzle.pieces_in_draw_order() {
        if let Some(path) = state.piece_paths.get(piece.id) {
            draw_piece(ctx, piece, path, now)?;
        }
    }
    Ok(())
}

fn draw_frame(ctx: &CanvasRenderingContext2d, frame: &FrameRect) {
    ctx.set_line_width(5.0);
    set_stroke_style(ctx, "black");
    ctx.stroke_rect(frame.x, frame.y, frame.width, frame.height);
}

fn draw_piece(
    ctx: &CanvasRenderingContext2d,
    piece: &Piece,
    path: &Path2d,
    now: f64,
) -> Result<(), JsValue> {
    let d = piece.display(now);
    let c = piece.region.centroid;
    ctx.save();
    ctx.set_global_alpha(d.opacity);
    ctx.translate(d.at.x, d.at.y)?;
    ctx.scale(d.scale, d.scale)?;
    ctx.translate(-c.x, -c.y)?;

    ctx.set_shadow_color("rgba(0,0,0,0.2)");
    ctx.set_shadow_offset_y(1.0);
    ctx.set_shadow_blur(if piece.is_active() { 6.0 } else { 2.0 });
    set_fill_style(ctx, piece.fill());
    ctx.fill_with_path_2d(path);

    ctx.set_shadow_color("transparent");
    ctx.set_line_width(if piece.is_active() { 2.0 } else { 1.0 });
    set_stroke_style(ctx, STROKE_PIECE);
    ctx.stroke_with_path(path);

    if piece.is_fixed() {
        // label centered on the placed piece, outlined for contrast
        ctx.set_font("bold 9px sans-serif");
        ctx.set_text_align("center");
        ctx.set_line_width(2.0);
        set_stroke_style(ctx, "#000");
        ctx.stroke_text(piece.display_name(), c.x, c.y + 5.0)?;
        set_fill_style(ctx, "#ffffff");
        ctx.fill_text(piece.display_name(), c.x, c.y + 5.0)?;
    }
    ctx.restore();
    Ok(())
}
