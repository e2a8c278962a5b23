use std::cell::RefCell;
use std::rc::Rc;

use rand::thread_rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlElement, MouseEvent, Window,
};

use map_puzzle_core::constants::CELEBRATION_PULSE_MS;
use map_puzzle_core::session::congratulations;
use map_puzzle_core::{Burst, Celebration, Puzzle, PuzzleConfig, PuzzleError, PuzzleEvent};

mod canvas;
mod state;
mod ui;
mod utils;

use crate::canvas::{build_paths, draw};
use crate::state::State;
use crate::utils::{
    asset_url, event_canvas_coords, fetch_text_with_fallbacks, init_logging, now_ms,
};

fn to_js(e: PuzzleError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or("no window")?;
    let search = window.location().search().unwrap_or_default();
    init_logging(&search);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = boot(window, search).await {
            log::error!("failed to start puzzle: {:?}", err);
        }
    });
    Ok(())
}

/// Optional `puzzle.json` next to the page, then URL overrides.
async fn load_config(window: &Window, search: &str) -> Result<PuzzleConfig, JsValue> {
    let mut config = match fetch_text_with_fallbacks(window, &[&asset_url("puzzle.json")]).await
    {
        Some(text) => PuzzleConfig::from_json(&text).map_err(to_js)?,
        None => PuzzleConfig::default(),
    };
    config.apply_query(search);
    Ok(config)
}

async fn boot(window: Window, search: String) -> Result<(), JsValue> {
    let document = window.document().ok_or("no document")?;
    let config = load_config(&window, &search).await?;
    let (canvas, ctx) = init_canvas(&document, config.width, config.height)?;

    let text = fetch_text_with_fallbacks(
        &window,
        &[&asset_url(&config.data_url), &config.data_url],
    )
    .await
    .ok_or_else(|| JsValue::from_str(&format!("could not load {}", config.data_url)))?;
    let now = now_ms(&window);
    let puzzle = Puzzle::from_geojson(&text, config, &mut thread_rng(), now).map_err(to_js)?;
    let region_paths = build_paths(puzzle.regions().iter().map(|r| r.path.as_str()))?;
    let piece_paths = build_paths(puzzle.pieces().iter().map(|p| p.region.path.as_str()))?;

    ui::set_text(&document, ui::TIMER_ID, "00:00");
    ui::set_visible(&document, ui::MESSAGE_ID, false);

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        ctx,
        puzzle,
        region_paths,
        piece_paths,
        clock_interval: None,
        celebration: None,
        dirty: true,
    }));

    attach_pointer(state.clone())?;
    attach_restart(state.clone())?;
    handle_events(&state);
    start_animation(state);
    Ok(())
}

fn init_canvas(
    document: &Document,
    width: f64,
    height: f64,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let container = document
        .get_element_by_id("map-container")
        .ok_or_else(|| JsValue::from_str("#map-container not found"))?;
    let cv = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    cv.set_width(width as u32);
    cv.set_height(height as u32);
    container.append_child(&cv)?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

fn attach_pointer(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let (window, canvas) = {
        let s = state.borrow();
        (s.window.clone(), s.canvas.clone())
    };
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let pt = event_canvas_coords(&e, &s.canvas);
            let now = now_ms(&s.window);
            if s.puzzle.pointer_down(pt, now) {
                e.prevent_default();
                s.dirty = true;
            }
        }));
        canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        // on the window so a drag keeps tracking outside the canvas
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            {
                let mut s = st.borrow_mut();
                // button released where no mouseup reached us
                if e.buttons() & 1 == 0 && s.puzzle.pointer_cancel() {
                    log::debug!("drag lost its button");
                }
                let pt = event_canvas_coords(&e, &s.canvas);
                let now = now_ms(&s.window);
                s.puzzle.pointer_move(pt, now);
                s.dirty = true;
            }
            handle_events(&st);
        }));
        window.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        let st = state.clone();
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            {
                let mut s = st.borrow_mut();
                let now = now_ms(&s.window);
                if s.puzzle.pointer_up(now).is_some() {
                    s.dirty = true;
                }
            }
            handle_events(&st);
        }));
        window.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }
    {
        let st = state.clone();
        let mouseleave = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            let mut s = st.borrow_mut();
            s.puzzle.pointer_leave();
            s.dirty = true;
        }));
        canvas.add_event_listener_with_callback("mouseleave", mouseleave.as_ref().unchecked_ref())?;
        mouseleave.forget();
    }
    {
        let st = state.clone();
        let blur = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
            let mut s = st.borrow_mut();
            if s.puzzle.pointer_cancel() {
                s.dirty = true;
            }
        }));
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }
    Ok(())
}

fn attach_restart(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    if let Some(btn) = doc.get_element_by_id(ui::RESTART_ID) {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(err) = restart(&st) {
                log::error!("restart failed: {:?}", err);
            }
            handle_events(&st);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

/// Fresh shuffle, zero score, stopped clock, hidden message.
fn restart(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let mut s = state.borrow_mut();
    s.clear_intervals();
    let now = now_ms(&s.window);
    s.puzzle.restart(&mut thread_rng(), now);
    let piece_paths = build_paths(s.puzzle.pieces().iter().map(|p| p.region.path.as_str()))?;
    s.piece_paths = piece_paths;
    ui::set_text(&s.document, ui::TIMER_ID, "00:00");
    ui::set_visible(&s.document, ui::MESSAGE_ID, false);
    s.dirty = true;
    Ok(())
}

/// Route engine events to the page collaborators.
fn handle_events(state: &Rc<RefCell<State>>) {
    let events = state.borrow_mut().puzzle.drain_events();
    for ev in events {
        let res = match ev {
            PuzzleEvent::ScoreChanged { .. } => {
                let s = state.borrow();
                ui::set_text(&s.document, ui::SCORE_ID, &s.puzzle.session().score_label());
                Ok(())
            }
            PuzzleEvent::TimerStarted => start_clock(state),
            PuzzleEvent::PieceSnapped { .. } | PuzzleEvent::BackgroundLabelRemoved { .. } => {
                state.borrow_mut().dirty = true;
                Ok(())
            }
            PuzzleEvent::Completed { time_label, .. } => finish(state, &time_label),
        };
        if let Err(err) = res {
            log::error!("event handling failed: {:?}", err);
        }
    }
}

fn start_clock(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let st = state.clone();
    let tick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let s = st.borrow();
        let label = s.puzzle.session().timer_label(now_ms(&s.window));
        ui::set_text(&s.document, ui::TIMER_ID, &label);
    }));
    let mut s = state.borrow_mut();
    let id = s.window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        s.puzzle.config().timer_tick_ms as i32,
    )?;
    tick.forget();
    s.clock_interval = Some(id);
    Ok(())
}

fn finish(state: &Rc<RefCell<State>>, time_label: &str) -> Result<(), JsValue> {
    {
        let mut s = state.borrow_mut();
        if let Some(id) = s.clock_interval.take() {
            s.window.clear_interval_with_handle(id);
        }
        ui::set_text(&s.document, ui::TIMER_ID, time_label);
        ui::set_text(&s.document, ui::MESSAGE_ID, &congratulations(time_label));
        ui::set_visible(&s.document, ui::MESSAGE_ID, true);
    }
    start_celebration(state)
}

fn start_celebration(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let st = state.clone();
    let pulse = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let mut s = st.borrow_mut();
        let now = now_ms(&s.window);
        let window = s.window.clone();
        let Some((_, show)) = s.celebration.as_mut() else {
            return;
        };
        match show.pulse(now, &mut thread_rng()) {
            Some(bursts) => {
                for b in &bursts {
                    fire_confetti(&window, b);
                }
            }
            None => {
                if let Some((id, _)) = s.celebration.take() {
                    window.clear_interval_with_handle(id);
                }
            }
        }
    }));
    let mut s = state.borrow_mut();
    let now = now_ms(&s.window);
    let id = s.window.set_interval_with_callback_and_timeout_and_arguments_0(
        pulse.as_ref().unchecked_ref(),
        CELEBRATION_PULSE_MS as i32,
    )?;
    pulse.forget();
    s.celebration = Some((id, Celebration::begin(now)));
    Ok(())
}

/// Hand one burst to the page's `confetti()` function, if it has one.
fn fire_confetti(window: &Window, burst: &Burst) {
    let Ok(f) = js_sys::Reflect::get(window, &JsValue::from_str("confetti")) else {
        return;
    };
    let Some(f) = f.dyn_ref::<js_sys::Function>() else {
        return;
    };
    let Ok(json) = serde_json::to_string(burst) else {
        return;
    };
    if let Ok(arg) = js_sys::JSON::parse(&json) {
        let _ = f.call1(&JsValue::NULL, &arg);
    }
}

fn start_animation(state: Rc<RefCell<State>>) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        {
            let mut s = state.borrow_mut();
            let animating = s.puzzle.tick(ts);
            if animating || s.dirty {
                if let Err(err) = draw(&s, ts) {
                    log::warn!("draw failed: {:?}", err);
                }
                // one extra frame so the last tween step lands
                s.dirty = animating;
            }
        }
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(f: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
    if let Some(window) = web_sys::window()
        && let Some(cb) = f.borrow().as_ref()
    {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
