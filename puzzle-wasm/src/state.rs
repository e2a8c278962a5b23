use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Path2d, Window};

use map_puzzle_core::{Celebration, Puzzle};

/// Runtime state stored behind an `Rc<RefCell<_>>` so it can be shared
/// across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub puzzle: Puzzle,
    /// One path per projected region, for the base map.
    pub region_paths: Vec<Path2d>,
    /// One path per piece id.
    pub piece_paths: Vec<Path2d>,
    /// `setInterval` handle of the game clock.
    pub clock_interval: Option<i32>,
    /// `setInterval` handle and schedule of the confetti show.
    pub celebration: Option<(i32, Celebration)>,
    /// Something changed since the last paint.
    pub dirty: bool,
}

impl State {
    pub fn clear_intervals(&mut self) {
        if let Some(id) = self.clock_interval.take() {
            self.window.clear_interval_with_handle(id);
        }
        if let Some((id, _)) = self.celebration.take() {
            self.window.clear_interval_with_handle(id);
        }
    }
}
