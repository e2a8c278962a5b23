use std::rc::Rc;

use crate::animation::{Frame, Tween};
use crate::models::{Extent, Point, ProjectedRegion};

/// Rendered state of a piece at one instant.
pub type Display = Frame;

/// One draggable region.
#[derive(Clone, Debug)]
pub struct Piece {
    pub id: usize,
    pub region: Rc<ProjectedRegion>,
    /// Where the piece belongs; never changes.
    target: Point,
    /// Logical position of the piece's centroid.
    position: Point,
    scale: f64,
    opacity: f64,
    fixed: bool,
    pub(crate) hovered: bool,
    pub(crate) active: bool,
    tween: Option<Tween>,
}

impl Piece {
    /// A piece waiting at `start`, shrunk and transparent until its entrance
    /// tween plays.
    pub fn new(id: usize, region: Rc<ProjectedRegion>, start: Point, entrance: Tween) -> Self {
        let first = entrance.sample(f64::NEG_INFINITY);
        Piece {
            id,
            target: region.centroid,
            region,
            position: start,
            scale: first.scale,
            opacity: first.opacity,
            fixed: false,
            hovered: false,
            active: false,
            tween: Some(entrance),
        }
    }

    pub fn name(&self) -> &str {
        &self.region.name
    }

    pub fn display_name(&self) -> &str {
        &self.region.display_name
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn distance_to_target(&self) -> f64 {
        self.position.distance(self.target)
    }

    /// Rendered bounding box around the position at the current scale.
    pub fn extent(&self) -> Extent {
        self.region.extent(self.scale)
    }

    pub fn fill(&self) -> &'static str {
        crate::piece_fill(self.fixed, self.hovered)
    }

    /// Pointer hit test against the outline as currently drawn.
    pub fn hit(&self, pointer: Point, now: f64) -> bool {
        let d = self.display(now);
        self.region.contains_at(d.at, d.scale, pointer)
    }

    pub fn display(&self, now: f64) -> Display {
        match &self.tween {
            Some(t) => t.sample(now),
            None => Frame {
                at: self.position,
                scale: self.scale,
                opacity: self.opacity,
            },
        }
    }

    /// SVG style transform string for the renderer.
    pub fn transform(&self, now: f64) -> String {
        let d = self.display(now);
        format!("translate({}, {}) scale({})", d.at.x, d.at.y, d.scale)
    }

    /// Drop finished tweens and adopt their final frame.
    pub fn settle(&mut self, now: f64) {
        if let Some(t) = self.tween
            && t.finished(now)
        {
            let end = t.sample(t.end_ms());
            self.scale = end.scale;
            self.opacity = end.opacity;
            self.tween = None;
        }
    }

    /// Jump any running tween to its end state.
    pub(crate) fn finish_tween(&mut self) {
        if let Some(t) = self.tween.take() {
            let end = t.sample(t.end_ms());
            self.scale = end.scale;
            self.opacity = end.opacity;
        }
    }

    pub(crate) fn set_position(&mut self, p: Point) {
        self.position = p;
    }

    /// Lock onto the target. Terminal: nothing un-fixes a piece.
    pub(crate) fn fix(&mut self, tween: Tween) {
        self.position = self.target;
        self.fixed = true;
        self.hovered = false;
        self.active = false;
        self.tween = Some(tween);
    }
}
