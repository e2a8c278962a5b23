use std::rc::Rc;

use rand::Rng;

use crate::animation::Tween;
use crate::config::PuzzleConfig;
use crate::drag::{DragController, DragState, DropOutcome};
use crate::error::PuzzleError;
use crate::geojson::parse_regions;
use crate::layout::{perimeter_positions, shuffled_order};
use crate::models::{Point, ProjectedRegion, Region};
use crate::piece::Piece;
use crate::projection::Mercator;
use crate::session::SessionState;

/// Things the page needs to react to, in the order they happened.
#[derive(Clone, Debug, PartialEq)]
pub enum PuzzleEvent {
    ScoreChanged { correct: usize, total: usize },
    TimerStarted,
    PieceSnapped { piece: usize, name: String },
    BackgroundLabelRemoved { name: String },
    Completed { elapsed_ms: f64, time_label: String },
}

/// One puzzle run: pieces, their stacking order, the gesture in progress and
/// the session score and clock.
pub struct Puzzle {
    config: PuzzleConfig,
    regions: Vec<Rc<ProjectedRegion>>,
    pieces: Vec<Piece>,
    /// Piece ids, bottom to top.
    order: Vec<usize>,
    drag: DragController,
    session: SessionState,
    hovered: Option<usize>,
    events: Vec<PuzzleEvent>,
}

impl Puzzle {
    pub fn from_geojson<R: Rng + ?Sized>(
        text: &str,
        config: PuzzleConfig,
        rng: &mut R,
        now: f64,
    ) -> Result<Self, PuzzleError> {
        let regions = parse_regions(text, &config.name_field, config.label_field())?;
        Puzzle::new(config, &regions, rng, now)
    }

    pub fn new<R: Rng + ?Sized>(
        config: PuzzleConfig,
        regions: &[Region],
        rng: &mut R,
        now: f64,
    ) -> Result<Self, PuzzleError> {
        config.validate()?;
        let projection = Mercator::from_config(&config);
        let projected = regions
            .iter()
            .map(|r| projection.project_region(r).map(Rc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Puzzle::from_projected(config, projected, rng, now))
    }

    /// The total is the number of regions actually loaded.
    pub fn from_projected<R: Rng + ?Sized>(
        config: PuzzleConfig,
        regions: Vec<Rc<ProjectedRegion>>,
        rng: &mut R,
        now: f64,
    ) -> Self {
        let mut puzzle = Puzzle {
            drag: DragController::new(&config),
            session: SessionState::new(regions.len()),
            config,
            regions,
            pieces: Vec::new(),
            order: Vec::new(),
            hovered: None,
            events: Vec::new(),
        };
        puzzle.scatter(rng, now);
        puzzle
    }

    fn scatter<R: Rng + ?Sized>(&mut self, rng: &mut R, now: f64) {
        let n = self.regions.len();
        let shuffled = shuffled_order(n, rng);
        let slots = perimeter_positions(&self.config.frame(), self.config.frame_offset, n);
        self.pieces = shuffled
            .into_iter()
            .zip(slots)
            .enumerate()
            .map(|(id, (region_idx, at))| {
                let entrance = Tween::Entrance {
                    at,
                    from_scale: self.config.entrance_start_scale,
                    start_ms: now + id as f64 * self.config.entrance_stagger_ms,
                    duration_ms: self.config.entrance_duration_ms,
                };
                Piece::new(id, self.regions[region_idx].clone(), at, entrance)
            })
            .collect();
        self.order = (0..n).collect();
        self.events.push(self.score_event());
        log::info!("scattered {n} pieces");
    }

    /// Start over from the cached regions with a fresh shuffle and session.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R, now: f64) {
        self.drag = DragController::new(&self.config);
        self.session.reset(self.regions.len());
        self.hovered = None;
        self.events.clear();
        self.scatter(rng, now);
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn regions(&self) -> &[Rc<ProjectedRegion>] {
        &self.regions
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: usize) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn pieces_in_draw_order(&self) -> impl Iterator<Item = &Piece> {
        self.order.iter().map(|&id| &self.pieces[id])
    }

    /// Names and anchors of map labels still shown under unplaced pieces.
    pub fn background_labels(&self) -> impl Iterator<Item = (&str, Point)> {
        self.pieces
            .iter()
            .filter(|p| !p.is_fixed())
            .map(|p| (p.display_name(), p.target()))
    }

    /// Topmost movable piece under the pointer. Fixed pieces are inert and
    /// let the pointer through.
    pub fn piece_at(&self, pointer: Point, now: f64) -> Option<usize> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&id| !self.pieces[id].is_fixed() && self.pieces[id].hit(pointer, now))
    }

    pub fn pointer_down(&mut self, pointer: Point, now: f64) -> bool {
        let Some(id) = self.piece_at(pointer, now) else {
            return false;
        };
        if !self.drag.start(&mut self.pieces[id], pointer) {
            return false;
        }
        // a press without a preceding move still lands on the grabbed piece
        self.set_hover(Some(id));
        self.raise(id);
        true
    }

    pub fn pointer_move(&mut self, pointer: Point, now: f64) {
        if let Some(id) = self.drag.active_piece() {
            if let Some(m) = self
                .drag
                .drag(&mut self.pieces[id], &mut self.session, pointer, now)
                && m.timer_started
            {
                self.events.push(PuzzleEvent::TimerStarted);
            }
            return;
        }
        let under = if self.config.frame().contains(pointer) {
            self.piece_at(pointer, now)
        } else {
            None
        };
        self.set_hover(under);
    }

    pub fn pointer_up(&mut self, now: f64) -> Option<DropOutcome> {
        let id = self.drag.active_piece()?;
        let outcome = self.drag.end(&mut self.pieces[id], &mut self.session, now)?;
        if let DropOutcome::Snapped { completion, .. } = &outcome {
            let piece = &self.pieces[id];
            let name = piece.name().to_string();
            let label = piece.display_name().to_string();
            if self.hovered == Some(id) {
                self.hovered = None;
            }
            self.events.push(PuzzleEvent::PieceSnapped { piece: id, name });
            self.events.push(PuzzleEvent::BackgroundLabelRemoved { name: label });
            self.events.push(self.score_event());
            if let Some(c) = completion {
                self.events.push(PuzzleEvent::Completed {
                    elapsed_ms: c.elapsed_ms,
                    time_label: c.time_label.clone(),
                });
            }
        }
        Some(outcome)
    }

    /// The pointer was lost mid-gesture: released outside the page or the
    /// window lost focus. The piece stays where it is and remains movable.
    pub fn pointer_cancel(&mut self) -> bool {
        let Some(id) = self.drag.active_piece() else {
            return false;
        };
        self.drag.cancel(&mut self.pieces[id])
    }

    /// Pointer left the play area.
    pub fn pointer_leave(&mut self) {
        if self.drag.active_piece().is_none() {
            self.set_hover(None);
        }
    }

    fn set_hover(&mut self, next: Option<usize>) {
        if next == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered.take() {
            self.drag.hover_leave(&mut self.pieces[prev]);
        }
        if let Some(id) = next
            && self.drag.hover_enter(&mut self.pieces[id])
        {
            self.hovered = Some(id);
        }
    }

    fn raise(&mut self, id: usize) {
        if let Some(pos) = self.order.iter().position(|&p| p == id) {
            let it = self.order.remove(pos);
            self.order.push(it);
        }
    }

    /// Retire finished tweens. Returns whether anything is still animating.
    pub fn tick(&mut self, now: f64) -> bool {
        let mut animating = false;
        for p in &mut self.pieces {
            p.settle(now);
            animating |= p.is_animating();
        }
        animating
    }

    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    fn score_event(&self) -> PuzzleEvent {
        PuzzleEvent::ScoreChanged {
            correct: self.session.correct_count(),
            total: self.session.total_pieces(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, MultiPolygon, Polygon};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn square(name: &str, c: Point, half: f64) -> Rc<ProjectedRegion> {
        let ring = LineString::from(vec![
            (c.x - half, c.y - half),
            (c.x + half, c.y - half),
            (c.x + half, c.y + half),
            (c.x - half, c.y + half),
            (c.x - half, c.y - half),
        ]);
        Rc::new(ProjectedRegion {
            name: name.into(),
            display_name: name.to_uppercase(),
            outline: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
            path: String::new(),
            centroid: c,
            bounds: (c.x - half, c.y - half, c.x + half, c.y + half),
        })
    }

    fn two_piece_puzzle() -> Puzzle {
        let regions = vec![
            square("Edirne", Point::new(400.0, 300.0), 15.0),
            square("Van", Point::new(900.0, 500.0), 15.0),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        Puzzle::from_projected(PuzzleConfig::default(), regions, &mut rng, 0.0)
    }

    /// Drag piece `id` from its current spot to `to` and release.
    fn drag_to(pz: &mut Puzzle, id: usize, to: Point, now: f64) -> Option<DropOutcome> {
        let from = pz.piece(id).unwrap().position();
        assert!(pz.pointer_down(from, now));
        pz.pointer_move(to, now + 16.0);
        pz.pointer_up(now + 32.0)
    }

    #[test]
    fn scatter_uses_loaded_region_count() {
        let mut pz = two_piece_puzzle();
        assert_eq!(pz.session().total_pieces(), 2);
        assert_eq!(pz.pieces()[0].position(), Point::new(10.0, 90.0));
        assert_eq!(
            pz.drain_events(),
            vec![PuzzleEvent::ScoreChanged { correct: 0, total: 2 }]
        );
        let mut labels: Vec<_> = pz.background_labels().map(|(l, _)| l).collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["EDIRNE", "VAN"]);
    }

    #[test]
    fn pointer_down_on_empty_space_does_nothing() {
        let mut pz = two_piece_puzzle();
        assert!(!pz.pointer_down(Point::new(600.0, 400.0), 0.0));
        assert_eq!(pz.drag_state(), DragState::Idle);
    }

    #[test]
    fn grabbed_piece_is_raised() {
        let mut pz = two_piece_puzzle();
        let from = pz.piece(0).unwrap().position();
        assert!(pz.pointer_down(from, 0.0));
        let top = pz.pieces_in_draw_order().last().unwrap().id;
        assert_eq!(top, 0);
    }

    #[test]
    fn full_session_completes_once() {
        let mut pz = two_piece_puzzle();
        pz.drain_events();

        let t0 = pz.piece(0).unwrap().target();
        let t1 = pz.piece(1).unwrap().target();

        let out = drag_to(&mut pz, 0, Point::new(t0.x + 5.0, t0.y), 1_000.0).unwrap();
        assert!(matches!(out, DropOutcome::Snapped { completion: None, .. }));
        let name0 = pz.piece(0).unwrap().name().to_string();
        let label0 = name0.to_uppercase();
        assert_eq!(
            pz.drain_events(),
            vec![
                PuzzleEvent::TimerStarted,
                PuzzleEvent::PieceSnapped { piece: 0, name: name0 },
                PuzzleEvent::BackgroundLabelRemoved { name: label0 },
                PuzzleEvent::ScoreChanged { correct: 1, total: 2 },
            ]
        );
        assert_eq!(pz.background_labels().count(), 1);

        // a miss first, then the real drop
        let miss = drag_to(&mut pz, 1, Point::new(t1.x + 100.0, t1.y), 5_000.0).unwrap();
        assert!(matches!(miss, DropOutcome::Dropped { .. }));
        assert_eq!(pz.session().correct_count(), 1);

        let out = drag_to(&mut pz, 1, t1, 66_000.0).unwrap();
        let DropOutcome::Snapped { completion: Some(c), .. } = &out else {
            panic!("expected completion, got {out:?}");
        };
        assert_eq!(c.time_label, "01:05");
        let events = pz.drain_events();
        assert_eq!(
            events.last(),
            Some(&PuzzleEvent::Completed {
                elapsed_ms: c.elapsed_ms,
                time_label: "01:05".into()
            })
        );
        assert!(pz.session().is_complete());
        assert!(pz.piece_at(t1, 70_000.0).is_none());
    }

    #[test]
    fn hover_follows_pointer_but_not_fixed_pieces() {
        let mut pz = two_piece_puzzle();
        pz.tick(10_000.0);
        let p0 = pz.piece(0).unwrap().position();
        pz.pointer_move(p0, 10_000.0);
        assert!(pz.piece(0).unwrap().is_hovered());
        pz.pointer_move(Point::new(600.0, 400.0), 10_001.0);
        assert!(!pz.piece(0).unwrap().is_hovered());

        let t0 = pz.piece(0).unwrap().target();
        drag_to(&mut pz, 0, t0, 11_000.0);
        pz.pointer_move(t0, 12_000.0);
        assert!(!pz.piece(0).unwrap().is_hovered());
    }

    #[test]
    fn restart_resets_session_and_pieces() {
        let mut pz = two_piece_puzzle();
        let t0 = pz.piece(0).unwrap().target();
        drag_to(&mut pz, 0, t0, 100.0);
        assert_eq!(pz.session().correct_count(), 1);

        let mut rng = StdRng::seed_from_u64(9);
        pz.restart(&mut rng, 500.0);
        assert_eq!(pz.session().correct_count(), 0);
        assert_eq!(pz.session().started_at(), None);
        assert!(pz.pieces().iter().all(|p| !p.is_fixed()));
        assert_eq!(
            pz.drain_events(),
            vec![PuzzleEvent::ScoreChanged { correct: 0, total: 2 }]
        );
    }

    #[test]
    fn tick_retires_entrance_tweens() {
        let mut pz = two_piece_puzzle();
        assert!(pz.tick(100.0));
        // last piece starts 20ms late and runs 800ms
        assert!(!pz.tick(820.0));
        assert!(pz.pieces().iter().all(|p| p.scale() == 1.0));
    }

    #[test]
    fn cancel_releases_the_piece_without_a_drop() {
        let mut pz = two_piece_puzzle();
        pz.drain_events();
        let from = pz.piece(0).unwrap().position();
        assert!(pz.pointer_down(from, 1_000.0));
        pz.pointer_move(Point::new(300.0, 300.0), 1_016.0);
        assert!(pz.pointer_cancel());
        assert_eq!(pz.drag_state(), DragState::Idle);
        let p = pz.piece(0).unwrap();
        assert_eq!(p.position(), Point::new(300.0, 300.0));
        assert!(!p.is_fixed());
        assert!(!p.is_active());

        // later moves with no button held only hover
        pz.pointer_move(Point::new(600.0, 400.0), 1_032.0);
        assert_eq!(pz.piece(0).unwrap().position(), Point::new(300.0, 300.0));
        assert_eq!(pz.pointer_up(1_050.0), None);
        assert!(!pz.pointer_cancel());
        assert_eq!(pz.drain_events(), vec![PuzzleEvent::TimerStarted]);
        assert_eq!(pz.session().correct_count(), 0);
    }

    #[test]
    fn leaving_clears_hover_unless_dragging() {
        let mut pz = two_piece_puzzle();
        pz.tick(10_000.0);
        let p0 = pz.piece(0).unwrap().position();
        pz.pointer_move(p0, 10_000.0);
        assert!(pz.piece(0).unwrap().is_hovered());
        pz.pointer_leave();
        assert!(!pz.piece(0).unwrap().is_hovered());

        assert!(pz.pointer_down(p0, 10_100.0));
        pz.pointer_leave();
        assert!(pz.piece(0).unwrap().is_hovered());
        assert!(matches!(pz.drag_state(), DragState::Dragging(_)));
    }

    #[test]
    fn restart_mid_drag_drops_the_gesture() {
        let mut pz = two_piece_puzzle();
        let from = pz.piece(0).unwrap().position();
        assert!(pz.pointer_down(from, 0.0));
        pz.pointer_move(Point::new(300.0, 300.0), 16.0);

        let mut rng = StdRng::seed_from_u64(11);
        pz.restart(&mut rng, 100.0);
        assert_eq!(pz.drag_state(), DragState::Idle);
        assert!(pz.pieces().iter().all(|p| !p.is_active() && !p.is_hovered()));
        assert_eq!(pz.session().started_at(), None);

        let before: Vec<_> = pz.pieces().iter().map(|p| p.position()).collect();
        pz.pointer_move(Point::new(500.0, 500.0), 200.0);
        assert_eq!(pz.pointer_up(216.0), None);
        let after: Vec<_> = pz.pieces().iter().map(|p| p.position()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn hover_moves_to_the_grabbed_piece_and_survives_a_miss() {
        let mut pz = two_piece_puzzle();
        pz.tick(10_000.0);
        let p0 = pz.piece(0).unwrap().position();
        let p1 = pz.piece(1).unwrap().position();
        pz.pointer_move(p1, 10_000.0);
        assert!(pz.piece(1).unwrap().is_hovered());

        // press on piece 0 with no move in between
        assert!(pz.pointer_down(p0, 10_100.0));
        assert!(!pz.piece(1).unwrap().is_hovered());
        pz.pointer_move(Point::new(300.0, 300.0), 10_116.0);
        let miss = pz.pointer_up(10_132.0);
        assert!(matches!(miss, Some(DropOutcome::Dropped { piece: 0, .. })));
        // the pointer is still over the dropped piece
        assert!(pz.piece(0).unwrap().is_hovered());
        assert!(!pz.piece(1).unwrap().is_hovered());

        pz.pointer_move(Point::new(600.0, 400.0), 10_200.0);
        assert!(pz.pieces().iter().all(|p| !p.is_hovered()));
    }

    #[test]
    fn pointer_outside_the_frame_hovers_nothing() {
        let mut pz = two_piece_puzzle();
        pz.tick(10_000.0);
        // piece 0 sits on the left edge; its outline pokes past the frame
        let p0 = pz.piece(0).unwrap().position();
        pz.pointer_move(p0, 10_000.0);
        assert!(pz.piece(0).unwrap().is_hovered());
        let outside = Point::new(p0.x - 5.0, p0.y);
        assert!(pz.pieces()[0].hit(outside, 10_000.0));
        pz.pointer_move(outside, 10_001.0);
        assert!(!pz.piece(0).unwrap().is_hovered());
    }
}
