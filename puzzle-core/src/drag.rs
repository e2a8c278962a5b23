//! Pointer gestures on a single piece: `idle -> dragging -> (snapped | idle)`.
//!
//! The controller holds only the gesture in progress. Pieces and the session
//! are passed in by the owner, so the same transitions can be driven from DOM
//! callbacks, a test, or a replay.

use crate::animation::Tween;
use crate::config::{FrameRect, PuzzleConfig};
use crate::models::Point;
use crate::piece::Piece;
use crate::session::{Completion, SessionState};

/// Lives from pointer-down to pointer-up on one piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub piece: usize,
    /// Pointer minus piece position at grab time, so the piece does not jump.
    pub grab_offset: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moved {
    pub position: Point,
    /// Set on the move that started the session clock.
    pub timer_started: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DropOutcome {
    Snapped {
        piece: usize,
        distance: f64,
        completion: Option<Completion>,
    },
    Dropped {
        piece: usize,
        distance: f64,
    },
}

#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
    frame: FrameRect,
    snap_distance: f64,
    overshoot: f64,
    snap_move_ms: f64,
    snap_settle_ms: f64,
}

impl DragController {
    pub fn new(cfg: &PuzzleConfig) -> Self {
        DragController {
            state: DragState::Idle,
            frame: cfg.frame(),
            snap_distance: cfg.snap_distance,
            overshoot: cfg.snap_overshoot_scale,
            snap_move_ms: cfg.snap_move_ms,
            snap_settle_ms: cfg.snap_settle_ms,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn active_piece(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging(s) => Some(s.piece),
            DragState::Idle => None,
        }
    }

    /// Pointer down on `piece`. Fixed pieces and a second concurrent grab are
    /// ignored. A running entrance tween is completed so the piece is at full
    /// size while it moves.
    pub fn start(&mut self, piece: &mut Piece, pointer: Point) -> bool {
        if piece.is_fixed() || self.state != DragState::Idle {
            return false;
        }
        piece.finish_tween();
        piece.active = true;
        self.state = DragState::Dragging(DragSession {
            piece: piece.id,
            grab_offset: pointer - piece.position(),
        });
        log::debug!("drag start: {}", piece.name());
        true
    }

    /// Pointer moved while down. Keeps the whole piece inside the frame.
    pub fn drag(
        &mut self,
        piece: &mut Piece,
        session: &mut SessionState,
        pointer: Point,
        now: f64,
    ) -> Option<Moved> {
        let DragState::Dragging(s) = self.state else {
            return None;
        };
        if piece.is_fixed() || s.piece != piece.id {
            return None;
        }
        let timer_started = session.start_timer(now);
        let position = self.frame.clamp(pointer - s.grab_offset, piece.extent());
        piece.set_position(position);
        log::trace!("drag {} to ({:.1}, {:.1})", piece.id, position.x, position.y);
        Some(Moved {
            position,
            timer_started,
        })
    }

    /// Pointer released. Snaps when the drop is within the snap distance
    /// (inclusive); otherwise the piece stays where it was dropped.
    pub fn end(
        &mut self,
        piece: &mut Piece,
        session: &mut SessionState,
        now: f64,
    ) -> Option<DropOutcome> {
        let DragState::Dragging(s) = self.state else {
            return None;
        };
        if s.piece != piece.id {
            return None;
        }
        self.state = DragState::Idle;
        piece.active = false;
        if piece.is_fixed() {
            return None;
        }
        let distance = piece.distance_to_target();
        if distance > self.snap_distance {
            log::debug!("dropped {} {:.1}px from target", piece.name(), distance);
            return Some(DropOutcome::Dropped {
                piece: piece.id,
                distance,
            });
        }
        piece.fix(Tween::Snap {
            from: piece.position(),
            to: piece.target(),
            overshoot: self.overshoot,
            start_ms: now,
            move_ms: self.snap_move_ms,
            settle_ms: self.snap_settle_ms,
        });
        log::info!("snapped {}", piece.name());
        Some(DropOutcome::Snapped {
            piece: piece.id,
            distance,
            completion: session.record_correct(now),
        })
    }

    /// Abandon the gesture without a drop decision (pointer lost). The piece
    /// keeps its last position and stays movable.
    pub fn cancel(&mut self, piece: &mut Piece) -> bool {
        if self.active_piece() != Some(piece.id) {
            return false;
        }
        piece.active = false;
        self.state = DragState::Idle;
        log::debug!("drag cancelled: {}", piece.name());
        true
    }

    pub fn hover_enter(&self, piece: &mut Piece) -> bool {
        if piece.is_fixed() || piece.hovered {
            return false;
        }
        piece.hovered = true;
        true
    }

    pub fn hover_leave(&self, piece: &mut Piece) -> bool {
        if piece.is_fixed() || !piece.hovered {
            return false;
        }
        piece.hovered = false;
        true
    }
}
