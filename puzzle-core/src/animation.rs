//! Cosmetic tweens. Sampled with an explicit clock so the engine stays
//! deterministic; nothing here affects where a piece logically is.

use crate::models::Point;

pub fn ease_cubic_out(t: f64) -> f64 {
    let u = t.clamp(0.0, 1.0) - 1.0;
    u * u * u + 1.0
}

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let u = t - 2.0;
        (u * u * u + 2.0) / 2.0
    }
}

fn progress(now: f64, start: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        1.0
    } else {
        ((now - start) / duration).clamp(0.0, 1.0)
    }
}

/// What the renderer needs for one piece at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub at: Point,
    pub scale: f64,
    pub opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tween {
    /// Fade in and grow in place after a per-piece delay.
    Entrance {
        at: Point,
        from_scale: f64,
        start_ms: f64,
        duration_ms: f64,
    },
    /// Glide to the target while overshooting the scale, then settle.
    Snap {
        from: Point,
        to: Point,
        overshoot: f64,
        start_ms: f64,
        move_ms: f64,
        settle_ms: f64,
    },
}

impl Tween {
    pub fn sample(&self, now: f64) -> Frame {
        match *self {
            Tween::Entrance {
                at,
                from_scale,
                start_ms,
                duration_ms,
            } => {
                let e = ease_cubic_out(progress(now, start_ms, duration_ms));
                Frame {
                    at,
                    scale: from_scale + (1.0 - from_scale) * e,
                    opacity: e,
                }
            }
            Tween::Snap {
                from,
                to,
                overshoot,
                start_ms,
                move_ms,
                settle_ms,
            } => {
                if now < start_ms + move_ms {
                    let e = ease_cubic_out(progress(now, start_ms, move_ms));
                    Frame {
                        at: from.lerp(to, e),
                        scale: 1.0 + (overshoot - 1.0) * e,
                        opacity: 1.0,
                    }
                } else {
                    let e = ease_cubic_in_out(progress(now, start_ms + move_ms, settle_ms));
                    Frame {
                        at: to,
                        scale: overshoot + (1.0 - overshoot) * e,
                        opacity: 1.0,
                    }
                }
            }
        }
    }

    pub fn end_ms(&self) -> f64 {
        match *self {
            Tween::Entrance {
                start_ms,
                duration_ms,
                ..
            } => start_ms + duration_ms,
            Tween::Snap {
                start_ms,
                move_ms,
                settle_ms,
                ..
            } => start_ms + move_ms + settle_ms,
        }
    }

    pub fn finished(&self, now: f64) -> bool {
        now >= self.end_ms()
    }
}
