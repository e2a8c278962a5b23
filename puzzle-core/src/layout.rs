use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::FrameRect;
use crate::models::Point;

/// Evenly spaced starting points along the inside of `frame`.
///
/// The perimeter is walked clockwise from the top-left corner (top, right,
/// bottom, left). Each edge is pulled `offset` pixels towards the interior so
/// pieces never sit on the border itself. `count == 0` yields nothing.
pub fn perimeter_positions(frame: &FrameRect, offset: f64, count: usize) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let (w, h) = (frame.width, frame.height);
    let step = frame.perimeter() / count as f64;
    (0..count)
        .map(|i| {
            let d = step * i as f64;
            if d < w {
                Point::new(frame.x + d, frame.y + offset)
            } else if d < w + h {
                Point::new(frame.x + w - offset, frame.y + (d - w))
            } else if d < 2.0 * w + h {
                Point::new(frame.x + w - (d - w - h), frame.y + h - offset)
            } else {
                Point::new(frame.x + offset, frame.y + h - (d - 2.0 * w - h))
            }
        })
        .collect()
}

/// Random piece order, independent of how regions neighbour each other.
pub fn shuffled_order<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    order.shuffle(rng);
    order
}
