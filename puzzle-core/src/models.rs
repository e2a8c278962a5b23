use geo::Contains;
use geo_types::{Coord, MultiPolygon};
use serde::{Deserialize, Serialize};

/// Basic two dimensional point in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn lerp(self, to: Point, t: f64) -> Point {
        Point {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

impl From<geo_types::Point<f64>> for Point {
    fn from(p: geo_types::Point<f64>) -> Self {
        Point { x: p.x(), y: p.y() }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// One administrative area as read from the boundary document, in
/// longitude/latitude degrees.
#[derive(Clone, Debug)]
pub struct Region {
    /// Value of the configured name property. Identifies the region.
    pub name: String,
    /// Text shown on the map and on a placed piece.
    pub display_name: String,
    pub shape: MultiPolygon<f64>,
}

/// Distances from a centroid to the four sides of its bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// A region after projection. Built once at load and shared read-only by
/// its piece for the lifetime of the puzzle.
#[derive(Clone, Debug)]
pub struct ProjectedRegion {
    pub name: String,
    pub display_name: String,
    /// Outline in screen pixels.
    pub outline: MultiPolygon<f64>,
    /// SVG path data for `outline`.
    pub path: String,
    pub centroid: Point,
    /// (min_x, min_y, max_x, max_y) of `outline`.
    pub bounds: (f64, f64, f64, f64),
}

impl ProjectedRegion {
    pub fn width(&self) -> f64 {
        self.bounds.2 - self.bounds.0
    }

    pub fn height(&self) -> f64 {
        self.bounds.3 - self.bounds.1
    }

    /// Rendered bounding box around the centroid at `scale`. Not symmetric
    /// for most regions.
    pub fn extent(&self, scale: f64) -> Extent {
        let (min_x, min_y, max_x, max_y) = self.bounds;
        let c = self.centroid;
        Extent {
            left: (c.x - min_x) * scale,
            top: (c.y - min_y) * scale,
            right: (max_x - c.x) * scale,
            bottom: (max_y - c.y) * scale,
        }
    }

    /// Hit test for a piece whose centroid is drawn at `at` with `scale`.
    pub fn contains_at(&self, at: Point, scale: f64, pointer: Point) -> bool {
        if scale <= 0.0 {
            return false;
        }
        let local = Point {
            x: self.centroid.x + (pointer.x - at.x) / scale,
            y: self.centroid.y + (pointer.y - at.y) / scale,
        };
        let (min_x, min_y, max_x, max_y) = self.bounds;
        if local.x < min_x || local.x > max_x || local.y < min_y || local.y > max_y {
            return false;
        }
        self.outline
            .contains(&geo_types::Point::new(local.x, local.y))
    }
}
