//! Geographic to screen projection.

use std::f64::consts::FRAC_PI_4;
use std::fmt::Write;

use geo::{BoundingRect, Centroid};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};

use crate::config::PuzzleConfig;
use crate::error::PuzzleError;
use crate::models::{Point, ProjectedRegion, Region};

/// Spherical Mercator with a fixed center, scale and screen translation.
#[derive(Clone, Copy, Debug)]
pub struct Mercator {
    k: f64,
    lambda0: f64,
    y0: f64,
    tx: f64,
    ty: f64,
}

fn mercator_y(phi: f64) -> f64 {
    (FRAC_PI_4 + phi / 2.0).tan().ln()
}

impl Mercator {
    pub fn new(center: (f64, f64), scale: f64, translate: (f64, f64)) -> Self {
        Mercator {
            k: scale,
            lambda0: center.0.to_radians(),
            y0: mercator_y(center.1.to_radians()),
            tx: translate.0,
            ty: translate.1,
        }
    }

    pub fn from_config(cfg: &PuzzleConfig) -> Self {
        Mercator::new(cfg.projection.center, cfg.projection.scale, cfg.translate())
    }

    /// Project (longitude, latitude) in degrees to screen pixels.
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        Point {
            x: self.tx + self.k * (lon.to_radians() - self.lambda0),
            y: self.ty - self.k * (mercator_y(lat.to_radians()) - self.y0),
        }
    }

    fn project_ring(&self, ring: &LineString<f64>) -> LineString<f64> {
        ring.coords()
            .map(|c| self.project(c.x, c.y).into())
            .collect::<Vec<Coord<f64>>>()
            .into()
    }

    pub fn project_shape(&self, shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        MultiPolygon::new(
            shape
                .iter()
                .map(|poly| {
                    Polygon::new(
                        self.project_ring(poly.exterior()),
                        poly.interiors().iter().map(|r| self.project_ring(r)).collect(),
                    )
                })
                .collect(),
        )
    }

    /// Project a region once and cache its outline, path, centroid and bounds.
    pub fn project_region(&self, region: &Region) -> Result<ProjectedRegion, PuzzleError> {
        let outline = self.project_shape(&region.shape);
        let empty = || PuzzleError::EmptyGeometry {
            name: region.name.clone(),
        };
        let centroid: Point = outline.centroid().ok_or_else(empty)?.into();
        let rect = outline.bounding_rect().ok_or_else(empty)?;
        let path = svg_path(&outline);
        Ok(ProjectedRegion {
            name: region.name.clone(),
            display_name: region.display_name.clone(),
            path,
            centroid,
            bounds: (rect.min().x, rect.min().y, rect.max().x, rect.max().y),
            outline,
        })
    }
}

/// SVG path data with one closed subpath per ring.
pub fn svg_path(shape: &MultiPolygon<f64>) -> String {
    let mut out = String::new();
    for poly in shape {
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            let mut coords = ring.coords();
            // a closed ring repeats its first point; `Z` covers that
            let n = ring.0.len().saturating_sub(usize::from(ring.is_closed()));
            if let Some(first) = coords.next() {
                let _ = write!(out, "M{:.2},{:.2}", first.x, first.y);
                for c in coords.take(n.saturating_sub(1)) {
                    let _ = write!(out, "L{:.2},{:.2}", c.x, c.y);
                }
                out.push('Z');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn center_lands_on_translate() {
        let m = Mercator::new((35.0, 39.0), 3000.0, (600.0, 400.0));
        let p = m.project(35.0, 39.0);
        assert!(close(p.x, 600.0) && close(p.y, 400.0));
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let m = Mercator::new((35.0, 39.0), 3000.0, (600.0, 400.0));
        let east = m.project(36.0, 39.0);
        let north = m.project(35.0, 40.0);
        assert!(close(east.x - 600.0, 3000.0 * 1f64.to_radians()));
        assert!(north.y < 400.0);
    }

    #[test]
    fn region_centroid_and_bounds() {
        // identity-like projection over a tiny area around the equator
        let m = Mercator::new((0.0, 0.0), 180.0 / std::f64::consts::PI, (0.0, 0.0));
        let square = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 0.001), (0.0, 0.001), (0.0, 0.0)]),
            vec![],
        );
        let region = Region {
            name: "sq".into(),
            display_name: "Square".into(),
            shape: MultiPolygon::new(vec![square]),
        };
        let pr = m.project_region(&region).unwrap();
        assert!(close(pr.centroid.x, 1.0));
        assert_eq!(pr.display_name, "Square");
        assert!((pr.width() - 2.0).abs() < 1e-9);
        assert!(pr.path.starts_with("M0.00,"));
        assert_eq!(pr.path.matches('L').count(), 3);
        assert!(pr.path.ends_with('Z'));
    }

    #[test]
    fn empty_region_is_an_error() {
        let m = Mercator::new((0.0, 0.0), 1.0, (0.0, 0.0));
        let region = Region {
            name: "void".into(),
            display_name: "void".into(),
            shape: MultiPolygon::new(vec![]),
        };
        assert!(matches!(
            m.project_region(&region),
            Err(PuzzleError::EmptyGeometry { .. })
        ));
    }
}
