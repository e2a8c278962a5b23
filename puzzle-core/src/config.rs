use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::PuzzleError;
use crate::models::{Extent, Point};

/// Map projection settings. Center is (longitude, latitude) in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub center: (f64, f64),
    pub scale: f64,
    /// Screen position of `center`; the canvas middle when absent.
    pub translate: Option<(f64, f64)>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            center: PROJECTION_CENTER,
            scale: PROJECTION_SCALE,
            translate: None,
        }
    }
}

/// Everything that shapes one puzzle instance. Any subset of fields may be
/// given in JSON; the rest fall back to the built-in Turkey map settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub width: f64,
    pub height: f64,
    pub frame_margin: f64,
    pub frame_offset: f64,
    pub snap_distance: f64,
    pub projection: ProjectionConfig,
    pub name_field: String,
    /// Property holding the label text; `name_field` when absent.
    pub label_field: Option<String>,
    pub data_url: String,
    pub entrance_start_scale: f64,
    pub entrance_duration_ms: f64,
    pub entrance_stagger_ms: f64,
    pub snap_overshoot_scale: f64,
    pub snap_move_ms: f64,
    pub snap_settle_ms: f64,
    pub timer_tick_ms: u32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        PuzzleConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_margin: FRAME_MARGIN,
            frame_offset: FRAME_OFFSET,
            snap_distance: SNAP_DISTANCE,
            projection: ProjectionConfig::default(),
            name_field: DEFAULT_NAME_FIELD.to_string(),
            label_field: None,
            data_url: DEFAULT_DATA_URL.to_string(),
            entrance_start_scale: ENTRANCE_START_SCALE,
            entrance_duration_ms: ENTRANCE_DURATION_MS,
            entrance_stagger_ms: ENTRANCE_STAGGER_MS,
            snap_overshoot_scale: SNAP_OVERSHOOT_SCALE,
            snap_move_ms: SNAP_MOVE_MS,
            snap_settle_ms: SNAP_SETTLE_MS,
            timer_tick_ms: TIMER_TICK_MS,
        }
    }
}

/// The bordered play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Clamp an anchor point so the box `ext` drawn around it stays inside.
    /// A box larger than the frame is centred on that axis.
    pub fn clamp(&self, p: Point, ext: Extent) -> Point {
        Point {
            x: clamp_axis(p.x, self.x + ext.left, self.x + self.width - ext.right),
            y: clamp_axis(p.y, self.y + ext.top, self.y + self.height - ext.bottom),
        }
    }
}

fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        v.clamp(lo, hi)
    }
}

impl PuzzleConfig {
    pub fn from_json(text: &str) -> Result<Self, PuzzleError> {
        let cfg: PuzzleConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(PuzzleError::InvalidConfig(format!(
                    "`{name}` must be a positive number, got {v}"
                )))
            }
        };
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("snap_distance", self.snap_distance)?;
        positive("projection.scale", self.projection.scale)?;
        if !(self.frame_margin.is_finite() && self.frame_margin >= 0.0) {
            return Err(PuzzleError::InvalidConfig(
                "`frame_margin` must be non-negative".into(),
            ));
        }
        if 2.0 * self.frame_margin >= self.width.min(self.height) {
            return Err(PuzzleError::InvalidConfig(
                "`frame_margin` leaves no room for the frame".into(),
            ));
        }
        if self.name_field.trim().is_empty() {
            return Err(PuzzleError::InvalidConfig("`name_field` is empty".into()));
        }
        if let Some(label) = &self.label_field
            && label.trim().is_empty()
        {
            return Err(PuzzleError::InvalidConfig("`label_field` is empty".into()));
        }
        Ok(())
    }

    pub fn label_field(&self) -> &str {
        self.label_field.as_deref().unwrap_or(&self.name_field)
    }

    /// Apply `?data=..&snap=..&field=..&label=..` overrides from a page URL.
    /// Unknown keys and unparsable numbers are ignored.
    pub fn apply_query(&mut self, search: &str) {
        if let Some(v) = get_query_param(search, "data")
            && !v.is_empty()
        {
            self.data_url = v;
        }
        if let Some(v) = get_query_param(search, "snap")
            && let Ok(d) = v.parse::<f64>()
            && d.is_finite()
            && d > 0.0
        {
            self.snap_distance = d;
        }
        if let Some(v) = get_query_param(search, "field")
            && !v.trim().is_empty()
        {
            self.name_field = v;
        }
        if let Some(v) = get_query_param(search, "label")
            && !v.trim().is_empty()
        {
            self.label_field = Some(v);
        }
    }

    pub fn frame(&self) -> FrameRect {
        FrameRect {
            x: self.frame_margin,
            y: self.frame_margin,
            width: self.width - self.frame_margin * 2.0,
            height: self.height - self.frame_margin * 2.0,
        }
    }

    pub fn translate(&self) -> (f64, f64) {
        self.projection
            .translate
            .unwrap_or((self.width / 2.0, self.height / 2.0))
    }
}

/// Simple query string parser for `?a=b&c=d`.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}
