/// Application-wide numeric constants.
/// Values are expressed in screen pixels unless noted otherwise.
pub const DEFAULT_WIDTH: f64 = 1200.0;
pub const DEFAULT_HEIGHT: f64 = 800.0;
/// Gap between the canvas edge and the drawn frame.
pub const FRAME_MARGIN: f64 = 10.0;
/// How far scattered pieces sit inside the frame edge.
pub const FRAME_OFFSET: f64 = 80.0;
/// Drop tolerance around a piece's target centroid (inclusive).
pub const SNAP_DISTANCE: f64 = 20.0;

/// Mercator center as (longitude, latitude) in degrees.
pub const PROJECTION_CENTER: (f64, f64) = (35.0, 39.0);
pub const PROJECTION_SCALE: f64 = 3000.0;

/// Entrance tween (milliseconds).
pub const ENTRANCE_START_SCALE: f64 = 0.7;
pub const ENTRANCE_DURATION_MS: f64 = 800.0;
pub const ENTRANCE_STAGGER_MS: f64 = 20.0;

/// Snap tween: move with overshoot, then settle.
pub const SNAP_OVERSHOOT_SCALE: f64 = 1.05;
pub const SNAP_MOVE_MS: f64 = 300.0;
pub const SNAP_SETTLE_MS: f64 = 200.0;

pub const TIMER_TICK_MS: u32 = 1000;
pub const CELEBRATION_PULSE_MS: u32 = 250;

pub const FILL_DEFAULT: &str = "#ccc";
pub const FILL_HOVER: &str = "#e9c46a";
pub const FILL_CORRECT: &str = "#2a9d8f";
pub const FILL_BASE_REGION: &str = "#f0f0f0";
pub const STROKE_BASE_REGION: &str = "#bbb";
pub const STROKE_PIECE: &str = "#333";
pub const LABEL_COLOR: &str = "#444";

pub const DEFAULT_NAME_FIELD: &str = "ilad";
pub const DEFAULT_DATA_URL: &str = "turkiye.geojson";
