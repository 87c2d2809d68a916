//! Battlefield path geometry.
//!
//! A path is picked from a small set of hand-drawn templates, jittered with
//! the simulation RNG, scaled into the field, and re-sampled into evenly
//! spaced waypoints. Once built it never changes; enemies only ever ask it
//! "where is distance d along you?".

use glam::DVec2;
use rand::Rng;

use kingdom_core::constants::*;

/// Normalized (0..1) control points for one path shape.
pub struct PathTemplate {
    pub name: &'static str,
    pub points: &'static [(f64, f64)],
}

pub const PATH_TEMPLATES: [PathTemplate; 4] = [
    PathTemplate {
        name: "serpentine",
        points: &[
            (0.0, 0.5),
            (0.2, 0.3),
            (0.38, 0.68),
            (0.6, 0.35),
            (0.78, 0.7),
            (1.0, 0.5),
        ],
    },
    PathTemplate {
        name: "meandering",
        points: &[
            (0.0, 0.65),
            (0.18, 0.75),
            (0.35, 0.4),
            (0.52, 0.55),
            (0.72, 0.25),
            (1.0, 0.35),
        ],
    },
    PathTemplate {
        name: "switchback",
        points: &[
            (0.0, 0.35),
            (0.22, 0.2),
            (0.4, 0.75),
            (0.58, 0.25),
            (0.76, 0.75),
            (1.0, 0.45),
        ],
    },
    PathTemplate {
        name: "riverbend",
        points: &[
            (0.0, 0.45),
            (0.18, 0.6),
            (0.34, 0.2),
            (0.5, 0.4),
            (0.68, 0.18),
            (0.86, 0.65),
            (1.0, 0.55),
        ],
    },
];

/// Size of the battlefield the path is laid into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl FieldBounds {
    /// Horizontal and vertical margins kept free around the path.
    pub fn margins(&self) -> DVec2 {
        let base = FIELD_MIN_MARGIN.max(self.width.min(self.height) * FIELD_MARGIN_FRACTION);
        let cap = |side: f64| (side / 2.0 - FIELD_EDGE_RESERVE).max(FIELD_MARGIN_FLOOR);
        DVec2::new(base.min(cap(self.width)), base.min(cap(self.height)))
    }
}

/// Where a distance along the path lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub position: DVec2,
    /// True once the distance reaches the final waypoint.
    pub end_reached: bool,
}

/// An immutable polyline with precomputed segment lengths.
#[derive(Debug, Clone)]
pub struct PathModel {
    waypoints: Vec<DVec2>,
    segment_lengths: Vec<f64>,
    /// Distance from the start to each waypoint.
    cumulative: Vec<f64>,
    template: &'static str,
}

impl PathModel {
    /// Pick a template, jitter it, and lay it into `bounds`.
    pub fn generate<R: Rng>(rng: &mut R, bounds: FieldBounds) -> Self {
        let index = rng.gen_range(0..PATH_TEMPLATES.len());
        let template = &PATH_TEMPLATES[index];
        let last = template.points.len().saturating_sub(1);

        let jittered: Vec<DVec2> = template
            .points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                if i == 0 || i == last {
                    DVec2::new(x, y)
                } else {
                    DVec2::new(
                        (x + rng.gen_range(-PATH_JITTER_X..=PATH_JITTER_X)).clamp(0.0, 1.0),
                        (y + rng.gen_range(-PATH_JITTER_Y..=PATH_JITTER_Y)).clamp(0.0, 1.0),
                    )
                }
            })
            .collect();

        let margins = bounds.margins();
        let span = DVec2::new(
            (bounds.width - margins.x * 2.0).max(10.0),
            (bounds.height - margins.y * 2.0).max(10.0),
        );
        let control: Vec<DVec2> = jittered.iter().map(|p| margins + *p * span).collect();

        let mut path = Self::from_waypoints(resample(&control, PATH_RESAMPLE_STEP));
        if path.is_degenerate() {
            log::warn!("Path template {} collapsed, using straight line", template.name);
            path = Self::straight_line(bounds);
        }
        path.template = template.name;
        path
    }

    /// Build a path directly from waypoints, without re-sampling.
    pub fn from_waypoints(waypoints: Vec<DVec2>) -> Self {
        let segment_lengths: Vec<f64> = waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        let mut cumulative = Vec::with_capacity(waypoints.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for length in &segment_lengths {
            total += length;
            cumulative.push(total);
        }
        if waypoints.is_empty() {
            cumulative.clear();
        }
        Self {
            waypoints,
            segment_lengths,
            cumulative,
            template: "custom",
        }
    }

    /// Horizontal line across the middle of the field, inside the margins.
    pub fn straight_line(bounds: FieldBounds) -> Self {
        let margins = bounds.margins();
        let y = bounds.height / 2.0;
        let control = [
            DVec2::new(margins.x, y),
            DVec2::new((bounds.width - margins.x).max(margins.x + 10.0), y),
        ];
        let mut path = Self::from_waypoints(resample(&control, PATH_RESAMPLE_STEP));
        path.template = "straight";
        path
    }

    fn is_degenerate(&self) -> bool {
        self.waypoints.len() < 2 || self.total_length() <= 0.0
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    pub fn waypoints(&self) -> &[DVec2] {
        &self.waypoints
    }

    pub fn segment_lengths(&self) -> &[f64] {
        &self.segment_lengths
    }

    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn start(&self) -> DVec2 {
        self.waypoints.first().copied().unwrap_or(DVec2::ZERO)
    }

    pub fn end(&self) -> DVec2 {
        self.waypoints.last().copied().unwrap_or(DVec2::ZERO)
    }

    /// Position at `distance` along the path, clamped to both ends.
    pub fn point_at(&self, distance: f64) -> PathPoint {
        // NaN fails every comparison below; treat it as the start.
        let distance = if distance.is_nan() { 0.0 } else { distance };
        let total = self.total_length();
        if self.waypoints.len() < 2 || distance >= total {
            return PathPoint {
                position: self.end(),
                end_reached: true,
            };
        }
        if distance <= 0.0 {
            return PathPoint {
                position: self.start(),
                end_reached: false,
            };
        }

        // First waypoint strictly past `distance` ends the segment we are on.
        // Zero-length segments never satisfy the strict comparison.
        let next = self.cumulative.partition_point(|&d| d <= distance);
        let segment = next - 1;
        let into = distance - self.cumulative[segment];
        let length = self.segment_lengths[segment];
        let t = if length > 0.0 { into / length } else { 0.0 };
        PathPoint {
            position: self.waypoints[segment].lerp(self.waypoints[next], t),
            end_reached: false,
        }
    }

    /// Shortest distance from `point` to any segment of the path.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        match self.waypoints.len() {
            0 => f64::INFINITY,
            1 => self.waypoints[0].distance(point),
            _ => self
                .waypoints
                .windows(2)
                .map(|pair| distance_to_segment(point, pair[0], pair[1]))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

/// Split each control segment into pieces no longer than `step`.
/// The final control point is always kept.
fn resample(control: &[DVec2], step: f64) -> Vec<DVec2> {
    let mut points = Vec::new();
    for pair in control.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let pieces = ((start.distance(end) / step).floor() as usize).max(1);
        for s in 0..pieces {
            points.push(start.lerp(end, s as f64 / pieces as f64));
        }
    }
    if let Some(last) = control.last() {
        points.push(*last);
    }
    points
}

fn distance_to_segment(point: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}
