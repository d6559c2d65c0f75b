use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// 12 o'clock expressed in cairo's angle space (0 at 3 o'clock, clockwise).
pub const START_OFFSET: f64 = -PI / 2.0;
/// Pointer positions this close to the center carry no usable angle.
pub const DEAD_ZONE_RADIUS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Angle of `point` around `center`, 0 at 12 o'clock growing clockwise, in `[0, 2π)`.
pub fn angle_of(center: Point, point: Point) -> f64 {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    let angle = (dy.atan2(dx) - START_OFFSET).rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if angle >= TAU { 0.0 } else { angle }
}

pub fn fraction_for_angle(angle: f64) -> f64 {
    (angle.rem_euclid(TAU) / TAU).clamp(0.0, 1.0)
}

pub fn angle_for_fraction(fraction: f64) -> f64 {
    fraction.clamp(0.0, 1.0) * TAU
}

pub fn to_cairo_angle(angle: f64) -> f64 {
    angle + START_OFFSET
}

pub fn point_at(center: Point, radius: f64, angle: f64) -> Point {
    let theta = to_cairo_angle(angle);
    Point::new(
        center.x + radius * theta.cos(),
        center.y + radius * theta.sin(),
    )
}

/// Sizes that shape the ring, in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// Width of the ring.
    pub thickness: f64,
    /// Gap between the ring's outer edge and the widget edge.
    pub padding: f64,
    /// Gap between the thumb center and the widget edge.
    pub thumb_padding: f64,
    /// Gap between the zero indicator and the widget's top edge.
    pub zero_indicator_padding: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            thickness: 10.0,
            padding: 0.0,
            thumb_padding: 5.0,
            zero_indicator_padding: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Thumb,
    Track,
}

/// Resolved ring geometry for one allocation of the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub orbit_radius: f64,
    pub zero_indicator: Point,
}

impl Layout {
    pub fn new(width: f64, height: f64, metrics: &Metrics) -> Self {
        let half = width.min(height).max(0.0) / 2.0;
        let center = Point::new(width / 2.0, height / 2.0);
        let outer_radius = (half - metrics.padding).max(0.0);
        let inner_radius = (outer_radius - metrics.thickness).max(0.0);

        Self {
            center,
            outer_radius,
            inner_radius,
            orbit_radius: (half - metrics.thumb_padding).max(0.0),
            zero_indicator: Point::new(center.x, center.y - half + metrics.zero_indicator_padding),
        }
    }

    pub fn track_radius(&self) -> f64 {
        (self.outer_radius + self.inner_radius) / 2.0
    }

    pub fn track_width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    pub fn thumb_center(&self, fraction: f64) -> Point {
        point_at(self.center, self.orbit_radius, angle_for_fraction(fraction))
    }

    /// Fraction of the full sweep pointed at by `point`, `None` inside the dead zone.
    pub fn fraction_at(&self, point: Point) -> Option<f64> {
        (self.center.distance(point) > DEAD_ZONE_RADIUS)
            .then(|| fraction_for_angle(angle_of(self.center, point)))
    }

    /// The thumb wins over the track; the track band is widened by the thumb
    /// radius so grabbing slightly off the ring still works.
    pub fn hit_test(&self, point: Point, fraction: f64, thumb_radius: f64) -> Option<Hit> {
        if self.thumb_center(fraction).distance(point) <= thumb_radius {
            return Some(Hit::Thumb);
        }

        let dist = self.center.distance(point);
        let lower = (self.inner_radius - thumb_radius).max(0.0);
        let upper = self.outer_radius + thumb_radius;
        (lower..=upper).contains(&dist).then_some(Hit::Track)
    }
}
