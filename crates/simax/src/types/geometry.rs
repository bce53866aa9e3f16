/*! Geometry types for screen coordinates. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Axis-aligned rectangle in screen coordinates.
///
/// Width and height may be zero (collapsed or offscreen elements).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Frame {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl Frame {
  /// Frame from origin and size.
  pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// Width times height.
  pub fn area(&self) -> f64 {
    self.width * self.height
  }

  /// True when either dimension is zero or negative.
  pub fn is_empty(&self) -> bool {
    self.width <= 0.0 || self.height <= 0.0
  }

  /// Non-empty and not positioned above or left of the screen origin.
  pub fn is_visible(&self) -> bool {
    !self.is_empty() && self.x >= 0.0 && self.y >= 0.0
  }

  /// Midpoint of the frame.
  pub fn center(&self) -> Point {
    self.point_at(0.5, 0.5)
  }

  /// Point at fractional offsets (0.0-1.0) across the frame.
  pub fn point_at(&self, x_ratio: f64, y_ratio: f64) -> Point {
    Point::new(
      self.x + self.width * x_ratio,
      self.y + self.height * y_ratio,
    )
  }

  /// Check if a point is contained within this frame (edges inclusive).
  pub fn contains(&self, point: Point) -> bool {
    point.x >= self.x
      && point.x <= self.x + self.width
      && point.y >= self.y
      && point.y <= self.y + self.height
  }

  /// Frame rounded to whole points, used as part of identity signatures.
  #[allow(clippy::cast_possible_truncation)] // Screen coordinates fit in i64
  pub fn rounded(&self) -> [i64; 4] {
    [
      self.x.round() as i64,
      self.y.round() as i64,
      self.width.round() as i64,
      self.height.round() as i64,
    ]
  }
}

/// A 2D point in screen coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod frame_contains {
    use super::*;

    #[test]
    fn point_inside_frame() {
      let frame = Frame::new(0.0, 0.0, 100.0, 100.0);
      assert!(
        frame.contains(Point::new(50.0, 50.0)),
        "center point should be contained"
      );
    }

    #[test]
    fn corners_are_contained() {
      let frame = Frame::new(10.0, 20.0, 100.0, 50.0);
      assert!(frame.contains(Point::new(10.0, 20.0)), "top-left corner");
      assert!(frame.contains(Point::new(110.0, 20.0)), "top-right corner");
      assert!(frame.contains(Point::new(10.0, 70.0)), "bottom-left corner");
      assert!(
        frame.contains(Point::new(110.0, 70.0)),
        "bottom-right corner"
      );
    }

    #[test]
    fn point_outside_frame() {
      let frame = Frame::new(0.0, 0.0, 100.0, 100.0);
      assert!(!frame.contains(Point::new(-1.0, 50.0)), "left of frame");
      assert!(!frame.contains(Point::new(101.0, 50.0)), "right of frame");
      assert!(!frame.contains(Point::new(50.0, -1.0)), "above frame");
      assert!(!frame.contains(Point::new(50.0, 101.0)), "below frame");
    }

    #[test]
    fn zero_size_frame() {
      let frame = Frame::new(50.0, 50.0, 0.0, 0.0);
      assert!(
        frame.contains(Point::new(50.0, 50.0)),
        "point at zero-size frame origin"
      );
      assert!(
        !frame.contains(Point::new(50.1, 50.0)),
        "point near zero-size frame"
      );
    }
  }

  mod frame_visibility {
    use super::*;

    #[test]
    fn positive_frame_on_screen_is_visible() {
      assert!(Frame::new(0.0, 0.0, 10.0, 10.0).is_visible());
    }

    #[test]
    fn zero_width_is_not_visible() {
      let frame = Frame::new(10.0, 10.0, 0.0, 10.0);
      assert!(frame.is_empty(), "zero width is empty");
      assert!(!frame.is_visible(), "empty frames are hidden");
    }

    #[test]
    fn negative_origin_is_not_visible() {
      assert!(
        !Frame::new(-5.0, 10.0, 10.0, 10.0).is_visible(),
        "offscreen to the left"
      );
      assert!(
        !Frame::new(5.0, -10.0, 10.0, 10.0).is_visible(),
        "offscreen above"
      );
    }
  }

  mod frame_points {
    use super::*;

    #[test]
    fn center_of_frame() {
      let c = Frame::new(100.0, 100.0, 50.0, 20.0).center();
      assert_eq!(c, Point::new(125.0, 110.0));
    }

    #[test]
    fn ratio_points_scale_from_origin() {
      let frame = Frame::new(0.0, 100.0, 400.0, 800.0);
      let p = frame.point_at(0.72, 0.62);
      assert!((p.x - 288.0).abs() < 1e-9, "x ratio applied to width");
      assert!((p.y - 596.0).abs() < 1e-9, "y ratio applied to height");
    }

    #[test]
    fn rounded_collapses_subpixel_jitter() {
      let a = Frame::new(10.2, 20.4, 99.6, 50.1);
      let b = Frame::new(9.8, 19.9, 100.4, 49.7);
      assert_eq!(a.rounded(), b.rounded(), "sub-point jitter rounds away");
    }
  }
}
