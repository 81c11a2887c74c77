//! Geometry types for view rectangles and screen coordinates.

use serde::{Deserialize, Serialize};

/// A point in view or screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }
}

/// Dimensions of a view or paper area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in device-independent pixels
    pub width: i32,
    /// Height in device-independent pixels
    pub height: i32,
}

impl Size {
    /// Create new dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A rectangle in view or screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal position
    pub x: i32,
    /// Vertical position
    pub y: i32,
    /// Width in device-independent pixels
    pub width: i32,
    /// Height in device-independent pixels
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Minimal non-empty rectangle at the origin.
    ///
    /// Used as the fallback view rectangle when a session carries no render
    /// delegate: downstream geometry code cannot handle an empty region, so
    /// the host never reports one.
    pub fn minimal() -> Self {
        Self::new(0, 0, 1, 1)
    }

    /// Whether either extent is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Return this rectangle with both extents clamped to at least 1,
    /// preserving the position.
    pub fn non_empty(&self) -> Self {
        if self.is_empty() {
            Self::new(self.x, self.y, 1, 1)
        } else {
            *self
        }
    }

    /// Check if a point is contained within this rectangle.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Information about the screen a session is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenInfo {
    /// Device scale factor (DIP to physical pixel ratio)
    pub device_scale_factor: f64,
    /// Bits per color component
    pub depth: i32,
    /// Bits per color component, per channel
    pub depth_per_component: i32,
    /// Whether the screen is monochrome
    pub is_monochrome: bool,
    /// Full screen rectangle
    pub rect: Rect,
    /// Screen rectangle minus OS reserved areas
    pub available_rect: Rect,
}

impl Default for ScreenInfo {
    fn default() -> Self {
        Self {
            device_scale_factor: 1.0,
            depth: 32,
            depth_per_component: 8,
            is_monochrome: false,
            rect: Rect::zero(),
            available_rect: Rect::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = Point::new(3, 9);
        assert_eq!(p.x, 3);
        assert_eq!(p.y, 9);
        assert_eq!(Point::origin(), Point::new(0, 0));
    }

    #[test]
    fn test_rect_minimal_is_non_empty() {
        let rect = Rect::minimal();
        assert!(!rect.is_empty());
        assert_eq!(rect, Rect::new(0, 0, 1, 1));
    }

    #[test]
    fn test_rect_non_empty_clamps_zero_area() {
        let rect = Rect::new(10, 20, 0, 50);
        let clamped = rect.non_empty();
        assert_eq!(clamped, Rect::new(10, 20, 1, 1));
    }

    #[test]
    fn test_rect_non_empty_preserves_valid() {
        let rect = Rect::new(10, 20, 640, 480);
        assert_eq!(rect.non_empty(), rect);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10, 10, 20, 20);

        assert!(rect.contains(&Point::new(10, 10))); // top-left corner
        assert!(rect.contains(&Point::new(15, 25))); // inside
        assert!(rect.contains(&Point::new(29, 29))); // bottom-right (inclusive)

        assert!(!rect.contains(&Point::new(9, 10))); // left
        assert!(!rect.contains(&Point::new(30, 10))); // right
        assert!(!rect.contains(&Point::new(10, 30))); // below
    }

    #[test]
    fn test_screen_info_default() {
        let info = ScreenInfo::default();
        assert_eq!(info.device_scale_factor, 1.0);
        assert_eq!(info.depth, 32);
        assert!(!info.is_monochrome);
    }
}
