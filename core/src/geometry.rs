//! Integer pixel geometry shared by rooms and entities.

use serde::{Deserialize, Serialize};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

/// Pixel coordinate measured from the top-left corner of the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point at the provided pixel coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the point shifted by the provided pixel offsets.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Width and height of a sprite or rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    /// Creates a new size from explicit pixel dimensions.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Vertical extent in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }
}

/// Straight segment between two pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Line {
    start: Point,
    end: Point,
}

impl Line {
    /// Creates a segment running from `start` to `end`.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// First endpoint of the segment.
    #[must_use]
    pub const fn start(&self) -> Point {
        self.start
    }

    /// Second endpoint of the segment.
    #[must_use]
    pub const fn end(&self) -> Point {
        self.end
    }
}

/// Axis-aligned rectangle covering the pixels `[x, x + width)` by `[y, y + height)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Creates a rectangle anchored at the provided top-left corner.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from an origin point and a size.
    #[must_use]
    pub const fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x(), origin.y(), size.width(), size.height())
    }

    /// Left edge of the rectangle.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Top edge of the rectangle.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width of the rectangle in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the rectangle in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Reports whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Midpoint of the rectangle, rounded toward the origin.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Reports whether the point lies inside the covered pixels.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x() >= self.x
            && point.x() < self.x + self.width
            && point.y() >= self.y
            && point.y() < self.y + self.height
    }

    /// Returns the rectangle shrunk by `offset` pixels on every side.
    #[must_use]
    pub fn inset(&self, offset: i32) -> Self {
        let width = self.width.saturating_sub(offset.saturating_mul(2)).max(0);
        let height = self.height.saturating_sub(offset.saturating_mul(2)).max(0);
        Self::new(
            self.x.saturating_add(offset),
            self.y.saturating_add(offset),
            width,
            height,
        )
    }

    /// Position that centers an object of `size` inside this rectangle.
    #[must_use]
    pub const fn centered_origin(&self, size: Size) -> Point {
        Point::new(
            self.x + self.width / 2 - size.width() / 2,
            self.y + self.height / 2 - size.height() / 2,
        )
    }

    /// Square of side `side` sharing this rectangle's center.
    #[must_use]
    pub const fn hotspot(&self, side: i32) -> Self {
        let origin = self.centered_origin(Size::new(side, side));
        Self::new(origin.x(), origin.y(), side, side)
    }

    /// Reports whether the two rectangles share at least one pixel.
    #[must_use]
    pub const fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Reports whether any part of the segment crosses the covered pixels.
    ///
    /// The segment is clipped against the inclusive pixel bounds with the
    /// Cohen-Sutherland algorithm, so a rectangle whose right edge ends exactly
    /// where a vertical wall begins does not touch it.
    #[must_use]
    pub fn intersects_line(&self, line: &Line) -> bool {
        if self.is_empty() {
            return false;
        }

        let left = i64::from(self.x);
        let top = i64::from(self.y);
        let right = left + i64::from(self.width) - 1;
        let bottom = top + i64::from(self.height) - 1;

        let outcode = |x: i64, y: i64| -> u8 {
            let mut code = INSIDE;
            if x < left {
                code |= LEFT;
            } else if x > right {
                code |= RIGHT;
            }
            if y < top {
                code |= TOP;
            } else if y > bottom {
                code |= BOTTOM;
            }
            code
        };

        let (mut x1, mut y1) = (i64::from(line.start.x()), i64::from(line.start.y()));
        let (mut x2, mut y2) = (i64::from(line.end.x()), i64::from(line.end.y()));
        let mut code1 = outcode(x1, y1);
        let mut code2 = outcode(x2, y2);

        loop {
            if code1 | code2 == INSIDE {
                return true;
            }
            if code1 & code2 != INSIDE {
                return false;
            }

            let code = if code1 != INSIDE { code1 } else { code2 };
            let (x, y) = if code & TOP != 0 {
                (x1 + (x2 - x1) * (top - y1) / (y2 - y1), top)
            } else if code & BOTTOM != 0 {
                (x1 + (x2 - x1) * (bottom - y1) / (y2 - y1), bottom)
            } else if code & LEFT != 0 {
                (left, y1 + (y2 - y1) * (left - x1) / (x2 - x1))
            } else {
                (right, y1 + (y2 - y1) * (right - x1) / (x2 - x1))
            };

            if code == code1 {
                x1 = x;
                y1 = y;
                code1 = outcode(x1, y1);
            } else {
                x2 = x;
                y2 = y;
                code2 = outcode(x2, y2);
            }
        }
    }
}
