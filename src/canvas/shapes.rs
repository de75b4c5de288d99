//! Geometric shapes and their coverage rasterizers
//!
//! Pixel centers sit at `(px + 0.5, py + 0.5)`. Edges are anti-aliased by a
//! half-pixel coverage ramp, so a stroke of width `w` fully covers pixels
//! whose center is within `w / 2` of the path.

use super::font;
use super::Color;

/// 2D point with f64 coordinates (subpixel precision)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from this point to the segment `a`-`b`
    pub fn distance_to_segment(&self, a: Point, b: Point) -> f64 {
        let ab = b - a;
        let len_sq = ab.x * ab.x + ab.y * ab.y;
        if len_sq < f64::EPSILON {
            return self.distance(&a);
        }
        let ap = *self - a;
        let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
        self.distance(&Point::new(a.x + ab.x * t, a.y + ab.y * t))
    }
}

impl std::ops::Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Grow on every side by `margin`
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    fn from_points(points: &[Point]) -> Rect {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// Shape trait for drawable primitives
pub trait Shape {
    /// Draw the shape onto a row-major pixel buffer
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]);

    /// Bounding box of the shape
    fn bounds(&self) -> Rect;
}

/// Visit every pixel whose center lies in `area`, clipped to the buffer,
/// blending `color` with the coverage returned by `coverage_at`.
fn cover<F>(area: Rect, color: Color, width: u32, height: u32, pixels: &mut [Color], coverage_at: F)
where
    F: Fn(Point) -> f64,
{
    if width == 0 || height == 0 {
        return;
    }
    let min_x = area.left().floor().max(0.0) as u32;
    let min_y = area.top().floor().max(0.0) as u32;
    let max_x = area.right().ceil().min(f64::from(width) - 1.0);
    let max_y = area.bottom().ceil().min(f64::from(height) - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let (max_x, max_y) = (max_x as u32, max_y as u32);

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let center = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
            let coverage = coverage_at(center).clamp(0.0, 1.0) as f32;
            if coverage <= 0.0 {
                continue;
            }
            let idx = (py * width + px) as usize;
            if let Some(dst) = pixels.get_mut(idx) {
                *dst = color.with_coverage(coverage).blend_over(dst);
            }
        }
    }
}

/// Stroke coverage for a pixel center at `distance` from the path
#[inline]
fn stroke_coverage(distance: f64, stroke_width: f64) -> f64 {
    stroke_width / 2.0 + 0.5 - distance
}

/// Line segment
#[derive(Debug, Clone, Copy)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub color: Color,
    pub width: f64,
}

impl Line {
    pub fn new(start: Point, end: Point, color: Color) -> Self {
        Self {
            start,
            end,
            color,
            width: 1.0,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

impl Shape for Line {
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]) {
        // Zero-length segments have no direction and draw nothing
        if self.start.distance(&self.end) < f64::EPSILON {
            return;
        }
        let area = self.bounds();
        cover(area, self.color, width, height, pixels, |p| {
            stroke_coverage(p.distance_to_segment(self.start, self.end), self.width)
        });
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(&[self.start, self.end]).inflate(self.width / 2.0 + 1.0)
    }
}

/// Circle
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
    /// `None` fills the disc, `Some(w)` strokes the rim with width `w`
    pub outline: Option<f64>,
}

impl Circle {
    pub fn filled(center: Point, radius: f64, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
            outline: None,
        }
    }

    pub fn outlined(center: Point, radius: f64, color: Color, stroke_width: f64) -> Self {
        Self {
            center,
            radius,
            color,
            outline: Some(stroke_width),
        }
    }
}

impl Shape for Circle {
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]) {
        cover(self.bounds(), self.color, width, height, pixels, |p| {
            let dist = p.distance(&self.center);
            match self.outline {
                None => self.radius + 0.5 - dist,
                Some(w) => stroke_coverage((dist - self.radius).abs(), w),
            }
        });
    }

    fn bounds(&self) -> Rect {
        let margin = self.outline.unwrap_or(0.0) / 2.0 + 1.0;
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
        .inflate(margin)
    }
}

/// Closed polygon, filled (convex only) or outlined
#[derive(Debug, Clone)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub color: Color,
    /// `None` fills the interior, `Some(w)` strokes the edges with width `w`
    pub outline: Option<f64>,
}

impl Polygon {
    pub fn rectangle(rect: Rect, color: Color) -> Self {
        Self {
            points: rect.corners().to_vec(),
            color,
            outline: None,
        }
    }

    pub fn triangle(points: [Point; 3], color: Color) -> Self {
        Self {
            points: points.to_vec(),
            color,
            outline: None,
        }
    }

    pub fn stroked(mut self, stroke_width: f64) -> Self {
        self.outline = Some(stroke_width);
        self
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    /// Signed distance to the interior of a convex polygon, positive inside
    fn inside_distance(&self, p: Point, orientation: f64) -> f64 {
        self.edges()
            .map(|(a, b)| {
                let edge = b - a;
                let len = (edge.x * edge.x + edge.y * edge.y).sqrt();
                let cross = edge.x * (p.y - a.y) - edge.y * (p.x - a.x);
                orientation * cross / len
            })
            .fold(f64::MAX, f64::min)
    }
}

impl Shape for Polygon {
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]) {
        if self.points.len() < 2 {
            return;
        }
        match self.outline {
            Some(w) => {
                cover(self.bounds(), self.color, width, height, pixels, |p| {
                    let nearest = self
                        .edges()
                        .map(|(a, b)| p.distance_to_segment(a, b))
                        .fold(f64::MAX, f64::min);
                    stroke_coverage(nearest, w)
                });
            }
            None => {
                let area = self.signed_area();
                if area.abs() < f64::EPSILON {
                    return;
                }
                let orientation = area.signum();
                cover(self.bounds(), self.color, width, height, pixels, |p| {
                    self.inside_distance(p, orientation) + 0.5
                });
            }
        }
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(&self.points).inflate(self.outline.unwrap_or(0.0) / 2.0 + 1.0)
    }
}

/// A run of text drawn with the built-in bitmap font
#[derive(Debug, Clone)]
pub struct TextRun {
    /// Left end of the baseline
    pub origin: Point,
    pub text: String,
    /// Glyph cell height in surface units
    pub size: f64,
    pub color: Color,
}

impl TextRun {
    fn scale(&self) -> f64 {
        self.size / f64::from(font::CELL_HEIGHT)
    }
}

impl Shape for TextRun {
    fn rasterize(&self, width: u32, height: u32, pixels: &mut [Color]) {
        let scale = self.scale();
        let top = self.origin.y - f64::from(font::GLYPH_HEIGHT) * scale;
        let mut pen_x = self.origin.x;

        for ch in self.text.chars() {
            if let Some(rows) = font::glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..font::GLYPH_WIDTH {
                        if bits & (1 << (font::GLYPH_WIDTH - 1 - col)) == 0 {
                            continue;
                        }
                        let cell = Rect::new(
                            pen_x + f64::from(col) * scale,
                            top + row as f64 * scale,
                            scale,
                            scale,
                        );
                        cover(cell, self.color, width, height, pixels, |p| {
                            let dx = (cell.right().min(p.x + 0.5) - cell.left().max(p.x - 0.5)).max(0.0);
                            let dy = (cell.bottom().min(p.y + 0.5) - cell.top().max(p.y - 0.5)).max(0.0);
                            dx * dy
                        });
                    }
                }
            }
            pen_x += f64::from(font::CELL_WIDTH) * scale;
        }
    }

    fn bounds(&self) -> Rect {
        let scale = self.scale();
        let glyphs = self.text.chars().count() as f64;
        Rect::new(
            self.origin.x,
            self.origin.y - f64::from(font::GLYPH_HEIGHT) * scale,
            glyphs * f64::from(font::CELL_WIDTH) * scale,
            f64::from(font::CELL_HEIGHT) * scale,
        )
    }
}
