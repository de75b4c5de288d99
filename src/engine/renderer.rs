//! Synchronous command execution against a drawing surface

use tracing::{debug, trace, warn};

use crate::canvas::{Color, DrawingSurface, Fill, Font, Point, Rect, Stroke};
use crate::command::legacy::sorted_by_order;
use crate::command::{
    Command, LegacyDrawingCommand, LegacyShape, DEFAULT_COLOR, DEFAULT_FONT_FAMILY,
    DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH,
};
use crate::errors::{DrawError, Result};

/// Outcome of rendering a sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Commands dispatched to the surface
    pub drawn: usize,
    /// Commands dropped because their payload was malformed
    pub skipped: usize,
    /// Commands of an unknown kind
    pub ignored: usize,
}

impl RenderReport {
    pub fn total(&self) -> usize {
        self.drawn + self.skipped + self.ignored
    }
}

fn parse_color(kind: &str, color: &str) -> Result<Color> {
    Color::parse_css(color)
        .ok_or_else(|| DrawError::malformed(kind, format!("unrecognized color '{color}'")))
}

fn optional_fill(kind: &str, color: Option<&str>) -> Result<Option<Fill>> {
    color.map(|c| parse_color(kind, c).map(Fill::new)).transpose()
}

fn triangle_points(points: [(f64, f64); 3]) -> [Point; 3] {
    points.map(Point::from)
}

/// Dispatch a single command.
///
/// Malformed commands (non-finite coordinates, non-positive sizes,
/// unrecognized colors) return an error and leave the surface untouched.
pub fn render_command<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    command: &Command,
) -> Result<()> {
    command.validate()?;
    let kind = command.kind().as_str();

    match command {
        Command::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        } => {
            let color = parse_color(kind, color.as_deref().unwrap_or(DEFAULT_COLOR))?;
            let stroke = Stroke::new(color, width.unwrap_or(DEFAULT_LINE_WIDTH));
            surface.stroke_line(Point::new(*x1, *y1), Point::new(*x2, *y2), &stroke);
        }
        Command::Circle {
            x,
            y,
            radius,
            color,
        } => {
            if let Some(fill) = optional_fill(kind, color.as_deref())? {
                surface.fill_circle(Point::new(*x, *y), *radius, &fill);
            }
        }
        Command::Rect {
            x,
            y,
            width,
            height,
            color,
        } => {
            if let Some(fill) = optional_fill(kind, color.as_deref())? {
                surface.fill_rect(Rect::new(*x, *y, *width, *height), &fill);
            }
        }
        Command::Triangle {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
            color,
        } => {
            if let Some(fill) = optional_fill(kind, color.as_deref())? {
                let vertices = triangle_points([(*x1, *y1), (*x2, *y2), (*x3, *y3)]);
                surface.fill_triangle(vertices, &fill);
            }
        }
        Command::Text {
            x,
            y,
            text,
            font_size,
            font_family,
            color,
        } => {
            let fill = Fill::new(parse_color(kind, color.as_deref().unwrap_or(DEFAULT_COLOR))?);
            if text.is_empty() {
                return Ok(());
            }
            let font = Font::new(
                font_size.unwrap_or(DEFAULT_FONT_SIZE),
                font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY),
            );
            surface.draw_text(Point::new(*x, *y), text, &font, &fill);
        }
        Command::Clear => surface.reset(),
    }

    Ok(())
}

/// Render a sequence in array order.
///
/// A malformed command is reported and skipped; the rest still draws. An
/// empty sequence does nothing, not even a reset.
pub fn render<S: DrawingSurface + ?Sized>(surface: &mut S, commands: &[Command]) -> RenderReport {
    let mut report = RenderReport::default();

    for (index, command) in commands.iter().enumerate() {
        match render_command(surface, command) {
            Ok(()) => report.drawn += 1,
            Err(e) => {
                warn!("Skipping command #{} ({}): {}", index, command.kind(), e);
                report.skipped += 1;
            }
        }
    }

    debug!(
        drawn = report.drawn,
        skipped = report.skipped,
        "Rendered command sequence"
    );
    report
}

fn apply_paint<S, F, G>(
    surface: &mut S,
    kind: &str,
    fill_color: Option<&str>,
    stroke: Option<(&str, f64)>,
    fill_op: F,
    stroke_op: G,
) -> Result<()>
where
    S: DrawingSurface + ?Sized,
    F: FnOnce(&mut S, &Fill),
    G: FnOnce(&mut S, &Stroke),
{
    // Resolve both colors before drawing so a bad stroke leaves no fill behind
    let fill = optional_fill(kind, fill_color)?;
    let stroke = stroke
        .map(|(color, width)| {
            if width.is_finite() && width > 0.0 {
                parse_color(kind, color).map(|c| Stroke::new(c, width))
            } else {
                Err(DrawError::malformed(kind, "strokeWidth must be greater than zero"))
            }
        })
        .transpose()?;

    if let Some(fill) = fill {
        fill_op(surface, &fill);
    }
    if let Some(stroke) = stroke {
        stroke_op(surface, &stroke);
    }
    Ok(())
}

fn check_finite(kind: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DrawError::malformed(kind, "coordinates must be finite numbers"))
    }
}

/// Dispatch one decoded legacy shape, with independent fill and stroke.
pub fn render_legacy_shape<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    shape: &LegacyShape,
) -> Result<()> {
    match shape {
        LegacyShape::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        } => {
            check_finite("line", &[*x1, *y1, *x2, *y2, *width])?;
            let stroke = Stroke::new(parse_color("line", color)?, *width);
            surface.stroke_line(Point::new(*x1, *y1), Point::new(*x2, *y2), &stroke);
        }
        LegacyShape::Circle {
            x,
            y,
            radius,
            paint,
        } => {
            check_finite("circle", &[*x, *y, *radius])?;
            let center = Point::new(*x, *y);
            apply_paint(
                surface,
                "circle",
                paint.fill(),
                paint.stroke().map(|c| (c, paint.stroke_width)),
                |s, fill| s.fill_circle(center, *radius, fill),
                |s, stroke| s.stroke_circle(center, *radius, stroke),
            )?;
        }
        LegacyShape::Rect {
            x,
            y,
            width,
            height,
            paint,
        } => {
            check_finite("rectangle", &[*x, *y, *width, *height])?;
            let rect = Rect::new(*x, *y, *width, *height);
            apply_paint(
                surface,
                "rectangle",
                paint.fill(),
                paint.stroke().map(|c| (c, paint.stroke_width)),
                |s, fill| s.fill_rect(rect, fill),
                |s, stroke| s.stroke_rect(rect, stroke),
            )?;
        }
        LegacyShape::Triangle { points, paint } => {
            let coords: Vec<f64> = points.iter().flat_map(|(x, y)| [*x, *y]).collect();
            check_finite("triangle", &coords)?;
            let vertices = triangle_points(*points);
            apply_paint(
                surface,
                "triangle",
                paint.fill(),
                paint.stroke().map(|c| (c, paint.stroke_width)),
                |s, fill| s.fill_triangle(vertices, fill),
                |s, stroke| s.stroke_triangle(vertices, stroke),
            )?;
        }
        LegacyShape::Text {
            x,
            y,
            text,
            font_size,
            font_family,
            color,
        } => {
            check_finite("text", &[*x, *y, *font_size])?;
            let fill = Fill::new(parse_color("text", color)?);
            surface.draw_text(Point::new(*x, *y), text, &Font::new(*font_size, font_family), &fill);
        }
        LegacyShape::Clear => surface.reset(),
    }
    Ok(())
}

/// Render interchange commands.
///
/// Commands run in ascending `order` (stable for ties). Each payload is
/// decoded on its own; one that fails is reported and skipped.
pub fn render_legacy<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    commands: &[LegacyDrawingCommand],
) -> RenderReport {
    let mut report = RenderReport::default();

    for legacy in sorted_by_order(commands) {
        let outcome = legacy
            .decode()
            .and_then(|shape| shape.map(|s| render_legacy_shape(surface, &s)).transpose());
        match outcome {
            Ok(Some(())) => report.drawn += 1,
            Ok(None) => {
                trace!("Unknown legacy command '{}' ignored", legacy.command_type);
                report.ignored += 1;
            }
            Err(e) => {
                warn!(
                    "Skipping legacy command '{}' at order {}: {}",
                    legacy.command_type, legacy.order, e
                );
                report.skipped += 1;
            }
        }
    }

    debug!(
        drawn = report.drawn,
        skipped = report.skipped,
        ignored = report.ignored,
        "Rendered legacy sequence"
    );
    report
}
