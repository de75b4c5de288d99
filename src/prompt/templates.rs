//! Fixed and procedural command templates
//!
//! The star is a closed ten-vertex polygon: its last segment returns to the
//! first outer vertex, and no segment has zero length.

use std::f64::consts::PI;

use crate::command::Command;

/// Round half up, so `-2.5` becomes `-2` and `2.5` becomes `3`
fn round(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn segment(from: (f64, f64), to: (f64, f64), color: &str) -> Command {
    Command::line(round(from.0), round(from.1), round(to.0), round(to.1), color)
}

pub fn house() -> Vec<Command> {
    vec![
        Command::circle(250.0, 100.0, 30.0, "#FFCC00"),
        Command::rect(230.0, 130.0, 40.0, 80.0, "#FF6347"),
        Command::rect(210.0, 130.0, 10.0, 50.0, "#FF6347"),
        Command::rect(270.0, 130.0, 10.0, 50.0, "#FF6347"),
        Command::rect(230.0, 210.0, 10.0, 40.0, "#4682B4"),
        Command::rect(260.0, 210.0, 10.0, 40.0, "#4682B4"),
        Command::Line {
            x1: 250.0,
            y1: 130.0,
            x2: 250.0,
            y2: 180.0,
            color: Some("#000000".to_string()),
            width: Some(2.0),
        },
        Command::circle(250.0, 80.0, 10.0, "#FF0000"),
        Command::rect(350.0, 150.0, 100.0, 100.0, "#8B4513"),
        Command::rect(370.0, 180.0, 20.0, 20.0, "#FFFFFF"),
        Command::rect(410.0, 180.0, 20.0, 20.0, "#FFFFFF"),
        Command::rect(385.0, 210.0, 30.0, 40.0, "#0000FF"),
        Command::triangle([(350.0, 150.0), (400.0, 100.0), (450.0, 150.0)], "#A52A2A"),
        Command::rect(370.0, 210.0, 20.0, 40.0, "#8B4513"),
        Command::rect(410.0, 210.0, 20.0, 40.0, "#8B4513"),
    ]
}

pub fn sun() -> Vec<Command> {
    vec![Command::circle(100.0, 100.0, 40.0, "#FFD700")]
}

pub fn tree() -> Vec<Command> {
    vec![
        Command::rect(300.0, 250.0, 20.0, 80.0, "#8B4513"),
        Command::circle(310.0, 240.0, 50.0, "#228B22"),
    ]
}

pub fn boat() -> Vec<Command> {
    vec![
        Command::rect(200.0, 300.0, 120.0, 30.0, "#8B4513"),
        Command::triangle([(260.0, 300.0), (320.0, 300.0), (290.0, 220.0)], "#FFFFFF"),
        Command::rect(315.0, 220.0, 5.0, 20.0, "#000000"),
        Command::rect(320.0, 220.0, 15.0, 10.0, "#FF0000"),
    ]
}

pub fn flower() -> Vec<Command> {
    vec![
        Command::line(250.0, 350.0, 250.0, 280.0, "#228B22"),
        Command::circle(230.0, 320.0, 15.0, "#228B22"),
        Command::circle(270.0, 320.0, 15.0, "#228B22"),
        Command::circle(250.0, 280.0, 25.0, "#FF69B4"),
        Command::circle(250.0, 280.0, 15.0, "#FFFF00"),
    ]
}

/// Cardioid-like curve sampled every 10 degrees, 36 segments
pub fn heart() -> Vec<Command> {
    const CENTER: (f64, f64) = (250.0, 250.0);
    const SCALE: f64 = 30.0;
    const STEPS: u32 = 36;

    let point = |step: u32| {
        let angle = f64::from(step * 10) * PI / 180.0;
        let pinch = 1.0 - angle.sin();
        (
            CENTER.0 + SCALE * angle.cos() * pinch,
            CENTER.1 + SCALE * angle.sin() * pinch,
        )
    };

    (0..STEPS)
        .map(|i| segment(point(i), point(i + 1), "#FF0000"))
        .collect()
}

/// Five-pointed star outline, alternating outer and inner vertices, closed
pub fn star() -> Vec<Command> {
    const CENTER: (f64, f64) = (250.0, 250.0);
    const OUTER: f64 = 40.0;
    const INNER: f64 = 20.0;
    const POINTS: u32 = 5;

    let vertex = |i: u32| {
        let angle = f64::from(i) * PI / f64::from(POINTS);
        let radius = if i % 2 == 0 { OUTER } else { INNER };
        (CENTER.0 + radius * angle.cos(), CENTER.1 + radius * angle.sin())
    };

    let n = POINTS * 2;
    (0..n)
        .map(|i| segment(vertex(i), vertex((i + 1) % n), "#FFD700"))
        .collect()
}

/// Shape drawn when no keyword matches
pub fn fallback() -> Vec<Command> {
    vec![
        Command::rect(200.0, 200.0, 100.0, 100.0, "#4169E1"),
        Command::circle(250.0, 250.0, 20.0, "#FFD700"),
    ]
}

/// Half-ring of 180 radial segments banded in seven colors
pub fn rainbow() -> Vec<Command> {
    const CENTER: (f64, f64) = (250.0, 300.0);
    const INNER: f64 = 80.0;
    const BAND: f64 = 20.0;
    const SEGMENTS: u32 = 180;
    const COLORS: [&str; 7] = [
        "#FF0000", "#FF7F00", "#FFFF00", "#00FF00", "#0000FF", "#4B0082", "#9400D3",
    ];

    (0..SEGMENTS)
        .map(|i| {
            let angle = f64::from(i) * PI / 180.0;
            let (cos, sin) = (angle.cos(), angle.sin());
            let inner = (CENTER.0 + INNER * cos, CENTER.1 + INNER * sin);
            let outer = (CENTER.0 + (INNER + BAND) * cos, CENTER.1 + (INNER + BAND) * sin);
            let band = (f64::from(i) / f64::from(SEGMENTS) * COLORS.len() as f64).floor() as usize;
            segment(inner, outer, COLORS[band % COLORS.len()])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_coords(cmd: &Command) -> (f64, f64, f64, f64) {
        match cmd {
            Command::Line { x1, y1, x2, y2, .. } => (*x1, *y1, *x2, *y2),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round(2.5), 3.0);
        assert_eq!(round(-2.5), -2.0);
        assert_eq!(round(2.4999), 2.0);
    }

    #[test]
    fn test_fixed_template_sizes() {
        assert_eq!(house().len(), 15);
        assert_eq!(sun().len(), 1);
        assert_eq!(tree().len(), 2);
        assert_eq!(boat().len(), 4);
        assert_eq!(flower().len(), 5);
        assert_eq!(fallback().len(), 2);
    }

    #[test]
    fn test_heart_is_closed_and_integral() {
        let heart = heart();
        assert_eq!(heart.len(), 36);
        for pair in heart.windows(2) {
            let (_, _, ex, ey) = line_coords(&pair[0]);
            let (sx, sy, _, _) = line_coords(&pair[1]);
            assert_eq!((ex, ey), (sx, sy));
        }
        let (x1, y1, _, _) = line_coords(&heart[0]);
        assert_eq!((x1, y1), (280.0, 250.0));
        let (_, _, x2, y2) = line_coords(&heart[35]);
        assert_eq!((x2, y2), (280.0, 250.0));
    }

    #[test]
    fn test_star_vertices() {
        let star = star();
        assert_eq!(star.len(), 10);
        assert_eq!(line_coords(&star[0]), (290.0, 250.0, 266.0, 262.0));
        let (_, _, x, y) = line_coords(&star[9]);
        assert_eq!((x, y), (290.0, 250.0));
    }

    #[test]
    fn test_rainbow_bands() {
        let rainbow = rainbow();
        assert_eq!(rainbow.len(), 180);
        assert_eq!(line_coords(&rainbow[0]), (330.0, 300.0, 350.0, 300.0));
        let color = |i: usize| match &rainbow[i] {
            Command::Line { color, .. } => color.clone(),
            _ => None,
        };
        assert_eq!(color(0).as_deref(), Some("#FF0000"));
        assert_eq!(color(25).as_deref(), Some("#FF0000"));
        assert_eq!(color(26).as_deref(), Some("#FF7F00"));
        assert_eq!(color(179).as_deref(), Some("#9400D3"));
    }
}
