//! Command model
//!
//! One [`Command`] is one drawing primitive. The in-memory sequence order is
//! authoritative; there is no explicit index on the primary variant.
//!
//! The order-indexed, string-typed interchange form spoken by remote
//! generators and stores lives in [`legacy`], together with the converters
//! in both directions.

pub mod legacy;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

use crate::errors::{DrawError, Result};

pub use legacy::{from_legacy, to_legacy, LegacyDrawingCommand, LegacyShape};

/// Color used for lines and text when none is given
pub const DEFAULT_COLOR: &str = "black";
/// Text size in surface units when none is given
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Font face when none is given
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Stroke width for lines when none is given
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Discriminant of a [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Line,
    Circle,
    Rect,
    Triangle,
    Text,
    Clear,
}

impl CommandKind {
    pub const ALL: [CommandKind; 6] = [
        CommandKind::Line,
        CommandKind::Circle,
        CommandKind::Rect,
        CommandKind::Triangle,
        CommandKind::Text,
        CommandKind::Clear,
    ];

    /// Name used in the `type` field of the JSON form
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Line => "line",
            CommandKind::Circle => "circle",
            CommandKind::Rect => "rect",
            CommandKind::Triangle => "triangle",
            CommandKind::Text => "text",
            CommandKind::Clear => "clear",
        }
    }

    /// Case-insensitive lookup. Accepts `rectangle` as used by the interchange form.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "line" => Some(CommandKind::Line),
            "circle" => Some(CommandKind::Circle),
            "rect" | "rectangle" => Some(CommandKind::Rect),
            "triangle" => Some(CommandKind::Triangle),
            "text" => Some(CommandKind::Text),
            "clear" => Some(CommandKind::Clear),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single drawing primitive.
///
/// For `circle`, `rect` and `triangle` an absent `color` means the shape is
/// not filled at all. `line` and `text` fall back to [`DEFAULT_COLOR`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Triangle {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        #[serde(rename = "fontSize", default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(rename = "fontFamily", default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Clear,
}

impl Command {
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, color: &str) -> Self {
        Command::Line {
            x1,
            y1,
            x2,
            y2,
            color: Some(color.to_string()),
            width: None,
        }
    }

    pub fn circle(x: f64, y: f64, radius: f64, color: &str) -> Self {
        Command::Circle {
            x,
            y,
            radius,
            color: Some(color.to_string()),
        }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64, color: &str) -> Self {
        Command::Rect {
            x,
            y,
            width,
            height,
            color: Some(color.to_string()),
        }
    }

    pub fn triangle(points: [(f64, f64); 3], color: &str) -> Self {
        let [(x1, y1), (x2, y2), (x3, y3)] = points;
        Command::Triangle {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
            color: Some(color.to_string()),
        }
    }

    pub fn text(x: f64, y: f64, text: &str) -> Self {
        Command::Text {
            x,
            y,
            text: text.to_string(),
            font_size: None,
            font_family: None,
            color: None,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Line { .. } => CommandKind::Line,
            Command::Circle { .. } => CommandKind::Circle,
            Command::Rect { .. } => CommandKind::Rect,
            Command::Triangle { .. } => CommandKind::Triangle,
            Command::Text { .. } => CommandKind::Text,
            Command::Clear => CommandKind::Clear,
        }
    }

    /// Check the numeric invariants serde cannot express.
    ///
    /// Coordinates must be finite; radius, width and height must be positive.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind().as_str();
        let finite = |field: &'static str, v: f64| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(DrawError::malformed(kind, format!("{field} is not a finite number")))
            }
        };
        let positive = |field: &'static str, v: f64| {
            finite(field, v)?;
            if v > 0.0 {
                Ok(())
            } else {
                Err(DrawError::malformed(kind, format!("{field} must be greater than zero")))
            }
        };

        match self {
            Command::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                ..
            } => {
                finite("x1", *x1)?;
                finite("y1", *y1)?;
                finite("x2", *x2)?;
                finite("y2", *y2)?;
                if let Some(w) = width {
                    positive("width", *w)?;
                }
            }
            Command::Circle { x, y, radius, .. } => {
                finite("x", *x)?;
                finite("y", *y)?;
                positive("radius", *radius)?;
            }
            Command::Rect {
                x,
                y,
                width,
                height,
                ..
            } => {
                finite("x", *x)?;
                finite("y", *y)?;
                positive("width", *width)?;
                positive("height", *height)?;
            }
            Command::Triangle {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
                ..
            } => {
                for (field, v) in [
                    ("x1", x1),
                    ("y1", y1),
                    ("x2", x2),
                    ("y2", y2),
                    ("x3", x3),
                    ("y3", y3),
                ] {
                    finite(field, *v)?;
                }
            }
            Command::Text {
                x, y, font_size, ..
            } => {
                finite("x", *x)?;
                finite("y", *y)?;
                if let Some(size) = font_size {
                    positive("fontSize", *size)?;
                }
            }
            Command::Clear => {}
        }
        Ok(())
    }

    /// Decode one JSON object.
    ///
    /// Returns `Ok(None)` for an unknown `type`, which is a reserved extension
    /// point rather than an error.
    pub fn from_value(value: Value) -> Result<Option<Command>> {
        let type_name = match value.get("type").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => return Err(DrawError::missing("command", "type")),
        };

        let Some(kind) = CommandKind::from_name(&type_name) else {
            trace!("Ignoring unknown command type '{}'", type_name);
            return Ok(None);
        };

        let mut value = value;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("type".to_string(), Value::String(kind.as_str().to_string()));
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DrawError::malformed(kind.as_str(), e))
    }
}

/// Parse a JSON array of commands.
///
/// The outer document must be an array. Elements that fail to decode are
/// reported and skipped; unknown kinds are dropped silently.
pub fn parse_commands(json: &str) -> Result<Vec<Command>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    Ok(from_values(values))
}

/// Decode already-parsed elements with the same skip rules as [`parse_commands`]
pub fn from_values(values: Vec<Value>) -> Vec<Command> {
    let mut commands = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        match Command::from_value(value) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(e) => warn!("Skipping command #{}: {}", index, e),
        }
    }

    commands
}

/// Serialize a command sequence to its JSON array form.
pub fn to_json(commands: &[Command]) -> Result<String> {
    serde_json::to_string_pretty(commands).map_err(DrawError::from)
}
