//! Legacy interchange form
//!
//! Remote generators and the persistence backend exchange commands as
//! `{ commandType, parameters, order }` where `parameters` is itself a JSON
//! string. The shape vocabulary is richer than [`Command`]: circles,
//! rectangles and triangles carry an independent fill and stroke.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

use super::{
    Command, CommandKind, DEFAULT_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH,
};
use crate::errors::{DrawError, Result};

/// One command in the order-indexed interchange form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDrawingCommand {
    /// Store-assigned id, absent for commands not yet persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_command_id: Option<u64>,
    /// Owning drawing, absent for free-standing commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_id: Option<u64>,
    /// `LINE`, `CIRCLE`, `RECTANGLE`, `TRIANGLE`, `TEXT` or `CLEAR`, any case
    pub command_type: String,
    /// JSON-encoded shape fields
    pub parameters: String,
    /// Execution position; ascending
    #[serde(default)]
    pub order: i64,
}

fn default_stroke_color() -> Option<String> {
    Some(DEFAULT_COLOR.to_string())
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

/// Stroke half of a legacy shape. `strokeColor` defaults to black; an explicit
/// `null` or empty string disables the outline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPaint {
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Option<String>,
    #[serde(default = "default_width")]
    pub stroke_width: f64,
}

impl LegacyPaint {
    pub fn fill(&self) -> Option<&str> {
        self.fill_color.as_deref().filter(|c| !c.is_empty())
    }

    pub fn stroke(&self) -> Option<&str> {
        self.stroke_color.as_deref().filter(|c| !c.is_empty())
    }
}

/// A decoded legacy payload, ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyShape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        width: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        paint: LegacyPaint,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: LegacyPaint,
    },
    Triangle {
        points: [(f64, f64); 3],
        paint: LegacyPaint,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        font_family: String,
        color: String,
    },
    Clear,
}

#[derive(Deserialize)]
struct LineParams {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default = "default_width")]
    width: f64,
}

#[derive(Deserialize)]
struct CircleParams {
    x: f64,
    y: f64,
    radius: f64,
    #[serde(flatten)]
    paint: LegacyPaint,
}

#[derive(Deserialize)]
struct RectParams {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(flatten)]
    paint: LegacyPaint,
}

#[derive(Deserialize)]
struct TriangleParams {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    #[serde(flatten)]
    paint: LegacyPaint,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextParams {
    x: f64,
    y: f64,
    text: String,
    #[serde(default = "default_font_size")]
    font_size: f64,
    #[serde(default = "default_font_family")]
    font_family: String,
    #[serde(default = "default_color")]
    color: String,
}

impl LegacyDrawingCommand {
    pub fn new(command_type: &str, parameters: &str, order: i64) -> Self {
        Self {
            drawing_command_id: None,
            drawing_id: None,
            command_type: command_type.to_string(),
            parameters: parameters.to_string(),
            order,
        }
    }

    pub fn kind(&self) -> Option<CommandKind> {
        CommandKind::from_name(&self.command_type)
    }

    fn parameters_value(&self) -> Result<Value> {
        serde_json::from_str(&self.parameters)
            .map_err(|e| DrawError::malformed(&self.command_type, e))
    }

    /// Decode `parameters` into the richer legacy vocabulary.
    ///
    /// `Ok(None)` means the command type is unknown and should be ignored.
    pub fn decode(&self) -> Result<Option<LegacyShape>> {
        let Some(kind) = self.kind() else {
            trace!("Ignoring unknown legacy command type '{}'", self.command_type);
            return Ok(None);
        };

        if kind == CommandKind::Clear {
            return Ok(Some(LegacyShape::Clear));
        }

        let mut value = self.parameters_value()?;
        let malformed = |e: serde_json::Error| DrawError::malformed(&self.command_type, e);

        // Primary payloads carry the fill as `color`
        if matches!(kind, CommandKind::Circle | CommandKind::Rect | CommandKind::Triangle) {
            if let Some(obj) = value.as_object_mut() {
                if !obj.contains_key("fillColor") {
                    if let Some(color) = obj.remove("color") {
                        obj.insert("fillColor".to_string(), color);
                    }
                }
            }
        }

        let shape = match kind {
            CommandKind::Line => {
                let p: LineParams = serde_json::from_value(value).map_err(malformed)?;
                LegacyShape::Line {
                    x1: p.x1,
                    y1: p.y1,
                    x2: p.x2,
                    y2: p.y2,
                    color: p.color,
                    width: p.width,
                }
            }
            CommandKind::Circle => {
                let p: CircleParams = serde_json::from_value(value).map_err(malformed)?;
                LegacyShape::Circle {
                    x: p.x,
                    y: p.y,
                    radius: p.radius,
                    paint: p.paint,
                }
            }
            CommandKind::Rect => {
                let p: RectParams = serde_json::from_value(value).map_err(malformed)?;
                LegacyShape::Rect {
                    x: p.x,
                    y: p.y,
                    width: p.width,
                    height: p.height,
                    paint: p.paint,
                }
            }
            CommandKind::Triangle => {
                let p: TriangleParams = serde_json::from_value(value).map_err(malformed)?;
                LegacyShape::Triangle {
                    points: [(p.x1, p.y1), (p.x2, p.y2), (p.x3, p.y3)],
                    paint: p.paint,
                }
            }
            CommandKind::Text => {
                let p: TextParams = serde_json::from_value(value).map_err(malformed)?;
                LegacyShape::Text {
                    x: p.x,
                    y: p.y,
                    text: p.text,
                    font_size: p.font_size,
                    font_family: p.font_family,
                    color: p.color,
                }
            }
            CommandKind::Clear => LegacyShape::Clear,
        };

        Ok(Some(shape))
    }

    /// Convert to the primary variant.
    ///
    /// `parameters` is read as a primary command body with `type` taken from
    /// `commandType`. A `fillColor` stands in for a missing `color`, since on
    /// the primary variant color governs fill.
    pub fn to_command(&self) -> Result<Option<Command>> {
        let Some(kind) = self.kind() else {
            trace!("Ignoring unknown legacy command type '{}'", self.command_type);
            return Ok(None);
        };

        let mut value = if kind == CommandKind::Clear {
            Value::Object(serde_json::Map::new())
        } else {
            self.parameters_value()?
        };

        let Some(obj) = value.as_object_mut() else {
            return Err(DrawError::malformed(
                &self.command_type,
                "parameters must be a JSON object",
            ));
        };

        if !obj.contains_key("color") {
            if let Some(fill) = obj.get("fillColor").cloned() {
                obj.insert("color".to_string(), fill);
            }
        }
        obj.insert("type".to_string(), Value::String(kind.as_str().to_string()));

        Command::from_value(value)
    }
}

/// Stable sort by `order`; ties keep their input position.
pub fn sorted_by_order(commands: &[LegacyDrawingCommand]) -> Vec<&LegacyDrawingCommand> {
    let mut sorted: Vec<&LegacyDrawingCommand> = commands.iter().collect();
    sorted.sort_by_key(|c| c.order);
    sorted
}

/// Convert a primary sequence to the interchange form, using the array index
/// as `order`.
///
/// Circles, rectangles and triangles carry `"strokeColor": null` so a replay
/// fills them without the interchange default outline.
pub fn to_legacy(commands: &[Command]) -> Result<Vec<LegacyDrawingCommand>> {
    commands
        .iter()
        .enumerate()
        .map(|(index, command)| {
            let mut value = serde_json::to_value(command)?;
            if matches!(
                command.kind(),
                CommandKind::Circle | CommandKind::Rect | CommandKind::Triangle
            ) {
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("strokeColor".to_string(), Value::Null);
                }
            }
            let parameters = value.to_string();
            Ok(LegacyDrawingCommand::new(
                &command.kind().as_str().to_ascii_uppercase(),
                &parameters,
                index as i64,
            ))
        })
        .collect()
}

/// Convert an interchange sequence to primary commands in execution order.
///
/// Entries whose payload cannot be decoded are reported and skipped.
pub fn from_legacy(commands: &[LegacyDrawingCommand]) -> Vec<Command> {
    sorted_by_order(commands)
        .into_iter()
        .filter_map(|legacy| match legacy.to_command() {
            Ok(command) => command,
            Err(e) => {
                warn!("Skipping legacy command at order {}: {}", legacy.order, e);
                None
            }
        })
        .collect()
}

/// Strict variant of [`from_legacy`]: the first undecodable entry fails the
/// whole conversion.
pub fn try_from_legacy(commands: &[LegacyDrawingCommand]) -> Result<Vec<Command>> {
    let mut out = Vec::with_capacity(commands.len());
    for legacy in sorted_by_order(commands) {
        if let Some(command) = legacy.to_command()? {
            out.push(command);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(kind: &str, params: &str, order: i64) -> LegacyDrawingCommand {
        LegacyDrawingCommand::new(kind, params, order)
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{"commandType":"CIRCLE","parameters":"{}","order":3}"#;
        let cmd: LegacyDrawingCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.command_type, "CIRCLE");
        assert_eq!(cmd.order, 3);
        assert!(cmd.drawing_id.is_none());
    }

    #[test]
    fn test_decode_circle_defaults_to_black_outline() {
        let shape = legacy("circle", r#"{"x":1,"y":2,"radius":3}"#, 0)
            .decode()
            .unwrap()
            .unwrap();
        let LegacyShape::Circle { paint, .. } = shape else {
            panic!("expected circle");
        };
        assert_eq!(paint.fill(), None);
        assert_eq!(paint.stroke(), Some("black"));
        assert!((paint.stroke_width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_null_stroke_disables_outline() {
        let shape = legacy(
            "RECTANGLE",
            r##"{"x":1,"y":2,"width":3,"height":4,"fillColor":"#fff","strokeColor":null}"##,
            0,
        )
        .decode()
        .unwrap()
        .unwrap();
        let LegacyShape::Rect { paint, .. } = shape else {
            panic!("expected rect");
        };
        assert_eq!(paint.fill(), Some("#fff"));
        assert_eq!(paint.stroke(), None);
    }

    #[test]
    fn test_decode_reads_primary_color_as_fill() {
        let params = r#"{"x1":0,"y1":0,"x2":4,"y2":0,"x3":2,"y3":3,"color":"red"}"#;
        let shape = legacy("TRIANGLE", params, 0)
            .decode()
            .unwrap()
            .unwrap();
        let LegacyShape::Triangle { paint, .. } = shape else {
            panic!("expected triangle");
        };
        assert_eq!(paint.fill(), Some("red"));
        assert_eq!(paint.stroke(), Some("black"));
    }

    #[test]
    fn test_decode_bad_json_is_malformed() {
        let err = legacy("LINE", "{x1: 0", 0).decode().unwrap_err();
        assert!(matches!(err, DrawError::MalformedCommand { .. }));
    }

    #[test]
    fn test_decode_unknown_type_is_ignored() {
        assert_eq!(legacy("POLYGON", "{}", 0).decode().unwrap(), None);
    }

    #[test]
    fn test_clear_ignores_parameters() {
        let shape = legacy("Clear", "not json", 0).decode().unwrap();
        assert_eq!(shape, Some(LegacyShape::Clear));
    }

    #[test]
    fn test_to_legacy_uses_index_as_order() {
        let commands = vec![
            Command::rect(0.0, 0.0, 10.0, 10.0, "red"),
            Command::Clear,
        ];
        let out = to_legacy(&commands).unwrap();
        assert_eq!(out[0].command_type, "RECT");
        assert_eq!(out[0].order, 0);
        assert_eq!(out[1].command_type, "CLEAR");
        assert_eq!(out[1].order, 1);
    }

    #[test]
    fn test_to_legacy_disables_shape_outline() {
        let commands = vec![
            Command::triangle([(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)], "green"),
            Command::line(0.0, 0.0, 1.0, 1.0, "red"),
        ];
        let out = to_legacy(&commands).unwrap();

        let Some(LegacyShape::Triangle { paint, .. }) = out[0].decode().unwrap() else {
            panic!("expected triangle");
        };
        assert_eq!(paint.fill(), Some("green"));
        assert_eq!(paint.stroke(), None);
        assert!(!out[1].parameters.contains("strokeColor"));
    }

    #[test]
    fn test_roundtrip_preserves_commands() {
        let commands = vec![
            Command::line(0.0, 0.0, 10.0, 10.0, "#FF0000"),
            Command::Circle {
                x: 5.0,
                y: 5.0,
                radius: 2.0,
                color: None,
            },
            Command::text(3.0, 4.0, "hello"),
            Command::Clear,
        ];
        let back = from_legacy(&to_legacy(&commands).unwrap());
        assert_eq!(back, commands);
    }

    #[test]
    fn test_from_legacy_sorts_and_skips() {
        let commands = vec![
            legacy("CIRCLE", r#"{"x":1,"y":1,"radius":1,"color":"red"}"#, 2),
            legacy("LINE", "garbage", 0),
            legacy("RECTANGLE", r#"{"x":0,"y":0,"width":1,"height":1,"fillColor":"blue"}"#, 1),
        ];
        let out = from_legacy(&commands);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Command::rect(0.0, 0.0, 1.0, 1.0, "blue"));
        assert_eq!(out[1], Command::circle(1.0, 1.0, 1.0, "red"));
    }

    #[test]
    fn test_try_from_legacy_fails_on_bad_entry() {
        let commands = vec![
            legacy("CLEAR", "", 0),
            legacy("TEXT", "{oops", 1),
        ];
        assert!(try_from_legacy(&commands).is_err());
    }
}
