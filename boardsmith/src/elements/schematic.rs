//! Schematic-domain elements: symbol placement, ports, drawing primitives
//! and schematic wires.

use serde::{Deserialize, Serialize};

use super::{Point, Size};

/// Direction a port faces, relative to its component's unrotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FacingDirection {
    /// Rotate by a multiple of 90 degrees, matching [`crate::transform::Matrix::rotate_degrees`]
    /// (y grows downward, so positive angles turn clockwise on screen).
    pub fn rotated(self, degrees: f64) -> Self {
        let quarter_turns = ((degrees / 90.0).round() as i64).rem_euclid(4);
        let mut dir = self;
        for _ in 0..quarter_turns {
            dir = match dir {
                FacingDirection::Up => FacingDirection::Right,
                FacingDirection::Right => FacingDirection::Down,
                FacingDirection::Down => FacingDirection::Left,
                FacingDirection::Left => FacingDirection::Up,
            };
        }
        dir
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl Default for TextAnchor {
    fn default() -> Self {
        TextAnchor::Center
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicComponent {
    pub schematic_component_id: String,
    pub source_component_id: String,
    pub center: Point,
    /// Degrees
    pub rotation: f64,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicPort {
    pub schematic_port_id: String,
    pub source_port_id: String,
    pub schematic_component_id: String,
    pub center: Point,
    pub facing_direction: FacingDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicLine {
    pub schematic_line_id: String,
    pub schematic_component_id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicBox {
    pub schematic_box_id: String,
    pub schematic_component_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicText {
    pub schematic_text_id: String,
    pub schematic_component_id: String,
    pub text: String,
    pub position: Point,
    pub anchor: TextAnchor,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicTraceEdge {
    pub from: Point,
    pub to: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_schematic_port_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_schematic_port_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicTrace {
    pub schematic_trace_id: String,
    pub source_trace_id: String,
    pub edges: Vec<SchematicTraceEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_direction_rotation() {
        assert_eq!(FacingDirection::Up.rotated(0.0), FacingDirection::Up);
        assert_eq!(FacingDirection::Up.rotated(90.0), FacingDirection::Right);
        assert_eq!(FacingDirection::Up.rotated(180.0), FacingDirection::Down);
        assert_eq!(FacingDirection::Up.rotated(-90.0), FacingDirection::Left);
        assert_eq!(FacingDirection::Right.rotated(360.0), FacingDirection::Right);
    }
}
