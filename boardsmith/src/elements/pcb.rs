//! PCB-domain elements: footprints, copper, silkscreen and the board outline.

use serde::{Deserialize, Serialize};

use super::{LayerRef, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbComponent {
    pub pcb_component_id: String,
    pub source_component_id: String,
    pub center: Point,
    /// Degrees
    pub rotation: f64,
    pub layer: LayerRef,
}

/// Where a trace lands on a component's footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbPort {
    pub pcb_port_id: String,
    pub source_port_id: String,
    pub pcb_component_id: String,
    pub x: f64,
    pub y: f64,
    pub layers: Vec<LayerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PadShape {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbSmtpad {
    pub pcb_smtpad_id: String,
    pub pcb_component_id: String,
    pub x: f64,
    pub y: f64,
    pub layer: LayerRef,
    #[serde(flatten)]
    pub shape: PadShape,
    /// Port names or pin numbers this pad belongs to
    pub port_hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbPlatedHole {
    pub pcb_plated_hole_id: String,
    pub pcb_component_id: String,
    pub x: f64,
    pub y: f64,
    pub hole_diameter: f64,
    pub outer_diameter: f64,
    pub layers: Vec<LayerRef>,
    pub port_hints: Vec<String>,
    /// Thickness of the board the hole is drilled through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_depth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbHole {
    pub pcb_hole_id: String,
    pub pcb_component_id: String,
    pub x: f64,
    pub y: f64,
    pub hole_diameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbVia {
    pub pcb_via_id: String,
    pub pcb_component_id: String,
    pub x: f64,
    pub y: f64,
    pub hole_diameter: f64,
    pub outer_diameter: f64,
    pub layers: Vec<LayerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_depth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbSilkscreenLine {
    pub pcb_silkscreen_line_id: String,
    pub pcb_component_id: String,
    pub layer: LayerRef,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbSilkscreenText {
    pub pcb_silkscreen_text_id: String,
    pub pcb_component_id: String,
    pub layer: LayerRef,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbRoutePoint {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub layer: LayerRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcb_port_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbTrace {
    pub pcb_trace_id: String,
    pub source_trace_id: String,
    pub route: Vec<PcbRoutePoint>,
}

impl PcbTrace {
    /// Width of the first route point; every point of a built trace shares it
    pub fn width(&self) -> Option<f64> {
        self.route.first().map(|p| p.width)
    }
}

/// Waypoints a trace should pass through before reaching a port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbTraceHint {
    pub pcb_trace_hint_id: String,
    /// Port selector the hint applies to, as written by the caller
    pub for_port: String,
    /// Offsets relative to the port position
    pub offsets: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbBoard {
    pub pcb_board_id: String,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}
